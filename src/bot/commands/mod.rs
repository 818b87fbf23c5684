//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Admin commands: category reassignment, deletion, secrets
pub mod admin;

/// Balance and category views
pub mod balance;

/// Customer management commands
pub mod customer;

/// Debt and repayment entry commands
pub mod entry;

/// General utility commands
pub mod general;

/// Small parsing helpers shared by the commands
pub mod utils;

// Export commands
pub use admin::*;
pub use balance::*;
pub use customer::*;
pub use entry::*;
pub use general::*;
