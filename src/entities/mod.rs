//! Entity module - Contains all SeaORM entity definitions for the ledger database.
//! Debts and repayments are the two event tables; customers, products and credentials
//! are the collaborator tables the engine reads at its boundary.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod credential;
pub mod customer;
pub mod debt;
pub mod debt_line_item;
pub mod product;
pub mod repayment;
pub mod system_state;

// Re-export specific types to avoid conflicts
pub use credential::{Column as CredentialColumn, Entity as Credential, Model as CredentialModel};
pub use customer::{Column as CustomerColumn, Entity as Customer, Model as CustomerModel};
pub use debt::{Column as DebtColumn, Entity as Debt, Model as DebtModel};
pub use debt_line_item::{
    Column as DebtLineItemColumn, Entity as DebtLineItem, Model as DebtLineItemModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use repayment::{Column as RepaymentColumn, Entity as Repayment, Model as RepaymentModel};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
