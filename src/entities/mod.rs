//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod annual_project;
pub mod budget_ceiling;
pub mod justification;
pub mod product;
pub mod requisition;

// Re-export specific types to avoid conflicts
pub use annual_project::{
    Column as AnnualProjectColumn, Entity as AnnualProject, Model as AnnualProjectModel,
};
pub use budget_ceiling::{
    Column as BudgetCeilingColumn, Entity as BudgetCeiling, Model as BudgetCeilingModel,
};
pub use justification::{
    Column as JustificationColumn, Entity as Justification, Model as JustificationModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use requisition::{
    Column as RequisitionColumn, Entity as Requisition, Model as RequisitionModel,
};
