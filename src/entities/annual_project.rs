//! Annual project entity - The derived ledger record per (ceiling, fiscal year).
//!
//! Tracks assigned, used, and available amounts. The crate-wide invariant is
//! `available_amount == assigned_amount - used_amount` at three decimal places
//! after every mutation. A project that carries history is never physically
//! removed, only flipped to the inactive status.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status value for a live annual project.
pub const STATUS_ACTIVE: &str = "active";
/// Status value for a soft-deactivated annual project.
pub const STATUS_INACTIVE: &str = "inactive";

/// Annual project database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "annual_projects")]
pub struct Model {
    /// Unique identifier for the annual project
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Fiscal year this ledger record covers
    pub year: i32,
    /// Ceiling this project derives from
    pub budget_ceiling_id: i64,
    /// Amount assigned for the year (mirrors the ceiling's budgeted amount)
    pub assigned_amount: Decimal,
    /// Amount consumed by live requisitions
    pub used_amount: Decimal,
    /// Remaining amount: `assigned_amount - used_amount`
    pub available_amount: Decimal,
    /// `"active"` or `"inactive"` (soft deactivation, history preserved)
    pub status: String,
}

/// Defines relationships between AnnualProject and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each annual project derives from one budget ceiling
    #[sea_orm(
        belongs_to = "super::budget_ceiling::Entity",
        from = "Column::BudgetCeilingId",
        to = "super::budget_ceiling::Column::Id"
    )]
    BudgetCeiling,
}

impl Related<super::budget_ceiling::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetCeiling.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
