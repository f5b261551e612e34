//! Requisition entity - A line-item request drawing against a budget ceiling.
//!
//! Each row records a product, a quantity, the month it is scheduled for
//! (`"1"`..`"12"`, or `"0"` for a bulk/unscheduled request) and the total
//! computed at creation time as `round(quantity * unit_price, 3)`. The folio
//! column carries a storage-level uniqueness constraint as the final backstop
//! behind the generator's bounded collision retries.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Requisition database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requisitions")]
pub struct Model {
    /// Unique identifier for the requisition
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable sequential identifier, e.g. `"REQ-2025-0001"`
    #[sea_orm(unique)]
    pub folio: String,
    /// Administrative area that raised the requisition
    pub area_id: i64,
    /// Ceiling this requisition draws against
    pub budget_ceiling_id: i64,
    /// Product being requisitioned
    pub product_id: i64,
    /// Requested quantity (strictly positive)
    pub quantity: Decimal,
    /// Month code `"1"`..`"12"`, or `"0"` for a bulk request
    pub month: String,
    /// `round(quantity * unit_price, 3)` at creation/update time
    pub total: Decimal,
    /// Actor who created the requisition
    pub created_by: String,
    /// When the requisition was created
    pub created_at: DateTimeUtc,
    /// When the requisition was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Requisition and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each requisition draws against one budget ceiling
    #[sea_orm(
        belongs_to = "super::budget_ceiling::Entity",
        from = "Column::BudgetCeilingId",
        to = "super::budget_ceiling::Column::Id"
    )]
    BudgetCeiling,
    /// Each requisition references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::budget_ceiling::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetCeiling.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
