//! Product entity - Read-only reference data supplying unit prices.
//!
//! Products belong to a budget chapter (classification code) which groups
//! requisitions for justification and reporting. This core never mutates
//! products; a missing price is treated as zero by the recalculation path.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Printer paper", "Diesel")
    pub name: String,
    /// Current unit price
    pub unit_price: Decimal,
    /// Unit of measure (e.g., "box", "litre")
    pub unit: String,
    /// Budget chapter (classification) this product belongs to
    pub chapter_id: i64,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product appears in many requisitions
    #[sea_orm(has_many = "super::requisition::Entity")]
    Requisitions,
}

impl Related<super::requisition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requisitions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
