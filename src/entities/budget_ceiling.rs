//! Budget ceiling entity - The allocation envelope per (area, chapter, funding source).
//!
//! A ceiling caps how much an area may requisition against one budget chapter
//! and funding source. Annual projects derive their assigned amount from it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget ceiling database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_ceilings")]
pub struct Model {
    /// Unique identifier for the ceiling
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Administrative area this ceiling belongs to
    pub area_id: i64,
    /// Budget chapter (classification) code
    pub chapter_id: i64,
    /// Funding source code
    pub funding_source_id: i64,
    /// Maximum amount allocated to this (area, chapter, funding source) tuple
    pub budgeted_amount: Decimal,
    /// Actor who created the ceiling
    pub created_by: String,
    /// When the ceiling was created
    pub created_at: DateTimeUtc,
    /// When the ceiling was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between BudgetCeiling and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One ceiling has one annual project per fiscal year
    #[sea_orm(has_many = "super::annual_project::Entity")]
    AnnualProjects,
    /// One ceiling has many requisitions drawing against it
    #[sea_orm(has_many = "super::requisition::Entity")]
    Requisitions,
}

impl Related<super::annual_project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AnnualProjects.def()
    }
}

impl Related<super::requisition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requisitions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
