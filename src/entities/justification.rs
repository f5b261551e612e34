//! Justification entity - One free-text justification per (chapter, area).
//!
//! The unified requisition flow upserts one row per distinct product
//! classification it touches: update if a record already exists for the
//! (chapter, area) pair, insert otherwise.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Justification database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "justifications")]
pub struct Model {
    /// Unique identifier for the justification
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Budget chapter (classification) the justification covers
    pub chapter_id: i64,
    /// Administrative area the justification covers
    pub area_id: i64,
    /// Free-text justification supplied by the requester
    pub text: String,
    /// When the justification was created
    pub created_at: DateTimeUtc,
    /// When the justification was last modified
    pub updated_at: DateTimeUtc,
}

/// Justifications stand alone; they are keyed by (chapter, area) in code.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
