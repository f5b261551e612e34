//! Shared test utilities for `ceiling-ledger`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::ceiling::create_ceiling,
    entities::{budget_ceiling, product, requisition},
    errors::Result,
    folio::{FolioGenerator, RequisitionFolios},
    money::line_total,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    // A single pooled connection keeps every caller on the same in-memory
    // database, including tasks spawned by concurrency tests.
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A folio generator over the requisition table with the default refresh TTL.
pub fn test_folios() -> FolioGenerator<RequisitionFolios> {
    FolioGenerator::new(RequisitionFolios)
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap_or(Decimal::ZERO)
}

/// Creates a test ceiling with sensible defaults.
///
/// # Defaults
/// * `area_id`: 1
/// * `chapter_id`: 21
/// * `funding_source_id`: 1
/// * `created_by`: `"test_user"`
pub async fn create_test_ceiling(
    db: &DatabaseConnection,
    amount: &str,
) -> Result<budget_ceiling::Model> {
    create_ceiling(db, 1, 21, 1, dec(amount), "test_user").await
}

/// Inserts a product row directly; products are read-only reference data for
/// this core, so there is no business-logic create path to go through.
pub async fn insert_test_product(
    db: &DatabaseConnection,
    name: &str,
    unit_price: &str,
    chapter_id: i64,
) -> Result<product::Model> {
    let row = product::ActiveModel {
        name: Set(name.to_string()),
        unit_price: Set(dec(unit_price)),
        unit: Set("unit".to_string()),
        chapter_id: Set(chapter_id),
        ..Default::default()
    };
    row.insert(db).await.map_err(Into::into)
}

/// Inserts a requisition row directly with its total computed from the
/// product's price, bypassing the engine (for seeding recalc/folio tests).
pub async fn insert_test_requisition(
    db: &DatabaseConnection,
    ceiling: &budget_ceiling::Model,
    product: &product::Model,
    folio: &str,
    month: &str,
    quantity: &str,
) -> Result<requisition::Model> {
    let quantity = dec(quantity);
    let now = Utc::now();
    let row = requisition::ActiveModel {
        folio: Set(folio.to_string()),
        area_id: Set(ceiling.area_id),
        budget_ceiling_id: Set(ceiling.id),
        product_id: Set(product.id),
        quantity: Set(quantity),
        month: Set(month.to_string()),
        total: Set(line_total(quantity, product.unit_price)),
        created_by: Set("test_user".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    row.insert(db).await.map_err(Into::into)
}

/// Initializes test tracing output; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
