//! Requisition engine.
//!
//! Creates, updates, and deletes requisition line items and drives the annual
//! project ledger. Single-row and unified flows are all-or-nothing inside one
//! transaction; batch flows are deliberately best-effort, collecting per-item
//! failures into a [`BatchResult`] while the remaining items proceed. The two
//! policies get two distinct return shapes on purpose.

use crate::entities::{
    BudgetCeiling, Justification, Product, Requisition, annual_project, budget_ceiling,
    justification, product, requisition,
};
use crate::errors::{Error, Result};
use crate::folio::{FolioGenerator, FolioStore};
use crate::money::{line_total, round_money};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, Set, TransactionTrait,
};
use std::collections::BTreeSet;

use super::annual_project::{apply_usage, get_or_create, reconcile};
use super::commit_or_rollback;

/// Folio prefix for requisition records.
pub const FOLIO_PREFIX: &str = "REQ";

/// The fiscal year requisitions are ledgered against.
#[must_use]
pub fn current_fiscal_year() -> i32 {
    Utc::now().year()
}

/// One (month, quantity) pair inside a product request.
#[derive(Debug, Clone)]
pub struct MonthQuantity {
    /// Month code `"1"`..`"12"`, or `"0"` for a bulk request
    pub month: String,
    /// Requested quantity for that month
    pub quantity: Decimal,
}

/// One product fanned across months, as accepted by the unified flow.
#[derive(Debug, Clone)]
pub struct ProductRequest {
    /// Product to requisition
    pub product_id: i64,
    /// Per-month quantities; zero-quantity entries are skipped
    pub months: Vec<MonthQuantity>,
}

/// One explicit (product, month, quantity) tuple for the batch flows.
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Product to requisition
    pub product_id: i64,
    /// Month code `"0"`..`"12"`
    pub month: String,
    /// Requested quantity
    pub quantity: Decimal,
}

/// A batch item that failed, paired with the error that sank it.
#[derive(Debug)]
pub struct BatchFailure {
    /// The item as submitted
    pub item: BatchItem,
    /// Why it failed
    pub error: Error,
}

/// Best-effort batch outcome: successes alongside collected failures.
#[derive(Debug)]
pub struct BatchResult {
    /// Requisition rows that were created
    pub succeeded: Vec<requisition::Model>,
    /// Items that failed, with their errors
    pub failed: Vec<BatchFailure>,
    /// Ledger state after reconciliation (absent when nothing was created)
    pub project: Option<annual_project::Model>,
}

/// Outcome of the all-or-nothing unified flow.
#[derive(Debug)]
pub struct UnifiedOutcome {
    /// Requisition rows created, in submission order
    pub requisitions: Vec<requisition::Model>,
    /// Running cost total across all created rows
    pub total_cost: Decimal,
    /// Ledger state after reconciliation
    pub project: annual_project::Model,
}

/// Field changes for [`update_requisition`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct RequisitionUpdate {
    /// New product (total is recomputed)
    pub product_id: Option<i64>,
    /// New quantity (total is recomputed)
    pub quantity: Option<Decimal>,
    /// New month code
    pub month: Option<String>,
    /// New owning ceiling (both old and new ceilings are reconciled)
    pub budget_ceiling_id: Option<i64>,
}

fn validate_area(area_id: i64) -> Result<()> {
    if area_id <= 0 {
        return Err(Error::validation(format!("invalid area id {area_id}")));
    }
    Ok(())
}

fn validate_month(month: &str) -> Result<()> {
    // Canonical codes only: "01" or "007" are not month codes even though
    // they parse to an in-range number.
    let valid = month
        .parse::<u8>()
        .map(|code| code <= 12 && code.to_string() == month)
        .unwrap_or(false);
    if !valid {
        return Err(Error::validation(format!(
            "month must be \"0\"..\"12\", got {month:?}"
        )));
    }
    Ok(())
}

fn validate_quantity(quantity: Decimal) -> Result<()> {
    if quantity <= Decimal::ZERO {
        return Err(Error::validation(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    Ok(())
}

/// Inserts one requisition row with its total computed from the product price.
async fn insert_row<C: ConnectionTrait>(
    db: &C,
    folio: String,
    ceiling_id: i64,
    area_id: i64,
    product: &product::Model,
    month: &str,
    quantity: Decimal,
    actor: &str,
) -> Result<requisition::Model> {
    let now = Utc::now();
    let row = requisition::ActiveModel {
        folio: Set(folio),
        area_id: Set(area_id),
        budget_ceiling_id: Set(ceiling_id),
        product_id: Set(product.id),
        quantity: Set(quantity),
        month: Set(month.to_string()),
        total: Set(line_total(quantity, product.unit_price)),
        created_by: Set(actor.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    row.insert(db).await.map_err(Into::into)
}

async fn require_ceiling<C: ConnectionTrait>(
    db: &C,
    ceiling_id: i64,
) -> Result<budget_ceiling::Model> {
    BudgetCeiling::find_by_id(ceiling_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("budget ceiling", ceiling_id))
}

async fn require_product<C: ConnectionTrait>(db: &C, product_id: i64) -> Result<product::Model> {
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("product", product_id))
}

/// Creates one requisition and updates the ledger through the incremental path.
pub async fn create_single<S: FolioStore>(
    db: &DatabaseConnection,
    folios: &FolioGenerator<S>,
    ceiling_id: i64,
    area_id: i64,
    product_id: i64,
    month: &str,
    quantity: Decimal,
    actor: &str,
) -> Result<requisition::Model> {
    validate_area(area_id)?;
    validate_month(month)?;
    validate_quantity(quantity)?;

    let txn = db.begin().await?;
    let result = async {
        let ceiling = require_ceiling(&txn, ceiling_id).await?;
        let product = require_product(&txn, product_id).await?;

        let year = current_fiscal_year();
        let folio = folios.generate(&txn, FOLIO_PREFIX, year).await?;
        let row = insert_row(&txn, folio, ceiling_id, area_id, &product, month, quantity, actor)
            .await?;

        // Common case: one new row, incremental ledger update.
        let project = get_or_create(&txn, &ceiling, year).await?;
        apply_usage(&txn, project, row.total).await?;
        Ok(row)
    }
    .await;
    commit_or_rollback(txn, result).await
}

/// Creates one requisition row per product×month with quantity > 0, upserts
/// one justification per distinct product chapter touched, and reconciles the
/// annual project. All-or-nothing for the requisition rows.
#[allow(clippy::too_many_lines)]
pub async fn create_unified<S: FolioStore>(
    db: &DatabaseConnection,
    folios: &FolioGenerator<S>,
    ceiling_id: i64,
    area_id: i64,
    actor: &str,
    products: &[ProductRequest],
    justification: Option<&str>,
) -> Result<UnifiedOutcome> {
    validate_area(area_id)?;
    if products.is_empty() {
        return Err(Error::validation("no products supplied"));
    }
    for group in products {
        for entry in &group.months {
            validate_month(&entry.month)?;
            if entry.quantity < Decimal::ZERO {
                return Err(Error::validation(format!(
                    "quantity must not be negative, got {}",
                    entry.quantity
                )));
            }
        }
    }

    let txn = db.begin().await?;
    let result = async {
        let ceiling = require_ceiling(&txn, ceiling_id).await?;

        // Hard validation before any write: every product must resolve.
        let mut resolved = Vec::with_capacity(products.len());
        for group in products {
            let product = require_product(&txn, group.product_id).await?;
            resolved.push((group, product));
        }

        let year = current_fiscal_year();
        let mut rows = Vec::new();
        let mut total_cost = Decimal::ZERO;
        let mut chapters_touched = BTreeSet::new();

        for (group, product) in &resolved {
            for entry in &group.months {
                if entry.quantity.is_zero() {
                    continue;
                }
                let folio = folios.generate(&txn, FOLIO_PREFIX, year).await?;
                let row = insert_row(
                    &txn,
                    folio,
                    ceiling_id,
                    area_id,
                    product,
                    &entry.month,
                    entry.quantity,
                    actor,
                )
                .await?;
                total_cost = round_money(total_cost + row.total);
                chapters_touched.insert(product.chapter_id);
                rows.push(row);
            }
        }

        if let Some(text) = justification {
            for chapter_id in &chapters_touched {
                upsert_justification(&txn, *chapter_id, area_id, text).await?;
            }
        }

        let project = reconcile(&txn, &ceiling, year).await?;
        Ok(UnifiedOutcome {
            requisitions: rows,
            total_cost,
            project,
        })
    }
    .await;
    commit_or_rollback(txn, result).await
}

/// Updates one justification per (chapter, area) or inserts it when absent.
async fn upsert_justification<C: ConnectionTrait>(
    db: &C,
    chapter_id: i64,
    area_id: i64,
    text: &str,
) -> Result<()> {
    let now = Utc::now();
    let existing = Justification::find()
        .filter(justification::Column::ChapterId.eq(chapter_id))
        .filter(justification::Column::AreaId.eq(area_id))
        .one(db)
        .await?;

    if let Some(record) = existing {
        let mut active: justification::ActiveModel = record.into();
        active.text = Set(text.to_string());
        active.updated_at = Set(now);
        active.update(db).await?;
    } else {
        let record = justification::ActiveModel {
            chapter_id: Set(chapter_id),
            area_id: Set(area_id),
            text: Set(text.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        record.insert(db).await?;
    }
    Ok(())
}

/// Updates a requisition; recomputes the total when product or quantity
/// changes and reconciles every ceiling whose ledger the change affects.
pub async fn update_requisition(
    db: &DatabaseConnection,
    id: i64,
    changes: RequisitionUpdate,
    _actor: &str,
) -> Result<requisition::Model> {
    if let Some(month) = &changes.month {
        validate_month(month)?;
    }
    if let Some(quantity) = changes.quantity {
        validate_quantity(quantity)?;
    }

    let txn = db.begin().await?;
    let result = async {
        let row = Requisition::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| Error::not_found("requisition", id))?;

        let old_ceiling_id = row.budget_ceiling_id;
        let new_ceiling_id = changes.budget_ceiling_id.unwrap_or(old_ceiling_id);
        let new_ceiling = require_ceiling(&txn, new_ceiling_id).await?;

        let product_id = changes.product_id.unwrap_or(row.product_id);
        let quantity = changes.quantity.unwrap_or(row.quantity);
        let recompute = product_id != row.product_id || quantity != row.quantity;

        let mut total = row.total;
        if recompute {
            let product = require_product(&txn, product_id).await?;
            total = line_total(quantity, product.unit_price);
        }

        let month = changes.month.clone().unwrap_or_else(|| row.month.clone());

        let mut active: requisition::ActiveModel = row.into();
        active.product_id = Set(product_id);
        active.quantity = Set(quantity);
        active.month = Set(month);
        active.budget_ceiling_id = Set(new_ceiling_id);
        active.total = Set(total);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        let year = current_fiscal_year();
        if old_ceiling_id == new_ceiling_id {
            reconcile(&txn, &new_ceiling, year).await?;
        } else {
            // The row moved: both ledgers must be recomputed independently.
            let old_ceiling = require_ceiling(&txn, old_ceiling_id).await?;
            reconcile(&txn, &old_ceiling, year).await?;
            reconcile(&txn, &new_ceiling, year).await?;
        }

        Ok(updated)
    }
    .await;
    commit_or_rollback(txn, result).await
}

/// Deletes a requisition and reconciles the owning ceiling's ledger.
pub async fn delete_requisition(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;
    let result = async {
        let row = Requisition::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| Error::not_found("requisition", id))?;

        let ceiling = require_ceiling(&txn, row.budget_ceiling_id).await?;
        row.delete(&txn).await?;

        reconcile(&txn, &ceiling, current_fiscal_year()).await?;
        Ok(())
    }
    .await;
    commit_or_rollback(txn, result).await
}

/// Creates requisitions for explicit (product, month, quantity) tuples,
/// best-effort: per-item failures are collected, the rest proceed, and the
/// ledger is reconciled once at the end.
pub async fn create_batch<S: FolioStore>(
    db: &DatabaseConnection,
    folios: &FolioGenerator<S>,
    ceiling_id: i64,
    area_id: i64,
    actor: &str,
    items: Vec<BatchItem>,
) -> Result<BatchResult> {
    validate_area(area_id)?;

    let txn = db.begin().await?;
    let result = async {
        // A missing ceiling sinks the whole call; it is a pre-write failure.
        let ceiling = require_ceiling(&txn, ceiling_id).await?;
        let year = current_fiscal_year();

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for item in items {
            match batch_item(&txn, folios, ceiling_id, area_id, year, actor, &item).await {
                Ok(row) => succeeded.push(row),
                Err(error) => failed.push(BatchFailure { item, error }),
            }
        }

        let project = if succeeded.is_empty() {
            None
        } else {
            Some(reconcile(&txn, &ceiling, year).await?)
        };

        Ok(BatchResult {
            succeeded,
            failed,
            project,
        })
    }
    .await;
    commit_or_rollback(txn, result).await
}

async fn batch_item<S: FolioStore, C: ConnectionTrait>(
    txn: &C,
    folios: &FolioGenerator<S>,
    ceiling_id: i64,
    area_id: i64,
    year: i32,
    actor: &str,
    item: &BatchItem,
) -> Result<requisition::Model> {
    validate_month(&item.month)?;
    validate_quantity(item.quantity)?;
    let product = require_product(txn, item.product_id).await?;
    let folio = folios.generate(txn, FOLIO_PREFIX, year).await?;
    insert_row(
        txn,
        folio,
        ceiling_id,
        area_id,
        &product,
        &item.month,
        item.quantity,
        actor,
    )
    .await
}

/// Fans one product across several months, best-effort per month.
pub async fn create_monthly<S: FolioStore>(
    db: &DatabaseConnection,
    folios: &FolioGenerator<S>,
    ceiling_id: i64,
    area_id: i64,
    product_id: i64,
    months: Vec<MonthQuantity>,
    actor: &str,
) -> Result<BatchResult> {
    let items = months
        .into_iter()
        .map(|entry| BatchItem {
            product_id,
            month: entry.month,
            quantity: entry.quantity,
        })
        .collect();
    create_batch(db, folios, ceiling_id, area_id, actor, items).await
}

/// Fans several product groups across their months, best-effort per item.
pub async fn create_bulk_monthly<S: FolioStore>(
    db: &DatabaseConnection,
    folios: &FolioGenerator<S>,
    ceiling_id: i64,
    area_id: i64,
    groups: Vec<ProductRequest>,
    actor: &str,
) -> Result<BatchResult> {
    let items = groups
        .into_iter()
        .flat_map(|group| {
            group.months.into_iter().map(move |entry| BatchItem {
                product_id: group.product_id,
                month: entry.month,
                quantity: entry.quantity,
            })
        })
        .collect();
    create_batch(db, folios, ceiling_id, area_id, actor, items).await
}
