//! Budget ceiling store.
//!
//! CRUD for the allocation envelope per (area, chapter, funding source).
//! Updating a ceiling's budgeted amount cascades the delta onto every active
//! annual project that references it: assigned and available shift by exactly
//! the delta while the used amount is untouched, so already-consumed budget is
//! never overwritten. Deletion is a hard delete guarded by a conflict check;
//! financial history is never cascaded away.

use crate::entities::{
    AnnualProject, BudgetCeiling, Requisition, annual_project, budget_ceiling, requisition,
};
use crate::errors::{Error, Result};
use crate::money::round_money;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::commit_or_rollback;

/// Field changes for [`update_ceiling`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct CeilingUpdate {
    /// New administrative area
    pub area_id: Option<i64>,
    /// New budget chapter
    pub chapter_id: Option<i64>,
    /// New funding source
    pub funding_source_id: Option<i64>,
    /// New budgeted amount (cascades onto active annual projects)
    pub budgeted_amount: Option<Decimal>,
}

/// Creates a budget ceiling after validating the amount is non-negative.
pub async fn create_ceiling<C: ConnectionTrait>(
    db: &C,
    area_id: i64,
    chapter_id: i64,
    funding_source_id: i64,
    budgeted_amount: Decimal,
    actor: &str,
) -> Result<budget_ceiling::Model> {
    if budgeted_amount < Decimal::ZERO {
        return Err(Error::validation(format!(
            "budgeted amount must be non-negative, got {budgeted_amount}"
        )));
    }

    let now = Utc::now();
    let ceiling = budget_ceiling::ActiveModel {
        area_id: Set(area_id),
        chapter_id: Set(chapter_id),
        funding_source_id: Set(funding_source_id),
        budgeted_amount: Set(round_money(budgeted_amount)),
        created_by: Set(actor.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    ceiling.insert(db).await.map_err(Into::into)
}

/// Finds a ceiling by its unique ID.
pub async fn get_ceiling_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<budget_ceiling::Model>> {
    BudgetCeiling::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Lists all ceilings ordered by ID.
pub async fn list_ceilings(db: &DatabaseConnection) -> Result<Vec<budget_ceiling::Model>> {
    BudgetCeiling::find()
        .order_by_asc(budget_ceiling::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates a ceiling and cascades any amount delta onto its active annual
/// projects. Returns the updated ceiling and the count of projects touched.
pub async fn update_ceiling(
    db: &DatabaseConnection,
    id: i64,
    changes: CeilingUpdate,
    _actor: &str,
) -> Result<(budget_ceiling::Model, usize)> {
    if let Some(amount) = changes.budgeted_amount {
        if amount < Decimal::ZERO {
            return Err(Error::validation(format!(
                "budgeted amount must be non-negative, got {amount}"
            )));
        }
    }

    let txn = db.begin().await?;
    let result = update_in_txn(&txn, id, changes).await;
    commit_or_rollback(txn, result).await
}

async fn update_in_txn<C: ConnectionTrait>(
    txn: &C,
    id: i64,
    changes: CeilingUpdate,
) -> Result<(budget_ceiling::Model, usize)> {
    let ceiling = BudgetCeiling::find_by_id(id)
        .one(txn)
        .await?
        .ok_or_else(|| Error::not_found("budget ceiling", id))?;

    let old_amount = ceiling.budgeted_amount;
    let new_amount = changes
        .budgeted_amount
        .map_or(old_amount, round_money);
    let delta = new_amount - old_amount;

    let mut active: budget_ceiling::ActiveModel = ceiling.into();
    if let Some(area_id) = changes.area_id {
        active.area_id = Set(area_id);
    }
    if let Some(chapter_id) = changes.chapter_id {
        active.chapter_id = Set(chapter_id);
    }
    if let Some(funding_source_id) = changes.funding_source_id {
        active.funding_source_id = Set(funding_source_id);
    }
    active.budgeted_amount = Set(new_amount);
    active.updated_at = Set(Utc::now());
    let updated = active.update(txn).await?;

    if delta.is_zero() {
        return Ok((updated, 0));
    }

    // Shift assigned and available by the delta; used is never touched here.
    let projects = AnnualProject::find()
        .filter(annual_project::Column::BudgetCeilingId.eq(id))
        .filter(annual_project::Column::Status.eq(annual_project::STATUS_ACTIVE))
        .all(txn)
        .await?;

    let mut touched = 0;
    for project in projects {
        let assigned = round_money(project.assigned_amount + delta);
        let available = round_money(project.available_amount + delta);
        let mut active: annual_project::ActiveModel = project.into();
        active.assigned_amount = Set(assigned);
        active.available_amount = Set(available);
        active.update(txn).await?;
        touched += 1;
    }

    Ok((updated, touched))
}

/// Hard-deletes a ceiling. Fails with [`Error::Conflict`] while any requisition
/// or annual project still references it.
pub async fn delete_ceiling(db: &DatabaseConnection, id: i64) -> Result<()> {
    let ceiling = BudgetCeiling::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("budget ceiling", id))?;

    let requisitions = Requisition::find()
        .filter(requisition::Column::BudgetCeilingId.eq(id))
        .count(db)
        .await?;
    if requisitions > 0 {
        return Err(Error::Conflict {
            message: format!("ceiling {id} still has {requisitions} requisition(s)"),
        });
    }

    let projects = AnnualProject::find()
        .filter(annual_project::Column::BudgetCeilingId.eq(id))
        .count(db)
        .await?;
    if projects > 0 {
        return Err(Error::Conflict {
            message: format!("ceiling {id} still has {projects} annual project(s)"),
        });
    }

    ceiling.delete(db).await?;
    Ok(())
}
