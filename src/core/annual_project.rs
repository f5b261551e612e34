//! Annual project ledger logic.
//!
//! An annual project is the derived record per (ceiling, fiscal year) holding
//! assigned, used, and available amounts. It appears on the first requisition
//! against a ceiling for that year and, once it carries history, is only ever
//! soft-deactivated. Two update paths exist on purpose: the incremental path
//! serves the common case (one requisition created), while every other
//! mutation goes through the full recalculation to stop rounding drift from
//! compounding over the ledger's lifetime.

use crate::entities::{AnnualProject, annual_project, budget_ceiling};
use crate::errors::{Error, Result};
use crate::money::round_money;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use super::recalc::recalculate_used;

/// Finds the active annual project for `(ceiling_id, year)`, if one exists.
pub async fn get_for_year<C: ConnectionTrait>(
    db: &C,
    ceiling_id: i64,
    year: i32,
) -> Result<Option<annual_project::Model>> {
    AnnualProject::find()
        .filter(annual_project::Column::BudgetCeilingId.eq(ceiling_id))
        .filter(annual_project::Column::Year.eq(year))
        .filter(annual_project::Column::Status.eq(annual_project::STATUS_ACTIVE))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the active annual project for `(ceiling, year)`, creating it when
/// absent with assigned = ceiling.budgeted_amount, used = 0, available = assigned.
pub async fn get_or_create<C: ConnectionTrait>(
    db: &C,
    ceiling: &budget_ceiling::Model,
    year: i32,
) -> Result<annual_project::Model> {
    if let Some(existing) = get_for_year(db, ceiling.id, year).await? {
        return Ok(existing);
    }

    let assigned = round_money(ceiling.budgeted_amount);
    let project = annual_project::ActiveModel {
        year: Set(year),
        budget_ceiling_id: Set(ceiling.id),
        assigned_amount: Set(assigned),
        used_amount: Set(Decimal::ZERO),
        available_amount: Set(assigned),
        status: Set(annual_project::STATUS_ACTIVE.to_string()),
        ..Default::default()
    };

    project.insert(db).await.map_err(Into::into)
}

/// Incremental path: adds `delta` to the used amount and rederives available.
///
/// Reserved for the single-requisition create; all other mutations must go
/// through [`reconcile`].
pub async fn apply_usage<C: ConnectionTrait>(
    db: &C,
    project: annual_project::Model,
    delta: Decimal,
) -> Result<annual_project::Model> {
    let assigned = project.assigned_amount;
    let used = round_money(project.used_amount + delta);
    let available = round_money(assigned - used);

    let mut active: annual_project::ActiveModel = project.into();
    active.used_amount = Set(used);
    active.available_amount = Set(available);
    active.update(db).await.map_err(Into::into)
}

/// Full recompute: sets used from the recalculation algorithm and rederives
/// available, creating the project first when absent. Idempotent.
pub async fn reconcile<C: ConnectionTrait>(
    db: &C,
    ceiling: &budget_ceiling::Model,
    year: i32,
) -> Result<annual_project::Model> {
    let project = get_or_create(db, ceiling, year).await?;

    let used = recalculate_used(db, ceiling.id).await?;
    let available = round_money(project.assigned_amount - used);

    let mut active: annual_project::ActiveModel = project.into();
    active.used_amount = Set(used);
    active.available_amount = Set(available);
    active.update(db).await.map_err(Into::into)
}

/// Soft-deactivates an annual project; history is preserved, never removed.
pub async fn deactivate<C: ConnectionTrait>(db: &C, id: i64) -> Result<annual_project::Model> {
    let project = AnnualProject::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("annual project", id))?;

    let mut active: annual_project::ActiveModel = project.into();
    active.status = Set(annual_project::STATUS_INACTIVE.to_string());
    active.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{
        create_test_ceiling, insert_test_product, insert_test_requisition, setup_test_db,
    };

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_get_or_create_initializes_from_ceiling() -> Result<()> {
        let db = setup_test_db().await?;
        let ceiling = create_test_ceiling(&db, "1000.000").await?;

        let project = get_or_create(&db, &ceiling, 2025).await?;
        assert_eq!(project.assigned_amount, dec("1000.000"));
        assert_eq!(project.used_amount, Decimal::ZERO);
        assert_eq!(project.available_amount, dec("1000.000"));
        assert_eq!(project.status, annual_project::STATUS_ACTIVE);

        // Second call returns the same row, not a duplicate.
        let again = get_or_create(&db, &ceiling, 2025).await?;
        assert_eq!(again.id, project.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_usage_keeps_invariant() -> Result<()> {
        let db = setup_test_db().await?;
        let ceiling = create_test_ceiling(&db, "1000").await?;
        let project = get_or_create(&db, &ceiling, 2025).await?;

        let updated = apply_usage(&db, project, dec("31.665")).await?;
        assert_eq!(updated.used_amount, dec("31.665"));
        assert_eq!(updated.available_amount, dec("968.335"));
        assert_eq!(
            updated.available_amount,
            updated.assigned_amount - updated.used_amount
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_reconcile_matches_live_requisitions() -> Result<()> {
        let db = setup_test_db().await?;
        let ceiling = create_test_ceiling(&db, "1000").await?;
        let product = insert_test_product(&db, "Paper", "10.555", 21).await?;
        insert_test_requisition(&db, &ceiling, &product, "REQ-2025-0001", "1", "3").await?;

        let project = reconcile(&db, &ceiling, 2025).await?;
        assert_eq!(project.used_amount, dec("31.665"));
        assert_eq!(project.available_amount, dec("968.335"));
        Ok(())
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let ceiling = create_test_ceiling(&db, "1000").await?;
        let product = insert_test_product(&db, "Paper", "10.555", 21).await?;
        insert_test_requisition(&db, &ceiling, &product, "REQ-2025-0001", "1", "3").await?;

        let first = reconcile(&db, &ceiling, 2025).await?;
        let second = reconcile(&db, &ceiling, 2025).await?;
        assert_eq!(first.used_amount, second.used_amount);
        assert_eq!(first.available_amount, second.available_amount);
        Ok(())
    }

    #[tokio::test]
    async fn test_deactivate_hides_project_from_active_lookup() -> Result<()> {
        let db = setup_test_db().await?;
        let ceiling = create_test_ceiling(&db, "1000").await?;
        let project = get_or_create(&db, &ceiling, 2025).await?;

        let deactivated = deactivate(&db, project.id).await?;
        assert_eq!(deactivated.status, annual_project::STATUS_INACTIVE);

        assert!(get_for_year(&db, ceiling.id, 2025).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_deactivate_missing_project() -> Result<()> {
        let db = setup_test_db().await?;
        let result = deactivate(&db, 999).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }
}
