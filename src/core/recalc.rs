//! Recalculation algorithm - the correctness backstop for the ledger.
//!
//! Recomputes a ceiling's used amount from the live requisitions joined with
//! their product's current unit price. The running total is re-rounded to the
//! storage scale after every line, reproducing per-line stored rounding
//! bit-for-bit; summing raw products and rounding once at the end can differ
//! from the stored totals by a rounding unit.
//!
//! The function is idempotent: repeated invocation with no intervening writes
//! returns the same value. It accepts any connection so callers can run it
//! inside their own transaction and see rows written earlier in that
//! transaction.

use crate::entities::{Product, Requisition, requisition};
use crate::errors::Result;
use crate::money::{line_total, round_money};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

/// Recomputes the used amount for `ceiling_id` from its live requisitions.
///
/// A requisition whose product no longer resolves contributes zero, matching
/// the missing-price-is-zero rule of the decimal layer.
pub async fn recalculate_used<C: ConnectionTrait>(db: &C, ceiling_id: i64) -> Result<Decimal> {
    let rows = Requisition::find()
        .filter(requisition::Column::BudgetCeilingId.eq(ceiling_id))
        .find_also_related(Product)
        .all(db)
        .await?;

    let mut used = Decimal::ZERO;
    for (row, product) in rows {
        let unit_price = product.map_or(Decimal::ZERO, |p| p.unit_price);
        let line = line_total(row.quantity, unit_price);
        // Round at every step, the same way storage rounds each line.
        used = round_money(used + line);
    }

    Ok(used)
}
