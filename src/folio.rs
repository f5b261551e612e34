//! Sequential folio generation.
//!
//! Folios are human-readable identifiers of the form `"PREFIX-YEAR-NNNN"`,
//! monotonically increasing within a (prefix, year) pair and never reused even
//! when earlier folios are deleted. A single `tokio` mutex serializes issuance;
//! waiters are queued fairly and released in arrival order. The lock guards only
//! the counter critical section, not the surrounding persistence writes.
//!
//! An in-memory single-slot cache avoids a storage scan on every call: the
//! counter is refreshed from the maximum persisted suffix only when it is
//! uninitialized, the prefix or year rolled over, or the refresh TTL elapsed.
//! Candidate folios are existence-checked before use; after three collisions
//! the single item fails with [`Error::ConcurrencyExhausted`] so a surrounding
//! batch can continue with its other items.

use crate::entities::{Requisition, requisition};
use crate::errors::{Error, Result};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Default cache TTL before the counter is re-read from storage.
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(5);

/// Collision-retry budget for a single folio.
const MAX_ATTEMPTS: u32 = 3;

/// Width of the zero-padded numeric suffix.
const SUFFIX_WIDTH: usize = 4;

/// Storage backing for one folio-bearing table.
///
/// The generator itself owns no table: inventory, delivery, and requisition
/// records all carry folios, each behind its own store implementation. This
/// crate ships [`RequisitionFolios`].
#[allow(async_fn_in_trait)]
pub trait FolioStore: Send + Sync {
    /// Highest numeric suffix already persisted for `"PREFIX-YEAR-"`, if any.
    async fn max_suffix<C: ConnectionTrait>(
        &self,
        db: &C,
        prefix: &str,
        year: i32,
    ) -> Result<Option<u32>>;

    /// Whether a candidate folio already exists in storage.
    async fn exists<C: ConnectionTrait>(&self, db: &C, folio: &str) -> Result<bool>;
}

/// [`FolioStore`] backed by the requisition table's unique folio column.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequisitionFolios;

impl FolioStore for RequisitionFolios {
    async fn max_suffix<C: ConnectionTrait>(
        &self,
        db: &C,
        prefix: &str,
        year: i32,
    ) -> Result<Option<u32>> {
        let pattern = format!("{prefix}-{year}-%");
        let folios: Vec<String> = Requisition::find()
            .select_only()
            .column(requisition::Column::Folio)
            .filter(requisition::Column::Folio.like(&pattern))
            .into_tuple()
            .all(db)
            .await?;

        Ok(folios
            .iter()
            .filter_map(|folio| folio.rsplit('-').next())
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max())
    }

    async fn exists<C: ConnectionTrait>(&self, db: &C, folio: &str) -> Result<bool> {
        let count = Requisition::find()
            .filter(requisition::Column::Folio.eq(folio))
            .count(db)
            .await?;
        Ok(count > 0)
    }
}

/// Single-slot counter cache guarded by the generator mutex.
#[derive(Debug)]
struct CacheState {
    prefix: String,
    year: i32,
    counter: Option<u32>,
    last_refresh: Option<Instant>,
}

/// Mutex-guarded, cached issuer of sequential folios.
#[derive(Debug)]
pub struct FolioGenerator<S> {
    store: S,
    state: Mutex<CacheState>,
    refresh_ttl: Duration,
}

impl<S: FolioStore> FolioGenerator<S> {
    /// Creates a generator with the default 5-second refresh TTL.
    pub fn new(store: S) -> Self {
        Self::with_ttl(store, DEFAULT_REFRESH_TTL)
    }

    /// Creates a generator with an explicit refresh TTL.
    pub fn with_ttl(store: S, refresh_ttl: Duration) -> Self {
        Self {
            store,
            state: Mutex::new(CacheState {
                prefix: String::new(),
                year: 0,
                counter: None,
                last_refresh: None,
            }),
            refresh_ttl,
        }
    }

    /// Issues the next folio for `(prefix, year)` as `"PREFIX-YEAR-NNNN"`.
    ///
    /// Fails outright if storage is unreachable during a required refresh:
    /// returning a folio from a stale cache risks a collision downstream.
    pub async fn generate<C: ConnectionTrait>(
        &self,
        db: &C,
        prefix: &str,
        year: i32,
    ) -> Result<String> {
        let mut state = self.state.lock().await;

        for attempt in 1..=MAX_ATTEMPTS {
            let counter = self.next_counter(&mut state, db, prefix, year).await?;
            let candidate = format_folio(prefix, year, counter);

            if !self.store.exists(db, &candidate).await? {
                debug!(folio = %candidate, attempt, "issued folio");
                return Ok(candidate);
            }

            warn!(folio = %candidate, attempt, "folio collision, resyncing counter");
            // Collision means the cache went stale under us; force a refresh.
            state.last_refresh = None;
        }

        Err(Error::ConcurrencyExhausted {
            prefix: prefix.to_string(),
            year,
        })
    }

    /// Advances the cached counter, refreshing from storage when required.
    async fn next_counter<C: ConnectionTrait>(
        &self,
        state: &mut CacheState,
        db: &C,
        prefix: &str,
        year: i32,
    ) -> Result<u32> {
        let same_sequence = state.prefix == prefix && state.year == year;
        let expired = state
            .last_refresh
            .is_none_or(|at| at.elapsed() > self.refresh_ttl);
        let needs_refresh = state.counter.is_none() || !same_sequence || expired;

        let next = if needs_refresh {
            let persisted = self.store.max_suffix(db, prefix, year).await?;
            let from_storage = persisted.map_or(1, |max| max + 1);
            // Suffixes are never reused: a refresh may not move the counter
            // backwards within the same (prefix, year) sequence, even when the
            // highest persisted folio has since been deleted.
            match state.counter {
                Some(cached) if same_sequence => from_storage.max(cached + 1),
                _ => from_storage,
            }
        } else {
            match state.counter {
                Some(cached) => cached + 1,
                None => 1,
            }
        };

        state.prefix = prefix.to_string();
        state.year = year;
        state.counter = Some(next);
        if needs_refresh {
            state.last_refresh = Some(Instant::now());
        }
        Ok(next)
    }
}

/// Formats a folio as `"PREFIX-YEAR-NNNN"` with a zero-padded suffix.
#[must_use]
pub fn format_folio(prefix: &str, year: i32, counter: u32) -> String {
    format!("{prefix}-{year}-{counter:0width$}", width = SUFFIX_WIDTH)
}
