//! External area/infrastructure catalog client.
//!
//! The catalog is reachable over HTTP and returns `{id_area, nombre}` pairs. It
//! is consulted only to resolve human-readable area names; a transport or
//! decoding failure degrades to a fallback label instead of failing the
//! surrounding request.

use crate::errors::{Error, Result};
use reqwest::Url;
use serde::Deserialize;
use tracing::warn;

/// One catalog entry as returned by the upstream service.
#[derive(Debug, Clone, Deserialize)]
pub struct AreaRecord {
    /// Area identifier
    pub id_area: i64,
    /// Human-readable area name
    pub nombre: String,
}

/// HTTP client for the area catalog.
#[derive(Debug, Clone)]
pub struct AreaCatalog {
    base_url: Url,
    http: reqwest::Client,
}

impl AreaCatalog {
    /// Builds a client for the catalog at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|err| Error::Config {
            message: format!("invalid catalog base URL: {err}"),
        })?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Fetches the full area list from the catalog.
    pub async fn fetch_areas(&self) -> Result<Vec<AreaRecord>> {
        let endpoint = self.base_url.join("areas").map_err(|err| Error::Config {
            message: format!("invalid catalog base URL: {err}"),
        })?;

        let response = self.http.get(endpoint).send().await?.error_for_status()?;
        let areas = response.json::<Vec<AreaRecord>>().await?;
        Ok(areas)
    }

    /// Resolves a display name for `area_id`, degrading to [`fallback_label`]
    /// when the catalog is unreachable or the id is unknown.
    pub async fn area_name(&self, area_id: i64) -> String {
        match self.fetch_areas().await {
            Ok(areas) => areas
                .into_iter()
                .find(|area| area.id_area == area_id)
                .map_or_else(|| fallback_label(area_id), |area| area.nombre),
            Err(err) => {
                warn!(area_id, %err, "area catalog lookup failed, using fallback label");
                fallback_label(area_id)
            }
        }
    }
}

/// Label used when the catalog cannot resolve an area name.
#[must_use]
pub fn fallback_label(area_id: i64) -> String {
    format!("Area {area_id}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = AreaCatalog::new("not a url");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_fallback_label_format() {
        assert_eq!(fallback_label(7), "Area 7");
    }

    #[tokio::test]
    async fn test_area_name_degrades_when_unreachable() {
        // Nothing listens on this port; the lookup must degrade, not fail.
        let catalog = AreaCatalog::new("http://127.0.0.1:9/").unwrap();
        let name = catalog.area_name(42).await;
        assert_eq!(name, "Area 42");
    }

    #[test]
    fn test_area_record_deserializes_upstream_shape() {
        let body = r#"[{"id_area": 3, "nombre": "Hospital General"}]"#;
        let areas: Vec<AreaRecord> = serde_json::from_str(body).unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].id_area, 3);
        assert_eq!(areas[0].nombre, "Hospital General");
    }
}
