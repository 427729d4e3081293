/*!
 * In-Memory Layout Repository
 * Fixture-backed repository for tests and offline diagnostics
 */

use super::{LayoutRepo, RepoResult};
use crate::core::errors::RepoError;
use crate::core::limits::{ID_SEPARATOR, WILDCARD};
use ahash::HashSet;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub layout_id: String,
    pub id: String,
    pub city_id: String,
    pub region_id: String,
    pub country_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntranceRecord {
    pub layout_id: String,
    pub id: String,
    pub store_id: String,
}

/// Repository answering from fixed records
pub struct MemoryLayoutRepo {
    dest: String,
    layouts: Vec<String>,
    stores: Vec<StoreRecord>,
    entrances: Vec<EntranceRecord>,
    available: AtomicBool,
}

/// Parsed CSV filter; `*` matches everything
fn id_set(csv: &str) -> Option<HashSet<&str>> {
    let ids: HashSet<&str> = csv
        .split(ID_SEPARATOR)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();
    if ids.contains(WILDCARD) {
        None
    } else {
        Some(ids)
    }
}

impl MemoryLayoutRepo {
    pub fn new(dest: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            layouts: Vec::new(),
            stores: Vec::new(),
            entrances: Vec::new(),
            available: AtomicBool::new(true),
        }
    }

    pub fn with_layout(mut self, layout_id: &str) -> Self {
        if !self.layouts.iter().any(|id| id == layout_id) {
            self.layouts.push(layout_id.to_string());
        }
        self
    }

    pub fn with_store(
        mut self,
        layout_id: &str,
        store_id: &str,
        city_id: &str,
        region_id: &str,
        country_id: &str,
    ) -> Self {
        self = self.with_layout(layout_id);
        self.stores.push(StoreRecord {
            layout_id: layout_id.to_string(),
            id: store_id.to_string(),
            city_id: city_id.to_string(),
            region_id: region_id.to_string(),
            country_id: country_id.to_string(),
        });
        self
    }

    pub fn with_entrance(mut self, layout_id: &str, entrance_id: &str, store_id: &str) -> Self {
        self = self.with_layout(layout_id);
        self.entrances.push(EntranceRecord {
            layout_id: layout_id.to_string(),
            id: entrance_id.to_string(),
            store_id: store_id.to_string(),
        });
        self
    }

    /// Toggle outage simulation; an unavailable repo fails every call
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    fn ensure_available(&self) -> RepoResult<()> {
        if self.available.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(RepoError::Unavailable(self.dest.clone()))
        }
    }

    fn stores_where<F>(&self, layout_id: &str, csv: &str, key: F) -> RepoResult<Vec<String>>
    where
        F: Fn(&StoreRecord) -> &str,
    {
        self.ensure_available()?;
        let filter = id_set(csv);
        Ok(self
            .stores
            .iter()
            .filter(|s| s.layout_id == layout_id)
            .filter(|s| filter.as_ref().map_or(true, |ids| ids.contains(key(s))))
            .map(|s| s.id.clone())
            .collect())
    }
}

#[async_trait]
impl LayoutRepo for MemoryLayoutRepo {
    fn dest(&self) -> String {
        self.dest.clone()
    }

    async fn health(&self) -> RepoResult<()> {
        self.ensure_available()
    }

    async fn find_layouts(&self) -> RepoResult<Vec<String>> {
        self.ensure_available()?;
        Ok(self.layouts.clone())
    }

    async fn find_stores_by_cities(&self, layout_id: &str, cities: &str) -> RepoResult<Vec<String>> {
        self.stores_where(layout_id, cities, |s| s.city_id.as_str())
    }

    async fn find_stores_by_regions(
        &self,
        layout_id: &str,
        regions: &str,
    ) -> RepoResult<Vec<String>> {
        self.stores_where(layout_id, regions, |s| s.region_id.as_str())
    }

    async fn find_stores_by_countries(
        &self,
        layout_id: &str,
        countries: &str,
    ) -> RepoResult<Vec<String>> {
        self.stores_where(layout_id, countries, |s| s.country_id.as_str())
    }

    async fn find_entrances(&self, layout_id: &str, store_csv: &str) -> RepoResult<Vec<String>> {
        self.ensure_available()?;
        let filter = if store_csv.trim().is_empty() {
            None
        } else {
            id_set(store_csv)
        };
        Ok(self
            .entrances
            .iter()
            .filter(|e| e.layout_id == layout_id)
            .filter(|e| filter.as_ref().map_or(true, |ids| ids.contains(e.store_id.as_str())))
            .map(|e| e.id.clone())
            .collect())
    }
}
