/*!
 * Layout Repositories
 * Per-tenant layout databases and the routing of layout IDs to them
 */

mod conn_manager;
mod memory;

pub use conn_manager::{ConnManager, RepoHealth};
pub use memory::{EntranceRecord, MemoryLayoutRepo, StoreRecord};

use crate::core::errors::RepoError;
use async_trait::async_trait;

pub type RepoResult<T> = Result<T, RepoError>;

/// Lookups the ACL expansion needs from a layout database
///
/// ID lists are comma-separated, as they appear in policy resources.
#[async_trait]
pub trait LayoutRepo: Send + Sync {
    /// Identity of the backing database, unique per connection
    fn dest(&self) -> String;

    async fn health(&self) -> RepoResult<()>;

    /// Every layout ID served by this repository
    async fn find_layouts(&self) -> RepoResult<Vec<String>>;

    async fn find_stores_by_cities(&self, layout_id: &str, cities: &str) -> RepoResult<Vec<String>>;

    async fn find_stores_by_regions(&self, layout_id: &str, regions: &str)
        -> RepoResult<Vec<String>>;

    async fn find_stores_by_countries(
        &self,
        layout_id: &str,
        countries: &str,
    ) -> RepoResult<Vec<String>>;

    /// Entrances of the listed stores; an empty list means every entrance of the layout
    async fn find_entrances(&self, layout_id: &str, store_csv: &str) -> RepoResult<Vec<String>>;
}
