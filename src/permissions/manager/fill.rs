/*!
 * ACL Expansion
 * Resolves a policy into per-layout store and entrance item sets
 */

use crate::acl::EntityKind;
use crate::core::errors::{PermissionError, PermissionResult};
use crate::core::limits::{ID_SEPARATOR, WILDCARD};
use crate::permissions::cache::User;
use crate::permissions::policy::{Permission, Permissions};
use crate::repos::{ConnManager, LayoutRepo};
use ahash::HashSet;
use tracing::debug;

/// Build the full snapshot of `user_id` under `policy`
///
/// The first repository failure aborts the whole expansion.
pub(crate) async fn fill_user(
    repos: &ConnManager,
    user_id: &str,
    policy: &Permissions,
) -> PermissionResult<User> {
    debug!(user_id, rules = policy.len(), "Expanding user ACL");

    let mut user = User::new(user_id);
    for rule in policy {
        let layout_ids = rule.layouts();
        for layout_id in &layout_ids {
            fill_layout(repos, &mut user, layout_id, &layout_ids, rule).await?;
        }
    }

    debug!(user_id, layouts = user.acls.len(), "User ACL expanded");
    Ok(user)
}

async fn fill_layout(
    repos: &ConnManager,
    user: &mut User,
    layout_id: &str,
    layout_ids: &[String],
    rule: &Permission,
) -> PermissionResult<()> {
    let allow = rule.effect.is_allow();

    // wildcard layouts: no per-store resolution
    if layout_id == WILDCARD {
        user.add_items(WILDCARD, allow, &rule.actions, &[WILDCARD], EntityKind::Layouts);
        return Ok(());
    }

    let repo = repos
        .repo_by_id(layout_id)
        .ok_or_else(|| PermissionError::RepoNotFound {
            layout_id: layout_id.to_string(),
        })?;
    let (stores, entrances) = resolve_entities(repo.as_ref(), layout_id, rule).await?;

    user.add_items(layout_id, allow, &rule.actions, layout_ids, EntityKind::Layouts);
    user.add_items(layout_id, allow, &rule.actions, &stores, EntityKind::Stores);
    user.add_items(layout_id, allow, &rule.actions, &entrances, EntityKind::Enters);
    Ok(())
}

/// Store IDs named by the rule plus the entrances of those stores
async fn resolve_entities(
    repo: &dyn LayoutRepo,
    layout_id: &str,
    rule: &Permission,
) -> PermissionResult<(Vec<String>, Vec<String>)> {
    let filters = rule.stores();

    let mut stores: Vec<String> = filters
        .by_stores
        .split(ID_SEPARATOR)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    if !filters.by_cities.is_empty() {
        let found = repo
            .find_stores_by_cities(layout_id, &filters.by_cities)
            .await
            .map_err(|e| PermissionError::repo("stores by cities", e))?;
        stores.extend(found);
    }
    if !filters.by_regions.is_empty() {
        let found = repo
            .find_stores_by_regions(layout_id, &filters.by_regions)
            .await
            .map_err(|e| PermissionError::repo("stores by regions", e))?;
        stores.extend(found);
    }
    if !filters.by_countries.is_empty() {
        let found = repo
            .find_stores_by_countries(layout_id, &filters.by_countries)
            .await
            .map_err(|e| PermissionError::repo("stores by countries", e))?;
        stores.extend(found);
    }
    dedup_in_order(&mut stores);

    let store_csv = stores.join(ID_SEPARATOR);
    let mut entrances = repo
        .find_entrances(layout_id, &store_csv)
        .await
        .map_err(|e| PermissionError::repo("entrances", e))?;
    dedup_in_order(&mut entrances);

    Ok((stores, entrances))
}

fn dedup_in_order(ids: &mut Vec<String>) {
    let mut seen = HashSet::default();
    ids.retain(|id| seen.insert(id.clone()));
}
