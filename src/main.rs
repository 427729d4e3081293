/*!
 * ACL Inspect - Diagnostic Entry Point
 *
 * Decodes a permission header value and shows how the policy answers
 * layout checks and which store filters it yields per action.
 *
 * Usage: acl-inspect <layout_id> [header_value]
 * The header value may also come from the X_USER_PERMISSIONS variable;
 * without one the configured default policy is inspected.
 */

use anyhow::{bail, Context};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::info;

use layoutconfig_acl::core::limits::X_USER_PERMISSIONS;
use layoutconfig_acl::permissions::decode_permissions;
use layoutconfig_acl::{init_tracing, AclConfig, Action, ConnManager, PermissionManager};

const HEADER_ENV: &str = "X_USER_PERMISSIONS";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(layout_id) = args.next() else {
        bail!("usage: acl-inspect <layout_id> [header_value]");
    };
    let header = args.next().or_else(|| std::env::var(HEADER_ENV).ok());

    let config = AclConfig::from_env().context("load ACL configuration")?;
    let manager = PermissionManager::with_config(config, Arc::new(ConnManager::new()));

    let mut builder = http::Request::builder();
    let source = match &header {
        Some(value) => {
            // surface decode errors here; the manager would silently fall back
            decode_permissions(value).context("decode permission header")?;
            builder = builder.header(X_USER_PERMISSIONS, value.as_str());
            "header"
        }
        None => "default",
    };
    let req = builder.body(()).context("build request")?;

    let policy = manager.from_request(&req);
    info!(layout_id = %layout_id, source, rules = policy.len(), "Inspecting policy");

    let mut checks = Map::new();
    let mut filters = Map::new();
    for action in Action::CRUD {
        checks.insert(
            action.to_string(),
            Value::Bool(manager.check_layout(&req, &layout_id, &action)),
        );
        filters.insert(
            action.to_string(),
            serde_json::to_value(policy.stores_filters(&action))?,
        );
    }

    let report = json!({
        "layout_id": layout_id,
        "source": source,
        "rules": policy.len(),
        "check_layout": checks,
        "stores_filters": filters,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
