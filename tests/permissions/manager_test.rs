/*!
 * Store and entrance checks over expanded user ACLs
 */

use crate::common::{
    demo_manager, demo_manager_with, demo_repos, request, LAYOUT_NET1, LAYOUT_NET2, STORES_NET1,
};
use layoutconfig_acl::{
    AclConfig, Action, DefaultPolicyKind, MemoryUserCache, PermissionManager, Permissions,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const PERM_ALL: &str = r#"[{"resources":["watcom.ru:data.counting:layouts:*"],"actions":["*"],"effect":"allow"}]"#;
const PERM_READER_NET1: &str = r#"[{"resources":["watcom.ru:data.counting:layouts:118416189"],"actions":["read"],"effect":"allow"}]"#;
const PERM_CITY_SPB_NET1: &str = r#"[{"resources":["watcom.ru:data.counting:layouts:118416189","watcom.ru:data.counting:cities:961"],"actions":["read"],"effect":"allow"}]"#;
const PERM_CITY_SPB_PLUS_STORE_NET1: &str = r#"[{"resources":["watcom.ru:data.counting:layouts:118416189","watcom.ru:data.counting:cities:961","watcom.ru:data.counting:stores:80079091"],"actions":["read"],"effect":"allow"}]"#;
const PERM_REGION_MSK_EXCEPT_STORE_NET1: &str = r#"[{"resources":["watcom.ru:data.counting:layouts:118416189","watcom.ru:data.counting:regions:157"],"actions":["read"],"effect":"allow"},{"resources":["watcom.ru:data.counting:layouts:118416189","watcom.ru:data.counting:stores:80079091"],"actions":["*"],"effect":"deny"}]"#;
const PERM_COUNTRY_NET1: &str = r#"[{"resources":["watcom.ru:data.counting:layouts:118416189","watcom.ru:data.counting:countries:1000"],"actions":["read"],"effect":"allow"}]"#;
const PERM_READ_EXCEPT_DELETE_NET1: &str = r#"[{"resources":["watcom.ru:data.counting:layouts:118416189"],"actions":["read"],"effect":"allow"},{"resources":["watcom.ru:data.counting:layouts:118416189"],"actions":["delete"],"effect":"deny"}]"#;
const PERM_ALL_STORES_NET1: &str = r#"[{"resources":["watcom.ru:data.counting:layouts:118416189","watcom.ru:data.counting:stores:*"],"actions":["read"],"effect":"allow"}]"#;
const PERM_ROUND_TRIP_NET1: &str = r#"[{"resources":["t:data.counting:layouts:118416189","t:data.counting:cities:961","t:data.counting:stores:80817080,80079091"],"actions":["read"],"effect":"allow"},{"resources":["t:data.counting:layouts:118416189"],"actions":["delete"],"effect":"deny"}]"#;
const PERM_STORES_SPB_NET1: &str = r#"[{"resources":["watcom.ru:data.counting:layouts:118416189","watcom.ru:data.counting:stores:147298805,82949216"],"actions":["read"],"effect":"allow"}]"#;

#[tokio::test]
async fn test_check_store_by_city() {
    let manager = demo_manager().await;
    let req = request("7", Some(PERM_CITY_SPB_NET1));

    assert!(manager.check_store(&req, LAYOUT_NET1, "82949216", &Action::Read).await);
    assert!(manager.check_store(&req, LAYOUT_NET1, "147298805", &Action::Read).await);
    assert!(!manager.check_store(&req, LAYOUT_NET1, "80079091", &Action::Read).await);
    assert!(!manager.check_store(&req, LAYOUT_NET1, "82949216", &Action::Update).await);
    assert!(!manager.check_store(&req, LAYOUT_NET2, "52944592", &Action::Read).await);
}

#[tokio::test]
async fn test_filtered_stores_by_city_keeps_input_order() {
    let manager = demo_manager().await;
    let req = request("7", Some(PERM_CITY_SPB_NET1));

    let filtered = manager
        .filtered_stores(&req, LAYOUT_NET1, STORES_NET1, &Action::Read)
        .await
        .unwrap();
    assert_eq!(filtered, "147298805,82949216");

    let filtered = manager
        .filtered_stores(&req, LAYOUT_NET1, "82949216,80079091,82949216", &Action::Read)
        .await
        .unwrap();
    assert_eq!(filtered, "82949216");
}

#[tokio::test]
async fn test_filtered_city_plus_store_selects_all() {
    let manager = demo_manager().await;
    let req = request("7", Some(PERM_CITY_SPB_PLUS_STORE_NET1));

    let stores = manager
        .filtered_stores(&req, LAYOUT_NET1, "", &Action::Read)
        .await
        .unwrap();
    assert_eq!(stores, "147298805,80079091,82949216");

    let enters = manager
        .filtered_enters(&req, LAYOUT_NET1, "", &Action::Read)
        .await
        .unwrap();
    assert_eq!(enters, "103594266,125067677,142758817,48777088,90168411");
}

#[tokio::test]
async fn test_region_with_denied_store() {
    let manager = demo_manager().await;
    let req = request("7", Some(PERM_REGION_MSK_EXCEPT_STORE_NET1));

    let filtered = manager
        .filtered_stores(&req, LAYOUT_NET1, STORES_NET1, &Action::Read)
        .await
        .unwrap();
    assert_eq!(filtered, "109332900,80817080");

    assert!(!manager.check_store(&req, LAYOUT_NET1, "80079091", &Action::Read).await);
    assert!(manager.check_store(&req, LAYOUT_NET1, "80817080", &Action::Read).await);
    assert!(!manager.check_enter(&req, LAYOUT_NET1, "125067677", &Action::Read).await);
    assert!(manager.check_enter(&req, LAYOUT_NET1, "76469786", &Action::Read).await);
    assert!(!manager.check_enter(&req, LAYOUT_NET1, "90168411", &Action::Read).await);
}

#[tokio::test]
async fn test_country_covers_whole_chain() {
    let manager = demo_manager().await;
    let req = request("7", Some(PERM_COUNTRY_NET1));

    let filtered = manager
        .filtered_stores(&req, LAYOUT_NET1, STORES_NET1, &Action::Read)
        .await
        .unwrap();
    assert_eq!(filtered, STORES_NET1);
}

#[tokio::test]
async fn test_explicit_store_list() {
    let manager = demo_manager().await;
    let req = request("7", Some(PERM_STORES_SPB_NET1));

    let enters = manager
        .filtered_enters(&req, LAYOUT_NET1, "90168411,76469786,48777088", &Action::Read)
        .await
        .unwrap();
    assert_eq!(enters, "90168411,48777088");
    assert!(manager.check_enter(&req, LAYOUT_NET1, "142758817", &Action::Read).await);
    assert!(!manager.check_enter(&req, LAYOUT_NET1, "125067677", &Action::Read).await);
}

#[tokio::test]
async fn test_layout_reader_returns_input_for_stores() {
    let manager = demo_manager().await;
    let req = request("7", Some(PERM_READER_NET1));

    let stores = manager
        .filtered_stores(&req, LAYOUT_NET1, STORES_NET1, &Action::Read)
        .await
        .unwrap();
    assert_eq!(stores, STORES_NET1);

    let stores = manager
        .filtered_stores(&req, LAYOUT_NET1, "", &Action::Read)
        .await
        .unwrap();
    assert_eq!(stores, "*");

    let enters = manager
        .filtered_enters(&req, LAYOUT_NET1, "", &Action::Read)
        .await
        .unwrap();
    assert_eq!(enters.split(',').count(), 9);

    assert!(manager.check_store(&req, LAYOUT_NET1, "80817080", &Action::Read).await);
    assert!(!manager.check_store(&req, LAYOUT_NET1, "80817080", &Action::Delete).await);
}

#[tokio::test]
async fn test_wildcard_layout_policy() {
    let manager = demo_manager().await;
    let req = request("7", Some(PERM_ALL));

    for layout in [LAYOUT_NET1, LAYOUT_NET2, "73685311"] {
        let stores = manager
            .filtered_stores(&req, layout, "", &Action::Update)
            .await
            .unwrap();
        assert_eq!(stores, "*");
        assert!(manager.check_store(&req, layout, "1", &Action::Delete).await);
    }
}

#[tokio::test]
async fn test_default_deny_without_header() {
    let config = AclConfig {
        default_policy: DefaultPolicyKind::Deny,
        ..AclConfig::default()
    };
    let (manager, _) = demo_manager_with(config).await;
    let req = request("7", None);

    assert!(!manager.check_layout(&req, LAYOUT_NET1, &Action::Read));
    assert!(!manager.check_store(&req, LAYOUT_NET1, "80817080", &Action::Read).await);
    assert_eq!(
        manager
            .filtered_stores(&req, LAYOUT_NET1, STORES_NET1, &Action::Read)
            .await
            .unwrap(),
        ""
    );
}

#[tokio::test]
async fn test_user_snapshot_is_cached() {
    let cache = Arc::new(MemoryUserCache::default());
    let (repos, _) = demo_repos().await;
    let manager = PermissionManager::new(
        cache.clone(),
        repos,
        Permissions::default_allow(),
        AclConfig::default(),
    );
    let req = request("7", Some(PERM_CITY_SPB_NET1));

    let first = manager.filtered_stores(&req, LAYOUT_NET1, STORES_NET1, &Action::Read).await;
    let second = manager.filtered_stores(&req, LAYOUT_NET1, STORES_NET1, &Action::Read).await;
    assert_eq!(first, second);

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.size, 1);
}

#[tokio::test]
async fn test_anonymous_callers_are_not_cached_together() {
    let cache = Arc::new(MemoryUserCache::default());
    let (repos, _) = demo_repos().await;
    let manager = PermissionManager::new(
        cache.clone(),
        repos,
        Permissions::default_allow(),
        AclConfig::default(),
    );

    let req = http::Request::builder().body(()).unwrap();
    assert!(manager.check_store(&req, LAYOUT_NET1, "80817080", &Action::Read).await);
    assert!(manager.check_store(&req, LAYOUT_NET1, "80817080", &Action::Read).await);

    assert_eq!(cache.stats().hits, 0);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_layout_allow_and_deny_agree_across_checks() {
    let manager = demo_manager().await;
    let req = request("p1", Some(PERM_READ_EXCEPT_DELETE_NET1));

    assert!(manager.check_layout(&req, LAYOUT_NET1, &Action::Read));
    assert!(manager.check_store(&req, LAYOUT_NET1, "80817080", &Action::Read).await);
    assert_eq!(
        manager
            .filtered_stores(&req, LAYOUT_NET1, STORES_NET1, &Action::Read)
            .await
            .unwrap(),
        STORES_NET1
    );
    assert_eq!(
        manager
            .filtered_stores(&req, LAYOUT_NET1, "", &Action::Read)
            .await
            .unwrap(),
        "*"
    );

    assert!(!manager.check_layout(&req, LAYOUT_NET1, &Action::Delete));
    assert!(!manager.check_store(&req, LAYOUT_NET1, "80817080", &Action::Delete).await);
    assert_eq!(
        manager
            .filtered_stores(&req, LAYOUT_NET1, STORES_NET1, &Action::Delete)
            .await
            .unwrap(),
        ""
    );
}

#[tokio::test]
async fn test_store_wildcard_preserves_input() {
    let manager = demo_manager().await;
    let req = request("7", Some(PERM_ALL_STORES_NET1));

    let filtered = manager
        .filtered_stores(&req, LAYOUT_NET1, "42,43", &Action::Read)
        .await
        .unwrap();
    assert_eq!(filtered, "42,43");

    let filtered = manager
        .filtered_stores(&req, LAYOUT_NET1, "", &Action::Read)
        .await
        .unwrap();
    assert_eq!(filtered, "*");

    let filtered = manager
        .filtered_stores(&req, LAYOUT_NET1, "42,43", &Action::Update)
        .await
        .unwrap();
    assert_eq!(filtered, "");
    assert!(manager.check_store(&req, LAYOUT_NET1, "42", &Action::Read).await);
}

#[tokio::test]
async fn test_round_trip_policy_stores() {
    let manager = demo_manager().await;
    let req = request("7", Some(PERM_ROUND_TRIP_NET1));

    assert!(manager.check_layout(&req, LAYOUT_NET1, &Action::Read));
    assert!(!manager.check_layout(&req, LAYOUT_NET1, &Action::Delete));
    assert!(!manager.check_layout(&req, "77", &Action::Delete));

    let filtered = manager
        .filtered_stores(&req, LAYOUT_NET1, STORES_NET1, &Action::Read)
        .await
        .unwrap();
    assert_eq!(filtered, "147298805,80079091,80817080,82949216");
    assert!(!manager.check_store(&req, LAYOUT_NET1, "109332900", &Action::Read).await);

    let filtered = manager
        .filtered_stores(&req, LAYOUT_NET1, STORES_NET1, &Action::Delete)
        .await
        .unwrap();
    assert_eq!(filtered, "");
}
