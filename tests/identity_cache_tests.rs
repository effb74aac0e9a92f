//! User identity cache tests
mod common;

use common::*;
use site_migrate::platform::SitePlatform;
use site_migrate::UserIdentityCache;
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

fn platform_with_user() -> FakePlatform {
    let mut platform = FakePlatform::new();
    platform.logins.insert(7, "ada@example.com".to_string());
    platform.logins.insert(8, "grace@example.com".to_string());
    platform.login_delay = Duration::from_millis(50);
    platform
}

// Two concurrent resolutions of one key
// Exactly one fetch is issued; a later resolution issues none
#[test]
fn test_concurrent_resolutions_fetch_once() {
    let platform = platform_with_user();
    let workspace = platform.workspace(SOURCE_URL).unwrap();
    let cache = UserIdentityCache::new();
    let barrier = Barrier::new(2);

    let logins: Vec<String> = thread::scope(|s| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    cache.resolve(&platform, &workspace, 7).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(logins, vec!["ada@example.com", "ada@example.com"]);
    assert_eq!(platform.login_fetches(), 1);

    assert_eq!(cache.resolve(&platform, &workspace, 7).unwrap(), "ada@example.com");
    assert_eq!(platform.login_fetches(), 1);
}

// Keys are scoped by workspace and user
#[test]
fn test_distinct_keys_fetch_separately() {
    let mut platform = platform_with_user();
    platform.login_delay = Duration::ZERO;
    let source = platform.workspace(SOURCE_URL).unwrap();
    let target = platform.workspace(TARGET_URL).unwrap();
    let cache = UserIdentityCache::new();

    cache.resolve(&platform, &source, 7).unwrap();
    cache.resolve(&platform, &source, 8).unwrap();
    cache.resolve(&platform, &target, 7).unwrap();
    cache.resolve(&platform, &source, 8).unwrap();

    assert_eq!(platform.login_fetches(), 3);
    assert_eq!(cache.len(), 3);
}

// A failed lookup is not cached
#[test]
fn test_failed_lookup_is_retried() {
    let mut platform = platform_with_user();
    platform.login_delay = Duration::ZERO;
    let workspace = platform.workspace(SOURCE_URL).unwrap();
    let cache = UserIdentityCache::new();

    let err = cache.resolve(&platform, &workspace, 99).unwrap_err();
    assert_eq!(err.operation, "resolve_login_name");
    assert!(cache.resolve(&platform, &workspace, 99).is_err());

    assert_eq!(platform.login_fetches(), 2);
    assert!(cache.is_empty());
}
