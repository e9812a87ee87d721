//! Integration Tests for the Containers
//!
//! Exercises the public container API the way a library user would.

use std::sync::{Arc, Mutex};

use mru_collections::{BoundedCache, DualOrderList, MruError, Shared, TouchableMap};

// == Helper Functions ==

fn destroyed_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

// == BoundedCache ==

#[test]
fn test_bounded_cache_eviction_scenario() {
    let log = destroyed_log();
    let sink = Arc::clone(&log);
    let mut cache = BoundedCache::new(3)
        .unwrap()
        .with_destroy_callback(move |key: String, _value: usize| {
            sink.lock().unwrap().push(key);
        });

    for key in ["a", "b", "c"] {
        cache.get_or_create(key.to_string(), |_, k| k.len());
    }
    let keys: Vec<&str> = cache.keys().map(String::as_str).collect();
    assert_eq!(keys, ["c", "b", "a"]);

    cache.get_or_create("a".to_string(), |_, _| panic!("a is cached"));
    let keys: Vec<&str> = cache.keys().map(String::as_str).collect();
    assert_eq!(keys, ["a", "c", "b"]);

    cache.get_or_create("d".to_string(), |_, k| k.len());
    let keys: Vec<&str> = cache.keys().map(String::as_str).collect();
    assert_eq!(keys, ["d", "a", "c"]);

    assert!(!cache.contains_key("b"));
    assert_eq!(*log.lock().unwrap(), vec!["b".to_string()]);

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 4);
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.total_entries, 3);
}

#[test]
fn test_bounded_cache_factory_builds_from_cached_values() {
    let mut cache: BoundedCache<u64, u64> = BoundedCache::new(16).unwrap();

    fn fib(cache: &mut BoundedCache<u64, u64>, n: u64) -> u64 {
        *cache.get_or_create(n, |cache, &n| {
            if n < 2 {
                n
            } else {
                fib(cache, n - 1) + fib(cache, n - 2)
            }
        })
    }

    assert_eq!(fib(&mut cache, 12), 144);
    assert!(cache.len() <= 16);
    assert_eq!(cache.keys().next(), Some(&12));
}

#[test]
fn test_bounded_cache_rejects_zero_capacity() {
    let result = BoundedCache::<String, u8>::new(0);
    assert_eq!(result.unwrap_err(), MruError::InvalidCapacity(0));
}

// == TouchableMap ==

#[test]
fn test_touchable_map_recency() {
    let mut map: TouchableMap<String, u32> = TouchableMap::new();
    map.set("one".to_string(), 1);
    map.set("two".to_string(), 2);
    map.set("three".to_string(), 3);

    // Reads do not reorder
    assert_eq!(map.get("one"), Some(&1));
    assert_eq!(map.front().map(|(k, _)| k.as_str()), Some("three"));

    assert!(map.touch("one"));
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, ["one", "three", "two"]);

    assert_eq!(map.take("three"), Some(3));
    assert!(matches!(map.lookup("three"), Err(MruError::KeyNotFound(_))));
}

#[test]
fn test_touchable_map_capacity_destroys_tail() {
    let log = destroyed_log();
    let sink = Arc::clone(&log);
    let mut map = TouchableMap::with_max_capacity(2)
        .unwrap()
        .with_destroy_callback(move |key: String, _value: u32| {
            sink.lock().unwrap().push(key);
        });

    map.set("a".to_string(), 1);
    map.set("b".to_string(), 2);
    map.touch("a");
    map.set("c".to_string(), 3);

    assert_eq!(*log.lock().unwrap(), vec!["b".to_string()]);
    assert_eq!(map.len(), 2);
}

// == DualOrderList ==

#[test]
fn test_dual_order_list_keeps_both_orders() {
    let mut list: DualOrderList<&str> = ["x", "y", "z"].into_iter().collect();

    assert!(list.touch(&"x"));
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["x", "y", "z"]);
    assert_eq!(list.mru_view().to_vec(), ["x", "z", "y"]);

    list.insert(1, "w").unwrap();
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["x", "w", "y", "z"]);
    assert_eq!(list.mru_view().first(), Some(&"w"));
    assert_eq!(list.mru_view().last(), Some(&"y"));

    let err = list.touch_at(9).unwrap_err();
    assert_eq!(err, MruError::IndexOutOfRange { index: 9, len: 4 });
}

// == Shared ==

#[tokio::test]
async fn test_shared_touchable_map() {
    let shared = Shared::new(TouchableMap::<u32, u32>::new());

    let mut handles = Vec::new();
    for i in 0..4u32 {
        let shared = shared.clone();
        handles.push(tokio::spawn(async move {
            shared.with(|map| map.set(i, i * 10)).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let len = shared.with(|map| map.len()).await;
    assert_eq!(len, 4);
}
