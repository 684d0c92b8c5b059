//! Concurrent inserts and removes under load, then verify state and introspection.

use shmap::ShardMap;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::thread;

#[test]
fn test_under_load_then_introspect() {
    let map = Arc::new(ShardMap::new());
    let mut handles = vec![];

    for t in 0..4 {
        let map = Arc::clone(&map);
        let handle = thread::spawn(move || {
            for i in 0..2000 {
                let key = format!("t{}_k{}", t, i);
                map.insert(key, i);
            }
            for i in 0..2000 {
                let key = format!("t{}_k{}", t, i);
                let _ = map.remove(&key);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    let loads = map.shard_loads();
    assert_eq!(loads.iter().sum::<usize>(), 0);
}

#[test]
fn test_mixed_load_with_ranging() {
    let map = Arc::new(ShardMap::with_shards(16));
    let mut handles = vec![];

    for t in 0..4u64 {
        let map = Arc::clone(&map);
        handles.push(thread::spawn(move || {
            for round in 0..5u64 {
                for i in 0..1000u64 {
                    map.insert(t << 32 | i, round);
                }
            }
        }));
    }

    for _ in 0..2 {
        let map = Arc::clone(&map);
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                let mut count = 0usize;
                map.range(|_, v| {
                    assert!(*v < 5);
                    count += 1;
                    ControlFlow::Continue(())
                });
                assert!(count <= 4000);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Last write wins per key
    assert_eq!(map.len(), 4000);
    map.range(|_, v| {
        assert_eq!(*v, 4);
        ControlFlow::Continue(())
    });
}
