//! Property-based tests: the sharded map must behave like a plain HashMap
//! for any single-threaded sequence of operations.

use proptest::prelude::*;
use shmap::shards::{default_shard_count_for, round_up_pow2};
use shmap::ShardMap;
use std::collections::HashMap;
use std::ops::ControlFlow;

#[derive(Debug, Clone)]
enum Op {
    Insert(u16, i32),
    Remove(u16),
    Get(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u16>(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k % 256, v)),
        any::<u16>().prop_map(|k| Op::Remove(k % 256)),
        any::<u16>().prop_map(|k| Op::Get(k % 256)),
    ]
}

proptest! {
    #[test]
    fn test_matches_hashmap_model(
        shards in 0usize..70,
        ops in prop::collection::vec(op_strategy(), 1..300)
    ) {
        let map = ShardMap::with_shards(shards);
        let mut model = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let old = map.insert(k, v).map(|arc| *arc);
                    prop_assert_eq!(old, model.insert(k, v));
                }
                Op::Remove(k) => {
                    let old = map.remove(&k).map(|arc| *arc);
                    prop_assert_eq!(old, model.remove(&k));
                }
                Op::Get(k) => {
                    let got = map.get(&k).map(|arc| *arc);
                    prop_assert_eq!(got, model.get(&k).copied());
                }
            }
        }

        prop_assert_eq!(map.len(), model.len());

        let mut seen = HashMap::new();
        map.range(|k, v| {
            seen.insert(*k, *v);
            ControlFlow::Continue(())
        });
        prop_assert_eq!(seen, model);
    }

    #[test]
    fn test_range_stop_after_k(
        entries in 1usize..400,
        k in 1usize..400
    ) {
        let map = ShardMap::with_shards(32);
        for i in 0..entries {
            map.insert(i, ());
        }

        let mut visits = 0;
        map.range(|_, _| {
            visits += 1;
            if visits == k { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        });
        prop_assert_eq!(visits, k.min(entries));
    }

    #[test]
    fn test_round_up_pow2_properties(count in 0usize..1_000_000_000) {
        let n = round_up_pow2(count);
        prop_assert!(n.is_power_of_two());
        prop_assert!(n >= count);
        if count > 1 {
            prop_assert!(n / 2 < count);
        }
    }

    #[test]
    fn test_default_shard_count_bounds(parallelism in 0usize..100_000) {
        let n = default_shard_count_for(parallelism);
        prop_assert!(n.is_power_of_two());
        prop_assert!((64..=1024).contains(&n));
    }
}
