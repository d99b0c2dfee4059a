//! Property tests for the balanced index: the height invariant must hold
//! after any insert sequence, lookups must return the most recently inserted
//! value, and persistence must round-trip every entry.

use newsdex_core::PostingMap;
use newsdex_index::{decode_index, encode_index, BalancedIndex};
use proptest::prelude::*;
use std::collections::HashMap;

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

proptest! {
    #[test]
    fn balance_holds_after_arbitrary_inserts(keys in prop::collection::vec(key_strategy(), 0..200)) {
        let mut index = BalancedIndex::new();
        for (i, key) in keys.iter().enumerate() {
            index.insert(key.clone(), i as u64);
            prop_assert!(index.is_balanced());
        }
    }

    #[test]
    fn lookup_returns_last_inserted_value(pairs in prop::collection::vec((key_strategy(), any::<u64>()), 0..200)) {
        let mut index = BalancedIndex::new();
        let mut model: HashMap<String, u64> = HashMap::new();
        for (key, value) in &pairs {
            index.insert(key.clone(), *value);
            model.insert(key.clone(), *value);
        }

        prop_assert_eq!(index.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(index.get(key), Some(value));
        }
        // A key that cannot be generated by the strategy reports absence.
        prop_assert!(index.get("NOT-A-KEY").is_none());
    }

    #[test]
    fn persistence_round_trips_arbitrary_postings(
        entries in prop::collection::hash_map(
            key_strategy(),
            prop::collection::hash_map("[a-z/.]{1,12}", 1u64..1000, 0..5),
            0..40,
        )
    ) {
        let mut index = BalancedIndex::new();
        for (term, postings) in &entries {
            let map: PostingMap = postings.clone().into_iter().collect();
            index.insert(term.clone(), map);
        }

        let decoded = decode_index(&encode_index(&index)).unwrap();
        prop_assert!(decoded.is_balanced());
        prop_assert_eq!(decoded.len(), entries.len());
        for (term, postings) in &entries {
            let loaded = decoded.get(term).expect("term lost in round trip");
            prop_assert_eq!(loaded.len(), postings.len());
            for (doc, count) in postings {
                prop_assert_eq!(loaded.get(doc), Some(count));
            }
        }
    }
}
