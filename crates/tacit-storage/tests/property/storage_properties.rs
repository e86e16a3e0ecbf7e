//! Property tests: create→get roundtrip and usage monotonicity.

use proptest::prelude::*;

use tacit_core::knowledge::KnowledgeUnit;
use tacit_core::traits::IKnowledgeStorage;
use tacit_storage::StorageEngine;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn roundtrip_preserves_text_and_hash(
        name in "[a-zA-Z0-9 ?']{1,40}",
        problem in "[a-zA-Z0-9 .,]{0,80}",
        solution in "[a-zA-Z0-9 .,]{1,80}",
        tags in proptest::collection::btree_set("[a-z]{2,8}", 0..4),
    ) {
        let storage = StorageEngine::open_in_memory().unwrap();
        let mut u = KnowledgeUnit::new_candidate("p", "d", name, problem, solution);
        u.tags.extend(tags);
        u.refresh_content_hash();
        storage.create(&u).unwrap();
        let got = storage.get("p").unwrap().unwrap();
        prop_assert_eq!(&got.name, &u.name);
        prop_assert_eq!(&got.tags, &u.tags);
        prop_assert_eq!(got.compute_content_hash(), u.content_hash);
    }

    #[test]
    fn usage_count_equals_increments(n in 0u64..20) {
        let storage = StorageEngine::open_in_memory().unwrap();
        storage.create(&KnowledgeUnit::new_candidate("p", "d", "n", "", "s")).unwrap();
        for _ in 0..n {
            storage.increment_usage("p").unwrap();
        }
        prop_assert_eq!(storage.get("p").unwrap().unwrap().usage_count, n);
    }
}
