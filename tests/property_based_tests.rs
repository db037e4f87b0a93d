mod common;

use common::strategies::*;
use logbook_core::database::{MemoryStore, Store};
use logbook_core::query_builder::QueryBuilder;
use logbook_core::repositories::RecordRepository;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

fn run_ids(store: &MemoryStore, query: QueryBuilder) -> BTreeSet<i64> {
    tokio_test::block_on(async {
        let repository = RecordRepository::new(Arc::clone(store.schema()), "runs");
        let mut tx = store.begin().await.unwrap();
        repository
            .find_all(&mut *tx, &query)
            .await
            .unwrap()
            .iter()
            .map(|record| record["id"].as_i64().unwrap())
            .collect()
    })
}

fn non_null_ids(fill_numbers: &[Option<i32>]) -> BTreeSet<i64> {
    fill_numbers
        .iter()
        .enumerate()
        .filter(|(_, fill)| fill.is_some())
        .map(|(index, _)| index as i64 + 1)
        .collect()
}

proptest! {
    /// Property: `is` and `not().is` partition the rows with a value
    #[test]
    fn negated_equality_is_the_complement_over_non_null_rows(
        fills in fill_numbers_strategy(),
        pivot in 0..6i32,
    ) {
        let store = runs_store(&fills);
        let matching = run_ids(&store, QueryBuilder::new().where_field("fill_number").is(pivot));
        let others = run_ids(&store, QueryBuilder::new().where_field("fill_number").not().is(pivot));

        prop_assert!(matching.is_disjoint(&others));
        let union: BTreeSet<i64> = matching.union(&others).copied().collect();
        prop_assert_eq!(union, non_null_ids(&fills));
    }

    /// Property: `between` is inclusive and `not().between` is its exact complement
    #[test]
    fn between_partitions_non_null_rows(
        fills in fill_numbers_strategy(),
        lo in 0..6i32,
        width in 0..4i32,
    ) {
        let hi = lo + width;
        let store = runs_store(&fills);
        let inside = run_ids(&store, QueryBuilder::new().where_field("fill_number").between(lo, hi));
        let outside = run_ids(&store, QueryBuilder::new().where_field("fill_number").not().between(lo, hi));

        let expected: BTreeSet<i64> = fills
            .iter()
            .enumerate()
            .filter(|(_, fill)| fill.map(|f| f >= lo && f <= hi).unwrap_or(false))
            .map(|(index, _)| index as i64 + 1)
            .collect();
        prop_assert_eq!(&inside, &expected);
        prop_assert!(inside.is_disjoint(&outside));
        prop_assert_eq!(inside.len() + outside.len(), non_null_ids(&fills).len());
    }

    /// Property: `one_of` and its negation partition the rows with a value
    #[test]
    fn one_of_and_its_negation_partition_non_null_rows(
        fills in fill_numbers_strategy(),
        values in prop::collection::vec(0..6i32, 0..4),
    ) {
        let store = runs_store(&fills);
        let inside = run_ids(&store, QueryBuilder::new().where_field("fill_number").one_of(values.clone()));
        let outside = run_ids(&store, QueryBuilder::new().where_field("fill_number").not().one_of(values.clone()));

        if values.is_empty() {
            prop_assert!(inside.is_empty());
        }
        prop_assert!(inside.is_disjoint(&outside));
        let union: BTreeSet<i64> = inside.union(&outside).copied().collect();
        prop_assert_eq!(union, non_null_ids(&fills));
    }

    /// Property: `starts_with` is a case-sensitive prefix match
    #[test]
    fn starts_with_is_a_case_sensitive_prefix_match(title in title_strategy()) {
        let expected = title.starts_with("Power");
        let evaluated = logbook_core::database::evaluation::evaluate_predicate(
            &serde_json::Value::String(title),
            &logbook_core::query_builder::Predicate::StartsWith("Power".to_string()),
            false,
        );
        prop_assert_eq!(evaluated, Some(expected));
    }
}
