use logbook_core::database::MemoryStore;
use logbook_core::models::logbook_schema;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

/// Fill numbers of a handful of runs; `None` leaves the run without a fill
pub fn fill_numbers_strategy() -> impl Strategy<Value = Vec<Option<i32>>> {
    prop::collection::vec(prop::option::weighted(0.8, 0..6i32), 0..24)
}

/// Runs numbered from 1 with the given fill numbers
pub fn runs_store(fill_numbers: &[Option<i32>]) -> MemoryStore {
    let store = MemoryStore::new(Arc::new(logbook_schema()));
    for (index, fill_number) in fill_numbers.iter().enumerate() {
        let id = index as i64 + 1;
        store
            .insert(
                "runs",
                json!({"id": id, "run_number": id, "fill_number": fill_number}),
            )
            .unwrap();
    }
    store
}

/// Titles mixing a shared prefix with arbitrary text
pub fn title_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "Power [a-zA-Z ]{0,12}",
        "[a-zA-Z ]{0,16}",
        "[a-z]{1,6} wire\\.",
    ]
}
