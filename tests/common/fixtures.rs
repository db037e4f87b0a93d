//! A small logbook seeded into a `MemoryStore`.
//!
//! Logs:
//! 1. "Power interruption due to unplugged wire." by John Doe, tags FOOD and RUN,
//!    runs 1 and 2, fill 1, environments CmCvjNbg and EIDO13i3D
//! 2. "Detected particle ABC123" by Jane Roe, tag FOOD, run 1, fills 1 and 2,
//!    environment CmCvjNbg
//! 3. "Cake at the particle accelerator!" by John Doe, tags MAINTENANCE and DCS,
//!    run 3, fill 6, environment 8E4aZTjY
//! 4. a reply to 1 by Jane Roe, tag RUN
//! 5. a reply to 4 (thread of 1) by Anonymous
//! 6. an entry without author
//!
//! Fills 1 to 7 with their runs back the statistics tests.

use chrono::{TimeZone, Utc};
use logbook_core::database::{MemoryStore, Store};
use logbook_core::logs::{content_search_matches, CONTENT_SEARCH_EXPRESSION};
use logbook_core::models::logbook_schema;
use serde_json::{json, Value};
use std::sync::Arc;

/// Epoch milliseconds of a UTC date-time
pub fn ms(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> i64 {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .unwrap()
        .timestamp_millis()
}

pub fn empty_store() -> MemoryStore {
    let store = MemoryStore::new(Arc::new(logbook_schema()));
    store.register_literal(CONTENT_SEARCH_EXPRESSION, content_search_matches);
    store
}

fn insert_all(store: &MemoryStore, model: &str, rows: Vec<Value>) {
    for row in rows {
        store.insert(model, row).unwrap();
    }
}

pub fn seeded_store() -> MemoryStore {
    let store = empty_store();

    insert_all(
        &store,
        "users",
        vec![
            json!({"id": 1, "external_id": 1, "name": "John Doe"}),
            json!({"id": 2, "external_id": 2, "name": "Jane Roe"}),
            json!({"id": 3, "name": "Anonymous"}),
        ],
    );

    insert_all(
        &store,
        "tags",
        vec![
            json!({"id": 1, "text": "FOOD"}),
            json!({"id": 2, "text": "RUN"}),
            json!({"id": 3, "text": "MAINTENANCE"}),
            json!({"id": 4, "text": "DCS"}),
        ],
    );

    insert_all(
        &store,
        "environments",
        vec![
            json!({"id": "CmCvjNbg", "created_at": ms(2019, 8, 8, 9, 0, 0)}),
            json!({"id": "EIDO13i3D", "created_at": ms(2019, 8, 8, 9, 30, 0)}),
            json!({"id": "8E4aZTjY", "created_at": ms(2019, 8, 9, 9, 0, 0)}),
        ],
    );

    insert_all(
        &store,
        "subsystems",
        vec![
            json!({"id": 1, "name": "ITS"}),
            json!({"id": 2, "name": "TPC"}),
        ],
    );

    insert_all(
        &store,
        "lhc_fills",
        vec![
            json!({"id": 1, "fill_number": 1,
                   "stable_beams_start": "2019-08-08T08:00:00Z",
                   "stable_beams_end": "2019-08-08T11:00:00Z"}),
            json!({"id": 2, "fill_number": 2,
                   "stable_beams_start": "2019-08-08T12:00:00Z",
                   "stable_beams_end": "2019-08-08T23:00:00Z"}),
            json!({"id": 3, "fill_number": 3,
                   "stable_beams_start": "2019-08-09T10:00:00Z",
                   "stable_beams_end": "2019-08-10T00:00:00Z"}),
            json!({"id": 4, "fill_number": 4,
                   "stable_beams_start": "2019-08-07T20:00:00Z",
                   "stable_beams_end": "2019-08-08T09:00:00Z"}),
            json!({"id": 5, "fill_number": 5,
                   "stable_beams_start": "2023-08-08T00:00:00Z",
                   "stable_beams_end": "2023-08-10T00:00:00Z"}),
            json!({"id": 6, "fill_number": 6,
                   "stable_beams_start": "2022-03-22T00:00:00Z",
                   "stable_beams_end": "2022-03-22T12:00:00Z"}),
            json!({"id": 7, "fill_number": 7,
                   "stable_beams_start": "2023-09-01T00:00:00Z"}),
        ],
    );

    insert_all(
        &store,
        "runs",
        vec![
            json!({"id": 1, "run_number": 1, "fill_number": 2,
                   "time_start": "2019-08-08T13:00:00Z", "time_end": "2019-08-08T14:00:00Z",
                   "ctf_file_size": 1000, "tf_file_size": 2000}),
            json!({"id": 2, "run_number": 2, "fill_number": 2,
                   "time_start": "2019-08-08T15:00:00Z", "time_end": "2019-08-08T16:00:00Z"}),
            json!({"id": 3, "run_number": 3, "fill_number": 2,
                   "time_start": "2019-08-08T20:00:00Z", "time_end": "2019-08-08T22:00:00Z"}),
            json!({"id": 4, "run_number": 4, "fill_number": 6,
                   "time_start": "2022-03-22T03:00:00Z", "time_end": "2022-03-22T04:40:00Z",
                   "ctf_file_size": 22_652_287_353_i64, "tf_file_size": 247_266_898_774_i64}),
            json!({"id": 5, "run_number": 5, "fill_number": 6,
                   "time_start": "2022-03-22T06:00:00Z", "time_end": "2022-03-22T07:40:00Z",
                   "ctf_file_size": 22_652_287_354_i64, "tf_file_size": 247_266_898_774_i64}),
            json!({"id": 6, "run_number": 6, "fill_number": 6,
                   "time_start": "2022-03-22T08:20:00Z", "time_end": "2022-03-22T10:00:00Z",
                   "ctf_file_size": 22_652_287_354_i64, "tf_file_size": 247_266_898_774_i64}),
            json!({"id": 7, "run_number": 7, "fill_number": 7,
                   "time_start": "2023-09-01T01:00:00Z"}),
            json!({"id": 8, "run_number": 8}),
        ],
    );

    insert_all(
        &store,
        "logs",
        vec![
            json!({"id": 1, "title": "Power interruption due to unplugged wire.",
                   "text": "The power went down because a wire was unplugged in the cavern.",
                   "user_id": 1, "created_at": ms(2019, 8, 8, 10, 0, 0), "origin": "human"}),
            json!({"id": 2, "title": "Detected particle ABC123",
                   "text": "Detected particle ABC123 near the beam pipe.",
                   "user_id": 2, "created_at": ms(2019, 8, 9, 10, 0, 0), "origin": "process"}),
            json!({"id": 3, "title": "Cake at the particle accelerator!",
                   "text": "There is cake in the control room.",
                   "user_id": 1, "created_at": ms(2019, 8, 10, 10, 0, 0), "origin": "human"}),
            json!({"id": 4, "title": "Re: Power interruption",
                   "text": "The wire is plugged back in.",
                   "user_id": 2, "parent_log_id": 1, "root_log_id": 1,
                   "created_at": ms(2019, 8, 11, 10, 0, 0), "origin": "human"}),
            json!({"id": 5, "title": "Re: Re: Power interruption",
                   "text": "Confirmed, power is back.",
                   "user_id": 3, "parent_log_id": 4, "root_log_id": 1,
                   "created_at": ms(2019, 8, 12, 10, 0, 0), "origin": "human"}),
            json!({"id": 6, "title": "Untitled",
                   "text": "Automatic entry.",
                   "created_at": ms(2019, 8, 13, 10, 0, 0), "origin": "process"}),
        ],
    );

    insert_all(
        &store,
        "log_tags",
        vec![
            json!({"log_id": 1, "tag_id": 1}),
            json!({"log_id": 1, "tag_id": 2}),
            json!({"log_id": 2, "tag_id": 1}),
            json!({"log_id": 3, "tag_id": 3}),
            json!({"log_id": 3, "tag_id": 4}),
            json!({"log_id": 4, "tag_id": 2}),
        ],
    );

    insert_all(
        &store,
        "log_runs",
        vec![
            json!({"log_id": 1, "run_id": 1}),
            json!({"log_id": 1, "run_id": 2}),
            json!({"log_id": 2, "run_id": 1}),
            json!({"log_id": 3, "run_id": 3}),
        ],
    );

    insert_all(
        &store,
        "log_lhc_fills",
        vec![
            json!({"log_id": 1, "lhc_fill_id": 1}),
            json!({"log_id": 2, "lhc_fill_id": 1}),
            json!({"log_id": 2, "lhc_fill_id": 2}),
            json!({"log_id": 3, "lhc_fill_id": 6}),
        ],
    );

    insert_all(
        &store,
        "log_environments",
        vec![
            json!({"log_id": 1, "environment_id": "CmCvjNbg"}),
            json!({"log_id": 1, "environment_id": "EIDO13i3D"}),
            json!({"log_id": 2, "environment_id": "CmCvjNbg"}),
            json!({"log_id": 3, "environment_id": "8E4aZTjY"}),
        ],
    );

    insert_all(
        &store,
        "log_subsystems",
        vec![
            json!({"log_id": 1, "subsystem_id": 1}),
            json!({"log_id": 3, "subsystem_id": 2}),
        ],
    );

    insert_all(
        &store,
        "attachments",
        vec![json!({"id": 1, "log_id": 1, "file_name": "wire.png",
                    "mime_type": "image/png", "size": 2048})],
    );

    store
}

pub fn seeded() -> Arc<dyn Store> {
    Arc::new(seeded_store())
}
