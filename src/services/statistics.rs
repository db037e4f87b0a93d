//! Per-fill efficiency statistics.
//!
//! A fill qualifies for a window `[from, to)` when its stable beams started
//! before `to` and it either is still open or ended inside the window. Open
//! fills are measured up to `to`.

use crate::database::{finish, Executor, Store};
use crate::error::Result;
use crate::models::{LhcFill, Run};
use crate::query_builder::{Comparison, Condition, QueryBuilder};
use crate::repositories::Repository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillStatisticsWindow {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub from: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub to: DateTime<Utc>,
}

impl FillStatisticsWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }
}

/// Durations are milliseconds, ratios are rounded to four decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillStatistics {
    pub fill_number: i32,
    pub runs_coverage: i64,
    pub efficiency: f64,
    pub time_loss_at_start: i64,
    pub efficiency_loss_at_start: f64,
    pub time_loss_at_end: i64,
    pub efficiency_loss_at_end: f64,
    pub mean_run_duration: i64,
    pub total_ctf_file_size: i64,
    pub total_tf_file_size: i64,
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

impl FillStatistics {
    /// Statistics of `fill` from the runs that took place during it.
    ///
    /// `window_end` closes a fill whose stable beams have not ended yet.
    pub fn compute(fill: &LhcFill, runs: &[Run], window_end: DateTime<Utc>) -> Self {
        let open = fill.stable_beams_end.is_none();
        let effective_end = fill.stable_beams_end.unwrap_or(window_end).timestamp_millis();
        let start = fill
            .stable_beams_start
            .map(|s| s.timestamp_millis())
            .unwrap_or(effective_end);
        let fill_duration = (effective_end - start).max(0);

        // (start, end) of every run that started; unfinished runs last until the fill ends
        let intervals: Vec<(i64, i64, &Run)> = runs
            .iter()
            .filter_map(|run| {
                let run_start = run.time_start?.timestamp_millis();
                let run_end = run
                    .time_end
                    .map(|end| end.timestamp_millis())
                    .unwrap_or(effective_end);
                Some((run_start, run_end, run))
            })
            .collect();

        let ratio = |value: i64| {
            if fill_duration == 0 || intervals.is_empty() {
                0.0
            } else {
                round4(value as f64 / fill_duration as f64)
            }
        };

        let runs_coverage: i64 = intervals
            .iter()
            .map(|(run_start, run_end, _)| {
                ((*run_end).min(effective_end) - (*run_start).max(start)).max(0)
            })
            .sum();

        let first_start = intervals.iter().map(|(s, _, _)| *s).min();
        let last_end = intervals.iter().map(|(_, e, _)| *e).max();
        let time_loss_at_start = first_start.map(|s| (s - start).max(0)).unwrap_or(0);
        let time_loss_at_end = match (open, last_end) {
            (false, Some(e)) => (effective_end - e).max(0),
            _ => 0,
        };

        let mean_run_duration = if intervals.is_empty() {
            0
        } else {
            let total: i64 = intervals.iter().map(|(s, e, _)| e - s).sum();
            (total as f64 / intervals.len() as f64).round() as i64
        };

        Self {
            fill_number: fill.fill_number,
            runs_coverage,
            efficiency: ratio(runs_coverage),
            time_loss_at_start,
            efficiency_loss_at_start: ratio(time_loss_at_start),
            time_loss_at_end,
            efficiency_loss_at_end: ratio(time_loss_at_end),
            mean_run_duration,
            total_ctf_file_size: intervals
                .iter()
                .map(|(_, _, run)| run.ctf_file_size.unwrap_or(0))
                .sum(),
            total_tf_file_size: intervals
                .iter()
                .map(|(_, _, run)| run.tf_file_size.unwrap_or(0))
                .sum(),
        }
    }
}

pub struct StatisticsService {
    store: Arc<dyn Store>,
    fills: Repository<LhcFill>,
    runs: Repository<Run>,
}

impl StatisticsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let schema = Arc::clone(store.schema());
        Self {
            fills: Repository::new(Arc::clone(&schema)),
            runs: Repository::new(schema),
            store,
        }
    }

    /// Statistics of every fill qualifying for `window`, by fill number
    pub async fn compute_fill_statistics(
        &self,
        window: &FillStatisticsWindow,
    ) -> Result<Vec<FillStatistics>> {
        if window.from >= window.to {
            debug!(from = %window.from, to = %window.to, "Empty statistics window");
            return Ok(Vec::new());
        }

        let mut tx = self.store.begin().await?;
        let outcome = self.compute_in(&mut *tx, window).await;
        let statistics = finish(tx, outcome).await?;

        info!(
            from = %window.from,
            to = %window.to,
            fills = statistics.len(),
            "Computed fill statistics"
        );
        Ok(statistics)
    }

    async fn compute_in<E>(
        &self,
        executor: &mut E,
        window: &FillStatisticsWindow,
    ) -> Result<Vec<FillStatistics>>
    where
        E: Executor + ?Sized,
    {
        let from = window.from.timestamp_millis();
        let to = window.to.timestamp_millis();

        let fill_query = QueryBuilder::new()
            .where_field("stable_beams_start")
            .lower_than(to)
            .where_any(vec![
                Condition::is_null("stable_beams_end"),
                Condition::all(vec![
                    Condition::compare("stable_beams_end", Comparison::GreaterThanOrEqual, from),
                    Condition::compare("stable_beams_end", Comparison::LowerThan, to),
                ]),
            ])
            .order_asc("fill_number");
        let fills = self.fills.find_all(executor, &fill_query).await?;
        if fills.is_empty() {
            return Ok(Vec::new());
        }

        let run_query = QueryBuilder::new()
            .where_field("fill_number")
            .one_of(fills.iter().map(|fill| fill.fill_number))
            .order_asc("time_start");
        let mut runs_by_fill: HashMap<i64, Vec<Run>> = self
            .runs
            .find_all_and_group(executor, &run_query, "fill_number")
            .await?
            .into_iter()
            .filter_map(|group| Some((group.index.as_i64()?, group.values)))
            .collect();
        debug!(fills = fills.len(), fills_with_runs = runs_by_fill.len(), "Loaded fills and runs");

        Ok(fills
            .iter()
            .map(|fill| {
                let runs = runs_by_fill
                    .remove(&i64::from(fill.fill_number))
                    .unwrap_or_default();
                FillStatistics::compute(fill, &runs, window.to)
            })
            .collect())
    }
}
