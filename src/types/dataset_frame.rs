//! Contains the `DatasetLazyFrame` structure for lazy operations on the
//! combined buoy dataset.

use crate::error::BaswapError;
use crate::types::aggregation::{Aggregation, Resolution};
use crate::types::reading::Reading;
use crate::types::schema;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::{
    col, lit, ClosedWindow, Duration, DynamicGroupOptions, Expr, Label, LazyFrame, StartBy,
};

/// Decodes the physical millisecond representation of a naive datetime cell.
pub(crate) fn ms_to_naive(ms: i64) -> NaiveDateTime {
    DateTime::from_timestamp_millis(ms)
        .expect("dataset timestamps are in-range epoch milliseconds")
        .naive_utc()
}

/// A wrapper around a Polars `LazyFrame` holding the combined buoy dataset.
///
/// The frame carries the canonical seven-column schema (see
/// [`crate::types::schema`]): one target-zone timestamp column followed by the
/// six sensor value columns. Methods on this struct cover the operations the
/// dashboard performs on a dataset (date-range filtering, hourly/daily
/// resampling and typed row collection) while retaining lazy evaluation.
///
/// Instances are obtained via [`crate::Baswap::historical`] and
/// [`crate::Baswap::latest`].
///
/// # Errors
///
/// Operations that trigger computation on the underlying `LazyFrame` (e.g.
/// calling `.collect()`) can return a [`polars::prelude::PolarsError`].
#[derive(Clone)]
pub struct DatasetLazyFrame {
    /// The underlying Polars LazyFrame containing the dataset.
    pub frame: LazyFrame,
}

impl std::fmt::Debug for DatasetLazyFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetLazyFrame").finish_non_exhaustive()
    }
}

impl DatasetLazyFrame {
    /// Wraps a `LazyFrame` assumed to carry the canonical dataset schema.
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Filters the dataset with an arbitrary Polars predicate expression.
    ///
    /// Returns a *new* `DatasetLazyFrame` with the filter applied lazily; the
    /// original remains unchanged.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use baswap::{Baswap, BaswapError, SALINITY_COL};
    /// use polars::prelude::{col, lit};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Baswap::default();
    /// let dataset = client.historical().file("combined-file-id").call().await?;
    ///
    /// // Keep only brackish readings.
    /// let brackish = dataset.filter(col(SALINITY_COL).gt(lit(0.5f64)));
    /// let df = brackish.frame.collect()?;
    /// println!("{}", df);
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> DatasetLazyFrame {
        DatasetLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Restricts the dataset to a calendar-date window (both ends inclusive).
    ///
    /// The window covers `from` at 00:00:00 through `to` at 23:59:59 in the
    /// target zone, mirroring the dashboard's date-range picker.
    ///
    /// # Arguments
    ///
    /// * `from` - First calendar date to keep.
    /// * `to` - Last calendar date to keep.
    pub fn get_range(&self, from: NaiveDate, to: NaiveDate) -> DatasetLazyFrame {
        let start = from
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid wall-clock time");
        let end = to
            .and_hms_opt(23, 59, 59)
            .expect("end of day is a valid wall-clock time");

        self.filter(
            col(schema::TIMESTAMP_COL)
                .gt_eq(lit(start))
                .and(col(schema::TIMESTAMP_COL).lt_eq(lit(end))),
        )
    }

    /// Resamples the dataset into hourly or daily windows, combining every
    /// sensor column with the chosen aggregate.
    ///
    /// Windows are left-labelled and left-closed: the row labelled
    /// `2025-01-17 08:00:00` aggregates samples from 08:00:00 (inclusive) to
    /// 09:00:00 (exclusive). Requires the frame to be sorted by timestamp,
    /// which every dataset produced by this crate is.
    ///
    /// Note that aggregation changes the dtype of the integer raw channel
    /// (e.g. a mean of `EC Raw` is a float), so the result is a summary view,
    /// not a canonical dataset.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use baswap::{Aggregation, Baswap, BaswapError, Resolution};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Baswap::default();
    /// let dataset = client.latest().file("combined-file-id").call().await?;
    ///
    /// let daily_means = dataset.resample(Resolution::Daily, Aggregation::Mean);
    /// println!("{}", daily_means.frame.collect()?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn resample(&self, resolution: Resolution, aggregation: Aggregation) -> DatasetLazyFrame {
        let every = Duration::parse(resolution.window());
        let no_groups: [Expr; 0] = [];
        let aggregates: Vec<Expr> = schema::SENSOR_COLS
            .iter()
            .map(|column| aggregation.apply(col(*column)))
            .collect();

        let frame = self
            .frame
            .clone()
            .group_by_dynamic(
                col(schema::TIMESTAMP_COL),
                no_groups,
                DynamicGroupOptions {
                    every,
                    period: every,
                    offset: Duration::parse("0"),
                    label: Label::Left,
                    closed_window: ClosedWindow::Left,
                    start_by: StartBy::WindowBound,
                    ..Default::default()
                },
            )
            .agg(aggregates);

        DatasetLazyFrame::new(frame)
    }

    /// First and last timestamp of the dataset, used for picker bounds.
    ///
    /// Returns `(None, None)` for an empty frame.
    pub fn time_bounds(&self) -> Result<(Option<NaiveDateTime>, Option<NaiveDateTime>), BaswapError> {
        let bounds = self
            .frame
            .clone()
            .select([
                col(schema::TIMESTAMP_COL).min().alias("min"),
                col(schema::TIMESTAMP_COL).max().alias("max"),
            ])
            .collect()?;

        let min = bounds.column("min")?.datetime()?.get(0).map(ms_to_naive);
        let max = bounds.column("max")?.datetime()?.get(0).map(ms_to_naive);
        Ok((min, max))
    }

    /// Materializes the dataset into typed [`Reading`] rows.
    ///
    /// Expects the canonical raw schema; resampled views (whose raw channel
    /// is no longer an integer) cannot be collected this way. Null sensor
    /// cells collapse to zero, matching the wire decoding rules.
    pub fn collect_readings(&self) -> Result<Vec<Reading>, BaswapError> {
        let df = self.frame.clone().collect()?;

        let timestamps = df.column(schema::TIMESTAMP_COL)?.datetime()?;
        let temperature = df.column(schema::TEMPERATURE_COL)?.f64()?;
        let ph = df.column(schema::PH_COL)?.f64()?;
        let ec_raw = df.column(schema::EC_RAW_COL)?.i64()?;
        let do_raw = df.column(schema::DO_RAW_COL)?.f64()?;
        let salinity = df.column(schema::SALINITY_COL)?.f64()?;
        let conductivity = df.column(schema::CONDUCTIVITY_COL)?.f64()?;

        let mut readings = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let Some(ms) = timestamps.get(i) else {
                continue;
            };
            readings.push(Reading {
                timestamp: ms_to_naive(ms),
                temperature: temperature.get(i).unwrap_or(0.0),
                ph: ph.get(i).unwrap_or(0.0),
                ec_raw: ec_raw.get(i).unwrap_or(0),
                do_raw: do_raw.get(i).unwrap_or(0.0),
                salinity: salinity.get(i).unwrap_or(0.0),
                conductivity: conductivity.get(i).unwrap_or(0.0),
            });
        }
        Ok(readings)
    }
}
