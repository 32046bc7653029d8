//! Incremental merge of polled telemetry samples into the cached dataset.

use crate::thingspeak::error::ThingSpeakError;
use crate::thingspeak::feed::Feed;
use crate::types::dataset_frame::ms_to_naive;
use crate::types::reading::Reading;
use crate::types::schema;
use chrono::{NaiveDate, NaiveDateTime};
use log::info;
use polars::prelude::*;

/// Approximate number of samples the buoy publishes per day. Used as an
/// upper bound when asking the polling API to cover the gap since the last
/// cached reading; the API caps the reply at what actually exists.
pub const SAMPLES_PER_DAY: i64 = 150;

/// Number of samples to request to cover the gap between the dataset's last
/// reading date and `today`.
///
/// A last reading dated in the future (clock skew, malformed history) clamps
/// the gap to zero so no negative count ever reaches the API.
///
/// ```
/// use baswap::samples_needed;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
/// let last = NaiveDate::from_ymd_opt(2025, 1, 17).unwrap();
/// assert_eq!(samples_needed(today, last), 450);
/// ```
pub fn samples_needed(today: NaiveDate, last_reading: NaiveDate) -> usize {
    let days = (today - last_reading).num_days().max(0);
    (SAMPLES_PER_DAY * days) as usize
}

/// Last timestamp of a chronologically sorted dataset.
pub fn last_timestamp(df: &DataFrame) -> Result<NaiveDateTime, ThingSpeakError> {
    if df.height() == 0 {
        return Err(ThingSpeakError::EmptyDataset);
    }
    let ms = df
        .column(schema::TIMESTAMP_COL)?
        .datetime()?
        .get(df.height() - 1)
        .ok_or(ThingSpeakError::EmptyDataset)?;
    Ok(ms_to_naive(ms))
}

/// Appends feed samples strictly newer than the dataset's last timestamp,
/// then re-sorts the combined frame chronologically.
///
/// The admission baseline is the dataset's last timestamp captured once,
/// before any sample is evaluated; it is not advanced as rows are appended
/// within the same pass. Samples failing to decode (see
/// [`Feed::reading`]) are dropped before admission. The sort is stable, so a
/// pass that admits nothing returns the rows in their original order.
pub fn append_new_readings(df: DataFrame, feeds: &[Feed]) -> Result<DataFrame, ThingSpeakError> {
    let baseline = last_timestamp(&df)?;

    let admitted: Vec<Reading> = feeds
        .iter()
        .filter_map(Feed::reading)
        .filter(|reading| reading.timestamp > baseline)
        .collect();

    let mut df = df;
    if !admitted.is_empty() {
        info!(
            "Admitting {} of {} polled samples (baseline {})",
            admitted.len(),
            feeds.len(),
            baseline
        );
        df.vstack_mut(&readings_to_frame(&admitted)?)?;
    }

    let df = df.sort(
        [schema::TIMESTAMP_COL],
        SortMultipleOptions::default().with_maintain_order(true),
    )?;
    Ok(df)
}

/// Builds a canonical dataset frame from typed readings.
pub(crate) fn readings_to_frame(readings: &[Reading]) -> Result<DataFrame, ThingSpeakError> {
    let timestamps: Vec<i64> = readings
        .iter()
        .map(|r| r.timestamp.and_utc().timestamp_millis())
        .collect();
    let timestamps = Column::new(schema::TIMESTAMP_COL.into(), timestamps)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

    let columns = vec![
        timestamps,
        Column::new(
            schema::TEMPERATURE_COL.into(),
            readings.iter().map(|r| r.temperature).collect::<Vec<_>>(),
        ),
        Column::new(
            schema::PH_COL.into(),
            readings.iter().map(|r| r.ph).collect::<Vec<_>>(),
        ),
        Column::new(
            schema::EC_RAW_COL.into(),
            readings.iter().map(|r| r.ec_raw).collect::<Vec<_>>(),
        ),
        Column::new(
            schema::DO_RAW_COL.into(),
            readings.iter().map(|r| r.do_raw).collect::<Vec<_>>(),
        ),
        Column::new(
            schema::SALINITY_COL.into(),
            readings.iter().map(|r| r.salinity).collect::<Vec<_>>(),
        ),
        Column::new(
            schema::CONDUCTIVITY_COL.into(),
            readings.iter().map(|r| r.conductivity).collect::<Vec<_>>(),
        ),
    ];

    Ok(DataFrame::new(columns)?)
}
