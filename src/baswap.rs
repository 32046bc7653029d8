//! This module provides the main entry point for retrieving the combined
//! buoy dataset. It serves the historical snapshot from durable storage
//! (cached with a time-to-live) and extends it with fresh samples polled
//! from the buoy's telemetry channel.

use crate::buoy_data::loader::{HistoricalLoader, DRIVE_EXPORT_URL};
use crate::buoy_data::snapshot_store::{SnapshotStore, DEFAULT_SNAPSHOT_TTL};
use crate::error::BaswapError;
use crate::thingspeak::client::{ThingSpeakClient, CHANNEL_FEED_URL};
use crate::thingspeak::error::ThingSpeakError;
use crate::thingspeak::merge;
use crate::types::dataset_frame::DatasetLazyFrame;
use crate::types::timezone::today_in_target_zone;
use bon::bon;
use log::warn;
use polars::prelude::IntoLazy;
use std::time::Duration;

/// The main client for accessing BASWAP water-quality data.
///
/// The client owns two subsystems: a TTL-cached snapshot store over the
/// durable-storage CSV (the historical dataset) and a ThingSpeak channel
/// client for incremental samples. Construct one with [`Baswap::default`]
/// for the production endpoints, or via the builder to point at different
/// URLs or change the cache lifetime:
///
/// ```
/// use baswap::Baswap;
/// use std::time::Duration;
///
/// let client = Baswap::builder()
///     .cache_ttl(Duration::from_secs(3600))
///     .build();
/// # let _ = client;
/// ```
pub struct Baswap {
    snapshots: SnapshotStore,
    thingspeak: ThingSpeakClient,
}

#[bon]
impl Baswap {
    /// Creates a client via `Baswap::builder()`.
    ///
    /// # Arguments
    ///
    /// * `.historical_base_url(String)`: Optional. Export endpoint of the
    ///   durable file store. Defaults to the public Drive export URL.
    /// * `.channel_url(String)`: Optional. Feed endpoint of the telemetry
    ///   channel. Defaults to the buoy's public ThingSpeak channel.
    /// * `.cache_ttl(Duration)`: Optional. Snapshot cache lifetime.
    ///   Defaults to 24 hours.
    #[builder]
    pub fn new(
        #[builder(default = DRIVE_EXPORT_URL.to_string())] historical_base_url: String,
        #[builder(default = CHANNEL_FEED_URL.to_string())] channel_url: String,
        #[builder(default = DEFAULT_SNAPSHOT_TTL)] cache_ttl: Duration,
    ) -> Self {
        Self {
            snapshots: SnapshotStore::new(HistoricalLoader::new(historical_base_url), cache_ttl),
            thingspeak: ThingSpeakClient::new(channel_url),
        }
    }

    /// Fetches the historical dataset for a storage file id.
    ///
    /// Served from the snapshot cache when the entry is inside its
    /// time-to-live window; otherwise downloaded, normalized and cached.
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.file(&str)`: **Required.** The durable-storage file id of the
    ///   combined CSV.
    ///
    /// # Returns
    ///
    /// A `Result` containing a [`DatasetLazyFrame`] over the historical
    /// rows, or a [`BaswapError`] on failure.
    ///
    /// # Errors
    ///
    /// Returns [`BaswapError::BuoyData`] variants for storage fetch
    /// failures, CSV parse failures, a missing canonical column, or a
    /// dataset left empty after timestamp normalization.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use baswap::{Baswap, BaswapError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Baswap::default();
    /// let history = client.historical().file("combined-file-id").call().await?;
    /// println!("{}", history.frame.collect()?.head(Some(5)));
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn historical(&self, file: &str) -> Result<DatasetLazyFrame, BaswapError> {
        let df = self.snapshots.get_cache_frame(file).await?;
        Ok(DatasetLazyFrame::new(df.lazy()))
    }

    /// Fetches the historical dataset and extends it with newer samples
    /// polled from the telemetry channel.
    ///
    /// The number of requested samples covers the day gap between the
    /// dataset's last reading and today in the target zone (150 per day); a
    /// zero gap skips the poll entirely. Samples are admitted only when
    /// strictly newer than the snapshot's last timestamp, and the merged
    /// frame is re-sorted chronologically. The merge result is never cached.
    ///
    /// A failed poll (network error or non-success status) is logged and
    /// yields the snapshot unchanged, so a render cycle can carry on with
    /// the data it has; an undecodable feed body is an error.
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.file(&str)`: **Required.** The durable-storage file id of the
    ///   combined CSV.
    ///
    /// # Returns
    ///
    /// A `Result` containing the merged [`DatasetLazyFrame`], or a
    /// [`BaswapError`] on failure.
    ///
    /// # Errors
    ///
    /// Returns [`BaswapError::BuoyData`] variants when the underlying
    /// snapshot cannot be loaded, and [`BaswapError::ThingSpeak`] variants
    /// when the feed body cannot be decoded or the merge itself fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use baswap::{Baswap, BaswapError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Baswap::default();
    /// let dataset = client.latest().file("combined-file-id").call().await?;
    /// let readings = dataset.collect_readings()?;
    /// println!("{} readings up to now", readings.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn latest(&self, file: &str) -> Result<DatasetLazyFrame, BaswapError> {
        let df = self.snapshots.get_cache_frame(file).await?;

        let last = merge::last_timestamp(&df)?;
        let wanted = merge::samples_needed(today_in_target_zone(), last.date());
        if wanted == 0 {
            return Ok(DatasetLazyFrame::new(df.lazy()));
        }

        match self.thingspeak.fetch_feeds(wanted).await {
            Ok(feeds) => {
                let merged = merge::append_new_readings(df, &feeds)?;
                Ok(DatasetLazyFrame::new(merged.lazy()))
            }
            Err(e @ (ThingSpeakError::NetworkRequest(..) | ThingSpeakError::HttpStatus { .. })) => {
                warn!("Telemetry poll failed, serving cached snapshot unchanged: {}", e);
                Ok(DatasetLazyFrame::new(df.lazy()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Baswap {
    /// Empties the snapshot cache; the next [`Baswap::historical`] or
    /// [`Baswap::latest`] call per file id reloads from durable storage.
    pub async fn clear_cache(&self) {
        self.snapshots.clear().await;
    }
}

impl Default for Baswap {
    fn default() -> Self {
        Baswap::builder().build()
    }
}
