mod baswap;
mod buoy_data;
mod error;
mod thingspeak;
mod types;

pub use baswap::*;
pub use error::BaswapError;

pub use buoy_data::error::BuoyDataError;
pub use buoy_data::loader::{HistoricalLoader, DRIVE_EXPORT_URL};
pub use buoy_data::snapshot_store::{SnapshotStore, DEFAULT_SNAPSHOT_TTL};

pub use thingspeak::client::{ThingSpeakClient, CHANNEL_FEED_URL};
pub use thingspeak::error::ThingSpeakError;
pub use thingspeak::feed::{Feed, FeedPage};
pub use thingspeak::merge::{append_new_readings, last_timestamp, samples_needed, SAMPLES_PER_DAY};

pub use types::aggregation::{Aggregation, Resolution};
pub use types::dataset_frame::DatasetLazyFrame;
pub use types::reading::{Reading, EC_SCALE};
pub use types::schema::{
    dataset_columns, CONDUCTIVITY_COL, DO_RAW_COL, EC_RAW_COL, PH_COL, SALINITY_COL, SENSOR_COLS,
    TEMPERATURE_COL, TIMESTAMP_COL,
};
pub use types::timezone::TARGET_ZONE;
