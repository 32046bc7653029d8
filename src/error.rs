use crate::buoy_data::error::BuoyDataError;
use crate::thingspeak::error::ThingSpeakError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BaswapError {
    #[error(transparent)]
    BuoyData(#[from] BuoyDataError),

    #[error(transparent)]
    ThingSpeak(#[from] ThingSpeakError),

    #[error("Failed processing dataset: {0}")]
    DataFrame(#[from] polars::error::PolarsError),
}
