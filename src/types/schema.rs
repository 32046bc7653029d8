//! Canonical column layout of the combined buoy dataset.
//!
//! The historical CSV in durable storage and every frame produced by this
//! crate share the same seven columns, in the same order. The timestamp
//! column holds Indochina (UTC+7) wall-clock time as a timezone-naive
//! `Datetime[ms]`.

/// Name of the timestamp column, as it appears in the stored CSV header.
pub const TIMESTAMP_COL: &str = "Timestamp (GMT+7)";

/// Water temperature, degrees Celsius (wire `field1`).
pub const TEMPERATURE_COL: &str = "Temperature (°C)";

/// Acidity (wire `field2`).
pub const PH_COL: &str = "pH";

/// Raw conductivity ADC channel, integer counts (wire `field3`).
pub const EC_RAW_COL: &str = "EC Raw";

/// Raw dissolved-oxygen channel (wire `field4`).
pub const DO_RAW_COL: &str = "DO Raw";

/// Salinity, parts per thousand (wire `field5`).
pub const SALINITY_COL: &str = "Salinity (ppt)";

/// Conductivity in mS/cm, derived from [`EC_RAW_COL`] at admission time.
pub const CONDUCTIVITY_COL: &str = "EC (mS/cm)";

/// Every sensor value column, in canonical order (derived column last).
pub const SENSOR_COLS: [&str; 6] = [
    TEMPERATURE_COL,
    PH_COL,
    EC_RAW_COL,
    DO_RAW_COL,
    SALINITY_COL,
    CONDUCTIVITY_COL,
];

/// Full canonical column order of a dataset frame, timestamp first.
pub fn dataset_columns() -> Vec<&'static str> {
    let mut columns = vec![TIMESTAMP_COL];
    columns.extend(SENSOR_COLS);
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_leads_the_canonical_order() {
        let columns = dataset_columns();
        assert_eq!(columns.len(), 7);
        assert_eq!(columns[0], TIMESTAMP_COL);
        assert_eq!(columns[6], CONDUCTIVITY_COL);
    }
}
