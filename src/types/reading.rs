use chrono::NaiveDateTime;

/// Scale factor turning raw conductivity ADC counts into mS/cm.
pub const EC_SCALE: f64 = 2000.0;

/// One buoy sample, expressed in target-zone wall-clock time.
#[derive(Debug, PartialEq, Clone)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub ph: f64,
    pub ec_raw: i64,
    pub do_raw: f64,
    pub salinity: f64,
    /// Conductivity in mS/cm, derived as `ec_raw / 2000`.
    pub conductivity: f64,
}

impl Reading {
    /// Builds a reading from decoded sensor fields, computing the derived
    /// conductivity from the raw channel.
    pub fn new(
        timestamp: NaiveDateTime,
        temperature: f64,
        ph: f64,
        ec_raw: i64,
        do_raw: f64,
        salinity: f64,
    ) -> Self {
        Self {
            timestamp,
            temperature,
            ph,
            ec_raw,
            do_raw,
            salinity,
            conductivity: ec_raw as f64 / EC_SCALE,
        }
    }
}
