//! Wire types for the ThingSpeak channel feed and per-sample decoding.

use crate::types::reading::Reading;
use crate::types::timezone::utc_to_target;
use chrono::NaiveDateTime;
use log::warn;
use serde::Deserialize;

/// Wire format of feed creation timestamps (always UTC).
const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Response body of `GET <channel-url>?results=N`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedPage {
    pub feeds: Vec<Feed>,
}

/// One telemetry sample as served by the polling API.
///
/// Every payload field is a stringified number and any of them may be absent;
/// decoding rules live in [`Feed::reading`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Feed {
    pub created_at: Option<String>,
    pub field1: Option<String>,
    pub field2: Option<String>,
    pub field3: Option<String>,
    pub field4: Option<String>,
    pub field5: Option<String>,
}

impl Feed {
    /// Decodes the sample into a target-zone [`Reading`].
    ///
    /// Samples without a creation timestamp are dropped (`None`); one with an
    /// unparseable timestamp is dropped with a warning. Numeric fields that
    /// are absent or malformed fall back to zero rather than rejecting the
    /// whole sample.
    pub fn reading(&self) -> Option<Reading> {
        let raw = self.created_at.as_deref().filter(|s| !s.is_empty())?;
        let utc = match NaiveDateTime::parse_from_str(raw, CREATED_AT_FORMAT) {
            Ok(utc) => utc,
            Err(e) => {
                warn!("Skipping feed entry with unparseable created_at '{}': {}", raw, e);
                return None;
            }
        };

        Some(Reading::new(
            utc_to_target(utc),
            float_field(&self.field1),
            float_field(&self.field2),
            int_field(&self.field3),
            float_field(&self.field4),
            float_field(&self.field5),
        ))
    }
}

fn float_field(value: &Option<String>) -> f64 {
    value
        .as_deref()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0.0)
}

fn int_field(value: &Option<String>) -> i64 {
    let Some(raw) = value.as_deref() else { return 0 };
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().map(|v| v as i64))
        .unwrap_or(0)
}
