//! Conversions between UTC wire timestamps and the fixed display timezone.
//!
//! All timestamps this crate stores or compares are Indochina (UTC+7)
//! wall-clock time. The zone is not configurable; the monitoring site sits in
//! Vinh Long and every consumer of the dataset expects GMT+7.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// The timezone every dataset timestamp is expressed in.
pub const TARGET_ZONE: Tz = chrono_tz::Asia::Bangkok;

/// Converts a UTC timestamp into target-zone wall-clock time.
pub(crate) fn utc_to_target(utc: NaiveDateTime) -> NaiveDateTime {
    Utc.from_utc_datetime(&utc)
        .with_timezone(&TARGET_ZONE)
        .naive_local()
}

/// Today's calendar date in the target zone.
pub(crate) fn today_in_target_zone() -> NaiveDate {
    Utc::now().with_timezone(&TARGET_ZONE).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn utc_shifts_forward_seven_hours() {
        let utc = NaiveDate::from_ymd_opt(2025, 1, 17)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        let local = utc_to_target(utc);
        // Indochina Time has no daylight saving; the offset is always +7.
        assert_eq!(
            local,
            NaiveDate::from_ymd_opt(2025, 1, 18)
                .unwrap()
                .and_hms_opt(1, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn midnight_utc_is_morning_in_target_zone() {
        let utc = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            utc_to_target(utc),
            NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(7, 0, 0)
                .unwrap()
        );
    }
}
