//! Time cursor — maps logical scenario offsets onto absolute timestamps.
//!
//! RULE: every timestamp in the dataset derives from the single fixed
//! epoch below. Scenarios pick a base offset for themselves (their own
//! sub-epoch) and express internal event timing relative to that base,
//! so windows across scenarios can be made disjoint or deliberately
//! overlapping. Formatting is the serializer's concern, not the cursor's.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// The run epoch: 2025-01-15 08:00:00. Shared by the whole run.
pub fn dataset_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .expect("epoch constant is a valid calendar date")
}

#[derive(Debug, Clone, Copy)]
pub struct TimeCursor {
    epoch: NaiveDateTime,
}

impl TimeCursor {
    pub fn new() -> Self {
        Self {
            epoch: dataset_epoch(),
        }
    }

    /// `epoch + days + hours + minutes`. Offsets may be zero but never
    /// negative — nothing in the dataset predates the epoch.
    pub fn at(&self, days: i64, hours: i64, minutes: i64) -> NaiveDateTime {
        debug_assert!(days >= 0 && hours >= 0 && minutes >= 0);
        self.epoch + Duration::days(days) + Duration::hours(hours) + Duration::minutes(minutes)
    }

    pub fn epoch(&self) -> NaiveDateTime {
        self.epoch
    }
}

impl Default for TimeCursor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_compose() {
        let cursor = TimeCursor::new();
        assert_eq!(cursor.at(0, 0, 0), cursor.epoch());
        assert_eq!(
            cursor.at(1, 2, 30),
            cursor.epoch() + Duration::minutes(24 * 60 + 2 * 60 + 30)
        );
    }
}
