//! Wall-clock arithmetic for the daily firing

use chrono::{Duration, NaiveDateTime};

/// Next `hour:00:00` strictly after `now`
///
/// Returns `None` for an hour outside 0-23.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use larder_janitor::next_fire_after;
///
/// let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// let now = day.and_hms_opt(12, 0, 0).unwrap();
///
/// // exactly at the hour counts as already passed
/// let next = next_fire_after(now, 12).unwrap();
/// assert_eq!(next, day.succ_opt().unwrap().and_hms_opt(12, 0, 0).unwrap());
/// ```
pub fn next_fire_after(now: NaiveDateTime, hour: u32) -> Option<NaiveDateTime> {
    let candidate = now.date().and_hms_opt(hour, 0, 0)?;
    if candidate > now {
        Some(candidate)
    } else {
        Some(candidate + Duration::days(1))
    }
}

/// How long to sleep from `now` until `target` (zero if already passed)
pub fn delay_until(now: NaiveDateTime, target: NaiveDateTime) -> std::time::Duration {
    (target - now).to_std().unwrap_or(std::time::Duration::ZERO)
}

/// Whether a firing at `actual` is later than `scheduled` by more than `flex`
pub fn is_drifted(scheduled: NaiveDateTime, actual: NaiveDateTime, flex: Duration) -> bool {
    actual - scheduled > flex
}
