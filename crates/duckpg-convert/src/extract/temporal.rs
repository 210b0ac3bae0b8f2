//! Epoch shifts between the source and target temporal encodings.
//!
//! The source counts days and microseconds from 1970-01-01, the target from
//! 2000-01-01.

/// Days from 1970-01-01 to 2000-01-01.
pub const TARGET_EPOCH_DAYS: i32 = days_from_ymd(2000, 1, 1);

/// Microseconds from 1970-01-01 to 2000-01-01.
pub const TARGET_EPOCH_MICROS: i64 = TARGET_EPOCH_DAYS as i64 * MICROS_PER_DAY;

const MICROS_PER_DAY: i64 = 86_400_000_000;

/// Calculate days since Unix epoch (1970-01-01) from year, month, day.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub const fn days_from_ymd(year: i32, month: u32, day: u32) -> i32 {
    // https://howardhinnant.github.io/date_algorithms.html
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u32;
    let doy = (153 * (if month > 2 { month - 3 } else { month + 9 }) + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe as i32 - 719_468
}

/// Unix days to target days.
#[must_use]
pub const fn date_to_target(unix_days: i32) -> Option<i32> {
    unix_days.checked_sub(TARGET_EPOCH_DAYS)
}

/// Unix microseconds to target microseconds.
#[must_use]
pub const fn micros_to_target(unix_micros: i64) -> Option<i64> {
    unix_micros.checked_sub(TARGET_EPOCH_MICROS)
}

/// Raw timestamp in `unit` to Unix microseconds.
///
/// Nanoseconds are floored to the microsecond.
#[must_use]
pub const fn to_unix_micros(raw: i64, unit: TimestampUnit) -> Option<i64> {
    match unit {
        TimestampUnit::Seconds => raw.checked_mul(1_000_000),
        TimestampUnit::Millis => raw.checked_mul(1_000),
        TimestampUnit::Micros => Some(raw),
        TimestampUnit::Nanos => Some(raw.div_euclid(1_000)),
    }
}

/// Unit of a raw timestamp payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampUnit {
    /// `TIMESTAMP_S`
    Seconds,
    /// `TIMESTAMP_MS`
    Millis,
    /// `TIMESTAMP`, `TIMESTAMP_TZ`
    Micros,
    /// `TIMESTAMP_NS`
    Nanos,
}
