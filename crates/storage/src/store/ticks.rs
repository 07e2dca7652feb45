#![forbid(unsafe_code)]

use time::OffsetDateTime;

const TICKS_PER_SECOND: i64 = 10_000_000;
/// Ticks between 0001-01-01T00:00:00 and the Unix epoch.
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// 100 ns ticks since 0001-01-01 of the wall-clock time in `at`'s own offset.
pub fn dotnet_ticks(at: OffsetDateTime) -> i64 {
    let wall_seconds = at.unix_timestamp() + i64::from(at.offset().whole_seconds());
    UNIX_EPOCH_TICKS + wall_seconds * TICKS_PER_SECOND + i64::from(at.nanosecond() / 100)
}

pub fn now_ticks() -> i64 {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    dotnet_ticks(now)
}
