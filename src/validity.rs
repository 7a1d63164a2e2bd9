pub const MINUTE: i64 = 60;
pub const HOUR: i64 = 60 * MINUTE;
pub const DAY: i64 = 24 * HOUR;
// Display approximations, deliberately coarse.
pub const MONTH: i64 = 30 * DAY;
pub const YEAR: i64 = 365 * DAY;

/// Check the validity window against an injected clock (seconds since the
/// Unix epoch, UTC). Returns whether `now` lies within `[not_before,
/// not_after]` inclusive, and the signed number of seconds until expiration
/// (negative once expired).
pub fn evaluate(not_before: i64, not_after: i64, now: i64) -> (bool, i64) {
    let is_valid = now >= not_before && now <= not_after;
    (is_valid, not_after - now)
}

/// Reduce a signed duration in seconds to a magnitude and display unit.
/// First matching bucket wins; divisions truncate toward zero and the sign
/// of the input carries over to the magnitude. Durations under two hours
/// stay in minutes, so "61 minutes" is reported rather than "1 hours".
pub fn humanize(seconds: i64) -> (i64, &'static str) {
    let sign = if seconds < 0 { -1 } else { 1 };
    let v = seconds.abs();
    let (magnitude, unit) = if v < MINUTE {
        (v, "seconds")
    } else if v < 2 * HOUR {
        (v / MINUTE, "minutes")
    } else if v < DAY {
        (v / HOUR, "hours")
    } else if v < MONTH {
        (v / DAY, "days")
    } else if v < YEAR {
        (v / MONTH, "months")
    } else {
        (v / YEAR, "years")
    };
    (sign * magnitude, unit)
}
