use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;

/// Timezone every displayed date and time is converted to.
pub const DISPLAY_TZ: Tz = chrono_tz::America::Los_Angeles;

/// Placeholder shown for both kickoff fields when a timestamp is missing or malformed.
pub const TBD: &str = "TBD";

/// Source of "now" for the live date/time block.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Kickoff date as `M/D`.
pub fn format_match_date(at: DateTime<Utc>) -> String {
    let local = at.with_timezone(&DISPLAY_TZ);
    format!("{}/{}", local.month(), local.day())
}

/// Kickoff time as `7:30p`, or `7p` on the hour.
pub fn format_match_time(at: DateTime<Utc>) -> String {
    let local = at.with_timezone(&DISPLAY_TZ);
    let (pm, hour) = local.hour12();
    let marker = if pm { 'p' } else { 'a' };
    match local.minute() {
        0 => format!("{hour}{marker}"),
        m => format!("{hour}:{m:02}{marker}"),
    }
}

/// Live clock as `h:mm`, without an am/pm suffix.
pub fn format_clock_time(at: DateTime<Utc>) -> String {
    let local = at.with_timezone(&DISPLAY_TZ);
    let (_, hour) = local.hour12();
    format!("{hour}:{:02}", local.minute())
}

/// Full date, e.g. `Saturday, July 5`.
pub fn format_long_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&DISPLAY_TZ)
        .format("%A, %B %-d")
        .to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/render/clock.rs"]
mod tests;
