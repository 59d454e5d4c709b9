use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::date::CalendarDate;
use crate::error::{Error, Result};

static OFFSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:UTC|GMT)\s*)?([+-])(\d{1,2})(?::?(\d{2}))?$").unwrap()
});

/// Longest offset in use is +14:00 (Line Islands), shortest -12:00.
const MAX_OFFSET_SECONDS: i32 = 14 * 3600;

/// Representative zone per ISO-3166 alpha-2 country code.
const COUNTRY_TIMEZONES: [(&str, &str); 48] = [
    ("AE", "Asia/Dubai"),
    ("AR", "America/Argentina/Buenos_Aires"),
    ("AT", "Europe/Vienna"),
    ("AU", "Australia/Sydney"),
    ("BD", "Asia/Dhaka"),
    ("BE", "Europe/Brussels"),
    ("BR", "America/Sao_Paulo"),
    ("CA", "America/Toronto"),
    ("CH", "Europe/Zurich"),
    ("CL", "America/Santiago"),
    ("CN", "Asia/Shanghai"),
    ("CO", "America/Bogota"),
    ("CZ", "Europe/Prague"),
    ("DE", "Europe/Berlin"),
    ("DK", "Europe/Copenhagen"),
    ("EG", "Africa/Cairo"),
    ("ES", "Europe/Madrid"),
    ("FI", "Europe/Helsinki"),
    ("FR", "Europe/Paris"),
    ("GB", "Europe/London"),
    ("GR", "Europe/Athens"),
    ("HK", "Asia/Hong_Kong"),
    ("ID", "Asia/Jakarta"),
    ("IE", "Europe/Dublin"),
    ("IL", "Asia/Jerusalem"),
    ("IN", "Asia/Kolkata"),
    ("IT", "Europe/Rome"),
    ("JP", "Asia/Tokyo"),
    ("KE", "Africa/Nairobi"),
    ("KI", "Pacific/Kiritimati"),
    ("KR", "Asia/Seoul"),
    ("MX", "America/Mexico_City"),
    ("MY", "Asia/Kuala_Lumpur"),
    ("NG", "Africa/Lagos"),
    ("NL", "Europe/Amsterdam"),
    ("NO", "Europe/Oslo"),
    ("NZ", "Pacific/Auckland"),
    ("PH", "Asia/Manila"),
    ("PK", "Asia/Karachi"),
    ("PL", "Europe/Warsaw"),
    ("PT", "Europe/Lisbon"),
    ("RU", "Europe/Moscow"),
    ("SE", "Europe/Stockholm"),
    ("SG", "Asia/Singapore"),
    ("TR", "Europe/Istanbul"),
    ("UA", "Europe/Kyiv"),
    ("US", "America/New_York"),
    ("ZA", "Africa/Johannesburg"),
];

/// Where "today" is observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Timezone {
    #[default]
    Utc,
    Fixed(FixedOffset),
    Named(Tz),
}

impl Timezone {
    /// Accepts `UTC`/`Z`, fixed offsets such as `+05:30`, `-0800` or `UTC+14`,
    /// and IANA identifiers.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let trimmed = descriptor.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidTimezone("empty timezone".to_string()));
        }
        let upper = trimmed.to_ascii_uppercase();
        if matches!(upper.as_str(), "UTC" | "GMT" | "Z" | "ETC/UTC") {
            return Ok(Timezone::Utc);
        }
        if let Some(caps) = OFFSET_RE.captures(&upper) {
            let sign = if &caps[1] == "-" { -1 } else { 1 };
            let hours: i32 = caps[2]
                .parse()
                .map_err(|_| Error::InvalidTimezone(descriptor.to_string()))?;
            let minutes: i32 = caps
                .get(3)
                .map(|m| m.as_str().parse().unwrap_or(60))
                .unwrap_or(0);
            let seconds = hours * 3600 + minutes * 60;
            if minutes >= 60 || seconds > MAX_OFFSET_SECONDS {
                return Err(Error::InvalidTimezone(format!(
                    "offset out of range: {descriptor}"
                )));
            }
            return FixedOffset::east_opt(sign * seconds)
                .map(Timezone::Fixed)
                .ok_or_else(|| Error::InvalidTimezone(descriptor.to_string()));
        }
        trimmed
            .parse::<Tz>()
            .map(Timezone::Named)
            .map_err(|_| Error::InvalidTimezone(format!("unknown timezone {descriptor:?}")))
    }
}

impl FromStr for Timezone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timezone::Utc => f.write_str("UTC"),
            Timezone::Fixed(offset) => write!(f, "{offset}"),
            Timezone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl Serialize for Timezone {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timezone::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Calendar date observed at `tz` at the instant `now`. Independent of the
/// host's local zone.
pub fn date_in_timezone(tz: Timezone, now: DateTime<Utc>) -> CalendarDate {
    let local = match tz {
        Timezone::Utc => now.date_naive(),
        Timezone::Fixed(offset) => now.with_timezone(&offset).date_naive(),
        Timezone::Named(zone) => now.with_timezone(&zone).date_naive(),
    };
    CalendarDate::from(local)
}

/// Today at `tz`, read from the system clock.
pub fn today_in(tz: Timezone) -> CalendarDate {
    date_in_timezone(tz, Utc::now())
}

/// Maps a country code to a representative zone; unknown codes fall back to UTC.
pub fn timezone_for_country(country: Option<&str>) -> Timezone {
    let Some(code) = country.map(str::trim).filter(|code| !code.is_empty()) else {
        return Timezone::Utc;
    };
    let code = code.to_ascii_uppercase();
    COUNTRY_TIMEZONES
        .iter()
        .find(|(cc, _)| *cc == code)
        .and_then(|(_, zone)| zone.parse::<Tz>().ok())
        .map(Timezone::Named)
        .unwrap_or(Timezone::Utc)
}
