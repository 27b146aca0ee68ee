//! UTCTime and GeneralizedTime values.
//!
//! Both time types are kept as a `chrono::DateTime<Utc>`. The functions in
//! this module translate between those and the content octets in the
//! restricted form demanded by DER: always in UTC marked with a trailing
//! `Z`, always with seconds, and for GeneralizedTime with a fraction of a
//! second only if it is non-zero and without trailing zeros.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use crate::decode::ContentError;


//------------ UTCTime -------------------------------------------------------

/// Parses the content octets of a UTCTime value.
///
/// The content must be of the form `YYMMDDhhmmssZ`. Two-digit years below
/// 50 are in the 21st century, all others in the 20th.
pub fn utc_time_from_content(
    content: &[u8]
) -> Result<DateTime<Utc>, ContentError> {
    if content.len() != 13 || content[12] != b'Z' {
        return Err("malformed UTCTime".into())
    }
    let year = read_digits(content, 0, 2)?;
    let year = if year < 50 { 2000 + year } else { 1900 + year };
    build_time(year, &content[2..12], 0)
}

/// Returns the content octets of a UTCTime value.
///
/// Returns `None` if the year is outside of 1950 to 2049 or if the time
/// has a fraction of a second, neither of which UTCTime can express.
pub fn utc_time_content(time: &DateTime<Utc>) -> Option<Vec<u8>> {
    if !(1950..=2049).contains(&time.year()) || time.nanosecond() != 0 {
        return None
    }
    Some(format!(
        "{:02}{:02}{:02}{:02}{:02}{:02}Z",
        time.year() % 100, time.month(), time.day(),
        time.hour(), time.minute(), time.second()
    ).into_bytes())
}


//------------ GeneralizedTime -----------------------------------------------

/// Parses the content octets of a GeneralizedTime value.
///
/// The content must be of the form `YYYYMMDDhhmmss[.f]Z` where the
/// optional fraction has between one and nine digits with the last one
/// not being zero.
pub fn generalized_time_from_content(
    content: &[u8]
) -> Result<DateTime<Utc>, ContentError> {
    if content.len() < 15 || content[content.len() - 1] != b'Z' {
        return Err("malformed GeneralizedTime".into())
    }
    let year = read_digits(content, 0, 4)?;
    let nanos = match &content[14..content.len() - 1] {
        [] => 0,
        [b'.', fraction @ ..] => {
            if fraction.is_empty() || fraction.len() > 9 {
                return Err("malformed GeneralizedTime fraction".into())
            }
            if fraction.last() == Some(&b'0') {
                return Err(
                    "trailing zero in GeneralizedTime fraction".into()
                )
            }
            let value = read_digits(fraction, 0, fraction.len())?;
            value * 10u32.pow(9 - fraction.len() as u32)
        }
        _ => return Err("malformed GeneralizedTime".into())
    };
    build_time(year, &content[4..14], nanos)
}

/// Returns the content octets of a GeneralizedTime value.
///
/// Returns `None` if the year cannot be expressed in four digits.
pub fn generalized_time_content(time: &DateTime<Utc>) -> Option<Vec<u8>> {
    if !(0..=9999).contains(&time.year()) {
        return None
    }
    let nanos = time.nanosecond();
    if nanos >= 1_000_000_000 {
        // Leap seconds don’t have a representation.
        return None
    }
    let mut res = format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        time.year(), time.month(), time.day(),
        time.hour(), time.minute(), time.second()
    );
    if nanos != 0 {
        let fraction = format!("{:09}", nanos);
        res.push('.');
        res.push_str(fraction.trim_end_matches('0'));
    }
    res.push('Z');
    Some(res.into_bytes())
}


//------------ Helpers -------------------------------------------------------

/// Builds the time from `MMDDhhmmss` digits.
fn build_time(
    year: u32, rest: &[u8], nanos: u32
) -> Result<DateTime<Utc>, ContentError> {
    let month = read_digits(rest, 0, 2)?;
    let day = read_digits(rest, 2, 2)?;
    let hour = read_digits(rest, 4, 2)?;
    let minute = read_digits(rest, 6, 2)?;
    let second = read_digits(rest, 8, 2)?;
    let naive = NaiveDate::from_ymd_opt(year as i32, month, day).and_then(
        |date| date.and_hms_nano_opt(hour, minute, second, nanos)
    );
    match naive {
        Some(naive) => Ok(Utc.from_utc_datetime(&naive)),
        None => Err("invalid time value".into())
    }
}

/// Reads `len` decimal digits starting at `start`.
fn read_digits(
    content: &[u8], start: usize, len: usize
) -> Result<u32, ContentError> {
    let digits = match content.get(start..start + len) {
        Some(digits) => digits,
        None => return Err("malformed time value".into())
    };
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err("malformed time value".into())
    }
    digits.iter().try_fold(0u32, |res, digit| {
        res.checked_mul(10).and_then(|res| {
            res.checked_add(u32::from(digit - b'0'))
        })
    }).ok_or_else(|| "malformed time value".into())
}


//============ Tests =========================================================
