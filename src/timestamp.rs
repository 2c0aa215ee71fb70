//! Timestamps as recorded in CM attributes, and as written to the commit stream.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use failure::{Fail, Fallible};
use std::fmt;
use std::time::UNIX_EPOCH;

/// The CM's native date format, which carries no zone and is read as UTC.
const NATIVE_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    #[fail(display = "Malformed timestamp: {:?}", _0)]
    Format(String),
}

/// A Timestamp is an instant with the UTC offset it was recorded in.  Timestamps order by
/// instant, regardless of offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    /// Parse an RFC 3339 timestamp, or one in the CM's native format.
    pub fn parse(text: &str) -> Fallible<Timestamp> {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Timestamp(dt));
        }
        match NaiveDateTime::parse_from_str(text, NATIVE_FORMAT) {
            Ok(naive) => Ok(Timestamp(Utc.from_utc_datetime(&naive).into())),
            Err(_) => Err(Error::Format(text.to_string()).into()),
        }
    }

    /// The Unix epoch, used when an object records no usable time at all.
    pub fn epoch() -> Timestamp {
        Timestamp(DateTime::<Utc>::from(UNIX_EPOCH).into())
    }

    /// Seconds since the Unix epoch
    pub fn seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// The UTC offset, formatted as `+HHMM` or `-HHMM`
    pub fn offset(&self) -> String {
        let secs = self.0.offset().local_minus_utc();
        let sign = if secs < 0 { '-' } else { '+' };
        let minutes = secs.abs() / 60;
        format!("{}{:02}{:02}", sign, minutes / 60, minutes % 60)
    }
}

/// Display in the form used by commit and tag identities: `<epoch> <offset>`.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.seconds(), self.offset())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_rfc3339() -> Fallible<()> {
        let ts = Timestamp::parse("2012-03-13T11:04:31+01:30")?;
        assert_eq!(ts.seconds(), 1331631271);
        assert_eq!(ts.offset(), "+0130");
        assert_eq!(ts.to_string(), "1331631271 +0130");
        Ok(())
    }

    #[test]
    fn parse_negative_offset() -> Fallible<()> {
        let ts = Timestamp::parse("2012-03-13T11:04:31-05:00")?;
        assert_eq!(ts.offset(), "-0500");
        Ok(())
    }

    #[test]
    fn parse_native() -> Fallible<()> {
        let ts = Timestamp::parse("Tue Mar 13 11:04:31 2012")?;
        assert_eq!(ts.seconds(), 1331636671);
        assert_eq!(ts.offset(), "+0000");
        Ok(())
    }

    #[test]
    fn parse_garbage() {
        let err = Timestamp::parse("yesterday").unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::Format("yesterday".to_string()))
        );
    }

    #[test]
    fn order_by_instant() -> Fallible<()> {
        let early = Timestamp::parse("2012-03-13T12:00:00+02:00")?;
        let late = Timestamp::parse("2012-03-13T11:00:00+00:00")?;
        assert!(early < late);
        assert!(Timestamp::epoch() < early);
        assert_eq!(Timestamp::epoch().to_string(), "0 +0000");
        Ok(())
    }
}
