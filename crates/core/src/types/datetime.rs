//! Calendar date and wall-clock time strings.
//!
//! Appointments carry their schedule as validated strings rather than parsed
//! temporal types: the store persists and returns the exact text the client
//! sent, and the list ordering contract (`date ASC, time ASC`) relies on the
//! zero-padded lexicographic form. Validation is pattern-only - `2025-02-30`
//! is accepted, matching the wire contract.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error parsing a [`CalendarDate`].
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid date format, expected YYYY-MM-DD")]
pub struct DateFormatError;

/// Error parsing a [`ClockTime`].
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid time format, expected HH:MM")]
pub struct TimeFormatError;

/// A calendar date in `YYYY-MM-DD` form.
///
/// ## Examples
///
/// ```
/// use agenda_core::CalendarDate;
///
/// assert!(CalendarDate::parse("2025-08-07").is_ok());
/// assert!(CalendarDate::parse("2025-8-7").is_err());   // not zero-padded
/// assert!(CalendarDate::parse("07/08/2025").is_err()); // wrong separators
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CalendarDate(String);

impl CalendarDate {
    /// Parse a `CalendarDate` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`DateFormatError`] unless the input is exactly four digits,
    /// a dash, two digits, a dash, and two digits.
    pub fn parse(s: &str) -> Result<Self, DateFormatError> {
        let bytes = s.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(DateFormatError);
        }

        let digits_at = |range: core::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
        if !digits_at(0..4) || !digits_at(5..7) || !digits_at(8..10) {
            return Err(DateFormatError);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the date as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CalendarDate {
    type Err = DateFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A 24-hour wall-clock time in `HH:MM` form.
///
/// A single-digit hour is accepted (`9:30`), matching the wire contract;
/// the stored text is not re-padded.
///
/// ## Examples
///
/// ```
/// use agenda_core::ClockTime;
///
/// assert!(ClockTime::parse("10:00").is_ok());
/// assert!(ClockTime::parse("9:30").is_ok());
/// assert!(ClockTime::parse("24:00").is_err());
/// assert!(ClockTime::parse("10:60").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ClockTime(String);

impl ClockTime {
    /// Parse a `ClockTime` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`TimeFormatError`] unless the input is `H:MM` or `HH:MM`
    /// with hour 0-23 and minute 0-59.
    pub fn parse(s: &str) -> Result<Self, TimeFormatError> {
        let (hour, minute) = s.split_once(':').ok_or(TimeFormatError)?;

        if hour.is_empty() || hour.len() > 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimeFormatError);
        }
        if minute.len() != 2 || !minute.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimeFormatError);
        }

        let hour: u8 = hour.parse().map_err(|_| TimeFormatError)?;
        let minute: u8 = minute.parse().map_err(|_| TimeFormatError)?;
        if hour > 23 || minute > 59 {
            return Err(TimeFormatError);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the time as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ClockTime {
    type Err = TimeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx support (with sqlite feature)
macro_rules! sqlite_text_newtype {
    ($name:ident) => {
        #[cfg(feature = "sqlite")]
        impl sqlx::Type<sqlx::Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <String as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            }
        }

        #[cfg(feature = "sqlite")]
        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $name {
            fn decode(
                value: sqlx::sqlite::SqliteValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as sqlx::Decode<'r, sqlx::Sqlite>>::decode(value)?;
                // Database values are assumed valid
                Ok(Self(s))
            }
        }

        #[cfg(feature = "sqlite")]
        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.0.clone(), buf)
            }
        }
    };
}

sqlite_text_newtype!(CalendarDate);
sqlite_text_newtype!(ClockTime);
