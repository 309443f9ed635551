use {
  thiserror::Error,
  time::{
    format_description::well_known::Rfc3339,
    macros::format_description,
    Date,
    OffsetDateTime,
    UtcOffset,
  },
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Deadline is empty")]
  Empty,

  #[error("Unrecognized deadline '{0}'. Expected YYYY-MM-DD or RFC 3339")]
  Unparsable(String),

  #[error("Deadline must be in the future, it is {0}s away")]
  NotInFuture(i64),

  #[error("Deadline timestamp {0} is out of the calendar range")]
  OutOfRange(u64),
}

/// Parses a user supplied deadline.
///
/// A bare calendar date (`2025-01-01`, what a date input produces) is
/// interpreted as midnight UTC of that day. Full RFC 3339 timestamps are
/// accepted as well.
pub fn parse_deadline(input: &str) -> Result<OffsetDateTime, Error> {
  let input = input.trim();
  if input.is_empty() {
    return Err(Error::Empty);
  }

  if let Ok(date) = Date::parse(input, format_description!("[year]-[month]-[day]"))
  {
    return Ok(date.midnight().assume_utc());
  }

  OffsetDateTime::parse(input, &Rfc3339)
    .map_err(|_| Error::Unparsable(input.to_owned()))
}

/// Whole seconds between `now` and `deadline`. Fails unless the
/// deadline is strictly in the future.
pub fn seconds_until(
  deadline: OffsetDateTime,
  now: OffsetDateTime,
) -> Result<u64, Error> {
  let seconds = (deadline - now).whole_seconds();
  if seconds <= 0 {
    return Err(Error::NotInFuture(seconds));
  }
  Ok(seconds as u64)
}

/// Controls how on-chain timestamps are rendered as calendar dates.
///
/// A locale is a single fixed offset, not a time zone. Dates on the
/// other side of a daylight saving change from the offset's origin are
/// rendered with the wrong offset and may land one day off when close
/// to midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
  pub offset: UtcOffset,
}

impl Locale {
  pub const fn utc() -> Self {
    Self {
      offset: UtcOffset::UTC,
    }
  }

  /// Uses the host's local offset as of now. When it can't be determined
  /// (e.g. multi-threaded processes on some unix platforms) this
  /// falls back to UTC.
  pub fn local() -> Self {
    Self {
      offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
    }
  }

  /// Renders a unix timestamp (seconds) as a numeric `M/D/YYYY` date
  /// in this locale's offset.
  pub fn format_date(&self, unix_seconds: u64) -> Result<String, Error> {
    let timestamp = i64::try_from(unix_seconds)
      .map_err(|_| Error::OutOfRange(unix_seconds))?;
    let datetime = OffsetDateTime::from_unix_timestamp(timestamp)
      .map_err(|_| Error::OutOfRange(unix_seconds))?
      .to_offset(self.offset);

    datetime
      .format(format_description!(
        "[month padding:none]/[day padding:none]/[year]"
      ))
      .map_err(|_| Error::OutOfRange(unix_seconds))
  }
}

impl Default for Locale {
  fn default() -> Self {
    Self::local()
  }
}
