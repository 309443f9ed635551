use {
  serde::{de, Deserialize, Deserializer, Serialize, Serializer},
  std::{
    fmt::{Debug, Display},
    str::FromStr,
  },
  thiserror::Error,
};

/// Number of fractional digits of one display unit.
pub const DECIMALS: usize = 18;

/// Base units in one display unit (10^18).
pub const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Funding amount is empty")]
  Empty,

  #[error("Malformed funding amount '{0}'")]
  Malformed(String),

  #[error("Funding amount '{0}' is out of range")]
  Overflow(String),
}

/// An amount of the funding currency expressed in base units,
/// the smallest fixed-point denomination (10^-18 of one ETH).
///
/// This is the value that contracts store and receive. The
/// human-readable form is produced by [`Display`], e.g. `1.5 ETH`,
/// and parsed back by [`Wei::parse_ether`].
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wei(u128);

impl Wei {
  pub const ZERO: Wei = Wei(0);

  pub const fn new(base_units: u128) -> Self {
    Self(base_units)
  }

  pub const fn base_units(&self) -> u128 {
    self.0
  }

  pub const fn is_zero(&self) -> bool {
    self.0 == 0
  }

  /// Parses a decimal ETH amount, optionally followed by an `ETH`
  /// suffix, into base units.
  ///
  /// The result is `round(value * 10^18)`: digits beyond the 18th
  /// fractional digit are rounded half-up on the first dropped digit.
  /// Signs, exponents and anything that is not a plain decimal are
  /// rejected.
  pub fn parse_ether(input: &str) -> Result<Self, Error> {
    let trimmed = input.trim();
    let number = trimmed
      .strip_suffix("ETH")
      .map(str::trim_end)
      .unwrap_or(trimmed);

    if number.is_empty() {
      return Err(Error::Empty);
    }

    let malformed = || Error::Malformed(input.to_owned());
    let overflow = || Error::Overflow(input.to_owned());

    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
      return Err(malformed());
    }

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
      return Err(malformed());
    }

    let mut units: u128 = 0;
    for digit in whole.bytes() {
      units = units
        .checked_mul(10)
        .and_then(|u| u.checked_add(u128::from(digit - b'0')))
        .ok_or_else(overflow)?;
    }
    let units = units.checked_mul(WEI_PER_ETH).ok_or_else(overflow)?;

    let (kept, dropped) = fraction.split_at(fraction.len().min(DECIMALS));
    let mut fractional: u128 = 0;
    for digit in kept.bytes() {
      fractional = fractional * 10 + u128::from(digit - b'0');
    }
    fractional *= 10u128.pow((DECIMALS - kept.len()) as u32);

    if matches!(dropped.as_bytes().first(), Some(d) if *d >= b'5') {
      fractional += 1;
    }

    units.checked_add(fractional).map(Self).ok_or_else(overflow)
  }
}

impl From<u128> for Wei {
  fn from(base_units: u128) -> Self {
    Self(base_units)
  }
}

impl FromStr for Wei {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse_ether(s)
  }
}

impl Display for Wei {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let whole = self.0 / WEI_PER_ETH;
    let fraction = self.0 % WEI_PER_ETH;
    if fraction == 0 {
      write!(f, "{whole} ETH")
    } else {
      let digits = format!("{fraction:018}");
      write!(f, "{whole}.{} ETH", digits.trim_end_matches('0'))
    }
  }
}

impl Debug for Wei {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "wei({})", self.0)
  }
}

// u128 does not survive JSON number handling in most clients,
// so base units travel as a decimal string.
impl Serialize for Wei {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.0.to_string())
  }
}

impl<'de> Deserialize<'de> for Wei {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let text = String::deserialize(deserializer)?;
    text.parse::<u128>().map(Self).map_err(de::Error::custom)
  }
}
