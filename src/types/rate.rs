use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;
use crate::error::{Error, Result};

/// Exchange rate in soles per dollar, fixed-point with 4 decimal places.
///
/// Every value is rounded exactly once, when it enters the system, so two
/// rates compare equal iff they agree at the 4th decimal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rate(i64);

impl Rate {
    const MULTIPLIER: i64 = 10_000;  // 10^4

    pub fn from_ten_thousandths(value: i64) -> Self {
        Rate(value)
    }

    pub fn ten_thousandths(&self) -> i64 {
        self.0
    }

    pub fn from_f64(value: f64) -> Self {
        Rate((value * Self::MULTIPLIER as f64).round() as i64)
    }

    /// Soles gained or saved on $1,000 at this rate difference.
    pub fn per_thousand_dollars(&self) -> Rate {
        Rate(self.0 * 1_000)
    }

    pub fn zero() -> Self {
        Rate(0)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parse a rate as providers print it: `"3.7500"`, `"S/ 3.75"`,
    /// `"$3.75"`, `"3,750.00"`.
    pub fn parse_text(text: &str) -> Result<Self> {
        let cleaned: String = text
            .replace("S/", "")
            .replace('$', "")
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .collect();

        let value: f64 = cleaned
            .parse()
            .map_err(|_| Error::InvalidRate(text.to_string()))?;

        if !value.is_finite() {
            return Err(Error::InvalidRate(text.to_string()));
        }

        Ok(Rate::from_f64(value))
    }
}

impl Sub for Rate {
    type Output = Rate;
    fn sub(self, other: Rate) -> Rate {
        Rate(self.0 - other.0)
    }
}

impl FromStr for Rate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rate::parse_text(s)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let multiplier = Self::MULTIPLIER as u64;
        write!(f, "{}{}.{:04}", sign, abs / multiplier, abs % multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_four_decimals() {
        assert_eq!(Rate::from_f64(3.74807), Rate::from_ten_thousandths(37481));
        assert_eq!(Rate::from_f64(3.748), Rate::from_ten_thousandths(37480));
    }

    #[test]
    fn displays_fixed_precision() {
        assert_eq!(Rate::from_f64(3.75).to_string(), "3.7500");
        assert_eq!(Rate::from_f64(0.003).to_string(), "0.0030");
        assert_eq!(Rate::from_f64(-0.0025).to_string(), "-0.0025");
    }

    #[test]
    fn parses_provider_text() {
        assert_eq!(Rate::parse_text("S/ 3.7500").unwrap(), Rate::from_f64(3.75));
        assert_eq!(Rate::parse_text("$3.748").unwrap(), Rate::from_f64(3.748));
        assert_eq!(Rate::parse_text("3,750.00").unwrap(), Rate::from_f64(3750.0));
        assert_eq!(" 3.7320 ".parse::<Rate>().unwrap(), Rate::from_f64(3.732));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Rate::parse_text("").is_err());
        assert!(Rate::parse_text("n/a").is_err());
        assert!(Rate::parse_text("inf").is_err());
    }

    #[test]
    fn display_then_parse_is_stable() {
        let rate = Rate::from_f64(3.7321);
        assert_eq!(rate.to_string().parse::<Rate>().unwrap(), rate);
    }
}
