use std::fmt;

/// An amount in **integer minor units** (cents), formatted for humans.
///
/// The ledger itself stores plain `i64` minor units everywhere; `Money` is the
/// presentation wrapper used in notifications, exports and logs.
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!(Money::new(33_34).to_string(), "33.34");
/// assert_eq!(Money::new(-5).to_string(), "-0.05");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(minor: i64) -> Self {
        Self(minor)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_two_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(10_000).to_string(), "100.00");
        assert_eq!(Money::new(3_333).to_string(), "33.33");
        assert_eq!(Money::new(-3_334).to_string(), "-33.34");
        assert_eq!(Money::from(i64::MIN).minor(), i64::MIN);
    }
}
