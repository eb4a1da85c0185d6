use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// ISO-like currency code shared by a group and all of its expenses.
///
/// A group is mono-currency: every expense inherits the group's currency and
/// there is no conversion. The enum stays closed so the data model remains
/// explicit about what the ledger can store.
///
/// ## Minor units
///
/// The ledger stores monetary values as an `i64` number of **minor units**
/// (see `MoneyCents`). `minor_units()` returns how many decimal digits are
/// used when converting between:
/// - major units (human input/output, e.g. `10.50 EUR`)
/// - minor units (stored integers, e.g. `1050`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Eur | Currency::Usd | Currency::Gbp => 2,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            "GBP" => Ok(Currency::Gbp),
            other => Err(LedgerError::InvalidName(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_codes() {
        assert_eq!(Currency::try_from("eur").unwrap(), Currency::Eur);
        assert_eq!(Currency::try_from(" USD ").unwrap(), Currency::Usd);
        assert!(Currency::try_from("JPY").is_err());
    }
}
