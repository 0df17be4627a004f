use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use crate::ValidationError;

/// ISO calendar-date layout used by the provider API and the CLI.
pub const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub fn format_date(date: Date) -> String {
    date.format(&DATE_FORMAT)
        .expect("calendar dates are ISO formattable")
}

pub fn parse_date(value: &str) -> Result<Date, ValidationError> {
    Date::parse(value, &DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        value: value.to_owned(),
    })
}

/// Base currencies accepted by the rate provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BaseCurrency {
    Usd,
    Cad,
    Jpy,
    Gbp,
}

impl BaseCurrency {
    pub const ALL: [Self; 4] = [Self::Usd, Self::Cad, Self::Jpy, Self::Gbp];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Cad => "CAD",
            Self::Jpy => "JPY",
            Self::Gbp => "GBP",
        }
    }
}

impl Display for BaseCurrency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseCurrency {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "CAD" => Ok(Self::Cad),
            "JPY" => Ok(Self::Jpy),
            "GBP" => Ok(Self::Gbp),
            other => Err(ValidationError::InvalidBaseCurrency {
                value: other.to_owned(),
            }),
        }
    }
}

/// One date's full mapping from currency code to rate against the base
/// currency, as returned by the provider. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedRateSet {
    pub date: Date,
    pub rates: BTreeMap<String, f64>,
}

impl DatedRateSet {
    pub fn new(date: Date, rates: BTreeMap<String, f64>) -> Self {
        Self { date, rates }
    }
}
