//! State codes accepted by the tract loader.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Postal abbreviation → two-digit FIPS code for the states, DC and Puerto Rico.
const STATE_FIPS: &[(&str, &str)] = &[
    ("AL", "01"), ("AK", "02"), ("AZ", "04"), ("AR", "05"), ("CA", "06"),
    ("CO", "08"), ("CT", "09"), ("DE", "10"), ("DC", "11"), ("FL", "12"),
    ("GA", "13"), ("HI", "15"), ("ID", "16"), ("IL", "17"), ("IN", "18"),
    ("IA", "19"), ("KS", "20"), ("KY", "21"), ("LA", "22"), ("ME", "23"),
    ("MD", "24"), ("MA", "25"), ("MI", "26"), ("MN", "27"), ("MS", "28"),
    ("MO", "29"), ("MT", "30"), ("NE", "31"), ("NV", "32"), ("NH", "33"),
    ("NJ", "34"), ("NM", "35"), ("NY", "36"), ("NC", "37"), ("ND", "38"),
    ("OH", "39"), ("OK", "40"), ("OR", "41"), ("PA", "42"), ("RI", "44"),
    ("SC", "45"), ("SD", "46"), ("TN", "47"), ("TX", "48"), ("UT", "49"),
    ("VT", "50"), ("VA", "51"), ("WA", "53"), ("WV", "54"), ("WI", "55"),
    ("WY", "56"), ("PR", "72"),
];

/// A state identified by its two-digit FIPS code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateCode(String);

impl StateCode {
    /// Parse a two-digit FIPS code ("26") or a postal abbreviation ("MI").
    pub fn parse(input: &str) -> Result<Self, MapError> {
        let trimmed = input.trim();

        if trimmed.len() == 2 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return STATE_FIPS
                .iter()
                .find(|(_, fips)| *fips == trimmed)
                .map(|(_, fips)| StateCode(fips.to_string()))
                .ok_or_else(|| MapError::InvalidStateCode(input.to_string()));
        }

        let upper = trimmed.to_ascii_uppercase();
        STATE_FIPS
            .iter()
            .find(|(abbr, _)| *abbr == upper)
            .map(|(_, fips)| StateCode(fips.to_string()))
            .ok_or_else(|| MapError::InvalidStateCode(input.to_string()))
    }

    /// Two-digit FIPS code.
    pub fn fips(&self) -> &str {
        &self.0
    }

    pub fn abbreviation(&self) -> &'static str {
        STATE_FIPS
            .iter()
            .find(|(_, fips)| *fips == self.0)
            .map(|(abbr, _)| *abbr)
            .unwrap_or("??")
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StateCode {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StateCode::parse(s)
    }
}

impl TryFrom<String> for StateCode {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StateCode::parse(&value)
    }
}

impl From<StateCode> for String {
    fn from(code: StateCode) -> Self {
        code.0
    }
}
