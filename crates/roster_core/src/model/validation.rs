//! Field-level validation errors shared by student and address drafts.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected input field, reported before any SQL runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    BlankFirstName,
    BlankLastName,
    NegativeAge(i64),
    BlankCity,
    BlankStreet,
    NonPositiveStreetNumber(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankFirstName => write!(f, "first_name must not be blank"),
            Self::BlankLastName => write!(f, "last_name must not be blank"),
            Self::NegativeAge(age) => write!(f, "age must not be negative, got {age}"),
            Self::BlankCity => write!(f, "city must not be blank"),
            Self::BlankStreet => write!(f, "street must not be blank"),
            Self::NonPositiveStreetNumber(number) => {
                write!(f, "street_number must be positive, got {number}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Blank means empty after trimming whitespace.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
