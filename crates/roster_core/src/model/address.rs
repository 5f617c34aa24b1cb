//! Shared address record and creation draft.
//!
//! Two addresses are the same address when `(city, street, street_number)`
//! match byte for byte. No case folding or trimming is applied to the match.

use crate::model::validation::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-generated address identifier.
pub type AddressId = i64;

/// Persisted address row, referenced by zero or more students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub city: String,
    pub street: String,
    pub street_number: i64,
}

/// Address values supplied when creating a student.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewAddress {
    pub city: String,
    pub street: String,
    pub street_number: i64,
}

impl NewAddress {
    pub fn new(city: impl Into<String>, street: impl Into<String>, street_number: i64) -> Self {
        Self {
            city: city.into(),
            street: street.into(),
            street_number,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.city) {
            return Err(ValidationError::BlankCity);
        }
        if is_blank(&self.street) {
            return Err(ValidationError::BlankStreet);
        }
        if self.street_number <= 0 {
            return Err(ValidationError::NonPositiveStreetNumber(self.street_number));
        }
        Ok(())
    }
}
