//! Student record and creation/update draft.

use crate::model::address::AddressId;
use crate::model::validation::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-generated student identifier. Never reused after deletion.
pub type StudentId = i64;

/// Persisted student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    /// Weak reference into the address table; `None` when the student has
    /// no address.
    pub address_id: Option<AddressId>,
}

/// Scalar student fields accepted by create and update.
///
/// Values are persisted exactly as given; trimming only applies to the
/// blank check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
}

impl NewStudent {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, age: i64) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
        }
    }

    /// Checks field constraints, reporting the first violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.first_name) {
            return Err(ValidationError::BlankFirstName);
        }
        if is_blank(&self.last_name) {
            return Err(ValidationError::BlankLastName);
        }
        if self.age < 0 {
            return Err(ValidationError::NegativeAge(self.age));
        }
        Ok(())
    }
}
