//! Read-facing student projection.
//!
//! # Invariants
//! - Address fields are either all present or all absent. Absence means
//!   "not requested" or "no address", never an empty address.

use crate::model::address::Address;
use crate::model::student::{Student, StudentId};
use serde::{Deserialize, Serialize};

/// Address values exposed on a `StudentView`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFields {
    pub city: String,
    pub street: String,
    pub street_number: i64,
}

impl From<Address> for AddressFields {
    fn from(value: Address) -> Self {
        Self {
            city: value.city,
            street: value.street,
            street_number: value.street_number,
        }
    }
}

/// Student projection returned by every roster read and write.
///
/// Serializes flat: `{"id", "firstName", "lastName", "age"}` plus
/// `city`/`street`/`streetNumber` only when `address` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentView {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    #[serde(flatten)]
    pub address: Option<AddressFields>,
}

impl StudentView {
    /// Builds a view without address fields.
    pub fn bare(student: Student) -> Self {
        Self::with_address(student, None)
    }

    pub fn with_address(student: Student, address: Option<Address>) -> Self {
        Self {
            id: student.id,
            first_name: student.first_name,
            last_name: student.last_name,
            age: student.age,
            address: address.map(AddressFields::from),
        }
    }

    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }
}
