//! Core roster logic: students, shared addresses, and the integrity rules
//! that tie them together.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::RosterConfig;
pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::address::{Address, AddressId, NewAddress};
pub use model::student::{NewStudent, Student, StudentId};
pub use model::validation::ValidationError;
pub use model::view::{AddressFields, StudentView};
pub use repo::address_repo::{AddressRepository, SqliteAddressRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository};
pub use service::roster_store::{
    ReadOptions, RemoveOptions, RosterError, RosterResult, RosterStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
