//! Roster store: the single owner of student/address integrity.
//!
//! # Responsibility
//! - Expose list/get/create/update/remove over students and their shared
//!   addresses.
//! - Deduplicate addresses on create and prune orphaned addresses on
//!   remove when asked to.
//!
//! # Invariants
//! - Every operation runs in one IMMEDIATE transaction while holding the
//!   store's connection lock, so check-then-insert (create) and
//!   delete-then-count (remove) are atomic against every other writer,
//!   in-process or on another connection to the same file.
//! - Never more than one address row per `(city, street, street_number)`;
//!   the schema's unique constraint backs this up.
//! - A student's `address_id` is unset or points at an existing row.
//!
//! # See also
//! - `db::migrations` for the constraints this module relies on.

use crate::db::{open_db, open_db_in_memory};
use crate::model::address::NewAddress;
use crate::model::student::{NewStudent, StudentId};
use crate::model::validation::ValidationError;
use crate::model::view::StudentView;
use crate::repo::address_repo::{AddressRepository, SqliteAddressRepository};
use crate::repo::ensure_roster_schema;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::student_repo::{SqliteStudentRepository, StudentRepository};
use log::{debug, error, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Attempts made by create/remove before giving up on a write conflict.
const CONFLICT_ATTEMPTS: u32 = 2;

/// Read-side options for `list` and `get`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Include address fields in returned views. Defaults to `false`.
    pub expand_address: bool,
}

impl ReadOptions {
    pub const EXPANDED: Self = Self {
        expand_address: true,
    };
}

/// Options for `remove`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Also delete the student's address when no other student references
    /// it after the removal. Defaults to `false`.
    pub remove_address_if_orphaned: bool,
}

impl RemoveOptions {
    pub const PRUNE_ORPHANED_ADDRESS: Self = Self {
        remove_address_if_orphaned: true,
    };
}

pub type RosterResult<T> = Result<T, RosterError>;

/// Caller-facing roster failures.
#[derive(Debug)]
pub enum RosterError {
    /// No student with the given id exists.
    NotFound(StudentId),
    /// A field failed validation; nothing was written.
    Validation(ValidationError),
    /// Transient: a write conflict survived the retry, or the store lock
    /// was poisoned by a panicking caller.
    StoreUnavailable(String),
    /// Any other persistence failure.
    Repo(RepoError),
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::StoreUnavailable(message) => write!(f, "roster store unavailable: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RosterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound(_) | Self::StoreUnavailable(_) => None,
        }
    }
}

impl From<ValidationError> for RosterError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for RosterError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::ConflictRace(err) => Self::StoreUnavailable(err.to_string()),
            other => Self::Repo(other),
        }
    }
}

/// Shared, thread-safe roster store over one SQLite connection.
///
/// Share it between callers with `Arc<RosterStore>`. The connection is
/// closed when the store is dropped.
pub struct RosterStore {
    conn: Mutex<Connection>,
}

impl RosterStore {
    /// Opens (and migrates) a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> RosterResult<Self> {
        let conn = open_db(path).map_err(RepoError::from)?;
        Self::from_connection(conn)
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> RosterResult<Self> {
        let conn = open_db_in_memory().map_err(RepoError::from)?;
        Self::from_connection(conn)
    }

    /// Wraps an already-migrated connection.
    pub fn from_connection(conn: Connection) -> RosterResult<Self> {
        ensure_roster_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Returns every student in creation order.
    ///
    /// The result is a snapshot taken in one transaction; iterate it as
    /// often as needed.
    pub fn list(&self, options: ReadOptions) -> RosterResult<Vec<StudentView>> {
        let views = self.run_once("list", |tx| {
            let students = SqliteStudentRepository::new(tx);
            if options.expand_address {
                let rows = students.list_students_with_addresses()?;
                Ok(rows
                    .into_iter()
                    .map(|(student, address)| StudentView::with_address(student, address))
                    .collect::<Vec<_>>())
            } else {
                let rows = students.list_students()?;
                Ok(rows.into_iter().map(StudentView::bare).collect::<Vec<_>>())
            }
        })?;
        debug!(
            "event=list module=roster status=ok expand_address={} count={}",
            options.expand_address,
            views.len()
        );
        Ok(views)
    }

    /// Gets one student by id.
    pub fn get(&self, id: StudentId, options: ReadOptions) -> RosterResult<StudentView> {
        self.run_once("get", |tx| {
            let students = SqliteStudentRepository::new(tx);
            let view = if options.expand_address {
                students
                    .get_student_with_address(id)?
                    .map(|(student, address)| StudentView::with_address(student, address))
            } else {
                students.get_student(id)?.map(StudentView::bare)
            };
            view.ok_or(RepoError::NotFound(id))
        })
    }

    /// Creates a student attached to the address with the given values,
    /// reusing an existing address row when one matches exactly.
    pub fn create_with_address(
        &self,
        student: &NewStudent,
        address: &NewAddress,
    ) -> RosterResult<StudentView> {
        student.validate()?;
        address.validate()?;

        let view = self.run_with_retry("create_with_address", |tx| {
            let addresses = SqliteAddressRepository::new(tx);
            let resolved = match addresses.find_address(address)? {
                Some(existing) => existing,
                None => addresses.insert_address(address)?,
            };
            let created =
                SqliteStudentRepository::new(tx).insert_student(student, Some(resolved.id))?;
            Ok(StudentView::with_address(created, Some(resolved)))
        })?;
        info!(
            "event=create_student module=roster status=ok student_id={} with_address=true",
            view.id
        );
        Ok(view)
    }

    /// Creates a student without an address.
    pub fn create_without_address(&self, student: &NewStudent) -> RosterResult<StudentView> {
        student.validate()?;

        let view = self.run_with_retry("create_without_address", |tx| {
            let created = SqliteStudentRepository::new(tx).insert_student(student, None)?;
            Ok(StudentView::bare(created))
        })?;
        info!(
            "event=create_student module=roster status=ok student_id={} with_address=false",
            view.id
        );
        Ok(view)
    }

    /// Deletes a student and, when requested, its address once nobody else
    /// references it. Returns the number of rows removed (1 or 2).
    pub fn remove(&self, id: StudentId, options: RemoveOptions) -> RosterResult<usize> {
        let removed = self.run_with_retry("remove", |tx| {
            let students = SqliteStudentRepository::new(tx);
            let student = students.get_student(id)?.ok_or(RepoError::NotFound(id))?;
            let mut removed = students.delete_student(id)?;

            // Count only after the delete, otherwise the removed student
            // still counts as a referencer.
            if let (true, Some(address_id)) =
                (options.remove_address_if_orphaned, student.address_id)
            {
                if students.count_students_at(address_id)? == 0 {
                    removed += SqliteAddressRepository::new(tx).delete_address(address_id)?;
                }
            }
            Ok(removed)
        })?;
        info!(
            "event=remove_student module=roster status=ok student_id={id} rows_removed={removed}"
        );
        Ok(removed)
    }

    /// Overwrites first name, last name and age. The address association is
    /// left untouched and not reported.
    pub fn update(&self, id: StudentId, student: &NewStudent) -> RosterResult<StudentView> {
        student.validate()?;

        let view = self.run_once("update", |tx| {
            let updated = SqliteStudentRepository::new(tx).update_student(id, student)?;
            Ok(StudentView::bare(updated))
        })?;
        info!("event=update_student module=roster status=ok student_id={id}");
        Ok(view)
    }

    /// Number of student rows.
    pub fn student_count(&self) -> RosterResult<u64> {
        self.run_once("student_count", |tx| {
            SqliteStudentRepository::new(tx).count_students()
        })
    }

    /// Number of address rows, shared or orphaned.
    pub fn address_count(&self) -> RosterResult<u64> {
        self.run_once("address_count", |tx| {
            SqliteAddressRepository::new(tx).count_addresses()
        })
    }

    fn lock(&self) -> RosterResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            error!("event=store_lock module=roster status=error error_code=lock_poisoned");
            RosterError::StoreUnavailable("connection lock poisoned".to_string())
        })
    }

    fn run_once<T>(
        &self,
        op: &'static str,
        work: impl Fn(&Transaction<'_>) -> RepoResult<T>,
    ) -> RosterResult<T> {
        let mut conn = self.lock()?;
        in_transaction(&mut conn, &work).map_err(|err| log_failure(op, err))
    }

    /// Runs `work`, retrying once with a fresh transaction when the first
    /// attempt loses a write conflict.
    fn run_with_retry<T>(
        &self,
        op: &'static str,
        work: impl Fn(&Transaction<'_>) -> RepoResult<T>,
    ) -> RosterResult<T> {
        let mut conn = self.lock()?;
        let mut attempt = 1;
        loop {
            match in_transaction(&mut conn, &work) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_conflict() && attempt < CONFLICT_ATTEMPTS => {
                    warn!(
                        "event={op} module=roster status=retry attempt={attempt} error_code=conflict_race error={err}"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(log_failure(op, err)),
            }
        }
    }
}

fn in_transaction<T>(
    conn: &mut Connection,
    work: &impl Fn(&Transaction<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let value = work(&tx)?;
    tx.commit()?;
    Ok(value)
}

fn log_failure(op: &'static str, err: RepoError) -> RosterError {
    match &err {
        RepoError::NotFound(id) => {
            debug!("event={op} module=roster status=not_found student_id={id}");
        }
        RepoError::ConflictRace(_) => {
            error!("event={op} module=roster status=error error_code=store_unavailable error={err}");
        }
        _ => {
            error!("event={op} module=roster status=error error_code=repo_failed error={err}");
        }
    }
    RosterError::from(err)
}
