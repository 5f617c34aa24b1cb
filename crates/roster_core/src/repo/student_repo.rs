//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `students` table.
//! - Provide the address-joined reads used for view expansion.
//! - Answer "how many students still reference this address".
//!
//! # Invariants
//! - `update_student` never writes `address_id`.
//! - List order is ascending id, which is creation order since ids are
//!   AUTOINCREMENT and never reused.

use crate::model::address::{Address, AddressId};
use crate::model::student::{NewStudent, Student, StudentId};
use crate::repo::address_repo::joined_address_from_row;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    age,
    address_id
FROM students";

const STUDENT_JOINED_SELECT_SQL: &str = "SELECT
    s.id AS id,
    s.first_name AS first_name,
    s.last_name AS last_name,
    s.age AS age,
    s.address_id AS address_id,
    a.id AS address_ref,
    a.city AS city,
    a.street AS street,
    a.street_number AS street_number
FROM students s
LEFT JOIN addresses a ON a.id = s.address_id";

/// Repository interface for student rows.
pub trait StudentRepository {
    fn insert_student(
        &self,
        draft: &NewStudent,
        address_id: Option<AddressId>,
    ) -> RepoResult<Student>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Gets one student together with its address row, if any.
    fn get_student_with_address(
        &self,
        id: StudentId,
    ) -> RepoResult<Option<(Student, Option<Address>)>>;
    fn list_students(&self) -> RepoResult<Vec<Student>>;
    fn list_students_with_addresses(&self) -> RepoResult<Vec<(Student, Option<Address>)>>;
    /// Overwrites first name, last name and age. Fails with `NotFound`.
    fn update_student(&self, id: StudentId, draft: &NewStudent) -> RepoResult<Student>;
    /// Deletes one student row and returns the number of rows removed.
    fn delete_student(&self, id: StudentId) -> RepoResult<usize>;
    fn count_students_at(&self, address_id: AddressId) -> RepoResult<u64>;
    fn count_students(&self) -> RepoResult<u64>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn insert_student(
        &self,
        draft: &NewStudent,
        address_id: Option<AddressId>,
    ) -> RepoResult<Student> {
        self.conn.execute(
            "INSERT INTO students (first_name, last_name, age, address_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![draft.first_name, draft.last_name, draft.age, address_id],
        )?;

        Ok(Student {
            id: self.conn.last_insert_rowid(),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            age: draft.age,
            address_id,
        })
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }
        Ok(None)
    }

    fn get_student_with_address(
        &self,
        id: StudentId,
    ) -> RepoResult<Option<(Student, Option<Address>)>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{STUDENT_JOINED_SELECT_SQL} WHERE s.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_joined_row(row)?));
        }
        Ok(None)
    }

    fn list_students(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{STUDENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }

    fn list_students_with_addresses(&self) -> RepoResult<Vec<(Student, Option<Address>)>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{STUDENT_JOINED_SELECT_SQL} ORDER BY s.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_joined_row(row)?);
        }
        Ok(students)
    }

    fn update_student(&self, id: StudentId, draft: &NewStudent) -> RepoResult<Student> {
        let changed = self.conn.execute(
            "UPDATE students
             SET
                first_name = ?1,
                last_name = ?2,
                age = ?3
             WHERE id = ?4;",
            params![draft.first_name, draft.last_name, draft.age, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.get_student(id)?.ok_or(RepoError::NotFound(id))
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [id])?;
        Ok(removed)
    }

    fn count_students_at(&self, address_id: AddressId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM students WHERE address_id = ?1;",
            [address_id],
            |row| row.get(0),
        )?;
        Ok(count.unsigned_abs())
    }

    fn count_students(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students;", [], |row| row.get(0))?;
        Ok(count.unsigned_abs())
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let id: StudentId = row.get("id")?;
    let age: i64 = row.get("age")?;
    if age < 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid age `{age}` in students.age (id={id})"
        )));
    }

    Ok(Student {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        age,
        address_id: row.get("address_id")?,
    })
}

fn parse_joined_row(row: &Row<'_>) -> RepoResult<(Student, Option<Address>)> {
    let student = parse_student_row(row)?;
    let address = joined_address_from_row(row)?;
    if student.address_id.is_some() && address.is_none() {
        return Err(RepoError::InvalidData(format!(
            "dangling students.address_id for student id={}",
            student.id
        )));
    }
    Ok((student, address))
}
