//! Student repository trait and the in-process document store.

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, StudentError};
use crate::filter::StudentFilter;
use crate::student::{NewStudent, Student, StudentPatch};

/// A document store holding student records.
///
/// The HTTP layer depends only on this trait, so a networked document
/// database can replace [`InMemoryStudentRepository`] without touching the
/// handlers or the cache layer.
///
/// # Errors
///
/// - `StudentError::Validation` when a payload field is invalid
/// - `StudentError::DuplicateEmail` when the email is already taken
/// - `StudentError::NotFound` when the id does not exist
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Validates and stores a new student, assigning its id.
    async fn create(&self, student: NewStudent) -> Result<Student>;

    /// Returns every student matching the filter, in insertion order.
    async fn find(&self, filter: &StudentFilter) -> Result<Vec<Student>>;

    /// Returns the student with the given id.
    async fn find_by_id(&self, id: &str) -> Result<Student>;

    /// Applies a partial update and returns the stored result.
    async fn update(&self, id: &str, patch: StudentPatch) -> Result<Student>;

    /// Removes the student with the given id.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Returns the name of this repository, for logging.
    fn name(&self) -> &str;
}

/// Student repository kept in process memory.
///
/// Ids are UUIDv7 strings, so insertion order and id order agree.
#[derive(Debug, Default)]
pub struct InMemoryStudentRepository {
    students: RwLock<IndexMap<String, Student>>,
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored students.
    pub fn len(&self) -> usize {
        self.students.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.read().is_empty()
    }

    fn ensure_unique_email(
        students: &IndexMap<String, Student>,
        email: &str,
        except_id: Option<&str>,
    ) -> Result<()> {
        let taken = students
            .values()
            .any(|s| s.email == email && Some(s.id.as_str()) != except_id);
        if taken {
            return Err(StudentError::duplicate_email(email));
        }
        Ok(())
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn create(&self, student: NewStudent) -> Result<Student> {
        let student = student.validated()?;

        let mut students = self.students.write();
        Self::ensure_unique_email(&students, &student.email, None)?;

        let id = Uuid::now_v7().to_string();
        let stored = student.into_student(id.clone());
        students.insert(id, stored.clone());

        debug!(id = %stored.id, "Student created");
        Ok(stored)
    }

    async fn find(&self, filter: &StudentFilter) -> Result<Vec<Student>> {
        let students = self.students.read();
        Ok(students
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Student> {
        self.students
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StudentError::not_found(id))
    }

    async fn update(&self, id: &str, patch: StudentPatch) -> Result<Student> {
        let patch = patch.validated()?;

        let mut students = self.students.write();
        if !students.contains_key(id) {
            return Err(StudentError::not_found(id));
        }
        if let Some(email) = patch.email.as_deref() {
            Self::ensure_unique_email(&students, email, Some(id))?;
        }

        let student = students
            .get_mut(id)
            .ok_or_else(|| StudentError::not_found(id))?;
        patch.apply(student);

        debug!(id = %id, "Student updated");
        Ok(student.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        match self.students.write().shift_remove(id) {
            Some(_) => {
                debug!(id = %id, "Student deleted");
                Ok(())
            },
            None => Err(StudentError::not_found(id)),
        }
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
