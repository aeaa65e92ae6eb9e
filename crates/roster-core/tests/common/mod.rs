#![allow(dead_code)]
use roster_core::{InMemoryStudentRepository, NewStudent, Student, StudentRepository};

/// Returns a valid payload with the given name and grade.
/// The email is derived from the name so payloads stay unique.
pub fn payload(name: &str, grade: &str) -> NewStudent {
    NewStudent::new(name, format!("{}@school.test", name.to_lowercase()), grade, 10)
}

/// Creates a repository seeded with the given (name, grade) pairs.
pub async fn seeded(rows: &[(&str, &str)]) -> (InMemoryStudentRepository, Vec<Student>) {
    let repository = InMemoryStudentRepository::new();
    let mut created = Vec::new();
    for (name, grade) in rows {
        created.push(
            repository
                .create(payload(name, grade))
                .await
                .expect("Failed to seed student"),
        );
    }
    (repository, created)
}
