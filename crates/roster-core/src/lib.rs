//! Roster Core - Domain types and storage traits
//!
//! This crate provides the student record, its validation rules, the list
//! filter, and the [`StudentRepository`] abstraction the HTTP layer talks to.
//!
//! ## Example
//!
//! ```
//! use roster_core::{InMemoryStudentRepository, NewStudent, StudentFilter, StudentRepository};
//!
//! # #[tokio::main]
//! # async fn main() -> roster_core::Result<()> {
//! let repository = InMemoryStudentRepository::new();
//!
//! let created = repository
//!     .create(NewStudent::new("Ada", "ada@example.com", "5", 10))
//!     .await?;
//!
//! let found = repository.find(&StudentFilter::default()).await?;
//! assert_eq!(found, vec![created]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod filter;
pub mod repository;
pub mod student;

pub use error::{Result, StudentError};
pub use filter::StudentFilter;
pub use repository::{InMemoryStudentRepository, StudentRepository};
pub use student::{NewStudent, Student, StudentPatch};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_semver() {
        let v = version();
        assert_eq!(v.split('.').count(), 3, "Version should be semver");
    }
}
