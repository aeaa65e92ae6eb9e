//! Exact-match filter for student listings.

use serde::Deserialize;

use crate::student::{Student, normalize_email};

/// Query parameters accepted by the list endpoint.
///
/// Every field that is present must match exactly. The email criterion is
/// normalized the way stored emails are, so it ignores case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudentFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub grade: Option<String>,
    pub age: Option<u32>,
}

impl StudentFilter {
    /// Filter on grade only.
    pub fn by_grade(grade: impl Into<String>) -> Self {
        Self {
            grade: Some(grade.into()),
            ..Default::default()
        }
    }

    /// Returns true if no criteria are set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.grade.is_none() && self.age.is_none()
    }

    /// Returns true if the student satisfies every criterion.
    pub fn matches(&self, student: &Student) -> bool {
        self.name.as_deref().is_none_or(|name| student.name == name)
            && self
                .email
                .as_deref()
                .is_none_or(|email| student.email == normalize_email(email))
            && self.grade.as_deref().is_none_or(|grade| student.grade == grade)
            && self.age.is_none_or(|age| student.age == age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::student::NewStudent;

    fn student(grade: &str, age: u32) -> Student {
        NewStudent::new("A", "a@x.com", grade, age).into_student("id")
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = StudentFilter::default();

        assert!(filter.is_empty());
        assert!(filter.matches(&student("5", 10)));
    }

    #[test]
    fn test_filter_by_grade() {
        let filter = StudentFilter::by_grade("5");

        assert!(filter.matches(&student("5", 10)));
        assert!(!filter.matches(&student("6", 10)));
    }

    #[test]
    fn test_filter_combines_criteria() {
        let filter = StudentFilter {
            grade: Some("5".to_string()),
            age: Some(11),
            ..Default::default()
        };

        assert!(!filter.matches(&student("5", 10)));
        assert!(filter.matches(&student("5", 11)));
    }

    #[test]
    fn test_filter_email_ignores_case() {
        let filter = StudentFilter {
            email: Some("A@X.com".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&student("5", 10)));
    }

    #[test]
    fn test_filter_email_folds_non_ascii_case() {
        let stored = NewStudent::new("Éva", "Éva.Ökör@X.com", "5", 10)
            .validated()
            .unwrap()
            .into_student("id");
        let filter = StudentFilter {
            email: Some(" ÉVA.ÖKÖR@x.COM ".to_string()),
            ..Default::default()
        };

        assert_eq!(stored.email, "éva.ökör@x.com");
        assert!(filter.matches(&stored));
    }
}
