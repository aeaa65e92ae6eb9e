//! Student record and its write models.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StudentError};

/// Upper bound accepted for `age`.
pub const MAX_AGE: u32 = 150;

/// A stored student document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Server-assigned identifier.
    pub id: String,
    pub name: String,
    /// Unique across all students.
    pub email: String,
    pub grade: String,
    pub age: u32,
}

/// Payload for creating a student. All fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub grade: String,
    pub age: u32,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub grade: Option<String>,
    pub age: Option<u32>,
}

impl NewStudent {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        grade: impl Into<String>,
        age: u32,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            grade: grade.into(),
            age,
        }
    }

    /// Validates every field and returns the normalized payload.
    ///
    /// Names and grades are trimmed, emails are trimmed and lowercased.
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            name: validate_name(&self.name)?,
            email: validate_email(&self.email)?,
            grade: validate_grade(&self.grade)?,
            age: validate_age(self.age)?,
        })
    }

    /// Builds the stored document under the given id.
    pub fn into_student(self, id: impl Into<String>) -> Student {
        Student {
            id: id.into(),
            name: self.name,
            email: self.email,
            grade: self.grade,
            age: self.age,
        }
    }
}

impl StudentPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.grade.is_none() && self.age.is_none()
    }

    /// Validates the fields that are present and returns the normalized patch.
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            name: self.name.as_deref().map(validate_name).transpose()?,
            email: self.email.as_deref().map(validate_email).transpose()?,
            grade: self.grade.as_deref().map(validate_grade).transpose()?,
            age: self.age.map(validate_age).transpose()?,
        })
    }

    /// Applies the patch on top of a stored student.
    pub fn apply(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(email) = self.email {
            student.email = email;
        }
        if let Some(grade) = self.grade {
            student.grade = grade;
        }
        if let Some(age) = self.age {
            student.age = age;
        }
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StudentError::validation("name", "cannot be empty"));
    }
    Ok(name.to_string())
}

/// Canonical form emails are stored and compared in.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<String> {
    let email = normalize_email(email);
    let Some((local, domain)) = email.split_once('@') else {
        return Err(StudentError::validation("email", "must contain '@'"));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(StudentError::validation("email", "is not a valid address"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(StudentError::validation("email", "cannot contain whitespace"));
    }
    Ok(email)
}

fn validate_grade(grade: &str) -> Result<String> {
    let grade = grade.trim();
    if grade.is_empty() {
        return Err(StudentError::validation("grade", "cannot be empty"));
    }
    Ok(grade.to_string())
}

fn validate_age(age: u32) -> Result<u32> {
    if age == 0 || age > MAX_AGE {
        return Err(StudentError::validation(
            "age",
            format!("must be between 1 and {MAX_AGE}"),
        ));
    }
    Ok(age)
}
