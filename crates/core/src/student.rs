//! The student record.

use serde::{Deserialize, Serialize};

use crate::id::StudentId;
use crate::validation::{self, FieldCheck, IntRule, TextRule, ValidationErrors};

pub const MIN_AGE: i64 = 0;
pub const MAX_AGE: i64 = 130;

const NAME_RULES: &[TextRule] = &[TextRule::Required];
const EMAIL_RULES: &[TextRule] = &[TextRule::Required, TextRule::Email];
const AGE_RULES: &[IntRule] = &[IntRule::Gte(MIN_AGE), IntRule::Lte(MAX_AGE)];

/// A present student record, as stored and as returned on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// The mutable part of a student: everything except the id.
///
/// Create and update both take the full set; there is no partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFields {
    pub name: String,
    pub email: String,
    pub age: i64,
}

impl StudentFields {
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age,
        }
    }

    /// Rule table for a student.
    pub fn checks(&self) -> [FieldCheck<'_>; 3] {
        [
            FieldCheck::text("Name", &self.name, NAME_RULES),
            FieldCheck::text("Email", &self.email, EMAIL_RULES),
            FieldCheck::int("Age", self.age, AGE_RULES),
        ]
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validation::validate(&self.checks())
    }

    pub fn into_student(self, id: StudentId) -> Student {
        Student {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
        }
    }
}
