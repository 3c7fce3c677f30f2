//! Employee entity.

use super::{require_optional_text, require_text, RecordId, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Presence shown next to an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Away,
    Busy,
}

impl EmployeeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Away => "away",
            Self::Busy => "busy",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "away" => Some(Self::Away),
            "busy" => Some(Self::Busy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    /// Avatar image URL.
    pub avatar: String,
    pub phone: String,
    pub status: EmployeeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    pub avatar: String,
    pub phone: String,
    /// `None` creates the employee as `active`.
    pub status: Option<EmployeeStatus>,
}

impl NewEmployee {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: String::new(),
            department: department.into(),
            avatar: String::new(),
            phone: String::new(),
            status: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        validate_email(&self.email)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub status: Option<EmployeeStatus>,
}

impl EmployeePatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_optional_text("name", self.name.as_ref())?;
        match self.email.as_deref() {
            Some(email) => validate_email(email),
            None => Ok(()),
        }
    }
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{EmployeePatch, NewEmployee};
    use crate::model::ValidationError;

    #[test]
    fn email_shape_is_checked() {
        let draft = NewEmployee::new("Ana", "ana@example.com", "Design");
        assert!(draft.validate().is_ok());

        let draft = NewEmployee::new("Ana", "ana.example.com", "Design");
        assert_eq!(
            draft.validate(),
            Err(ValidationError::InvalidEmail("ana.example.com".to_string()))
        );

        let patch = EmployeePatch {
            email: Some("nobody@".to_string()),
            ..EmployeePatch::default()
        };
        assert!(patch.validate().is_err());
    }
}
