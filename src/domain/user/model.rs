//! Vehicle owner domain entity

use chrono::{DateTime, Utc};

use crate::shared::errors::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Vehicle plate, unique across users, stored upper-case
    pub plate_number: String,
    pub contact_number: Option<String>,
    pub service_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn apply(&mut self, patch: UserPatch) -> DomainResult<()> {
        if let Some(first) = &patch.first_name {
            require_name("first_name", first)?;
        }
        if let Some(last) = &patch.last_name {
            require_name("last_name", last)?;
        }
        let plate = patch
            .plate_number
            .as_deref()
            .map(normalize_plate)
            .transpose()?;

        if let Some(first) = patch.first_name {
            self.first_name = first;
        }
        if let Some(last) = patch.last_name {
            self.last_name = last;
        }
        if let Some(plate) = plate {
            self.plate_number = plate;
        }
        if let Some(contact) = patch.contact_number {
            self.contact_number = contact;
        }
        if let Some(service_id) = patch.service_id {
            self.service_id = service_id;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub plate_number: String,
    pub contact_number: Option<String>,
    pub service_id: Option<i32>,
}

impl NewUser {
    /// Validate and normalise the plate number in place.
    pub fn normalize(mut self) -> DomainResult<Self> {
        require_name("first_name", &self.first_name)?;
        require_name("last_name", &self.last_name)?;
        self.plate_number = normalize_plate(&self.plate_number)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub plate_number: Option<String>,
    pub contact_number: Option<Option<String>>,
    pub service_id: Option<Option<i32>>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Exact plate match (case-insensitive)
    pub plate_number: Option<String>,
    /// Partial plate match
    pub plate_search: Option<String>,
    pub service_id: Option<i32>,
}

/// Trim, upper-case and collapse inner whitespace of a plate number.
pub fn normalize_plate(plate: &str) -> DomainResult<String> {
    let normalized = plate
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    if normalized.is_empty() {
        return Err(DomainError::Validation("plate_number must not be empty".into()));
    }
    if !normalized
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
    {
        return Err(DomainError::Validation(format!(
            "plate_number '{}' may only contain letters, digits, spaces and dashes",
            plate
        )));
    }
    Ok(normalized)
}

fn require_name(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plate_is_normalised() {
        assert_eq!(normalize_plate("  abc  1234 ").unwrap(), "ABC 1234");
        assert_eq!(normalize_plate("nbc-123").unwrap(), "NBC-123");
    }

    #[test]
    fn plate_rejects_symbols_and_blank() {
        assert!(normalize_plate("   ").is_err());
        assert!(normalize_plate("AB#12").is_err());
    }

    #[test]
    fn new_user_requires_names() {
        let user = NewUser {
            first_name: "".into(),
            last_name: "Cruz".into(),
            plate_number: "ABC 123".into(),
            contact_number: None,
            service_id: None,
        };
        assert!(user.normalize().is_err());
    }
}
