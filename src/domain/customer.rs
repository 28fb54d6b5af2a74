//! Customer contact record kept by the customer store.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Customer {
    /// Validate and normalize a record (email is lowercased).
    pub fn new(
        customer_id: impl Into<String>,
        name: impl Into<String>,
        email: &str,
        phone: Option<String>,
    ) -> Result<Self, ValidationError> {
        let customer_id = customer_id.into();
        if customer_id.trim().is_empty() {
            return Err(ValidationError::new("customer_id", "must not be empty"));
        }
        Ok(Self {
            customer_id,
            name: name.into(),
            email: normalize_email(email)?,
            phone,
        })
    }
}

/// An email needs a username and a domain around its `@`.
pub fn normalize_email(email: &str) -> Result<String, ValidationError> {
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(ValidationError::new(
            "email",
            "must contain a username and domain",
        ));
    }
    Ok(email.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_lowercased() {
        let c = Customer::new("cust-1", "Alex", "Alex@Example.COM", None).unwrap();
        assert_eq!(c.email, "alex@example.com");
    }

    #[test]
    fn email_needs_both_sides_of_at() {
        assert!(normalize_email("alex.example.com").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("alex@").is_err());
    }

    #[test]
    fn empty_id_is_rejected() {
        let err = Customer::new("  ", "Alex", "a@b.c", None).unwrap_err();
        assert_eq!(err.field, "customer_id");
    }
}
