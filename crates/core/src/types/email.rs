//! Customer email type and de-duplicating set.

use core::fmt;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CustomerEmail`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty or whitespace.
    #[error("email cannot be empty")]
    Empty,
}

/// The email recorded on an order, used to identify a customer.
///
/// Only emptiness is checked. The value is kept exactly as the order
/// recorded it, whatever its length or shape.
///
/// ```
/// use ct_metrics_core::CustomerEmail;
///
/// assert!(CustomerEmail::parse("user@example.com").is_ok());
/// assert!(CustomerEmail::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CustomerEmail(String);

impl CustomerEmail {
    /// Parse a `CustomerEmail` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Empty`] if the input is blank.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.trim().is_empty() {
            return Err(EmailError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CustomerEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A set of unique customer emails.
#[derive(Debug, Clone, Default)]
pub struct EmailSet {
    inner: HashSet<CustomerEmail>,
}

impl EmailSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an email, returning `true` if it was already present.
    pub fn insert_checked(&mut self, email: CustomerEmail) -> bool {
        if self.inner.contains(&email) {
            return true;
        }
        self.inner.insert(email);
        false
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blank() {
        assert_eq!(CustomerEmail::parse(""), Err(EmailError::Empty));
        assert_eq!(CustomerEmail::parse(" \t"), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_accepts_long_addresses() {
        let long = format!("{}@example.com", "a".repeat(300));
        assert_eq!(CustomerEmail::parse(&long).unwrap().as_str(), long);
    }

    #[test]
    fn test_parse_keeps_raw_value() {
        let email = CustomerEmail::parse("Someone@Example.com").unwrap();
        assert_eq!(email.as_str(), "Someone@Example.com");
    }

    #[test]
    fn test_insert_checked_reports_repeats() {
        let mut set = EmailSet::new();
        let a = CustomerEmail::parse("a@example.com").unwrap();
        let b = CustomerEmail::parse("b@example.com").unwrap();

        assert!(!set.insert_checked(a.clone()));
        assert!(!set.insert_checked(b));
        assert!(set.insert_checked(a));
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_serde_transparent() {
        let email: CustomerEmail = serde_json::from_str("\"x@example.com\"").unwrap();
        assert_eq!(email.to_string(), "x@example.com");
    }
}
