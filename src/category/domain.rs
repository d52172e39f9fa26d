//! Domain types for categories.

use serde::{Deserialize, Serialize};

use crate::{Error, transaction::TransactionKind, user::UserID};

/// Alias for ids for the category table.
pub type CategoryId = i64;

/// The name of a category. Cannot be empty or all whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a validated category name.
    ///
    /// # Errors
    /// Returns a validation error if `name` is empty or whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(Error::validation(
                "name",
                "required",
                "category name cannot be empty",
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Create a category name without validation, e.g. from a trusted database row.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A transaction category.
///
/// Rows with no owner are system defaults, seeded at initialization and
/// immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    /// `None` marks a system default category.
    pub user_id: Option<UserID>,
    pub name: CategoryName,
    pub kind: TransactionKind,
    pub icon: String,
    pub color: String,
    pub is_default: bool,
}

/// The client-supplied fields for creating or updating a category.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryData {
    pub name: String,
    pub kind: TransactionKind,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

#[cfg(test)]
mod category_name_tests {
    use crate::Error;

    use super::CategoryName;

    #[test]
    fn new_fails_on_empty_string() {
        assert!(matches!(CategoryName::new(""), Err(Error::Validation(_))));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert!(matches!(
            CategoryName::new("\n\t \r"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn new_trims_surrounding_whitespace() {
        let name = CategoryName::new("  Mercado ").unwrap();

        assert_eq!(name.as_ref(), "Mercado");
    }
}
