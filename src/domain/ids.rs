//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity name newtype wrapper
///
/// Names one record type known to the entity registry, e.g. `Customer`.
/// Entity names are matched exactly; only attribute names are case-insensitive.
///
/// # Examples
///
/// ```
/// use rowpack::domain::ids::EntityName;
/// use std::str::FromStr;
///
/// let entity = EntityName::from_str("Customer").unwrap();
/// assert_eq!(entity.as_str(), "Customer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityName(String);

impl EntityName {
    /// Creates a new EntityName from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(EntityName)` if the name is valid, `Err` otherwise
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Entity name cannot be empty".to_string());
        }
        if name.chars().any(char::is_whitespace) {
            return Err(format!("Entity name cannot contain whitespace: '{name}'"));
        }
        Ok(Self(name))
    }

    /// Returns the entity name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
