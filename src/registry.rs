//! Category and location name registries.
//!
//! An ordered set of unique names, insertion order preserved for display.
//! The set must never become empty: removing the last remaining entry is
//! rejected. Removal never cascades to records referencing the name.

use serde::{Deserialize, Serialize};

use crate::errors::{StockError, StockResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Registry {
    names: Vec<String>,
}

impl From<Vec<String>> for Registry {
    fn from(names: Vec<String>) -> Self {
        Registry::new(names)
    }
}

impl From<Registry> for Vec<String> {
    fn from(registry: Registry) -> Self {
        registry.names
    }
}

impl Registry {
    pub fn new(names: Vec<String>) -> Self {
        let mut registry = Self { names: Vec::new() };
        for name in names {
            // Drop duplicates and blanks from persisted or imported data.
            let _ = registry.add(&name);
        }
        registry
    }

    pub fn default_categories() -> Self {
        Self::new(
            [
                "Electronics",
                "Furniture",
                "Office Supplies",
                "Food & Beverages",
                "Clothing",
                "Tools",
                "Other",
            ]
            .map(String::from)
            .to_vec(),
        )
    }

    pub fn default_locations() -> Self {
        Self::new(
            [
                "Warehouse A",
                "Warehouse B",
                "Storage Room 1",
                "Storage Room 2",
                "Retail Floor",
                "Back Office",
                "Other",
            ]
            .map(String::from)
            .to_vec(),
        )
    }

    pub fn add(&mut self, name: &str) -> StockResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StockError::Validation("Name cannot be empty".to_string()));
        }
        if self.contains(name) {
            return Err(StockError::Validation(format!(
                "\"{name}\" already exists"
            )));
        }
        self.names.push(name.to_string());
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> StockResult<()> {
        let index = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| StockError::NotFound(format!("\"{name}\" is not registered")))?;
        if self.names.len() <= 1 {
            return Err(StockError::RegistryInvariant(
                "At least one entry must remain".to_string(),
            ));
        }
        self.names.remove(index);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
