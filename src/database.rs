//! Database module for tabql
//!
//! This module provides the catalog: the registry that owns every loaded table
//! and looks tables up by name. It is created once by the program and passed
//! by reference to whatever needs it.
//!
//! Registration order is preserved. Registering a second table under an
//! existing name keeps both, and lookups return the one registered first.

use crate::error::{TabqlError, TabqlResult};
use crate::table::Table;

/// Central catalog that owns all registered tables
#[derive(Debug, Default)]
pub struct Database {
    /// Registered tables in insertion order
    tables: Vec<Table>,
}

impl Database {
    /// Create a new empty database
    pub fn new() -> Self {
        Database { tables: Vec::new() }
    }

    /// Register a table
    ///
    /// # Arguments
    /// * `table` - Table to add; its own name is the lookup key
    pub fn insert(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Find a table by name
    ///
    /// # Returns
    /// * `Some(&Table)` for the first table registered under `name`
    /// * `None` if no table has that name
    pub fn search(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name() == name)
    }

    /// Get a table by name, treating a miss as an error
    ///
    /// # Returns
    /// * `Ok(&Table)` if the table exists
    /// * `Err(TabqlError::TableNotFound)` if it doesn't
    pub fn get_table(&self, name: &str) -> TabqlResult<&Table> {
        self.search(name)
            .ok_or_else(|| TabqlError::TableNotFound(name.to_string()))
    }

    /// Get names of all tables in registration order
    pub fn table_names(&self) -> Vec<String> {
        self.tables
            .iter()
            .map(|table| table.name().to_string())
            .collect()
    }

    /// Get number of registered tables
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn table(name: &str, marker: &str) -> Table {
        let record: Record = [("marker", marker)].into_iter().collect();
        Table::from_records(name, vec![record])
    }

    #[test]
    fn test_search_finds_registered_table() {
        let mut db = Database::new();
        db.insert(table("cities", "c"));
        db.insert(table("countries", "k"));

        let found = db.search("countries").unwrap();
        assert_eq!(found.records()[0].get("marker").unwrap(), "k");
        assert_eq!(db.table_names(), vec!["cities", "countries"]);
    }

    #[test]
    fn test_first_registration_wins() {
        let mut db = Database::new();
        db.insert(table("players", "first"));
        db.insert(table("players", "second"));

        assert_eq!(db.table_count(), 2);
        let found = db.search("players").unwrap();
        assert_eq!(found.records()[0].get("marker").unwrap(), "first");
    }

    #[test]
    fn test_unregistered_name() {
        let db = Database::new();

        assert!(db.search("teams").is_none());
        assert!(matches!(
            db.get_table("teams"),
            Err(TabqlError::TableNotFound(ref n)) if n == "teams"
        ));
    }
}
