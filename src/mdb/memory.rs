use std::collections::HashMap;

use super::{Row, TableSource};
use crate::pdb::types::error::{PdbError, Result};

/// Tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    tables: HashMap<String, Vec<Row>>,
}

impl MemoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a table, builder style.
    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.insert_table(name, rows);
        self
    }

    pub fn insert_table(&mut self, name: impl Into<String>, rows: Vec<Row>) {
        self.tables.insert(name.into(), rows);
    }
}

impl TableSource for MemoryTables {
    fn rows(&self, table: &str) -> Result<Vec<Row>> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| PdbError::MissingTable(table.to_owned()))
    }
}
