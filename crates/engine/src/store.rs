//! Row stores
//!
//! [`RowStore`] is the seam between the migrator and the database it rewrites. The
//! migrator only ever lists tables, pages through rows and writes changed rows back
//! by primary key, so that is all a store has to provide.
//!
//! [`MemoryStore`] keeps whole tables in memory and loads and saves them as a JSON
//! snapshot:
//!
//! ```json
//! {"tables": [
//!   {"name": "wp_options", "primary_key": "option_id",
//!    "rows": [{"option_id": 1, "option_name": "siteurl", "option_value": "http://example.com"}]}
//! ]}
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::row::Row;

/// Database access needed by the migrator
pub trait RowStore {
    /// Names of all tables, in processing order
    fn tables(&self) -> Result<Vec<String>>;

    /// Primary key column of a table, or `None` if it has none
    fn primary_key(&self, table: &str) -> Result<Option<String>>;

    /// Number of rows in a table
    fn row_count(&self, table: &str) -> Result<usize>;

    /// Up to `limit` rows starting at `offset`, in a stable order
    fn fetch_rows(&self, table: &str, limit: usize, offset: usize) -> Result<Vec<Row>>;

    /// Write `row` back over the stored row with the same primary key value.
    ///
    /// # Errors
    ///
    /// Returns an error if no stored row has that key; the migrator records this and
    /// carries on.
    fn update_row(&mut self, table: &str, primary_key: &str, row: &Row) -> Result<()>;
}

/// One table of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// Table name
    pub name: String,
    /// Primary key column, if the table has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    /// Rows in storage order
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// In-memory store backed by a JSON snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    tables: Vec<TableData>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, replacing any table with the same name
    pub fn add_table(&mut self, table: TableData) {
        match self.tables.iter_mut().find(|t| t.name == table.name) {
            Some(slot) => *slot = table,
            None => self.tables.push(table),
        }
    }

    /// Look up a table
    pub fn table(&self, name: &str) -> Option<&TableData> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Parse a snapshot from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the snapshot as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let store = Self::from_json(&content).map_err(|e| {
            Error::Snapshot(format!("Failed to parse snapshot '{}': {}", path.display(), e))
        })?;
        info!(
            target: "wpmigrate::store",
            path = %path.display(),
            tables = store.tables.len(),
            "Loaded snapshot"
        );
        Ok(store)
    }

    /// Write the snapshot to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        info!(target: "wpmigrate::store", path = %path.display(), "Wrote snapshot");
        Ok(())
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut TableData> {
        self.tables
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| Error::store(format!("no such table '{}'", name)))
    }

    fn table_ref(&self, name: &str) -> Result<&TableData> {
        self.table(name)
            .ok_or_else(|| Error::store(format!("no such table '{}'", name)))
    }
}

impl RowStore for MemoryStore {
    fn tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.iter().map(|t| t.name.clone()).collect())
    }

    fn primary_key(&self, table: &str) -> Result<Option<String>> {
        Ok(self.table_ref(table)?.primary_key.clone())
    }

    fn row_count(&self, table: &str) -> Result<usize> {
        Ok(self.table_ref(table)?.rows.len())
    }

    fn fetch_rows(&self, table: &str, limit: usize, offset: usize) -> Result<Vec<Row>> {
        let rows = &self.table_ref(table)?.rows;
        Ok(rows.iter().skip(offset).take(limit).cloned().collect())
    }

    fn update_row(&mut self, table: &str, primary_key: &str, row: &Row) -> Result<()> {
        let key = row.get(primary_key).ok_or_else(|| Error::MissingPrimaryKey {
            table: table.to_string(),
            primary_key: primary_key.to_string(),
        })?;
        let data = self.table_mut(table)?;
        let slot = data
            .rows
            .iter_mut()
            .find(|r| r.get(primary_key) == Some(key))
            .ok_or_else(|| {
                Error::store(format!("no row in '{}' with {} = {}", table, primary_key, key))
            })?;
        *slot = row.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Cell;
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"{
        "tables": [
            {"name": "wp_options", "primary_key": "option_id", "rows": [
                {"option_id": 1, "option_name": "siteurl", "option_value": "http://old.test"},
                {"option_id": 2, "option_name": "home", "option_value": "http://old.test"},
                {"option_id": 3, "option_name": "blogname", "option_value": "Old"}
            ]},
            {"name": "wp_links", "rows": []}
        ]
    }"#;

    #[test]
    fn test_parse_snapshot() {
        let store = MemoryStore::from_json(SNAPSHOT).unwrap();
        assert_eq!(store.tables().unwrap(), vec!["wp_options", "wp_links"]);
        assert_eq!(store.primary_key("wp_options").unwrap().as_deref(), Some("option_id"));
        assert_eq!(store.primary_key("wp_links").unwrap(), None);
        assert_eq!(store.row_count("wp_options").unwrap(), 3);
    }

    #[test]
    fn test_fetch_rows_pages() {
        let store = MemoryStore::from_json(SNAPSHOT).unwrap();
        let page = store.fetch_rows("wp_options", 2, 0).unwrap();
        assert_eq!(page.len(), 2);
        let page = store.fetch_rows("wp_options", 2, 2).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].text("option_name"), Some("blogname"));
        assert!(store.fetch_rows("wp_options", 2, 4).unwrap().is_empty());
    }

    #[test]
    fn test_update_row_by_key() {
        let mut store = MemoryStore::from_json(SNAPSHOT).unwrap();
        let mut row = store.fetch_rows("wp_options", 1, 1).unwrap().remove(0);
        row.set("option_value", "http://new.test");
        store.update_row("wp_options", "option_id", &row).unwrap();

        let rows = &store.table("wp_options").unwrap().rows;
        assert_eq!(rows[1].text("option_value"), Some("http://new.test"));
        assert_eq!(rows[0].text("option_value"), Some("http://old.test"));
    }

    #[test]
    fn test_update_unknown_row_fails() {
        let mut store = MemoryStore::from_json(SNAPSHOT).unwrap();
        let row = Row::new().with("option_id", 99);
        assert!(matches!(
            store.update_row("wp_options", "option_id", &row),
            Err(Error::Store(_))
        ));
        assert!(store.update_row("wp_missing", "id", &Row::new().with("id", 1)).is_err());
    }

    #[test]
    fn test_unknown_table() {
        let store = MemoryStore::new();
        assert!(matches!(store.row_count("nope"), Err(Error::Store(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");

        let mut store = MemoryStore::new();
        store.add_table(TableData {
            name: "wp_posts".to_string(),
            primary_key: Some("ID".to_string()),
            rows: vec![Row::new().with("ID", 7).with("post_content", "hi")],
        });
        store.save(&path).unwrap();

        let loaded = MemoryStore::load(&path).unwrap();
        assert_eq!(loaded, store);
        let rows = &loaded.table("wp_posts").unwrap().rows;
        assert_eq!(rows[0].get("ID"), Some(&Cell::Int(7)));
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"tables\": 3}").unwrap();
        assert!(matches!(MemoryStore::load(&path), Err(Error::Snapshot(_))));
    }
}
