//! Persistence - the schools table in SQLite

use crate::error::{IsbeError, IsbeResult};
use crate::types::SchoolRecord;
use rusqlite::{Connection, ToSql};
use std::path::Path;
use tracing::debug;

/// Columns stored by default, in table order
pub const DEFAULT_COLUMNS: [&str; 9] = [
    "rcd",
    "rectype",
    "facilityname",
    "address",
    "city",
    "zip",
    "countyname",
    "gradeserved",
    "nces_id",
];

pub const DEFAULT_TABLE: &str = "schools";

/// Target table: a name and its text columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<String>,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            name: DEFAULT_TABLE.to_string(),
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn create_sql(&self) -> String {
        let fields = self
            .columns
            .iter()
            .map(|c| format!("{} text", c))
            .collect::<Vec<_>>()
            .join(", ");
        format!("create table if not exists {} ( {} )", self.name, fields)
    }

    pub fn insert_sql(&self) -> String {
        let placeholders = self
            .columns
            .iter()
            .map(|c| format!(":{}", c))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "insert into {} ({}) values ({})",
            self.name,
            self.columns.join(", "),
            placeholders
        )
    }

    pub fn delete_sql(&self) -> String {
        format!("delete from {}", self.name)
    }
}

/// Where normalized school records end up
pub trait SchoolSink {
    /// Create the table if it does not exist yet
    fn create_table(&mut self) -> IsbeResult<()>;

    /// Delete every row
    fn clear(&mut self) -> IsbeResult<()>;

    /// Insert one record, binding each table column by name
    fn insert(&mut self, record: &SchoolRecord) -> IsbeResult<()>;

    /// Commit everything inserted since the last commit
    fn commit(&mut self) -> IsbeResult<()>;

    /// Statement text used by `insert`, for error reports
    fn insert_statement(&self) -> String;
}

/// SQLite-backed sink.
///
/// Inserts run inside a transaction that the first insert opens and
/// `commit` closes.
pub struct SqliteSink {
    conn: Connection,
    schema: TableSchema,
    insert_sql: String,
}

impl SqliteSink {
    pub fn open<P: AsRef<Path>>(path: P, schema: TableSchema) -> IsbeResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Ok(Self::with_connection(conn, schema))
    }

    pub fn open_in_memory(schema: TableSchema) -> IsbeResult<Self> {
        Ok(Self::with_connection(Connection::open_in_memory()?, schema))
    }

    pub fn with_connection(conn: Connection, schema: TableSchema) -> Self {
        let insert_sql = schema.insert_sql();
        Self {
            conn,
            schema,
            insert_sql,
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn row_count(&self) -> IsbeResult<usize> {
        let sql = format!("select count(*) from {}", self.schema.name);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl SchoolSink for SqliteSink {
    fn create_table(&mut self) -> IsbeResult<()> {
        let sql = self.schema.create_sql();
        debug!("{}", sql);
        self.conn.execute_batch(&sql)?;
        Ok(())
    }

    fn clear(&mut self) -> IsbeResult<()> {
        self.conn.execute(&self.schema.delete_sql(), [])?;
        Ok(())
    }

    fn insert(&mut self, record: &SchoolRecord) -> IsbeResult<()> {
        let names: Vec<String> = self.schema.columns.iter().map(|c| format!(":{}", c)).collect();
        let mut values: Vec<String> = Vec::with_capacity(names.len());
        for column in &self.schema.columns {
            let value = record.get(column).ok_or_else(|| IsbeError::MissingColumn {
                column: column.clone(),
                rcd: record.rcd().to_string(),
            })?;
            values.push(value.to_string());
        }
        let params: Vec<(&str, &dyn ToSql)> = names
            .iter()
            .zip(values.iter())
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();

        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        let mut stmt = self.conn.prepare_cached(&self.insert_sql)?;
        stmt.execute(params.as_slice())?;
        Ok(())
    }

    fn commit(&mut self) -> IsbeResult<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    fn insert_statement(&self) -> String {
        self.insert_sql.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn small_schema() -> TableSchema {
        TableSchema::new("schools", vec!["rcd".into(), "city".into()])
    }

    fn record(rcd: &str, city: &str) -> SchoolRecord {
        [("rcd", rcd), ("city", city), ("zip", "62701")].into_iter().collect()
    }

    #[test]
    fn test_sql_text() {
        let schema = small_schema();
        assert_eq!(
            schema.create_sql(),
            "create table if not exists schools ( rcd text, city text )"
        );
        assert_eq!(
            schema.insert_sql(),
            "insert into schools (rcd, city) values (:rcd, :city)"
        );
        assert_eq!(schema.delete_sql(), "delete from schools");
    }

    #[test]
    fn test_default_schema() {
        let schema = TableSchema::default();
        assert_eq!(schema.name, "schools");
        assert_eq!(schema.columns.len(), 9);
        assert_eq!(schema.columns[0], "rcd");
    }

    #[test]
    fn test_insert_and_commit() {
        let mut sink = SqliteSink::open_in_memory(small_schema()).unwrap();
        sink.create_table().unwrap();
        sink.insert(&record("1", "Quincy")).unwrap();
        sink.insert(&record("2", "Peoria")).unwrap();
        assert!(!sink.connection().is_autocommit());
        sink.commit().unwrap();
        assert!(sink.connection().is_autocommit());
        assert_eq!(sink.row_count().unwrap(), 2);

        let city: String = sink
            .connection()
            .query_row("select city from schools where rcd = '2'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(city, "Peoria");
    }

    #[test]
    fn test_commit_without_inserts_is_noop() {
        let mut sink = SqliteSink::open_in_memory(small_schema()).unwrap();
        sink.create_table().unwrap();
        sink.commit().unwrap();
        assert_eq!(sink.row_count().unwrap(), 0);
    }

    #[test]
    fn test_create_table_twice() {
        let mut sink = SqliteSink::open_in_memory(small_schema()).unwrap();
        sink.create_table().unwrap();
        sink.create_table().unwrap();
    }

    #[test]
    fn test_clear() {
        let mut sink = SqliteSink::open_in_memory(small_schema()).unwrap();
        sink.create_table().unwrap();
        sink.insert(&record("1", "Quincy")).unwrap();
        sink.commit().unwrap();
        sink.clear().unwrap();
        assert_eq!(sink.row_count().unwrap(), 0);
    }

    #[test]
    fn test_insert_missing_column() {
        let mut sink = SqliteSink::open_in_memory(small_schema()).unwrap();
        sink.create_table().unwrap();
        let partial: SchoolRecord = [("rcd", "1")].into_iter().collect();
        let err = sink.insert(&partial).unwrap_err();
        assert!(matches!(err, IsbeError::MissingColumn { ref column, .. } if column == "city"));
    }

    #[test]
    fn test_insert_without_table_fails() {
        let mut sink = SqliteSink::open_in_memory(small_schema()).unwrap();
        assert!(matches!(
            sink.insert(&record("1", "Quincy")),
            Err(IsbeError::Database(_))
        ));
    }
}
