//! Fully-qualified table keys

use std::fmt;

/// `{database}://{cluster}.{schema}/{table}` key used to link dashboards to tables
///
/// The parts are expected to be sanitized already; the key is used verbatim
/// downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableIdentifier {
    pub database: String,
    pub cluster: String,
    pub schema: String,
    pub table: String,
}

impl TableIdentifier {
    pub fn new(
        database: impl Into<String>,
        cluster: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            cluster: cluster.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}.{}/{}",
            self.database, self.cluster, self.schema, self.table
        )
    }
}
