//! Classification of Tableau connection types

use std::fmt;

/// Connection types whose "tables" are subsheets of one parent document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetSource {
    GoogleSheets,
    Salesforce,
    ExcelDirect,
}

impl SheetSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleSheets => "google-sheets",
            Self::Salesforce => "salesforce",
            Self::ExcelDirect => "excel-direct",
        }
    }
}

/// How an external connection maps onto table records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionKind {
    /// One table per subsheet; the parent document name becomes the schema
    Sheet(SheetSource),
    /// One table per connection (text/CSV and anything unrecognized); the
    /// configured external schema is used
    FlatFile(String),
}

impl ConnectionKind {
    pub fn classify(connection_type: &str) -> Self {
        match connection_type {
            "google-sheets" => Self::Sheet(SheetSource::GoogleSheets),
            "salesforce" => Self::Sheet(SheetSource::Salesforce),
            "excel-direct" => Self::Sheet(SheetSource::ExcelDirect),
            other => Self::FlatFile(other.to_string()),
        }
    }

    /// The raw connection type string as reported by Tableau
    pub fn connection_type(&self) -> &str {
        match self {
            Self::Sheet(source) => source.as_str(),
            Self::FlatFile(kind) => kind,
        }
    }

    pub fn has_subsheets(&self) -> bool {
        matches!(self, Self::Sheet(_))
    }
}

impl From<&str> for ConnectionKind {
    fn from(connection_type: &str) -> Self {
        Self::classify(connection_type)
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.connection_type())
    }
}
