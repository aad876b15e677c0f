//! Identifier sanitization
//!
//! Names coming out of Tableau are written for people: they carry spaces,
//! punctuation and HTML escape sequences. These functions turn them into
//! fragments that are safe to use inside a `database://cluster.schema/table`
//! key.

use regex::Regex;
use std::sync::LazyLock;

/// Matches `&#x27;`-style numeric escapes and `&amp;`
static HTML_ESCAPE_SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(&#[x\d]+;)|(&amp;)").unwrap());

static SCHEMA_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\]()\-]").unwrap());

/// Escape HTML metacharacters (`&`, `<`, `>`, `"`, `'`)
pub fn html_escape(name: &str) -> String {
    html_escape::encode_quoted_attribute(name).into_owned()
}

/// Sanitize a name for the schema position of a table key
///
/// Brackets, parentheses and hyphens are deleted, then HTML escape
/// sequences, and only then are periods and spaces turned into underscores.
/// The order matters because escape sequences contain characters the later
/// steps rewrite.
///
/// ```
/// use tableau_metadata_extractor::tableau::sanitize::sanitize_schema_name;
///
/// assert_eq!(sanitize_schema_name("FY19 Report"), "FY19_Report");
/// assert_eq!(sanitize_schema_name("Budget (2020).xlsx"), "Budget_2020_xlsx");
/// ```
pub fn sanitize_schema_name(name: &str) -> String {
    let stripped = SCHEMA_PUNCTUATION.replace_all(name, "");
    let unescaped = HTML_ESCAPE_SEQUENCE.replace_all(&stripped, "");
    unescaped.replace('.', "_").replace(' ', "_")
}

/// Sanitize a name for the database position of a table key
pub fn sanitize_database_name(name: &str) -> String {
    name.replace('-', "")
}

/// Sanitize a name for the table position of a table key
///
/// Only HTML escape sequences are removed; spaces and periods survive.
pub fn sanitize_table_name(name: &str) -> String {
    HTML_ESCAPE_SEQUENCE.replace_all(name, "").into_owned()
}

/// Sanitize a workbook name for use as a dashboard id
///
/// Same rule as [`sanitize_table_name`] today, kept separate so the two can diverge.
pub fn sanitize_workbook_name(name: &str) -> String {
    HTML_ESCAPE_SEQUENCE.replace_all(name, "").into_owned()
}
