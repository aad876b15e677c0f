//! Tableau Metadata API extractors
//!
//! Each extractor pairs a GraphQL query with a mapper that turns the
//! response into flat records:
//!
//! | Extractor | Records |
//! |---|---|
//! | [`DashboardTableExtractor`] | workbook → upstream table keys |
//! | [`ExternalTableExtractor`] | spreadsheet, file and SaaS tables |
//! | [`DashboardMetadataExtractor`] | workbook name, description, URLs |
//! | [`DashboardLastModifiedExtractor`] | workbook update time |
//! | [`DashboardQueryExtractor`] | custom SQL used by workbooks |

pub mod connection;
pub mod dashboard_tables;
pub mod dashboards;
pub mod external_tables;
pub mod graphql;
pub mod identifier;
pub mod last_modified;
pub mod queries;
pub mod sanitize;

pub use connection::{ConnectionKind, SheetSource};
pub use dashboard_tables::{DashboardTableExtractor, DashboardTableMapper, DashboardTableRecord};
pub use dashboards::{DashboardMetadataExtractor, DashboardMetadataMapper, DashboardMetadataRecord};
pub use external_tables::{ExternalTableExtractor, ExternalTableMapper, ExternalTableRecord};
pub use graphql::{ExcludedProjects, GraphQlExtractor, QueryMapper, Record};
pub use identifier::TableIdentifier;
pub use last_modified::{
    DashboardLastModifiedExtractor, DashboardLastModifiedMapper, DashboardLastModifiedRecord,
};
pub use queries::{DashboardQueryExtractor, DashboardQueryMapper, DashboardQueryRecord};
