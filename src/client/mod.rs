//! Tableau API client and authentication.
//!
//! This module provides the [`TableauClient`] for querying the Tableau
//! Metadata API, along with the lazily signed-in [`AuthSession`].

mod auth;
mod tableau;

pub use auth::AuthSession;
pub use tableau::{AUTH_HEADER, TableauClient};
