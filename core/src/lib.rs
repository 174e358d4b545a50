//! Shared types for the pretalx API client: the error taxonomy, the
//! credentials a client is built from, and the query parameters passed to
//! read endpoints.

pub mod error;
pub mod models;

pub use error::{PretalxError, Result};
pub use models::{Credentials, ParamValue, QueryParams, Resource};
