//! Async client for the [pretalx](https://pretalx.com) conference-management API.
//!
//! ```no_run
//! use pretalx_api::{PretalxClient, QueryParams};
//!
//! # async fn example() -> pretalx_api::Result<()> {
//! let client = PretalxClient::with_token("https://pretalx.com", "my-token")?;
//! let talks = client
//!     .talks("democon", None, &QueryParams::new().with("q", "rust"))
//!     .await?;
//! println!("{}", talks);
//! # Ok(())
//! # }
//! ```

mod client;
mod endpoints;
mod types;

pub use client::PretalxClient;
pub use pretalx_core::{Credentials, ParamValue, PretalxError, QueryParams, Resource, Result};
