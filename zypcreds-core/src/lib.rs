//! Client for the ZypCreds identity-verification REST API.
//!
//! Every call is signed with HMAC-SHA1 over the canonical form of its
//! parameters and the reply, JSON or XML, is normalized into a
//! [`NormalizedResult`].
//!
//! ```rust,no_run
//! use zypcreds_core::{ClientConfig, ContentType, ZypCredsClient, ZypCredsError};
//!
//! # async fn verify() -> Result<(), ZypCredsError> {
//! let config = ClientConfig::new("my-api-id", "my-api-key").with_content_type(ContentType::Xml);
//! let client = ZypCredsClient::new(config)?;
//!
//! client.request_verification("5551234567", None, None).await?;
//!
//! let outcome = client
//!     .attempt_verification("5551234567", "123456", Some("203.0.113.7".to_string()))
//!     .await?;
//! if outcome.result.succeeded() == Some(true) {
//!     println!("verified {:?}", outcome.result.prepped_index);
//! } else {
//!     println!("rejected: {:?}", outcome.result.error_description);
//! }
//! # Ok(())
//! # }
//! ```
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

mod client;
pub use client::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod logger;
pub use logger::*;

pub mod params;
pub use params::{canonicalize, ParameterSet};

pub mod request;
pub use request::{build_request, PreparedRequest, RequestContext, Verb};

mod response;
pub use response::*;

mod signer;
pub use signer::*;

mod transport;
pub use transport::*;

uniffi::setup_scaffolding!("zypcreds_core");
