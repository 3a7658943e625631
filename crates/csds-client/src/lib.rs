//! csds-client
//!
//! Client side of the Client Status Discovery Service:
//! - request loading (YAML/JSON node matchers, file + inline merge)
//! - options and their validation
//! - transports (HTTP/JSON endpoint, saved response file)
//!
//! Decoding and analysis of the response live in `csds-core`.

pub mod client;
pub mod constants;
pub mod options;
pub mod request;
pub mod transport;

pub use client::{CsdsClient, Fetched};
pub use constants::*;
pub use options::{ApiVersion, AuthnMode, ClientOptions, OptionsError, Platform};
pub use request::{load_request, ClientStatusRequest, NodeMatcher};
pub use transport::{endpoint_url, FileStatusSource, HttpStatusSource, StatusSource};
