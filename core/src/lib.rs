//! Async client core for a Qiita-style items API.
//!
//! # Overview
//! `QiitaClient` fetches a page of a user's items with one authenticated
//! `GET /users/{user_id}/items?page=&per_page=` per call, decodes the JSON
//! array into `Item`s, and maps HTTP statuses onto `ApiError`.
//!
//! # Design
//! - `QiitaClient` is immutable after construction and cheap to clone; it
//!   holds the base URL, token, user agent, a shared `Transport` and a
//!   `Logger`.
//! - Each operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`), with `execute` dispatching
//!   through the transport in between.
//! - Cancellation is driven by the caller's `CancellationToken`. There is no
//!   retry and no default timeout.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod logger;
pub mod transport;
pub mod types;

pub use client::{ClientBuilder, QiitaClient, DEFAULT_USER_AGENT};
pub use error::{ApiError, TransportError};
pub use http::{HttpRequest, HttpResponse};
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use tokio_util::sync::CancellationToken;
pub use transport::{ReqwestTransport, Transport};
pub use types::{Item, ItemsOutcome};
