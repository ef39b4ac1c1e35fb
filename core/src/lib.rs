//! Synchronous core for the surgical records console.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the
//! remote records API without touching the network (host-does-IO pattern),
//! and holds everything the console needs that is not I/O: the field
//! descriptor table, value normalization, filtering and name resolution,
//! form state, the session state machine and the PDF exporter.
//!
//! # Design
//! - `RecordsClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, and
//!   `RecordService` runs the pair over a host-supplied `Transport`.
//! - Failures are explicit `ApiError`s; a failed fetch never looks like an
//!   empty list.
//! - `FIELDS` is the single declaration of the record schema used by forms,
//!   tables and reports.

pub mod client;
pub mod error;
pub mod fields;
pub mod filter;
pub mod form;
pub mod http;
pub mod normalize;
pub mod report;
pub mod service;
pub mod session;
pub mod transport;
pub mod types;

pub use client::{RecordsClient, DEFAULT_API_URL};
pub use error::{ApiError, ReportError, SessionError};
pub use fields::{field_by_key, FieldError, FieldKind, FieldSpec, FIELDS};
pub use filter::{resolve_by_name, NameMatch, RecordFilter};
pub use form::{RecordForm, CLEAR_INPUT};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use normalize::{normalize, normalize_all, NormalizedRecord};
pub use report::{export_pdf, report_lines, ReportLayout};
pub use service::RecordService;
pub use session::{Action, Session, View};
pub use transport::Transport;
#[cfg(any(test, feature = "test-support"))]
pub use transport::ScriptedTransport;
pub use types::{LoginOutcome, LoginRequest, Record};
