//! Shared models and the client-side form engine of the membership application.
//!
//! Both the browser client (`frontend`) and the HTTP server (`backend`) depend on
//! this crate. It holds everything that has to behave identically on both sides:
//!
//! - `model`: the membership record, its field identifiers and the persisted
//!   submission with its review status.
//! - `validation` and `rules`: the field validator and the age-dependent rule for
//!   the student field.
//! - `signature`: the freehand drawing surface and the upload slot.
//! - `session`: the form state controller driving a single form session from
//!   editing to download.
//! - `requests`: the JSON payloads exchanged with the backend.
//! - `client`: the collaborator traits the session consumes (persistence and
//!   document rendering).
//! - `terms`: the static membership terms printed with every application.

pub mod client;
pub mod error;
pub mod model;
pub mod requests;
pub mod rules;
pub mod session;
pub mod signature;
pub mod terms;
pub mod validation;
