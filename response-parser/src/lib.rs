#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]
#![allow(clippy::type_complexity, type_alias_bounds)]

//! # Response-Parser
//! Small framework for turning the opaque responses of any network call into typed data, or into
//! an application defined failure.
//!
//! ## Core abstractions:
//! - **ResponseParser** supplying the API specific logic: extracting the raw payload from a
//!   response, detecting a failure embedded in a response, and converting any caught error into
//!   the domain failure type. Implement it directly, or compose a [`FnParser`] from closures.
//! - **ParsePipeline** orchestrating a request action & [`ResponseParser`] for single object,
//!   list, and empty responses. Every error raised along the way is caught exactly once and
//!   funneled into the domain failure, so callers never handle anything but the returned value.
//!
//! ## Example
//! ```rust,ignore
//! let pipeline = ParsePipeline::new(FnParser::new(
//!     |response: &Value| extract_field(response, "data"),
//!     |response: &Value| Ok(detect_field(response, "error").map(ApiFailure::from)),
//!     |error: ParseError, context: ErrorContext| ApiFailure::caught(error, context),
//! ));
//!
//! let orders: Result<Vec<Order>, ApiFailure> = pipeline
//!     .parse_list(|| client.fetch_orders(), deserialize_mapping::<Order>)
//!     .await;
//! ```

pub use crate::{
    config::PipelineConfig,
    error::{BoxError, ErrorContext, ParseError, ShapeError},
    parser::{ResponseParser, func::FnParser},
    payload::{PayloadKind, RawMapping, RawPayload},
    pipeline::{Operation, ParsePipeline, Stage},
};

/// All [`Error`](std::error::Error)s generated in Response-Parser, and the [`ErrorContext`]
/// accompanying a caught error.
pub mod error;

/// Defines the [`ResponseParser`] contract and a closure backed [`FnParser`] implementation.
pub mod parser;

/// Defines the [`ParsePipeline`] executing request actions and parsing their responses.
pub mod pipeline;

/// Untyped [`RawPayload`] extracted from a response, and its shape checked conversions.
pub mod payload;

/// [`PipelineConfig`] controlling panic capture & backtrace collection.
pub mod config;

/// Utilities to assist deserialisation.
pub mod de;

/// Default `tracing` subscriber initialisation.
#[cfg(feature = "logging")]
pub mod logging;

