use crate::{
    payload::PayloadKind,
    pipeline::{Operation, Stage},
};
use derive_more::Constructor;
use std::{backtrace::Backtrace, sync::Arc};
use thiserror::Error;

/// Boxed error returned by caller supplied request actions, extractors, detectors and mappers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Raw payload did not have the shape required by the pipeline operation consuming it.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("expected {expected} payload, found {actual}")]
pub struct ShapeError {
    pub expected: PayloadKind,
    pub actual: PayloadKind,
}

/// All errors caught at the outer boundary of a [`ParsePipeline`](crate::pipeline::ParsePipeline)
/// operation, before being converted into a domain failure via
/// [`ResponseParser::catch_error`](crate::parser::ResponseParser::catch_error).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("request action failed: {0}")]
    Request(BoxError),

    #[error("failure detection failed: {0}")]
    DetectFailure(BoxError),

    #[error("data extraction failed: {0}")]
    Extract(BoxError),

    #[error("payload shape violation: {0}")]
    Shape(#[from] ShapeError),

    #[error("mapping failed{}: {error}", element_suffix(.index))]
    Map {
        /// Index of the sequence element that failed, `None` for single mapping operations.
        index: Option<usize>,
        error: BoxError,
    },

    #[error("panicked during {stage}: {message}")]
    Panic { stage: Stage, message: String },
}

impl ParseError {
    /// [`Stage`] of the pipeline this error originated from.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Request(_) => Stage::Request,
            Self::DetectFailure(_) => Stage::DetectFailure,
            Self::Extract(_) => Stage::Extract,
            Self::Shape(_) => Stage::Shape,
            Self::Map { .. } => Stage::Map,
            Self::Panic { stage, .. } => *stage,
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panic { .. })
    }
}

fn element_suffix(index: &Option<usize>) -> String {
    index
        .map(|index| format!(" for element {index}"))
        .unwrap_or_default()
}

/// Context handed to [`ResponseParser::catch_error`](crate::parser::ResponseParser::catch_error)
/// alongside the [`ParseError`].
///
/// Use [`Self::stage`] to locate where the error originated.
#[derive(Debug, Clone, Constructor)]
pub struct ErrorContext {
    pub operation: Operation,
    pub stage: Stage,
    /// Catch-site [`Backtrace`], captured inside the pipeline after the error was caught.
    ///
    /// Its frames show the pipeline's catch boundary, not the code that returned the error or
    /// raised the panic. Honours the `RUST_BACKTRACE` & `RUST_LIB_BACKTRACE` environment
    /// variables.
    pub backtrace: Arc<Backtrace>,
}

impl ErrorContext {
    /// Construct an [`ErrorContext`], capturing a [`Backtrace`] if `capture_backtrace` is set.
    pub fn capture(operation: Operation, stage: Stage, capture_backtrace: bool) -> Self {
        let backtrace = if capture_backtrace {
            Backtrace::capture()
        } else {
            Backtrace::disabled()
        };

        Self::new(operation, stage, Arc::new(backtrace))
    }
}
