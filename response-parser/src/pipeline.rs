use crate::{
    config::PipelineConfig,
    error::{BoxError, ErrorContext, ParseError},
    parser::ResponseParser,
    payload::RawMapping,
};
use derive_more::Display;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::{
    any::Any,
    future::Future,
    panic::AssertUnwindSafe,
    sync::atomic::{AtomicU8, Ordering},
};
use tracing::{Instrument, debug, debug_span, error, warn};

/// Name of the [`tracing::Span`] every [`ParsePipeline`] operation runs inside.
pub const PARSE_SPAN_NAME: &str = "parse_response";

/// [`ParsePipeline`] operation being executed.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    #[display("parse_single")]
    Single,
    #[display("parse_list")]
    List,
    #[display("parse_empty")]
    Empty,
}

/// Step of a [`ParsePipeline`] operation.
///
/// Every [`ParseError`] reports the [`Stage`] it originated from, allowing
/// [`ResponseParser::catch_error`] to encode why an operation failed into the domain failure.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[display("request")]
    Request,
    #[display("detect_failure")]
    DetectFailure,
    #[display("extract")]
    Extract,
    #[display("shape")]
    Shape,
    #[display("map")]
    Map,
}

impl Stage {
    const ALL: [Self; 5] = [
        Self::Request,
        Self::DetectFailure,
        Self::Extract,
        Self::Shape,
        Self::Map,
    ];
}

/// Records the [`Stage`] currently executing so a caught panic can be attributed to it.
#[derive(Debug, Default)]
struct StageTracker(AtomicU8);

impl StageTracker {
    fn enter(&self, stage: Stage) {
        self.0.store(stage as u8, Ordering::Relaxed);
    }

    fn current(&self) -> Stage {
        Stage::ALL[usize::from(self.0.load(Ordering::Relaxed))]
    }
}

/// Runs a caller supplied request action and parses the response into typed data or a
/// [`ResponseParser::Failure`].
///
/// Every error raised by the request action, the [`ResponseParser`] or the mapper (including
/// panics, see [`PipelineConfig::catch_panics`]) is caught exactly once at the outer boundary of
/// the operation and converted via [`ResponseParser::catch_error`]. No operation returns an error
/// other than a `Parser::Failure`.
///
/// ### Cancellation
/// Dropping an operation's future cancels it. Nothing is caught and
/// [`ResponseParser::catch_error`] is not called. A request action that resolves to a
/// cancellation error value is treated like any other request error.
#[derive(Debug, Clone)]
pub struct ParsePipeline<Parser> {
    pub parser: Parser,
    pub config: PipelineConfig,
}

impl<Parser> ParsePipeline<Parser> {
    /// Construct a new [`Self`] using the default [`PipelineConfig`].
    pub fn new(parser: Parser) -> Self {
        Self::with_config(parser, PipelineConfig::default())
    }

    pub fn with_config(parser: Parser, config: PipelineConfig) -> Self {
        Self { parser, config }
    }
}

impl<Parser> ParsePipeline<Parser>
where
    Parser: ResponseParser,
{
    /// Execute the request action and map the single [`RawMapping`] extracted from a healthy
    /// response into `Data`.
    pub async fn parse_single<Request, Fut, RequestError, Mapper, Data, MapError>(
        &self,
        request: Request,
        mapper: Mapper,
    ) -> Result<Data, Parser::Failure>
    where
        Request: FnOnce() -> Fut,
        Fut: Future<Output = Result<Parser::Response, RequestError>>,
        RequestError: Into<BoxError>,
        Mapper: FnOnce(RawMapping) -> Result<Data, MapError>,
        MapError: Into<BoxError>,
    {
        self.run(Operation::Single, request, |parser, response, tracker| {
            tracker.enter(Stage::Extract);
            let payload = parser
                .extract_data(response)
                .map_err(ParseError::Extract)?;

            tracker.enter(Stage::Shape);
            let mapping = payload.into_mapping()?;

            tracker.enter(Stage::Map);
            mapper(mapping).map_err(|error| ParseError::Map {
                index: None,
                error: error.into(),
            })
        })
        .await
    }

    /// Execute the request action and map every [`RawMapping`] in the sequence extracted from a
    /// healthy response into `Data`, preserving order.
    ///
    /// The first element that fails to map fails the whole operation.
    pub async fn parse_list<Request, Fut, RequestError, Mapper, Data, MapError>(
        &self,
        request: Request,
        mut mapper: Mapper,
    ) -> Result<Vec<Data>, Parser::Failure>
    where
        Request: FnOnce() -> Fut,
        Fut: Future<Output = Result<Parser::Response, RequestError>>,
        RequestError: Into<BoxError>,
        Mapper: FnMut(RawMapping) -> Result<Data, MapError>,
        MapError: Into<BoxError>,
    {
        self.run(Operation::List, request, |parser, response, tracker| {
            tracker.enter(Stage::Extract);
            let payload = parser
                .extract_data(response)
                .map_err(ParseError::Extract)?;

            tracker.enter(Stage::Shape);
            let sequence = payload.into_sequence()?;

            tracker.enter(Stage::Map);
            sequence
                .into_iter()
                .enumerate()
                .map(|(index, mapping)| {
                    mapper(mapping).map_err(|error| ParseError::Map {
                        index: Some(index),
                        error: error.into(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .await
    }

    /// Execute the request action and only check the response for an embedded failure.
    ///
    /// Returns `None` if the response is healthy. Errors caught along the way are returned as
    /// `Some(failure)`, indistinguishable in shape from a detected failure.
    pub async fn parse_empty<Request, Fut, RequestError>(
        &self,
        request: Request,
    ) -> Option<Parser::Failure>
    where
        Request: FnOnce() -> Fut,
        Fut: Future<Output = Result<Parser::Response, RequestError>>,
        RequestError: Into<BoxError>,
    {
        self.run(Operation::Empty, request, |_, _, _| Ok(()))
            .await
            .err()
    }

    /// Run the [`Operation`] inside its [`tracing::Span`], funneling any [`ParseError`] (or
    /// caught panic) through [`ResponseParser::catch_error`].
    async fn run<Request, Fut, RequestError, Extract, Output>(
        &self,
        operation: Operation,
        request: Request,
        extract: Extract,
    ) -> Result<Output, Parser::Failure>
    where
        Request: FnOnce() -> Fut,
        Fut: Future<Output = Result<Parser::Response, RequestError>>,
        RequestError: Into<BoxError>,
        Extract: FnOnce(&Parser, &Parser::Response, &StageTracker) -> Result<Output, ParseError>,
    {
        let span = debug_span!(PARSE_SPAN_NAME, %operation);

        async move {
            let tracker = StageTracker::default();
            let parse = self.parse_response(operation, request, extract, &tracker);

            let outcome = if self.config.catch_panics {
                AssertUnwindSafe(parse)
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| {
                        Err(ParseError::Panic {
                            stage: tracker.current(),
                            message: panic_message(panic.as_ref()),
                        })
                    })
            } else {
                parse.await
            };

            match outcome {
                Ok(result) => result,
                Err(error) => Err(self.catch(operation, error)),
            }
        }
        .instrument(span)
        .await
    }

    /// Request the `Parser::Response`, short-circuiting with `Ok(Err(failure))` if the
    /// [`ResponseParser`] detects an embedded failure.
    async fn parse_response<Request, Fut, RequestError, Extract, Output>(
        &self,
        operation: Operation,
        request: Request,
        extract: Extract,
        tracker: &StageTracker,
    ) -> Result<Result<Output, Parser::Failure>, ParseError>
    where
        Request: FnOnce() -> Fut,
        Fut: Future<Output = Result<Parser::Response, RequestError>>,
        RequestError: Into<BoxError>,
        Extract: FnOnce(&Parser, &Parser::Response, &StageTracker) -> Result<Output, ParseError>,
    {
        tracker.enter(Stage::Request);
        let response = request()
            .await
            .map_err(|error| ParseError::Request(error.into()))?;

        tracker.enter(Stage::DetectFailure);
        if let Some(failure) = self
            .parser
            .detect_failure(&response)
            .map_err(ParseError::DetectFailure)?
        {
            debug!(%operation, "detected failure embedded in response");
            return Ok(Err(failure));
        }

        extract(&self.parser, &response, tracker).map(Ok)
    }

    fn catch(&self, operation: Operation, error: ParseError) -> Parser::Failure {
        let stage = error.stage();

        if error.is_panic() {
            error!(%operation, %stage, %error, "caught panic while parsing response");
        } else {
            warn!(%operation, %stage, %error, "caught error while parsing response");
        }

        let context = ErrorContext::capture(operation, stage, self.config.capture_backtrace);
        self.parser.catch_error(error, context)
    }
}

/// Extract a human readable message from a caught panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
