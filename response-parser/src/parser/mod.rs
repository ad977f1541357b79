use crate::{
    error::{BoxError, ErrorContext, ParseError},
    payload::RawPayload,
};
use std::sync::Arc;

/// Closure backed [`ResponseParser`] implementation.
pub mod func;

/// Utilised by a [`ParsePipeline`](crate::pipeline::ParsePipeline) to interpret an opaque
/// [`Self::Response`], and to convert any error caught along the way into the domain
/// [`Self::Failure`].
///
/// Implement this trait directly to customise parsing for an API, or construct a
/// [`FnParser`](func::FnParser) from three closures. The pipeline behaves identically for both.
pub trait ResponseParser {
    /// Response produced by the request action, only ever interpreted by this parser.
    type Response;

    /// Domain failure returned by pipeline operations that did not succeed.
    type Failure;

    /// Extract the [`RawPayload`] from a healthy [`Self::Response`].
    ///
    /// Never called for a response [`detect_failure`](Self::detect_failure) reported a
    /// [`Self::Failure`] for.
    fn extract_data(&self, response: &Self::Response) -> Result<RawPayload, BoxError>;

    /// Inspect the [`Self::Response`] for an embedded API failure, returning `None` if the
    /// response is healthy.
    fn detect_failure(
        &self,
        response: &Self::Response,
    ) -> Result<Option<Self::Failure>, BoxError>;

    /// Convert a [`ParseError`] caught by the pipeline into a [`Self::Failure`].
    ///
    /// Called at most once per pipeline operation.
    fn catch_error(&self, error: ParseError, context: ErrorContext) -> Self::Failure;
}

impl<Parser> ResponseParser for &Parser
where
    Parser: ResponseParser + ?Sized,
{
    type Response = Parser::Response;
    type Failure = Parser::Failure;

    fn extract_data(&self, response: &Self::Response) -> Result<RawPayload, BoxError> {
        (**self).extract_data(response)
    }

    fn detect_failure(
        &self,
        response: &Self::Response,
    ) -> Result<Option<Self::Failure>, BoxError> {
        (**self).detect_failure(response)
    }

    fn catch_error(&self, error: ParseError, context: ErrorContext) -> Self::Failure {
        (**self).catch_error(error, context)
    }
}

impl<Parser> ResponseParser for Box<Parser>
where
    Parser: ResponseParser + ?Sized,
{
    type Response = Parser::Response;
    type Failure = Parser::Failure;

    fn extract_data(&self, response: &Self::Response) -> Result<RawPayload, BoxError> {
        (**self).extract_data(response)
    }

    fn detect_failure(
        &self,
        response: &Self::Response,
    ) -> Result<Option<Self::Failure>, BoxError> {
        (**self).detect_failure(response)
    }

    fn catch_error(&self, error: ParseError, context: ErrorContext) -> Self::Failure {
        (**self).catch_error(error, context)
    }
}

impl<Parser> ResponseParser for Arc<Parser>
where
    Parser: ResponseParser + ?Sized,
{
    type Response = Parser::Response;
    type Failure = Parser::Failure;

    fn extract_data(&self, response: &Self::Response) -> Result<RawPayload, BoxError> {
        (**self).extract_data(response)
    }

    fn detect_failure(
        &self,
        response: &Self::Response,
    ) -> Result<Option<Self::Failure>, BoxError> {
        (**self).detect_failure(response)
    }

    fn catch_error(&self, error: ParseError, context: ErrorContext) -> Self::Failure {
        (**self).catch_error(error, context)
    }
}
