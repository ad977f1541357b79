use crate::{
    error::{BoxError, ErrorContext, ParseError},
    parser::ResponseParser,
    payload::RawPayload,
};
use std::marker::PhantomData;

/// [`ResponseParser`] composed of three closures bound at construction.
///
/// ### Notes
/// Holds no mutable state, so a single [`FnParser`] can be shared by any number of concurrent
/// pipeline operations as long as the closures are `Send + Sync`.
pub struct FnParser<Response, Failure, Extract, Detect, Catch> {
    extract: Extract,
    detect: Detect,
    catch: Catch,
    phantom: PhantomData<fn(&Response) -> Failure>,
}

impl<Response, Failure, Extract, Detect, Catch> FnParser<Response, Failure, Extract, Detect, Catch>
where
    Extract: Fn(&Response) -> Result<RawPayload, BoxError>,
    Detect: Fn(&Response) -> Result<Option<Failure>, BoxError>,
    Catch: Fn(ParseError, ErrorContext) -> Failure,
{
    /// Construct a new [`Self`] from the provided `extract_data`, `detect_failure` and
    /// `catch_error` functions.
    pub fn new(extract: Extract, detect: Detect, catch: Catch) -> Self {
        Self {
            extract,
            detect,
            catch,
            phantom: PhantomData,
        }
    }
}

impl<Response, Failure, Extract, Detect, Catch> ResponseParser
    for FnParser<Response, Failure, Extract, Detect, Catch>
where
    Extract: Fn(&Response) -> Result<RawPayload, BoxError>,
    Detect: Fn(&Response) -> Result<Option<Failure>, BoxError>,
    Catch: Fn(ParseError, ErrorContext) -> Failure,
{
    type Response = Response;
    type Failure = Failure;

    fn extract_data(&self, response: &Self::Response) -> Result<RawPayload, BoxError> {
        (self.extract)(response)
    }

    fn detect_failure(
        &self,
        response: &Self::Response,
    ) -> Result<Option<Self::Failure>, BoxError> {
        (self.detect)(response)
    }

    fn catch_error(&self, error: ParseError, context: ErrorContext) -> Self::Failure {
        (self.catch)(error, context)
    }
}

impl<Response, Failure, Extract, Detect, Catch> Clone
    for FnParser<Response, Failure, Extract, Detect, Catch>
where
    Extract: Clone,
    Detect: Clone,
    Catch: Clone,
{
    fn clone(&self) -> Self {
        Self {
            extract: self.extract.clone(),
            detect: self.detect.clone(),
            catch: self.catch.clone(),
            phantom: PhantomData,
        }
    }
}

impl<Response, Failure, Extract, Detect, Catch> std::fmt::Debug
    for FnParser<Response, Failure, Extract, Detect, Catch>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnParser")
            .field("response", &std::any::type_name::<Response>())
            .field("failure", &std::any::type_name::<Failure>())
            .finish_non_exhaustive()
    }
}
