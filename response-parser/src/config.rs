use serde::{Deserialize, Serialize};

/// Behavioural configuration for a [`ParsePipeline`](crate::pipeline::ParsePipeline).
///
/// Deserialisable so it can be embedded in a host application's configuration, where missing
/// fields fall back to their [`Default`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Catch panics raised by the request action, parser or mapper and funnel them through
    /// [`ResponseParser::catch_error`](crate::parser::ResponseParser::catch_error).
    ///
    /// When disabled a panic unwinds through the pipeline operation.
    pub catch_panics: bool,

    /// Capture a [`Backtrace`](std::backtrace::Backtrace) for the
    /// [`ErrorContext`](crate::error::ErrorContext) of every caught error.
    pub capture_backtrace: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            catch_panics: true,
            capture_backtrace: true,
        }
    }
}

impl PipelineConfig {
    pub fn with_catch_panics(self, catch_panics: bool) -> Self {
        Self {
            catch_panics,
            ..self
        }
    }

    pub fn with_capture_backtrace(self, capture_backtrace: bool) -> Self {
        Self {
            capture_backtrace,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_de_pipeline_config() {
        struct TestCase {
            input: &'static str,
            expected: Result<PipelineConfig, serde_json::Error>,
        }

        let cases = vec![
            TestCase {
                // TC0: empty config uses defaults
                input: r#"{}"#,
                expected: Ok(PipelineConfig::default()),
            },
            TestCase {
                // TC1: partial config
                input: r#"{ "capture_backtrace": false }"#,
                expected: Ok(PipelineConfig {
                    catch_panics: true,
                    capture_backtrace: false,
                }),
            },
            TestCase {
                // TC2: full config
                input: r#"{ "catch_panics": false, "capture_backtrace": false }"#,
                expected: Ok(PipelineConfig {
                    catch_panics: false,
                    capture_backtrace: false,
                }),
            },
            TestCase {
                // TC3: invalid field type
                input: r#"{ "catch_panics": "yes" }"#,
                expected: Err(<serde_json::Error as serde::de::Error>::custom("")),
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let actual = serde_json::from_str::<PipelineConfig>(test.input);

            match (actual, test.expected) {
                (Ok(actual), Ok(expected)) => {
                    assert_eq!(actual, expected, "TC{index} failed")
                }
                (Err(_), Err(_)) => {
                    // Test passed
                }
                (actual, expected) => {
                    // Test failed
                    panic!(
                        "TC{index} failed because actual != expected. \nActual: {actual:?}\nExpected: {expected:?}\n"
                    );
                }
            }
        }
    }

    #[test]
    fn test_pipeline_config_builders() {
        let config = PipelineConfig::default()
            .with_catch_panics(false)
            .with_capture_backtrace(false);

        assert!(!config.catch_panics);
        assert!(!config.capture_backtrace);
    }
}
