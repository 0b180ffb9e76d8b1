//! # tagmark-engine
//!
//! The front door for callers: raw input in, a complete parse result out.
//! The engine applies the configured input limits and UTF-8 policy, runs the
//! scanner and the assembler from `tagmark-syntax`, and serializes and
//! measures the resulting tree.
//!
//! The output is canonical markdown, not HTML. Escaping it for display is
//! the caller's job.
//!
//! ```
//! use tagmark_engine::{Config, Engine};
//!
//! let engine = Engine::new(Config::default());
//! let parsed = engine.parse("**héllo** *world").unwrap();
//!
//! assert_eq!(parsed.output, "**héllo** \\*world");
//! assert_eq!(parsed.text_length, 12);
//! assert!(parsed.warnings.is_empty());
//! ```

use serde::Serialize;
use tagmark_syntax::{Ast, ScanOptions, Warning, parse_with};

pub use tagmark_config::{Config, ConfigError, InvalidUtf8Policy};

/// Reported in every [`Parsed`] result.
pub const NAME: &str = "tagmark";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Failures that stop a parse before it starts.
///
/// Malformed markup is never an error; it is reported through
/// [`Parsed::warnings`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Input is {len} bytes, the limit is {limit}")]
    InputTooLarge { len: usize, limit: usize },
    #[error("Input is not valid UTF-8 after byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },
}

/// Everything a caller gets back from one parse.
#[derive(Debug, Clone, Serialize)]
pub struct Parsed {
    pub name: &'static str,
    pub version: &'static str,
    /// Canonical markdown re-serialized from the tree.
    pub output: String,
    /// Unicode scalar values of the visible text.
    pub text_length: usize,
    pub warnings: Vec<Warning>,
    #[serde(skip)]
    pub ast: Ast,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: Config,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Engine configured from the default config file, or defaults when
    /// there is none.
    pub fn load() -> anyhow::Result<Self> {
        let config = Config::load_or_default()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn parse(&self, input: &str) -> Result<Parsed, EngineError> {
        self.check_len(input.len())?;
        Ok(self.run(input))
    }

    /// Decode `bytes` according to the UTF-8 policy, then parse.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Parsed, EngineError> {
        self.check_len(bytes.len())?;
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(self.run(text)),
            Err(e) => match self.config.invalid_utf8 {
                InvalidUtf8Policy::Reject => {
                    log::warn!("Rejecting input: invalid UTF-8 after byte {}", e.valid_up_to());
                    Err(EngineError::InvalidUtf8 {
                        valid_up_to: e.valid_up_to(),
                    })
                }
                InvalidUtf8Policy::Replace => {
                    log::warn!(
                        "Input has invalid UTF-8 after byte {}, replacing with U+FFFD",
                        e.valid_up_to()
                    );
                    let text = String::from_utf8_lossy(bytes);
                    Ok(self.run(&text))
                }
            },
        }
    }

    fn check_len(&self, len: usize) -> Result<(), EngineError> {
        let limit = self.config.max_input_bytes;
        if len > limit {
            return Err(EngineError::InputTooLarge { len, limit });
        }
        Ok(())
    }

    fn run(&self, input: &str) -> Parsed {
        let options = ScanOptions {
            bare_urls: self.config.bare_urls,
        };
        let parse = parse_with(input, &options);
        let root = parse.ast.root();
        let output = parse.ast.to_markdown(root);
        let text_length = parse.ast.text_len(root);

        log::debug!(
            "Parsed {} bytes: {} warnings, {} text length",
            input.len(),
            parse.warnings.len(),
            text_length
        );

        Parsed {
            name: NAME,
            version: VERSION,
            output,
            text_length,
            warnings: parse.warnings,
            ast: parse.ast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_check_len_boundary() {
        let engine = Engine::new(Config {
            max_input_bytes: 3,
            ..Config::default()
        });
        assert_eq!(engine.check_len(3), Ok(()));
        assert_eq!(
            engine.check_len(4),
            Err(EngineError::InputTooLarge { len: 4, limit: 3 })
        );
    }

    #[test]
    fn test_error_messages() {
        let err = EngineError::InputTooLarge { len: 10, limit: 5 };
        assert_eq!(err.to_string(), "Input is 10 bytes, the limit is 5");

        let err = EngineError::InvalidUtf8 { valid_up_to: 2 };
        assert_eq!(err.to_string(), "Input is not valid UTF-8 after byte 2");
    }

    #[test]
    fn test_bare_urls_follow_config() {
        let input = "see https://example.com";
        let plain = Engine::default().parse(input).unwrap();
        assert_eq!(plain.output, input);

        let linked = Engine::new(Config {
            bare_urls: true,
            ..Config::default()
        })
        .parse(input)
        .unwrap();
        assert_eq!(
            linked.output,
            "see [https://example.com](https://example.com)"
        );
    }
}
