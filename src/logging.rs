//! Tracing setup with secret redaction.
//!
//! Every log line passes through [`Redactor`] before it reaches stderr so
//! bot tokens and API keys never end up in logs.

use regex::Regex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Regex patterns for redacting sensitive data
pub struct Redactor {
    rules: Vec<(Regex, &'static str)>,
}

impl Redactor {
    /// Compile the redaction rules
    ///
    /// # Errors
    ///
    /// Returns an error if any regex pattern is invalid
    pub fn new() -> Result<Self, regex::Error> {
        let rules = vec![
            // Bot API URLs: https://api.telegram.org/bot<token>/method
            (
                Regex::new(r"(https?://[^/]+/bot)([0-9]+:[A-Za-z0-9_-]+)")?,
                "$1[TELEGRAM_TOKEN]",
            ),
            (
                Regex::new(r"[0-9]{8,10}:[A-Za-z0-9_-]{35}")?,
                "[TELEGRAM_TOKEN]",
            ),
            (Regex::new(r"sk-or-v1-[A-Za-z0-9]+")?, "[OPENROUTER_KEY]"),
            (Regex::new(r"Bearer [A-Za-z0-9._-]+")?, "Bearer [MASKED]"),
        ];
        Ok(Self { rules })
    }

    /// Masks every secret found in `input`
    #[must_use]
    pub fn redact(&self, input: &str) -> String {
        self.rules
            .iter()
            .fold(input.to_string(), |acc, (re, replacement)| {
                re.replace_all(&acc, *replacement).into_owned()
            })
    }
}

struct RedactingWriter<W: Write> {
    inner: W,
    redactor: Arc<Redactor>,
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        self.inner.write_all(self.redactor.redact(&s).as_bytes())?;
        // Report the original length; the redacted text may differ in size
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct RedactingMakeWriter<F> {
    make_inner: F,
    redactor: Arc<Redactor>,
}

impl<'a, F, W> tracing_subscriber::fmt::MakeWriter<'a> for RedactingMakeWriter<F>
where
    F: Fn() -> W + 'static,
    W: Write,
{
    type Writer = RedactingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: (self.make_inner)(),
            redactor: self.redactor.clone(),
        }
    }
}

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_logging(redactor: Arc<Redactor>) {
    let make_writer = RedactingMakeWriter {
        make_inner: io::stderr,
        redactor,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_telegram_url_token() -> Result<(), regex::Error> {
        let redactor = Redactor::new()?;
        let line = "POST https://api.telegram.org/bot123456789:AAEhBOweik6ad9r_QXMENQjcrGbqCr4K-ts/sendMessage";
        let out = redactor.redact(line);
        assert!(out.contains("/bot[TELEGRAM_TOKEN]/sendMessage"));
        assert!(!out.contains("AAEhBOweik6ad9r"));
        Ok(())
    }

    #[test]
    fn test_redacts_openrouter_key() -> Result<(), regex::Error> {
        let redactor = Redactor::new()?;
        let out = redactor.redact("key=sk-or-v1-abc123DEF and Bearer sk-or-v1-zzz");
        assert!(!out.contains("abc123DEF"));
        assert!(!out.contains("zzz"));
        Ok(())
    }

    #[test]
    fn test_plain_text_untouched() -> Result<(), regex::Error> {
        let redactor = Redactor::new()?;
        let line = "Translation delivered user_id=42 attempt=1";
        assert_eq!(redactor.redact(line), line);
        Ok(())
    }
}
