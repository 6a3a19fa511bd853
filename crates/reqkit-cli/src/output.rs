//! Output formatting for responses.

use serde::Serialize;
use serde_json::Value;
use std::io::Write;

use reqkit::Response;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

/// Trait for types that can be formatted for output
pub trait FormattedOutput {
    fn format_text(&self) -> String;
    fn format_json(&self) -> Result<String, serde_json::Error>;
}

/// A response prepared for printing
#[derive(Debug, Serialize)]
pub struct ResponseOutput {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<(String, String)>>,
    pub body: Value,
    #[serde(skip)]
    text: String,
}

impl ResponseOutput {
    /// Capture a response; headers are kept only when `include` is set,
    /// one entry per value so repeated headers survive
    pub fn new(response: &Response, include: bool) -> Self {
        let headers = include.then(|| {
            response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect()
        });
        let text = response.text().into_owned();
        let body = response
            .json::<Value>()
            .unwrap_or_else(|_| Value::String(text.clone()));

        Self {
            status: response.status_code(),
            headers,
            body,
            text,
        }
    }
}

impl FormattedOutput for ResponseOutput {
    fn format_text(&self) -> String {
        match &self.headers {
            Some(headers) => {
                let mut out = format!("HTTP {}\n", self.status);
                for (name, value) in headers {
                    out.push_str(&format!("{name}: {value}\n"));
                }
                out.push('\n');
                out.push_str(&self.text);
                out
            }
            None => self.text.clone(),
        }
    }

    fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Print formatted output to stdout
pub fn print_response<T: FormattedOutput>(ctx: &CommandContext, value: &T) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    write_output(ctx, value, stdout.lock())
}

/// Print formatted output to a writer
pub fn write_output<T, W>(ctx: &CommandContext, value: &T, mut writer: W) -> Result<(), CliError>
where
    T: FormattedOutput,
    W: Write,
{
    let output = match ctx.format {
        OutputFormat::Text => value.format_text(),
        OutputFormat::Json => value.format_json()?,
    };

    writeln!(writer, "{}", output)?;
    Ok(())
}
