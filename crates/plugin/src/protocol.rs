//! JSON-RPC framing between the launcher and the plugin.
//!
//! Requests arrive as a single JSON document; responses leave as a single
//! line of ASCII-only JSON on stdout.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use serde_json::Value;

use shelfcover_core::ResultItem;

/// Request used when neither stdin nor argv carry one.
pub const DEFAULT_REQUEST: &str = r#"{"method":"query","parameters":[""]}"#;

const QUERY_METHOD: &str = "query";

/// A launcher request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Request {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default = "default_parameters")]
    pub parameters: Vec<Value>,
}

fn default_method() -> String {
    QUERY_METHOD.to_string()
}

fn default_parameters() -> Vec<Value> {
    vec![Value::String(String::new())]
}

impl Request {
    /// Parse raw input. Blank input is an empty object.
    pub fn parse(input: &str) -> Result<Self, serde_json::Error> {
        let input = input.trim();
        if input.is_empty() {
            return serde_json::from_str("{}");
        }
        serde_json::from_str(input)
    }

    pub fn is_query(&self) -> bool {
        self.method == QUERY_METHOD
    }

    /// First parameter when it is a string.
    pub fn first_str(&self) -> Option<&str> {
        self.parameters.first().and_then(Value::as_str)
    }
}

/// Body of a response line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Items(Vec<ResultItem>),
    Message(String),
}

/// A response line: `{"result": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub result: Payload,
}

impl Response {
    pub fn items(items: Vec<ResultItem>) -> Self {
        Self {
            result: Payload::Items(items),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            result: Payload::Message(message.into()),
        }
    }

    /// Single item reporting a failure that aborted the request.
    pub fn error(message: &str, icon: &Path) -> Self {
        Self::items(vec![ResultItem::placeholder(
            "OpenLibrary Plugin Error",
            format!("Critical error: {}", message),
            icon,
        )])
    }

    /// Single item reporting that the response could not be encoded.
    pub fn encoding_error(message: &str) -> Self {
        Self::items(vec![ResultItem::placeholder(
            "Encoding Error",
            message.to_string(),
            Path::new(""),
        )])
    }
}

/// Escapes every non-ASCII character as `\uXXXX` (surrogate pairs above the BMP).
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize any value to compact ASCII-only JSON.
pub fn to_ascii_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, AsciiFormatter);
    value.serialize(&mut serializer)?;
    // Only ASCII bytes are ever written
    String::from_utf8(buf).map_err(|e| serde::ser::Error::custom(e.to_string()))
}

/// Encode a response as one output line, falling back to an encoding error item.
pub fn encode_line(response: &Response) -> String {
    match to_ascii_json(response) {
        Ok(line) => line,
        Err(e) => {
            tracing::error!("Failed to encode response: {}", e);
            to_ascii_json(&Response::encoding_error(&e.to_string())).unwrap_or_else(|_| {
                r#"{"result":[{"Title":"Encoding Error","SubTitle":"","IcoPath":""}]}"#
                    .to_string()
            })
        }
    }
}
