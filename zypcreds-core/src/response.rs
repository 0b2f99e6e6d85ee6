//! Normalization of service replies.
//!
//! The service answers in JSON or XML depending on the `Accept` header. Both
//! carry the same five branches (`params`, `index`, `token`, `result`, `error`),
//! as nested objects in JSON and as attributes on child elements in XML. Every
//! field is optional: a missing branch or key leaves the field unset and is
//! never an error. Empty strings count as unset.

use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumString};

use crate::error::{ZypCredsError, ZypCredsResult};

/// Top-level key wrapping JSON replies.
const JSON_ENVELOPE: &str = "zypcreds";

/// Response format, selected explicitly by configuration. The decoder never sniffs it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display, uniffi::Enum,
)]
#[strum(serialize_all = "lowercase")]
pub enum ContentType {
    /// `application/json`
    #[default]
    Json,
    /// `text/xml`
    Xml,
}

impl ContentType {
    /// Value of the `Accept` header requesting this format.
    #[must_use]
    pub const fn accept_header(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "text/xml",
        }
    }
}

/// Decoded outcome of any call.
///
/// A value with every field unset is the "no data" outcome; check
/// [`NormalizedResult::is_empty`] before trusting the fields. Service-side
/// failures show up here in `error_number`/`error_description`, not as errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct NormalizedResult {
    /// Index as received by the service.
    pub raw_index: Option<String>,
    /// Country as received by the service.
    pub raw_country: Option<String>,
    /// IP as received by the service.
    pub raw_ip: Option<String>,
    /// Canonical form of the index.
    pub prepped_index: Option<String>,
    /// Display form of the index.
    pub friendly_index: Option<String>,
    /// Session token.
    pub token: Option<String>,
    /// Session token expiration.
    pub token_expiration: Option<String>,
    /// `"1"` if the token is valid, `"0"` otherwise.
    pub token_valid: Option<String>,
    /// `"1"` if the operation succeeded, `"0"` otherwise.
    pub result_bool: Option<String>,
    /// Human readable outcome.
    pub result_desc: Option<String>,
    /// Service error number.
    pub error_number: Option<String>,
    /// Service error description.
    pub error_description: Option<String>,
}

impl NormalizedResult {
    /// Whether the reply carried no data at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// `result_bool` as a boolean, if it holds `"1"` or `"0"`.
    #[must_use]
    pub fn succeeded(&self) -> Option<bool> {
        parse_flag(self.result_bool.as_deref())
    }

    /// `token_valid` as a boolean, if it holds `"1"` or `"0"`.
    #[must_use]
    pub fn token_is_valid(&self) -> Option<bool> {
        parse_flag(self.token_valid.as_deref())
    }

    /// Builds a result by looking up each field as a `(branch, name)` pair.
    fn from_lookup(lookup: impl Fn(&str, &str) -> Option<String>) -> Self {
        let field = |branch: &str, name: &str| lookup(branch, name).filter(|v| !v.is_empty());
        Self {
            raw_index: field("params", "index"),
            raw_country: field("params", "country"),
            raw_ip: field("params", "ip"),
            prepped_index: field("index", "prepped"),
            friendly_index: field("index", "friendly"),
            token: field("token", "token"),
            token_expiration: field("token", "expiration"),
            token_valid: field("token", "bool"),
            result_bool: field("result", "bool"),
            result_desc: field("result", "description"),
            error_number: field("error", "number"),
            error_description: field("error", "description"),
        }
    }
}

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value? {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

/// Decodes `raw` as `content_type` into a [`NormalizedResult`].
///
/// Empty (or whitespace-only) input yields the "no data" result.
///
/// # Errors
///
/// Returns [`ZypCredsError::Decode`] if the bytes are not a well-formed document
/// of the declared type.
pub fn decode(raw: &[u8], content_type: ContentType) -> ZypCredsResult<NormalizedResult> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(NormalizedResult::default());
    }

    match content_type {
        ContentType::Json => decode_json(raw),
        ContentType::Xml => decode_xml(raw),
    }
}

/// Decodes a raw service reply fetched outside of [`crate::ZypCredsClient`].
///
/// # Errors
///
/// See [`decode`].
#[uniffi::export]
#[allow(clippy::needless_pass_by_value)]
pub fn decode_response(
    raw: Vec<u8>,
    content_type: ContentType,
) -> Result<NormalizedResult, ZypCredsError> {
    decode(&raw, content_type)
}

fn decode_error(content_type: ContentType, error: impl ToString) -> ZypCredsError {
    ZypCredsError::Decode {
        content_type: content_type.to_string(),
        error: error.to_string(),
    }
}

fn decode_json(raw: &[u8]) -> ZypCredsResult<NormalizedResult> {
    let document: Value =
        serde_json::from_slice(raw).map_err(|e| decode_error(ContentType::Json, e))?;

    let Value::Object(root) = &document else {
        return Err(decode_error(ContentType::Json, "expected a JSON object"));
    };
    let body = match root.get(JSON_ENVELOPE) {
        Some(Value::Object(inner)) => inner,
        _ => root,
    };

    Ok(NormalizedResult::from_lookup(|branch, name| {
        body.get(branch)
            .and_then(|b| b.get(name))
            .and_then(json_scalar)
    }))
}

fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn decode_xml(raw: &[u8]) -> ZypCredsResult<NormalizedResult> {
    let text = std::str::from_utf8(raw).map_err(|e| decode_error(ContentType::Xml, e))?;
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let document = roxmltree::Document::parse_with_options(text, options)
        .map_err(|e| decode_error(ContentType::Xml, e))?;
    let root = document.root_element();

    let branch = |name: &str| {
        root.children()
            .find(|node| node.is_element() && node.has_tag_name(name))
    };

    let mut result = NormalizedResult::from_lookup(|name, attribute| {
        branch(name)
            .and_then(|node| node.attribute(attribute))
            .map(str::to_string)
    });

    // Older replies put the description in the element body.
    if result.result_desc.is_none() {
        result.result_desc = branch("result")
            .and_then(|node| node.text())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
    }

    Ok(result)
}
