//! Assembly of signed requests.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use url::form_urlencoded;

use crate::error::{ZypCredsError, ZypCredsResult};
use crate::params::{ParameterSet, ACCOUNT_ID_FIELD, TRANSPORT_ONLY_FIELDS};
use crate::response::ContentType;
use crate::signer::sign_params;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The verbs the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Parameters travel in the query string.
    Get,
    /// Parameters travel in a form-encoded body.
    Post,
    /// Parameters travel in a form-encoded body.
    Put,
    /// Parameters travel in a form-encoded body.
    Delete,
}

impl Verb {
    /// The HTTP method for this verb.
    #[must_use]
    pub const fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    const fn uses_body(self) -> bool {
        !matches!(self, Self::Get)
    }
}

/// Inputs for [`build_request`] beyond the business parameters.
#[derive(Clone, Copy)]
pub struct RequestContext<'a> {
    /// Value injected as [`ACCOUNT_ID_FIELD`].
    pub account_id: &'a str,
    /// Signing key.
    pub secret: &'a str,
    /// Format requested through the `Accept` header.
    pub content_type: ContentType,
    /// Timeout applied to the request.
    pub timeout: Duration,
}

/// A fully signed request, ready for a [`crate::Transport`].
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: Method,
    /// Target URL, including the query string for GET requests.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Form-encoded body, absent for GET requests.
    pub body: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// The signed parameters, in wire order.
    pub params: ParameterSet,
}

impl PreparedRequest {
    /// The target URL without its query string, for logs and error messages.
    #[must_use]
    pub fn endpoint(&self) -> String {
        let mut url = self.url.clone();
        url.set_query(None);
        url.to_string()
    }
}

/// Injects the account id, signs, and encodes `params` for `endpoint` according to `verb`.
///
/// # Errors
///
/// Returns [`ZypCredsError::Configuration`] if `endpoint` is not a valid absolute URL.
pub fn build_request(
    mut params: ParameterSet,
    endpoint: &str,
    verb: Verb,
    context: &RequestContext<'_>,
) -> ZypCredsResult<PreparedRequest> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| ZypCredsError::configuration(format!("invalid endpoint {endpoint}: {e}")))?;

    params.insert(ACCOUNT_ID_FIELD, context.account_id);
    sign_params(&mut params, context.secret);
    for field in TRANSPORT_ONLY_FIELDS {
        params.remove(field);
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(context.content_type.accept_header()),
    );

    let body = if verb.uses_body() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        Some(
            form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params.iter())
                .finish(),
        )
    } else {
        url.query_pairs_mut().extend_pairs(params.iter());
        None
    };

    Ok(PreparedRequest {
        method: verb.method(),
        url,
        headers,
        body,
        timeout: context.timeout,
        params,
    })
}
