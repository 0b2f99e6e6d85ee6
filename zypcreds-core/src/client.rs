use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::config::ClientConfig;
use crate::error::{ZypCredsError, ZypCredsResult};
use crate::params::{ParameterSet, FIELD_ORDER};
use crate::request::{build_request, RequestContext, Verb};
use crate::response::{decode, NormalizedResult};
use crate::transport::{HttpTransport, Transport};

/// The service endpoints, each configured in [`ClientConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Verify,
    Token,
    Whitelist,
    Blacklist,
}

/// Result of a single call: the normalized reply plus the bytes it came from.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct CallOutcome {
    /// The decoded reply.
    pub result: NormalizedResult,
    /// The raw response body.
    pub raw: Vec<u8>,
    /// HTTP status of the reply.
    pub status: u16,
    /// `false` when the reply carried no data; `result` is then entirely unset.
    pub has_data: bool,
}

/// Client for the ZypCreds REST API.
///
/// Each operation validates its inputs, signs a request, sends it, and returns
/// its own [`CallOutcome`]. The client keeps no per-call state, so one instance
/// can serve concurrent calls.
#[derive(uniffi::Object)]
pub struct ZypCredsClient {
    config: ClientConfig,
    secret: SecretString,
    transport: Arc<dyn Transport>,
}

#[uniffi::export]
impl ZypCredsClient {
    /// Creates a client that talks to the service over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`ZypCredsError::Configuration`] if the account id or the secret key
    /// is blank, or the HTTP client cannot be created.
    #[uniffi::constructor]
    pub fn new(config: ClientConfig) -> Result<Self, ZypCredsError> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout)?;
        Self::with_transport(config, Arc::new(transport))
    }
}

#[uniffi::export(async_runtime = "tokio")]
impl ZypCredsClient {
    /// Requests that a verification code be sent to `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ZypCredsError::Validation`] if `index` is blank, otherwise any
    /// transport or decode error.
    pub async fn request_verification(
        &self,
        index: &str,
        country: Option<String>,
        ip: Option<String>,
    ) -> Result<CallOutcome, ZypCredsError> {
        let index = required("index", index)?;
        let params = business_params(&[
            ("index", Some(index)),
            ("country", country.as_deref()),
            ("ip", ip.as_deref()),
        ]);
        self.call(Endpoint::Verify, Verb::Post, params).await
    }

    /// Checks whether `code` is the verification code sent to `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ZypCredsError::Validation`] if `index` or `code` is blank,
    /// otherwise any transport or decode error.
    pub async fn attempt_verification(
        &self,
        index: &str,
        code: &str,
        ip: Option<String>,
    ) -> Result<CallOutcome, ZypCredsError> {
        let index = required("index", index)?;
        let code = required("code", code)?;
        let params = business_params(&[
            ("index", Some(index)),
            ("code", Some(code)),
            ("ip", ip.as_deref()),
        ]);
        self.call(Endpoint::Verify, Verb::Put, params).await
    }

    /// Checks whether `token` is a valid session token for `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ZypCredsError::Validation`] if `index` or `token` is blank,
    /// otherwise any transport or decode error.
    pub async fn check_token(
        &self,
        index: &str,
        token: &str,
    ) -> Result<CallOutcome, ZypCredsError> {
        let index = required("index", index)?;
        let token = required("token", token)?;
        let params = business_params(&[("index", Some(index)), ("token", Some(token))]);
        self.call(Endpoint::Token, Verb::Get, params).await
    }

    /// Fetches the account's whitelist.
    ///
    /// # Errors
    ///
    /// Returns any transport or decode error.
    pub async fn get_whitelist(&self) -> Result<CallOutcome, ZypCredsError> {
        self.call(Endpoint::Whitelist, Verb::Get, ParameterSet::new())
            .await
    }

    /// Adds `index` to the account's whitelist.
    ///
    /// # Errors
    ///
    /// Returns [`ZypCredsError::Validation`] if `index` is blank, otherwise any
    /// transport or decode error.
    pub async fn add_to_whitelist(&self, index: &str) -> Result<CallOutcome, ZypCredsError> {
        self.index_call(Endpoint::Whitelist, Verb::Post, index).await
    }

    /// Removes `index` from the account's whitelist.
    ///
    /// # Errors
    ///
    /// Returns [`ZypCredsError::Validation`] if `index` is blank, otherwise any
    /// transport or decode error.
    pub async fn delete_from_whitelist(
        &self,
        index: &str,
    ) -> Result<CallOutcome, ZypCredsError> {
        self.index_call(Endpoint::Whitelist, Verb::Delete, index)
            .await
    }

    /// Fetches the account's blacklist.
    ///
    /// # Errors
    ///
    /// Returns any transport or decode error.
    pub async fn get_blacklist(&self) -> Result<CallOutcome, ZypCredsError> {
        self.call(Endpoint::Blacklist, Verb::Get, ParameterSet::new())
            .await
    }

    /// Adds `index` to the account's blacklist.
    ///
    /// # Errors
    ///
    /// Returns [`ZypCredsError::Validation`] if `index` is blank, otherwise any
    /// transport or decode error.
    pub async fn add_to_blacklist(&self, index: &str) -> Result<CallOutcome, ZypCredsError> {
        self.index_call(Endpoint::Blacklist, Verb::Post, index).await
    }

    /// Removes `index` from the account's blacklist.
    ///
    /// # Errors
    ///
    /// Returns [`ZypCredsError::Validation`] if `index` is blank, otherwise any
    /// transport or decode error.
    pub async fn delete_from_blacklist(
        &self,
        index: &str,
    ) -> Result<CallOutcome, ZypCredsError> {
        self.index_call(Endpoint::Blacklist, Verb::Delete, index)
            .await
    }
}

impl ZypCredsClient {
    /// Creates a client that sends its requests through `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`ZypCredsError::Configuration`] if the account id or the secret key is blank.
    pub fn with_transport(
        mut config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> ZypCredsResult<Self> {
        config.validate()?;
        let secret = SecretString::from(std::mem::take(&mut config.secret_key));
        Ok(Self {
            config,
            secret,
            transport,
        })
    }

    /// The configuration in use. The secret key is not retained here.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint_uri(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Verify => &self.config.verify_uri,
            Endpoint::Token => &self.config.token_uri,
            Endpoint::Whitelist => &self.config.whitelist_uri,
            Endpoint::Blacklist => &self.config.blacklist_uri,
        }
    }

    async fn index_call(
        &self,
        endpoint: Endpoint,
        verb: Verb,
        index: &str,
    ) -> ZypCredsResult<CallOutcome> {
        let index = required("index", index)?;
        let params = business_params(&[("index", Some(index))]);
        self.call(endpoint, verb, params).await
    }

    async fn call(
        &self,
        endpoint: Endpoint,
        verb: Verb,
        params: ParameterSet,
    ) -> ZypCredsResult<CallOutcome> {
        let context = RequestContext {
            account_id: &self.config.account_id,
            secret: self.secret.expose_secret(),
            content_type: self.config.content_type,
            timeout: self.config.timeout,
        };
        let request = build_request(params, self.endpoint_uri(endpoint), verb, &context)?;
        let method = request.method.clone();
        let url = request.endpoint();

        log::debug!("{method} {url}");
        let response = self.transport.execute(request).await?;
        let is_success = (200..300).contains(&response.status);

        let result = match decode(&response.body, self.config.content_type) {
            Ok(result) if is_success || !result.is_empty() => result,
            Ok(_) => {
                return Err(ZypCredsError::Transport {
                    url,
                    status: Some(response.status),
                    error: "empty reply".to_string(),
                })
            }
            Err(err) if !is_success => {
                return Err(ZypCredsError::Transport {
                    url,
                    status: Some(response.status),
                    error: format!("unreadable reply: {err}"),
                })
            }
            Err(err) => return Err(err),
        };

        let has_data = !result.is_empty();
        if !has_data {
            log::warn!("{method} {url} returned no data");
        }

        Ok(CallOutcome {
            result,
            raw: response.body,
            status: response.status,
            has_data,
        })
    }
}

/// Rejects blank required inputs before anything is sent.
fn required<'a>(field: &str, value: &'a str) -> ZypCredsResult<&'a str> {
    if value.trim().is_empty() {
        return Err(ZypCredsError::validation(field));
    }
    Ok(value)
}

/// Builds the business parameters in [`FIELD_ORDER`], dropping unset optional fields.
fn business_params(fields: &[(&str, Option<&str>)]) -> ParameterSet {
    let mut ordered = fields.to_vec();
    ordered.sort_by_key(|(name, _)| {
        FIELD_ORDER
            .iter()
            .position(|field| field == name)
            .unwrap_or(FIELD_ORDER.len())
    });

    let mut params = ParameterSet::new();
    for (name, value) in ordered {
        params.insert_opt(name, value);
    }
    params
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::Method;

    use super::*;
    use crate::request::PreparedRequest;
    use crate::response::ContentType;
    use crate::transport::RawResponse;

    /// Records every request and answers each with the same canned reply.
    struct RecordingTransport {
        reply: RawResponse,
        requests: Mutex<Vec<PreparedRequest>>,
    }

    impl RecordingTransport {
        fn new(status: u16, body: &[u8]) -> Arc<Self> {
            Arc::new(Self {
                reply: RawResponse {
                    status,
                    body: body.to_vec(),
                },
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<PreparedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn execute(&self, request: PreparedRequest) -> ZypCredsResult<RawResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(self.reply.clone())
        }
    }

    const OK_JSON: &[u8] = br#"{"zypcreds":{"result":{"bool":"1","description":"ok"}}}"#;

    fn client(transport: &Arc<RecordingTransport>) -> ZypCredsClient {
        let config = ClientConfig::new("acct-1", "s3cr3t");
        ZypCredsClient::with_transport(config, transport.clone()).unwrap()
    }

    fn param_pairs(request: &PreparedRequest) -> Vec<(String, String)> {
        request
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_rejects_missing_credentials() {
        let transport = RecordingTransport::new(200, OK_JSON);
        for (account_id, secret_key) in [("", "s3cr3t"), ("acct-1", "")] {
            let config = ClientConfig::new(account_id, secret_key);
            let result = ZypCredsClient::with_transport(config.clone(), transport.clone());
            assert!(matches!(result, Err(ZypCredsError::Configuration { .. })));
            assert!(matches!(
                ZypCredsClient::new(config),
                Err(ZypCredsError::Configuration { .. })
            ));
        }
    }

    #[test]
    fn test_secret_is_not_kept_in_config() {
        let transport = RecordingTransport::new(200, OK_JSON);
        let client = client(&transport);
        assert_eq!(client.config().secret_key, "");
        assert_eq!(client.config().account_id, "acct-1");
    }

    #[tokio::test]
    async fn test_attempt_verification_requires_code() {
        let transport = RecordingTransport::new(200, OK_JSON);
        let client = client(&transport);

        let err = client
            .attempt_verification("5551234567", "", Some("1.2.3.4".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, ZypCredsError::Validation { ref field } if field == "code"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_required_inputs_make_no_request() {
        let transport = RecordingTransport::new(200, OK_JSON);
        let client = client(&transport);

        let results = [
            client.request_verification(" ", None, None).await,
            client.attempt_verification("", "1234", None).await,
            client.check_token("5551234567", "").await,
            client.check_token("", "tok").await,
            client.add_to_whitelist("").await,
            client.delete_from_whitelist("").await,
            client.add_to_blacklist("").await,
            client.delete_from_blacklist("").await,
        ];

        for result in results {
            assert!(matches!(result, Err(ZypCredsError::Validation { .. })));
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_attempt_verification_request() {
        let transport = RecordingTransport::new(200, OK_JSON);
        let client = client(&transport);

        let outcome = client
            .attempt_verification("5551234567", "4242", Some("1.2.3.4".to_string()))
            .await
            .unwrap();

        assert!(outcome.has_data);
        assert_eq!(outcome.result.succeeded(), Some(true));
        assert_eq!(outcome.raw, OK_JSON);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].endpoint(), "https://api.zypcreds.com/verify/");
        assert_eq!(
            param_pairs(&requests[0]),
            vec![
                ("index".to_string(), "5551234567".to_string()),
                ("code".to_string(), "4242".to_string()),
                ("ip".to_string(), "1.2.3.4".to_string()),
                ("api_id".to_string(), "acct-1".to_string()),
                (
                    "hash".to_string(),
                    "b5d892b8a5fe4ea32ac7cb4ed8de8fa2a9497989".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_request_verification_orders_optional_fields() {
        let transport = RecordingTransport::new(200, OK_JSON);
        let client = client(&transport);

        client
            .request_verification("5551234567", Some("US".to_string()), Some(String::new()))
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::POST);
        let keys: Vec<_> = request.params.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["index", "country", "api_id", "hash"]);
    }

    #[tokio::test]
    async fn test_check_token_request() {
        let transport = RecordingTransport::new(200, OK_JSON);
        let client = client(&transport);

        client.check_token("5551234567", "abc123").await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.endpoint(), "https://api.zypcreds.com/token/");
        assert_eq!(
            request.params.get("hash"),
            Some("39c6a1dde40cdfb37025d09183875f33c2818488")
        );
    }

    #[tokio::test]
    async fn test_list_operations_use_expected_verbs() {
        let transport = RecordingTransport::new(200, OK_JSON);
        let client = client(&transport);

        client.get_whitelist().await.unwrap();
        client.add_to_whitelist("5551234567").await.unwrap();
        client.delete_from_whitelist("5551234567").await.unwrap();
        client.get_blacklist().await.unwrap();
        client.add_to_blacklist("5551234567").await.unwrap();
        client.delete_from_blacklist("5551234567").await.unwrap();

        let seen: Vec<_> = transport
            .requests()
            .iter()
            .map(|r| (r.method.clone(), r.endpoint()))
            .collect();
        let whitelist = "https://api.zypcreds.com/whitelist/".to_string();
        let blacklist = "https://api.zypcreds.com/blacklist/".to_string();
        assert_eq!(
            seen,
            vec![
                (Method::GET, whitelist.clone()),
                (Method::POST, whitelist.clone()),
                (Method::DELETE, whitelist),
                (Method::GET, blacklist.clone()),
                (Method::POST, blacklist.clone()),
                (Method::DELETE, blacklist),
            ]
        );

        let fetch = &transport.requests()[0];
        assert_eq!(
            fetch.params.get("hash"),
            Some("10e544bad542fe886688aab3b98ee2aee5ea86d0")
        );
    }

    #[tokio::test]
    async fn test_empty_reply_is_no_data() {
        let transport = RecordingTransport::new(200, b"");
        let client = client(&transport);

        let outcome = client.get_whitelist().await.unwrap();
        assert!(!outcome.has_data);
        assert!(outcome.result.is_empty());
    }

    #[tokio::test]
    async fn test_service_error_is_a_result() {
        let body = br#"{"zypcreds":{"result":{"bool":"0"},"error":{"number":"7","description":"Index blacklisted."}}}"#;
        let transport = RecordingTransport::new(400, body);
        let client = client(&transport);

        let outcome = client.request_verification("5551234567", None, None).await.unwrap();
        assert_eq!(outcome.status, 400);
        assert_eq!(outcome.result.succeeded(), Some(false));
        assert_eq!(outcome.result.error_number.as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn test_unreadable_error_reply_is_transport_error() {
        let transport = RecordingTransport::new(502, b"<html>Bad Gateway</html>");
        let client = client(&transport);

        let err = client.get_blacklist().await.unwrap_err();
        assert!(matches!(err, ZypCredsError::Transport { status: Some(502), .. }));
    }

    #[tokio::test]
    async fn test_empty_error_reply_is_transport_error() {
        let transport = RecordingTransport::new(503, b"");
        let client = client(&transport);

        let err = client.get_blacklist().await.unwrap_err();
        assert!(matches!(err, ZypCredsError::Transport { status: Some(503), .. }));
    }

    #[tokio::test]
    async fn test_malformed_success_reply_is_decode_error() {
        let transport = RecordingTransport::new(200, b"not json");
        let client = client(&transport);

        let err = client.get_whitelist().await.unwrap_err();
        assert!(matches!(err, ZypCredsError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_xml_client_sends_xml_accept_header() {
        let transport = RecordingTransport::new(200, br#"<zypcreds><result bool="1"/></zypcreds>"#);
        let config =
            ClientConfig::new("acct-1", "s3cr3t").with_content_type(ContentType::Xml);
        let client = ZypCredsClient::with_transport(config, transport.clone()).unwrap();

        let outcome = client.get_whitelist().await.unwrap();
        assert_eq!(outcome.result.succeeded(), Some(true));
        assert_eq!(transport.requests()[0].headers["accept"], "text/xml");
    }

    #[test]
    fn test_business_params_follow_declared_order() {
        let params = business_params(&[
            ("ip", Some("1.2.3.4")),
            ("index", Some("555")),
            ("country", None),
            ("code", Some("42")),
        ]);
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["index", "code", "ip"]);
    }
}
