//! HTTP plumbing shared by the v2, v3 and log-cache clients.
//!
//! One request in, one [`Warned`] response body out. The connection attaches the bearer
//! token, pulls warnings out of every response (failed ones included), maps transport
//! failures and error statuses to [`CcError`], and logs each round-trip with `tracing`.

use super::ccerror::{v2_error, v3_error, CcError};
use crate::warnings::{Warned, Warnings};
use percent_encoding::percent_decode_str;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

pub const WARNINGS_HEADER: &str = "X-Cf-Warnings";

/// Which error envelope the server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFlavor {
    V2,
    V3,
}

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub skip_ssl_validation: bool,
    pub dial_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            skip_ssl_validation: false,
            dial_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::POST, path).body(body)
    }

    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::PUT, path).body(body)
    }

    /// A PUT with no body, as used by relationship endpoints.
    pub fn put_empty(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// An authenticated client bound to one API root.
#[derive(Debug, Clone)]
pub struct Connection {
    http: Client,
    base_url: String,
    token: Option<String>,
}

pub fn user_agent() -> String {
    format!(
        "cf/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::ARCH,
        std::env::consts::OS
    )
}

impl Connection {
    /// `token` is the full header value as stored in the config, e.g. `bearer eyJ...`.
    pub fn new(
        base_url: &str,
        token: Option<String>,
        config: &ConnectionConfig,
    ) -> Result<Self, CcError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(agent) = HeaderValue::from_str(&user_agent()) {
            headers.insert(USER_AGENT, agent);
        }

        let http = Client::builder()
            .default_headers(headers)
            .connect_timeout(config.dial_timeout)
            .danger_accept_invalid_certs(config.skip_ssl_validation)
            .build()
            .map_err(|e| CcError::Request {
                message: error_chain(&e),
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs (e.g. v3 pagination links) pass through untouched.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Sends `request` and returns the raw body of a successful response.
    pub fn make(&self, request: Request, flavor: ApiFlavor) -> Warned<String, CcError> {
        let url = self.url(&request.path);
        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, token);
        }
        if let Some(body) = &request.body {
            trace!(body = %body, "request body");
            builder = builder.json(body);
        }

        debug!(
            method = %request.method,
            url = %url,
            query = ?request.query,
            authorization = if self.token.is_some() { "[PRIVATE DATA HIDDEN]" } else { "" },
            "REQUEST"
        );
        let started = Instant::now();

        let response = match builder.send() {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %url, error = %e, "request failed");
                return Warned::err(transport_error(&url, &e), Warnings::new());
            }
        };

        let status = response.status().as_u16();
        let warnings = parse_warnings(
            response
                .headers()
                .get_all(WARNINGS_HEADER)
                .iter()
                .filter_map(|v| v.to_str().ok()),
        );
        let body = match response.text() {
            Ok(body) => body,
            Err(e) => return Warned::err(transport_error(&url, &e), warnings),
        };

        debug!(
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            warnings = warnings.len(),
            "RESPONSE"
        );
        trace!(body = %body, "response body");

        if status >= 400 {
            let error = match flavor {
                ApiFlavor::V2 => v2_error(status, &body),
                ApiFlavor::V3 => v3_error(status, &body),
            };
            return Warned::err(error, warnings);
        }
        Warned::ok(body, warnings)
    }

    /// Sends `request` and decodes the JSON body of a successful response.
    pub fn make_json<T: DeserializeOwned>(
        &self,
        request: Request,
        flavor: ApiFlavor,
    ) -> Warned<T, CcError> {
        let (result, warnings) = self.make(request, flavor).into_parts();
        Warned {
            result: result.and_then(|body| decode(&body)),
            warnings,
        }
    }
}

pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, CcError> {
    serde_json::from_str(body).map_err(|e| CcError::Json {
        message: e.to_string(),
    })
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn transport_error(url: &str, err: &reqwest::Error) -> CcError {
    let message = error_chain(err);
    if message.contains("UnknownIssuer")
        || message.contains("unknown authority")
        || message.contains("self signed")
        || message.contains("self-signed")
    {
        CcError::UnverifiedServer {
            url: url.to_string(),
        }
    } else if message.contains("NotValidForName") {
        CcError::SslValidationHostname { message }
    } else {
        CcError::Request { message }
    }
}

/// Collects warnings from every `X-Cf-Warnings` value: comma-split, query-unescaped,
/// trimmed, empties dropped.
pub fn parse_warnings<'a>(values: impl Iterator<Item = &'a str>) -> Warnings {
    let mut warnings = Warnings::new();
    for value in values {
        for part in value.split(',') {
            let warning = query_unescape(part);
            let warning = warning.trim();
            if !warning.is_empty() {
                warnings.push(warning);
            }
        }
    }
    warnings
}

/// Decodes `+` as space and `%XX` escapes; malformed escapes are kept literally.
pub fn query_unescape(raw: &str) -> String {
    percent_decode_str(&raw.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::serve;

    #[test]
    fn parses_and_unescapes_warnings() {
        let warnings = parse_warnings(["42,+Ed+McMann,+the+1942+doggers,a%2Cb"].into_iter());
        assert_eq!(
            warnings.as_strs(),
            vec!["42", "Ed McMann", "the 1942 doggers", "a,b"]
        );
    }

    #[test]
    fn concatenates_repeated_headers_in_order() {
        let warnings = parse_warnings(["first,second", "third"].into_iter());
        assert_eq!(warnings.as_strs(), vec!["first", "second", "third"]);
    }

    #[test]
    fn drops_empty_entries() {
        let warnings = parse_warnings([" , ,only"].into_iter());
        assert_eq!(warnings.as_strs(), vec!["only"]);
    }

    #[test]
    fn malformed_escape_is_literal() {
        assert_eq!(query_unescape("100%"), "100%");
        assert_eq!(query_unescape("%zz"), "%zz");
        assert_eq!(query_unescape("caf%C3%A9"), "café");
        assert_eq!(query_unescape("1%2B1+is+2"), "1+1 is 2");
        assert_eq!(query_unescape("%+1"), "% 1");
    }

    #[test]
    fn absolute_urls_pass_through() {
        let connection =
            Connection::new("https://api.example.com/", None, &ConnectionConfig::default())
                .unwrap();
        assert_eq!(
            connection.url("/v2/apps"),
            "https://api.example.com/v2/apps"
        );
        assert_eq!(
            connection.url("https://api.example.com/v3/apps?page=2"),
            "https://api.example.com/v3/apps?page=2"
        );
    }

    #[test]
    fn successful_response_carries_warnings_and_token() {
        let (base, server) = serve(vec![(200, "some+warning,other", r#"{"ok":true}"#)]);
        let connection = Connection::new(
            &base,
            Some("bearer some-token".into()),
            &ConnectionConfig::default(),
        )
        .unwrap();

        let out = connection.make_json::<serde_json::Value>(
            Request::get("/v2/info").query("q", "name:dora"),
            ApiFlavor::V2,
        );
        assert_eq!(out.warnings.as_strs(), vec!["some warning", "other"]);
        assert_eq!(out.result.unwrap()["ok"], true);

        let seen = server.join().unwrap();
        assert_eq!(seen[0].0, "/v2/info?q=name%3Adora");
        assert_eq!(seen[0].1, "bearer some-token");
    }

    #[test]
    fn failed_response_keeps_warnings() {
        let (base, server) = serve(vec![(
            404,
            "still+here",
            r#"{"code":100004,"description":"gone","error_code":"CF-AppNotFound"}"#,
        )]);
        let connection = Connection::new(&base, None, &ConnectionConfig::default()).unwrap();

        let out = connection.make(Request::get("/v2/apps/guid"), ApiFlavor::V2);
        assert_eq!(out.warnings.as_strs(), vec!["still here"]);
        assert!(out.result.unwrap_err().is_not_found());

        let seen = server.join().unwrap();
        assert_eq!(seen[0].1, "");
    }

    #[test]
    fn undecodable_body_is_a_json_error() {
        let (base, server) = serve(vec![(200, "", "not json")]);
        let connection = Connection::new(&base, None, &ConnectionConfig::default()).unwrap();

        let out = connection.make_json::<serde_json::Value>(Request::get("/"), ApiFlavor::V3);
        assert!(matches!(out.result, Err(CcError::Json { .. })));
        server.join().unwrap();
    }

    #[test]
    fn refused_connection_is_a_request_error() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let connection = Connection::new(
            &format!("http://127.0.0.1:{port}"),
            None,
            &ConnectionConfig::default(),
        )
        .unwrap();

        let out = connection.make(Request::get("/v2/info"), ApiFlavor::V2);
        assert!(matches!(out.result, Err(CcError::Request { .. })));
        assert!(out.warnings.is_empty());
    }
}
