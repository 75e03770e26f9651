//! HTTP client for the admin REST API.

use std::sync::Arc;

use reqwest::Method;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, instrument, trace, warn};

use claimdesk_core::error::{AuthError, Error, InvalidInputError, ProtocolError, ShapeError, TransportError};
use claimdesk_core::{AccessToken, BodyEncoding, CsrfToken, HttpMethod, Payload, ResourceSpec, Result, Route};

use crate::config::RestConfig;

/// Cookie set by the CSRF endpoint.
const XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Header carrying the (encrypted) cookie value.
const XSRF_HEADER: &str = "x-xsrf-token";

/// Header carrying a plain session token.
const CSRF_HEADER: &str = "x-csrf-token";

/// Error body shape for non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Map a reqwest error onto the transport taxonomy.
pub(crate) fn transport(err: reqwest::Error) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(err)
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn multipart(payload: &Payload) -> Result<Form> {
    let mut form = Form::new();
    for (key, value) in payload.form_fields() {
        form = form.text(key, value);
    }
    for attachment in payload.attachments() {
        let mut part = Part::bytes(attachment.bytes.clone()).file_name(attachment.file_name.clone());
        if let Some(content_type) = &attachment.content_type {
            part = part.mime_str(content_type).map_err(|e| InvalidInputError::Other {
                message: format!("invalid content type '{content_type}': {e}"),
            })?;
        }
        form = form.part(attachment.field.clone(), part);
    }
    Ok(form)
}

/// Extract and decode a named cookie from a `Cookie` header value.
fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key != name {
            return None;
        }
        url::form_urlencoded::parse(format!("v={value}").as_bytes())
            .next()
            .map(|(_, decoded)| decoded.into_owned())
    })
}

#[derive(Debug, Clone)]
enum CsrfHeader {
    /// Token taken from configuration.
    Plain(CsrfToken),
    /// Token read back from the CSRF cookie.
    Cookie(CsrfToken),
}

impl CsrfHeader {
    fn header(&self) -> (&'static str, &str) {
        match self {
            CsrfHeader::Plain(token) => (CSRF_HEADER, token.as_str()),
            CsrfHeader::Cookie(token) => (XSRF_HEADER, token.as_str()),
        }
    }
}

/// HTTP client with bearer authentication and lazy CSRF acquisition.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    jar: Arc<Jar>,
    config: Arc<RestConfig>,
    csrf: Arc<Mutex<Option<CsrfHeader>>>,
}

impl RestClient {
    /// Create a client for the configured API.
    pub fn new(config: RestConfig) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(transport)?;

        let csrf = config.csrf_token().cloned().map(CsrfHeader::Plain);

        Ok(Self {
            client,
            jar,
            config: Arc::new(config),
            csrf: Arc::new(Mutex::new(csrf)),
        })
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    /// Send a request for `route` and return the decoded JSON body.
    ///
    /// An empty success body decodes as `null`.
    #[instrument(skip(self, payload, token), fields(api = %self.config.api(), entity = spec.name))]
    pub async fn send(
        &self,
        spec: &ResourceSpec,
        route: Route<'_>,
        payload: Option<&Payload>,
        token: &AccessToken,
    ) -> Result<Value> {
        if token.is_empty() {
            return Err(AuthError::MissingToken.into());
        }

        let url = self.config.api().endpoint(&route.segments(spec));
        let method = to_method(route.method(spec));
        debug!(%method, %url, "REST request");

        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(token.as_str())
            .header(ACCEPT, "application/json");

        if route.is_mutating() {
            if let Some(csrf) = self.csrf_header().await? {
                let (name, value) = csrf.header();
                request = request.header(name, value);
            }
        }

        if let Some(payload) = payload {
            request = match spec.encoding {
                BodyEncoding::Json => request.json(&payload.to_json()),
                BodyEncoding::Multipart => request.multipart(multipart(payload)?),
            };
        }

        let response = request.send().await.map_err(transport)?;
        self.handle_response(response).await
    }

    /// The CSRF header for mutating requests, fetching the cookie once.
    async fn csrf_header(&self) -> Result<Option<CsrfHeader>> {
        let mut cached = self.csrf.lock().await;
        if let Some(csrf) = cached.as_ref() {
            return Ok(Some(csrf.clone()));
        }

        let Some(path) = self.config.csrf_path() else {
            return Ok(None);
        };

        let url = self.config.api().root_path(path);
        debug!(%url, "Fetching CSRF cookie");
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::CsrfUnavailable {
                reason: format!("{url} returned HTTP {}", status.as_u16()),
            }
            .into());
        }

        let token = self
            .jar
            .cookies(self.config.api().as_url())
            .and_then(|header| header.to_str().ok().and_then(|h| cookie_value(h, XSRF_COOKIE)))
            .ok_or_else(|| AuthError::CsrfUnavailable {
                reason: format!("no {XSRF_COOKIE} cookie issued by {url}"),
            })?;

        let csrf = CsrfHeader::Cookie(CsrfToken::new(token));
        *cached = Some(csrf.clone());
        Ok(Some(csrf))
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        trace!(status = %status, "REST response");

        let bytes = response.bytes().await.map_err(transport)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.message);
            let error = ProtocolError::new(status.as_u16(), message);
            if error.is_csrf_mismatch() {
                let mut cached = self.csrf.lock().await;
                // Configured tokens are kept; only a cookie token can be re-fetched.
                if matches!(cached.as_ref(), Some(CsrfHeader::Cookie(_))) {
                    warn!("CSRF token rejected, clearing cached cookie token");
                    cached.take();
                } else {
                    warn!("Configured CSRF token rejected");
                }
            }
            return Err(error.into());
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            ShapeError::Decode {
                message: e.to_string(),
            }
            .into()
        })
    }
}
