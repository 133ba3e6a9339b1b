//! Call builder - one documented HTTP request with its expected status

use std::fmt;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::doc::context::{pretty_print, DocContext, Exchange};
use crate::doc::field::{ApiType, TypeInfo};
use crate::doc::model::Header;
use crate::error::{Error, Result};
use crate::rest::context::Context;
use crate::rest::path::{header_values, prepare_request_path, substitute_version, Payload};

/// Request payload
#[derive(Clone, Debug)]
enum Body {
    Json(Payload),
    /// Sent verbatim instead of being serialized
    Text(String),
}

/// A single HTTP call
///
/// Errors raised while building are kept and returned by the terminal
/// `send*` method.
///
/// ```ignore
/// let user: User = Call::get("/{apiVersion}/users/{userId}")
///     .params(&UserIdParams { user_id })
///     .expect(200)
///     .send(&ctx, &mut dc)
///     .await?;
/// ```
#[derive(Debug)]
pub struct Call {
    method: Method,
    path: String,
    headers: Option<Payload>,
    params: Option<Payload>,
    body: Option<Body>,
    expected: u16,
    error: Option<Error>,
}

impl Call {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Call {
            method,
            path: path.into(),
            headers: None,
            params: None,
            body: None,
            expected: 200,
            error: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Call::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Call::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Call::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Call::new(Method::DELETE, path)
    }

    /// Request headers, taken from the string members of a struct
    pub fn headers<T: ApiType + Serialize + ?Sized>(mut self, headers: &T) -> Self {
        match Payload::of(headers) {
            Ok(payload) => self.headers = payload,
            Err(err) => self.fail(err),
        }
        self
    }

    /// Path and query parameters, taken from the members of a struct
    pub fn params<T: ApiType + Serialize + ?Sized>(mut self, params: &T) -> Self {
        match Payload::of(params) {
            Ok(payload) => self.params = payload,
            Err(err) => self.fail(err),
        }
        self
    }

    /// JSON request body
    pub fn body<T: ApiType + Serialize + ?Sized>(mut self, body: &T) -> Self {
        match Payload::of(body) {
            Ok(payload) => self.body = payload.map(Body::Json),
            Err(err) => self.fail(err),
        }
        self
    }

    /// Request body sent as given
    pub fn text_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Text(body.into()));
        self
    }

    /// Expected HTTP status code, 200 unless set
    pub fn expect(mut self, status: u16) -> Self {
        self.expected = status;
        self
    }

    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Sends the call and decodes the JSON response body into `R`
    pub async fn send<R>(self, ctx: &Context, dc: &mut DocContext) -> Result<R>
    where
        R: DeserializeOwned + ApiType,
    {
        let (exchange, body) = self.perform(ctx, Some(R::type_info()), true).await?;
        let result = serde_json::from_str(body.as_deref().unwrap_or_default())?;
        dc.record(&exchange)?;
        Ok(result)
    }

    /// Sends the call without reading the response body
    pub async fn send_empty(self, ctx: &Context, dc: &mut DocContext) -> Result<()> {
        let (exchange, _) = self.perform(ctx, None, false).await?;
        dc.record(&exchange)
    }

    /// Sends the call and returns the response body as plain text
    pub async fn send_text(self, ctx: &Context, dc: &mut DocContext) -> Result<String> {
        let (exchange, body) = self.perform(ctx, Some(String::type_info()), true).await?;
        dc.record(&exchange)?;
        Ok(body.unwrap_or_default())
    }

    async fn perform(
        self,
        ctx: &Context,
        result: Option<TypeInfo>,
        read_body: bool,
    ) -> Result<(Exchange, Option<String>)> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let path = substitute_version(&self.path, &ctx.version);
        let request_path = prepare_request_path(&self.path, &ctx.version, self.params.as_ref())?;
        let uri = format!("{}{}", ctx.url, request_path);
        display(ctx, &format!("===> {}", self.method), &uri);

        let request_body = match &self.body {
            None => None,
            Some(Body::Json(payload)) => Some(serde_json::to_string(&payload.value)?),
            Some(Body::Text(text)) => Some(text.clone()),
        };
        let sent_headers = self
            .headers
            .as_ref()
            .map(header_values)
            .transpose()?
            .unwrap_or_default();

        let mut req_builder = ctx.client().request(self.method.clone(), &uri);
        match &request_body {
            Some(body) => {
                display(ctx, "===> REQUEST PAYLOAD", &pretty_print(Some(body)));
                req_builder = req_builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(body.clone());
            }
            None => display(ctx, "===> REQUEST PAYLOAD", "(none)"),
        }
        for header in &sent_headers {
            req_builder = req_builder.header(&header.name, &header.value);
        }
        if let Some(value) = context_authorization(ctx, &sent_headers) {
            req_builder = req_builder.header(AUTHORIZATION, value);
        }

        let response = req_builder.send().await?;
        let status = response.status().as_u16();
        display(ctx, "<=== STATUS", &status.to_string());

        if status != self.expected {
            let body = failure_body(response.text().await);
            tracing::error!(
                method = %self.method,
                uri = %uri,
                expected = self.expected,
                actual = status,
                body = %body,
                "Unexpected status code"
            );
            return Err(Error::UnexpectedStatus {
                expected: self.expected,
                actual: status,
                body,
            });
        }

        let response_body = if read_body {
            let text = response.text().await?;
            display(ctx, "<=== RESPONSE BODY", &pretty_print(Some(&text)));
            Some(text)
        } else {
            None
        };

        let exchange = Exchange {
            method: self.method.as_str().to_string(),
            root_path: ctx.url.clone(),
            path,
            request_path,
            headers: self.headers.map(|p| p.info),
            header_values: sent_headers,
            params: self.params.map(|p| p.info),
            body: self.body.map(|body| match body {
                Body::Json(payload) => payload.info,
                Body::Text(_) => String::type_info(),
            }),
            result,
            request_body,
            response_body: response_body.clone(),
            status,
        };

        Ok((exchange, response_body))
    }
}

/// Authorization of the context, unless the headers struct already sends one
fn context_authorization(ctx: &Context, sent_headers: &[Header]) -> Option<String> {
    let supplied = sent_headers
        .iter()
        .any(|header| header.name.eq_ignore_ascii_case(AUTHORIZATION.as_str()));
    if supplied {
        return None;
    }
    ctx.auth.header_value()
}

/// Body of a rejected response, a failed read is kept as a note
fn failure_body<E: fmt::Display>(body: std::result::Result<String, E>) -> String {
    body.unwrap_or_else(|err| {
        tracing::warn!("Could not read response body: {}", err);
        format!("<unreadable response body: {}>", err)
    })
}

/// Logs one step of a call, at info level in verbose mode
fn display(ctx: &Context, label: &str, detail: &str) {
    if ctx.verbose {
        tracing::info!("{}:\n{}", label, detail);
    } else {
        tracing::debug!("{}:\n{}", label, detail);
    }
}
