//! Request executor: headers, form encoding, status mapping, and decoding.

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::auth::AuthProvider;
use crate::config::FastlyConfig;
use crate::errors::{FastlyError, FastlyResult};
use crate::observability::{log_request, log_response};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Executes API requests on behalf of the resource services.
///
/// Attaches authentication and the standard headers, sends through the
/// configured [`HttpTransport`], maps non-2xx responses to [`FastlyError`],
/// and decodes JSON bodies. It never retries.
pub struct RequestExecutor {
    config: FastlyConfig,
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl RequestExecutor {
    /// Creates a new request executor.
    pub fn new(
        config: FastlyConfig,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            config,
            transport,
            auth,
        }
    }

    /// Issues a GET and decodes the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> FastlyResult<T> {
        self.execute(HttpMethod::Get, path, None).await
    }

    /// Issues a POST with a form-encoded body and decodes the JSON response.
    pub async fn post_form<T, B>(&self, path: &str, body: &B) -> FastlyResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let form = serde_urlencoded::to_string(body)?;
        self.execute(HttpMethod::Post, path, Some(form)).await
    }

    /// Issues a PUT with a form-encoded body and decodes the JSON response.
    pub async fn put_form<T, B>(&self, path: &str, body: &B) -> FastlyResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let form = serde_urlencoded::to_string(body)?;
        self.execute(HttpMethod::Put, path, Some(form)).await
    }

    /// Issues a DELETE and decodes the JSON response.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> FastlyResult<T> {
        self.execute(HttpMethod::Delete, path, None).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        form: Option<String>,
    ) -> FastlyResult<T> {
        let request = self.build_request(method, path, form);
        log_request(method.as_str(), path, request.body.as_ref().map(Vec::len));

        let started = Instant::now();
        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(method = %method, path = path, error = %e, "Transport failure");
            FastlyError::from(e)
        })?;
        log_response(
            response.status,
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            &response.body,
        );

        Self::parse_response(method, path, &response)
    }

    fn build_request(&self, method: HttpMethod, path: &str, form: Option<String>) -> HttpRequest {
        let mut request = HttpRequest::new(method, path).with_timeout(self.config.timeout);

        for (name, value) in &self.config.custom_headers {
            request.headers.insert(name.clone(), value.clone());
        }
        request
            .headers
            .insert("User-Agent".to_string(), self.config.user_agent.clone());
        request
            .headers
            .insert("Accept".to_string(), JSON_CONTENT_TYPE.to_string());
        self.auth.apply_auth(&mut request.headers);

        if let Some(form) = form {
            request
                .headers
                .insert("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string());
            request.body = Some(form.into_bytes());
        }

        request
    }

    fn parse_response<T: DeserializeOwned>(
        method: HttpMethod,
        path: &str,
        response: &HttpResponse,
    ) -> FastlyResult<T> {
        if !response.is_success() {
            let request_id = response.header("x-request-id").map(String::from);
            let error = FastlyError::from_response(response.status, &response.body, request_id);
            tracing::warn!(
                method = %method,
                path = path,
                status = response.status,
                error = %error,
                "API returned an error response"
            );
            return Err(error);
        }

        serde_json::from_slice(&response.body).map_err(|e| FastlyError::Serialization {
            message: format!("Failed to parse response: {}", e),
        })
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("config", &self.config)
            .finish()
    }
}
