//! Blocking HTTP client for the task-lists API.
//!
//! # Design
//! `TasksApi` owns its `ClientConfig` and a private `ureq::Agent` built from
//! it; neither is mutated after `create`. Each operation is split into a
//! pure `build_*` method that produces an `HttpRequest` and a method that
//! builds and sends it. Credentials travel as the `key` and `access_token`
//! query parameters and are interpolated verbatim, without percent-encoding,
//! because the backend expects exactly that.
//!
//! Responses are never judged here: every status, timeout or connection
//! failure comes back as an `ApiResponse`. `Err` is reserved for a body
//! that could not be serialized before anything was sent.

use std::fmt;
use std::io::ErrorKind;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};
use ureq::http::Response;
use ureq::{Body, RequestBuilder};

use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::ApiError;
use crate::http::{ApiResponse, HttpMethod, HttpRequest, Problem};

/// Client for the five task-list operations.
///
/// Cloning shares the underlying agent; separately created clients share
/// nothing.
#[derive(Clone)]
pub struct TasksApi {
    config: ClientConfig,
    agent: ureq::Agent,
}

impl fmt::Debug for TasksApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TasksApi")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

impl TasksApi {
    /// Build a client from `config`.
    ///
    /// A non-empty `base_url` overrides `config.base_url`. If both are empty
    /// the default `http://localhost:4000/` is used. The URL is not
    /// validated here; a malformed one shows up as a failed `ApiResponse`
    /// on the first call.
    pub fn create(mut config: ClientConfig, base_url: Option<&str>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.is_empty()) {
            config.base_url = url.to_string();
        }
        if config.base_url.is_empty() {
            config.base_url = DEFAULT_BASE_URL.to_string();
        }

        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();

        Self { config, agent }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.config.headers
    }

    // -----------------------------------------------------------------------
    // Request building
    // -----------------------------------------------------------------------

    pub fn build_get_lists_of_tasks(&self, token: &str) -> HttpRequest {
        let path = format!("users/@me/lists/{}", self.credentials(token));
        self.request(HttpMethod::Get, path, None)
    }

    pub fn build_get_tasks_of_list(&self, list_id: &str, token: &str) -> HttpRequest {
        let path = format!("lists/{list_id}/tasks/{}", self.credentials(token));
        self.request(HttpMethod::Get, path, None)
    }

    pub fn build_update_task<B: Serialize + ?Sized>(
        &self,
        list_id: &str,
        task_id: &str,
        data: &B,
        token: &str,
    ) -> Result<HttpRequest, ApiError> {
        let path = format!("lists/{list_id}/tasks/{task_id}/{}", self.credentials(token));
        Ok(self.request(HttpMethod::Patch, path, Some(to_body(data)?)))
    }

    pub fn build_create_list<B: Serialize + ?Sized>(
        &self,
        data: &B,
        token: &str,
    ) -> Result<HttpRequest, ApiError> {
        let path = format!("users/@me/lists/{}", self.credentials(token));
        Ok(self.request(HttpMethod::Post, path, Some(to_body(data)?)))
    }

    pub fn build_create_task<B: Serialize + ?Sized>(
        &self,
        list_id: &str,
        data: &B,
        token: &str,
    ) -> Result<HttpRequest, ApiError> {
        let path = format!("lists/{list_id}/tasks/{}", self.credentials(token));
        Ok(self.request(HttpMethod::Post, path, Some(to_body(data)?)))
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    pub fn get_lists_of_tasks(&self, token: &str) -> ApiResponse {
        self.send(&self.build_get_lists_of_tasks(token))
    }

    pub fn get_tasks_of_list(&self, list_id: &str, token: &str) -> ApiResponse {
        self.send(&self.build_get_tasks_of_list(list_id, token))
    }

    pub fn update_task<B: Serialize + ?Sized>(
        &self,
        list_id: &str,
        task_id: &str,
        data: &B,
        token: &str,
    ) -> Result<ApiResponse, ApiError> {
        let req = self.build_update_task(list_id, task_id, data, token)?;
        Ok(self.send(&req))
    }

    pub fn create_list<B: Serialize + ?Sized>(
        &self,
        data: &B,
        token: &str,
    ) -> Result<ApiResponse, ApiError> {
        let req = self.build_create_list(data, token)?;
        Ok(self.send(&req))
    }

    pub fn create_task<B: Serialize + ?Sized>(
        &self,
        list_id: &str,
        data: &B,
        token: &str,
    ) -> Result<ApiResponse, ApiError> {
        let req = self.build_create_task(list_id, data, token)?;
        Ok(self.send(&req))
    }

    /// Execute a built request and wrap whatever happened in an `ApiResponse`.
    ///
    /// A GET request is sent without a body even if `req.body` is set.
    pub fn send(&self, req: &HttpRequest) -> ApiResponse {
        let route = req.path.split('?').next().unwrap_or_default();
        debug!(method = req.method.as_str(), path = route, "sending request");

        let started = Instant::now();
        let response = match self.execute(req) {
            Ok(mut response) => {
                let status = response.status().as_u16();
                let headers = response
                    .headers()
                    .iter()
                    .map(|(k, v)| {
                        (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned())
                    })
                    .collect();
                // No size limit; invalid UTF-8 is decoded lossily.
                match response.body_mut().with_config().limit(u64::MAX).read_to_vec() {
                    Ok(bytes) => {
                        let body = String::from_utf8_lossy(&bytes).into_owned();
                        ApiResponse::received(status, headers, body, started.elapsed())
                    }
                    Err(e) => ApiResponse::interrupted(
                        status,
                        headers,
                        problem_of(&e),
                        e.to_string(),
                        started.elapsed(),
                    ),
                }
            }
            Err(e) => ApiResponse::failed(problem_of(&e), e.to_string(), started.elapsed()),
        };

        debug!(
            method = req.method.as_str(),
            path = route,
            status = ?response.status,
            problem = ?response.problem,
            elapsed_ms = response.duration.as_millis() as u64,
            "request finished"
        );
        response
    }

    fn execute(&self, req: &HttpRequest) -> Result<Response<Body>, ureq::Error> {
        let url = req.url.as_str();
        match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, None) => with_headers(self.agent.get(url), &req.headers).call(),
            (HttpMethod::Get, Some(_)) => {
                let route = req.path.split('?').next().unwrap_or_default();
                warn!(path = route, "dropping body on GET request");
                with_headers(self.agent.get(url), &req.headers).call()
            }
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), &req.headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), &req.headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                with_headers(self.agent.patch(url), &req.headers).send(body.as_bytes())
            }
            (HttpMethod::Patch, None) => {
                with_headers(self.agent.patch(url), &req.headers).send_empty()
            }
        }
    }

    fn credentials(&self, token: &str) -> String {
        format!("?key={}&access_token={token}", self.config.api_key)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        for (name, value) in &self.config.headers {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }

        HttpRequest {
            method,
            url: join_url(&self.config.base_url, &path),
            path,
            headers,
            body,
        }
    }
}

/// Join a base URL and a relative path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn to_body<B: Serialize + ?Sized>(data: &B) -> Result<String, ApiError> {
    serde_json::to_string(data).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn with_headers<B>(
    mut builder: RequestBuilder<B>,
    headers: &[(String, String)],
) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn problem_of(err: &ureq::Error) -> Problem {
    match err {
        ureq::Error::Timeout(_) => Problem::TimeoutError,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => Problem::ConnectionError,
        ureq::Error::Io(e) => match e.kind() {
            ErrorKind::TimedOut => Problem::TimeoutError,
            ErrorKind::ConnectionRefused | ErrorKind::AddrNotAvailable => {
                Problem::ConnectionError
            }
            _ => Problem::NetworkError,
        },
        _ => Problem::NetworkError,
    }
}
