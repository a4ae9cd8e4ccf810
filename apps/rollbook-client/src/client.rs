//! # Rollbook HTTP Client
//!
//! Wrapper around the Rollbook REST API.
//!
//! Every call goes through one fetch path: send, then either decode the
//! JSON body of a 2xx response or turn anything else into
//! `ClientError::Api` carrying the server's `error` field (falling back to
//! the HTTP reason phrase).

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Default server URL.
pub const DEFAULT_URL: &str = "http://localhost:5000";

/// Errors from the HTTP client layer.
#[derive(Debug)]
pub enum ClientError {
    /// Cannot reach the Rollbook server.
    ConnectionFailed(String),
    /// Server answered with a non-2xx status.
    Api { status: u16, message: String },
    /// Failed to parse response body.
    ParseError(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(url) => write!(f, "Cannot connect to Rollbook at {url}"),
            Self::Api { status, message } => write!(f, "{message} (HTTP {status})"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// A student as returned by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Student {
    pub roll: u64,
    pub name: String,
    pub age: u32,
    pub branch: String,
    pub mark1: u8,
    pub mark2: u8,
    pub mark3: u8,
    pub mark4: u8,
    pub mark5: u8,
    pub percentage: f64,
    pub grade: String,
}

impl Student {
    /// Marks in field order.
    #[must_use]
    pub fn marks(&self) -> [u8; 5] {
        [self.mark1, self.mark2, self.mark3, self.mark4, self.mark5]
    }
}

/// Fields for a new student.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewStudent {
    pub roll: u64,
    pub name: String,
    pub age: u32,
    pub branch: String,
    pub mark1: i64,
    pub mark2: i64,
    pub mark3: i64,
    pub mark4: i64,
    pub mark5: i64,
}

/// Fields to change on an existing student. `None` fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StudentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark1: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark2: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark3: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark4: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark5: Option<i64>,
}

impl StudentUpdate {
    /// Set marks from a slot array; `None` slots are left out.
    #[must_use]
    pub fn with_marks(mut self, marks: [Option<i64>; 5]) -> Self {
        let [m1, m2, m3, m4, m5] = marks;
        self.mark1 = m1;
        self.mark2 = m2;
        self.mark3 = m3;
        self.mark4 = m4;
        self.mark5 = m5;
        self
    }
}

#[derive(Debug, Deserialize)]
struct CountBody {
    count: usize,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Outcome of loading the sample batch.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedSummary {
    pub message: String,
    pub added: usize,
    pub skipped: Vec<u64>,
}

/// Health check body.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client that wraps calls to the Rollbook REST API.
#[derive(Clone)]
pub struct RollbookClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RollbookClient {
    /// Create a new client pointing at the given Rollbook server URL.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Server base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request with optional Bearer auth.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    /// Send a request and decode a 2xx JSON body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }
        resp.json::<T>()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }

    /// GET /health
    pub async fn health(&self) -> Result<Health, ClientError> {
        self.fetch(self.request(Method::GET, "/health")).await
    }

    /// GET /api/students
    pub async fn list(&self) -> Result<Vec<Student>, ClientError> {
        self.fetch(self.request(Method::GET, "/api/students")).await
    }

    /// GET /api/students/sorted
    pub async fn sorted(&self) -> Result<Vec<Student>, ClientError> {
        self.fetch(self.request(Method::GET, "/api/students/sorted"))
            .await
    }

    /// GET /api/students/count
    pub async fn count(&self) -> Result<usize, ClientError> {
        let body: CountBody = self
            .fetch(self.request(Method::GET, "/api/students/count"))
            .await?;
        Ok(body.count)
    }

    /// GET /api/students/{roll}
    pub async fn get(&self, roll: u64) -> Result<Student, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/api/students/{roll}")))
            .await
    }

    /// POST /api/students
    pub async fn create(&self, student: &NewStudent) -> Result<Student, ClientError> {
        self.fetch(self.request(Method::POST, "/api/students").json(student))
            .await
    }

    /// PUT /api/students/{roll}
    pub async fn update(&self, roll: u64, update: &StudentUpdate) -> Result<Student, ClientError> {
        let path = format!("/api/students/{roll}");
        self.fetch(self.request(Method::PUT, &path).json(update))
            .await
    }

    /// DELETE /api/students/{roll} → confirmation message.
    pub async fn delete(&self, roll: u64) -> Result<String, ClientError> {
        let body: MessageBody = self
            .fetch(self.request(Method::DELETE, &format!("/api/students/{roll}")))
            .await?;
        Ok(body.message)
    }

    /// POST /api/students/dummy
    pub async fn seed(&self) -> Result<SeedSummary, ClientError> {
        self.fetch(self.request(Method::POST, "/api/students/dummy"))
            .await
    }
}

/// Build the error for a non-2xx response body.
pub fn api_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        });
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_is_preferred() {
        let err = api_error(
            StatusCode::CONFLICT,
            r#"{"error":"Student with roll number 1 already exists"}"#,
        );
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Student with roll number 1 already exists");
            }
            other => unreachable!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reason_phrase_is_the_fallback() {
        let err = api_error(StatusCode::BAD_GATEWAY, "<html>upstream down</html>");
        assert_eq!(err.to_string(), "Bad Gateway (HTTP 502)");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = RollbookClient::new("http://localhost:5000/", Some(String::new()));
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn update_skips_unset_fields() {
        let update = StudentUpdate {
            name: Some("Meera".to_string()),
            ..StudentUpdate::default()
        }
        .with_marks([None, Some(70), None, None, None]);

        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json, serde_json::json!({ "name": "Meera", "mark2": 70 }));
    }
}
