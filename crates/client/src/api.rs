//! REST client for the like endpoints.

use booksummary_core::interaction::WorkCounters;
use booksummary_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ClientError;

/// Like state of the caller plus the work's counters, as returned by
/// `GET|POST|DELETE /api/v1/works/{id}/like`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LikeStatus {
    pub work_id: DbId,
    pub liked: bool,
    pub like_count: i64,
    pub view_count: i64,
}

impl LikeStatus {
    pub fn counters(&self) -> WorkCounters {
        WorkCounters {
            work_id: self.work_id,
            view_count: self.view_count,
            like_count: self.like_count,
        }
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    login_url: Option<String>,
}

/// HTTP client for one API server.
pub struct BookSummaryApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BookSummaryApi {
    /// * `base_url` - server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Send `Authorization: Bearer {token}` on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// WebSocket endpoint on the same server.
    pub fn ws_url(&self) -> String {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.base_url.clone()
        };
        format!("{ws_base}/api/v1/ws")
    }

    /// Current like state and counters. Anonymous callers get `liked: false`.
    pub async fn like_status(&self, work_id: DbId) -> Result<LikeStatus, ClientError> {
        let response = self
            .authorized(self.client.get(self.like_url(work_id)))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    /// Like a work. Liking twice leaves the count unchanged.
    pub async fn like(&self, work_id: DbId) -> Result<LikeStatus, ClientError> {
        let response = self
            .authorized(self.client.post(self.like_url(work_id)))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn unlike(&self, work_id: DbId) -> Result<LikeStatus, ClientError> {
        let response = self
            .authorized(self.client.delete(self.like_url(work_id)))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    fn like_url(&self, work_id: DbId) -> String {
        format!("{}/api/v1/works/{work_id}/like", self.base_url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn parse_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_status(status.as_u16(), body))
    }
}

/// Map a non-2xx response to a [`ClientError`]. 401 is surfaced as
/// [`ClientError::LoginRequired`] so callers can redirect.
fn error_from_status(status: u16, body: String) -> ClientError {
    if status == 401 {
        let login_url = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.login_url);
        return ClientError::LoginRequired { login_url };
    }
    ClientError::Api { status, body }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn ws_url_follows_scheme() {
        assert_eq!(
            BookSummaryApi::new("http://localhost:3000/").ws_url(),
            "ws://localhost:3000/api/v1/ws"
        );
        assert_eq!(
            BookSummaryApi::new("https://books.example.com").ws_url(),
            "wss://books.example.com/api/v1/ws"
        );
    }

    #[test]
    fn unauthorized_carries_login_url() {
        let err = error_from_status(
            401,
            r#"{"error":"로그인이 필요합니다.","code":"UNAUTHORIZED","login_url":"/login"}"#.into(),
        );
        assert_matches!(err, ClientError::LoginRequired { login_url: Some(u) } if u == "/login");
    }

    #[test]
    fn other_statuses_keep_body() {
        let err = error_from_status(404, "missing".into());
        assert_matches!(err, ClientError::Api { status: 404, body } if body == "missing");
    }

    #[test]
    fn like_status_parses_data_envelope() {
        let json = r#"{"data":{"work_id":5,"liked":true,"like_count":3,"view_count":40}}"#;
        let envelope: Envelope<LikeStatus> = serde_json::from_str(json).unwrap();
        assert!(envelope.data.liked);
        assert_eq!(envelope.data.counters().like_count, 3);
        assert_eq!(envelope.data.counters().view_count, 40);
    }
}
