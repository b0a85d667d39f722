use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl BoardClientError {
    /// Classifies a non-success response. The server's `{"error": ...}` body is preferred
    /// over the raw text when present.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            StatusCode::NOT_FOUND => BoardClientError::NotFound(message),
            StatusCode::BAD_REQUEST => BoardClientError::InvalidRequest(message),
            other => BoardClientError::Status {
                status: other.as_u16(),
                message,
            },
        }
    }

    pub(crate) async fn from_http_response(resp: reqwest::Response) -> Self {
        let status = resp.status();
        match resp.text().await {
            Ok(body) => Self::from_status(status, &body),
            Err(e) => BoardClientError::RequestError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_uses_server_message() {
        let err = BoardClientError::from_status(
            StatusCode::NOT_FOUND,
            r#"{"error":"post not found: 3","details":{"resource":3}}"#,
        );
        assert!(matches!(err, BoardClientError::NotFound(ref m) if m == "post not found: 3"));
    }

    #[test]
    fn bad_request_falls_back_to_raw_body() {
        let err = BoardClientError::from_status(StatusCode::BAD_REQUEST, "Json deserialize error\n");
        assert!(
            matches!(err, BoardClientError::InvalidRequest(ref m) if m == "Json deserialize error")
        );
    }

    #[test]
    fn other_statuses_keep_code() {
        let err = BoardClientError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"internal error"}"#,
        );
        assert_eq!(err.to_string(), "Server returned 500: internal error");
    }
}
