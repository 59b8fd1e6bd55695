use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Request rejected: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            400 | 422 => ApiError::BadRequest(truncated),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// True if `err` carries a 401 from the backend.
    pub fn is_unauthorized(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized))
    }

    /// Short message for the sign-in form.
    pub fn login_message(err: &anyhow::Error) -> String {
        match err.downcast_ref::<ApiError>() {
            Some(ApiError::Unauthorized) | Some(ApiError::BadRequest(_)) => {
                "Invalid username or password".to_string()
            }
            Some(ApiError::RateLimited) => "Too many attempts. Please wait.".to_string(),
            Some(ApiError::ServerError(_)) => "Server error. Please try again later.".to_string(),
            _ => {
                let text = format!("{:#}", err).to_lowercase();
                if text.contains("timed out") || text.contains("timeout") {
                    "Connection timed out. Please try again.".to_string()
                } else if text.contains("connect") {
                    "Unable to connect to server.".to_string()
                } else {
                    format!("Login failed: {}", err)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "no"),
            ApiError::AccessDenied(ref b) if b == "no"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, ""),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, ""),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let body = "é".repeat(400); // 800 bytes
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("truncated, 800 total bytes"));
    }

    #[test]
    fn test_is_unauthorized() {
        let err: anyhow::Error = ApiError::Unauthorized.into();
        assert!(ApiError::is_unauthorized(&err));

        let other: anyhow::Error = ApiError::RateLimited.into();
        assert!(!ApiError::is_unauthorized(&other));
        assert!(!ApiError::is_unauthorized(&anyhow::anyhow!("plain")));
    }

    #[test]
    fn test_login_message() {
        let err: anyhow::Error = ApiError::Unauthorized.into();
        assert_eq!(ApiError::login_message(&err), "Invalid username or password");

        let err = anyhow::anyhow!("operation timed out");
        assert_eq!(
            ApiError::login_message(&err),
            "Connection timed out. Please try again."
        );
    }
}
