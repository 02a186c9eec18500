use actix_web::HttpResponse;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Unauthorized(String),
    NotFound(String),
    InvalidRequest(String),
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "{}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::InvalidRequest(msg) => write!(f, "{}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Maps the error to its HTTP response. Ownership mismatch and absence
    /// both surface as NotFound so callers cannot probe for existence.
    pub fn to_response(&self) -> HttpResponse {
        let body = serde_json::json!({
            "success": false,
            "error": self.to_string(),
        });
        match self {
            AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(body),
            AppError::NotFound(_) => HttpResponse::NotFound().json(body),
            AppError::InvalidRequest(_) => HttpResponse::BadRequest().json(body),
            AppError::DatabaseError(_) => HttpResponse::InternalServerError().json(body),
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Unauthorized("no".into()).to_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("gone".into()).to_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidRequest("bad".into()).to_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DatabaseError("down".into()).to_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_keeps_message() {
        let err = AppError::NotFound("Project not found or you do not have access".into());
        assert_eq!(err.to_string(), "Project not found or you do not have access");
    }
}
