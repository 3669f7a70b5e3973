//! Error handling middleware - RFC 7807 compliant responses.

use std::fmt;

use actix_web::{
    HttpResponse, ResponseError,
    dev::ServiceResponse,
    http::StatusCode,
    middleware::{ErrorHandlerResponse, ErrorHandlers},
};
use quill_core::DomainError;
use quill_shared::{ErrorResponse, FieldProblem};

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Validation(Vec<FieldProblem>),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Validation(errors) => ErrorResponse::validation_failed(errors.clone()),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation(errors) => AppError::Validation(
                errors
                    .errors()
                    .iter()
                    .map(|e| FieldProblem {
                        field: e.field.to_string(),
                        message: e.message.clone(),
                    })
                    .collect(),
            ),
            DomainError::Storage(err) => AppError::Internal(format!("Post store error: {}", err)),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Middleware that puts the internal detail back into 500 problem bodies.
/// Only mounted in development.
pub fn expose_internal_detail<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, with_internal_detail)
}

fn with_internal_detail<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let detail = match res.response().error().and_then(|e| e.as_error::<AppError>()) {
        Some(AppError::Internal(detail)) => detail.clone(),
        _ => return Ok(ErrorHandlerResponse::Response(res.map_into_left_body())),
    };

    let (req, _) = res.into_parts();
    let body = HttpResponse::InternalServerError().json(ErrorResponse::internal_error().with_detail(detail));
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, body).map_into_right_body(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::RepoError;
    use quill_core::error::ValidationErrors;

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        let not_found: AppError = DomainError::post_not_found("abc").into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let invalid: AppError = DomainError::Validation(ValidationErrors::single("title", "title is required")).into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let storage: AppError = DomainError::Storage(RepoError::Connection("refused".into())).into();
        assert_eq!(storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    async fn failing_handler() -> AppResult<HttpResponse> {
        Err(AppError::Internal("password=hunter2".into()))
    }

    #[actix_web::test]
    async fn test_development_mode_shows_internal_detail() {
        use actix_web::{App, test, web};

        let app = test::init_service(
            App::new()
                .wrap(expose_internal_detail())
                .route("/boom", web::get().to(failing_handler))
                .route("/missing", web::get().to(|| async {
                    Err::<HttpResponse, _>(AppError::NotFound("post".into()))
                })),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/boom").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "password=hunter2");
        assert_eq!(body["title"], "Internal Server Error");

        let resp = test::call_service(&app, test::TestRequest::get().uri("/missing").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_production_mode_hides_internal_detail() {
        use actix_web::{App, test, web};

        let app = test::init_service(App::new().route("/boom", web::get().to(failing_handler))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/boom").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body.get("detail").is_none());
    }

    #[actix_web::test]
    async fn test_internal_error_hides_detail_by_default() {
        let resp = AppError::Internal("password=hunter2".into()).error_response();
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let text = std::str::from_utf8(&body).unwrap();
        assert!(!text.contains("hunter2"));
        assert!(text.contains("Internal Server Error"));
    }
}
