use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use serde_json::json;
use urlencoding;

use crate::errors::{model::ModelError, store::StoreError, AppError};

// The IntoResponse impl turns AppError into either a login redirect (for
// auth failures on page routes) or a JSON error body the page script can
// display inline.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Authentication errors redirect to login
            AppError::Auth(msg) => {
                Redirect::to(&format!("/?error={}", urlencoding::encode(&msg)))
                    .into_response()
            }

            AppError::BadInput(msg) => error_body(StatusCode::BAD_REQUEST, &msg),

            AppError::Store(err) => convert_store_error(err),

            AppError::File(e) => error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("File error: {}", e),
            ),

            // Model errors keep their message unchanged; only the status
            // code depends on the variant.
            AppError::Model(err) => convert_model_error(err),
        }
    }
}

fn convert_store_error(err: StoreError) -> Response {
    let status = if err.is_user_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    error_body(status, &err.to_string())
}

fn convert_model_error(err: ModelError) -> Response {
    let status = match err {
        ModelError::MissingApiKey => StatusCode::BAD_REQUEST,
        ModelError::Auth(_) => StatusCode::UNAUTHORIZED,
        ModelError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        ModelError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ModelError::Transport(_) | ModelError::Api { .. } | ModelError::EmptyReply => {
            StatusCode::BAD_GATEWAY
        }
    };
    error_body(status, &err.to_string())
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
