use axum::{
    Json,
    body::{Bytes, to_bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, routes::response::MessageBody};

const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

/// Rewrites framework-generated error responses (unknown route, wrong method)
/// as JSON so every error a client sees has a JSON body.
pub async fn json_error_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    if is_json_response(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let message = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => body_bytes_to_message(status, bytes),
        Err(_) => default_message(status),
    };

    let mut new_response = match app_error_from_status(status, message) {
        Ok(app_error) => app_error.into_response(),
        Err(message) => (status, Json(MessageBody { message })).into_response(),
    };
    copy_headers(&parts.headers, &mut new_response);
    new_response
}

fn is_json_response(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let value = value.to_ascii_lowercase();
            value.contains("application/json") || value.contains("+json")
        })
        .unwrap_or(false)
}

fn body_bytes_to_message(status: StatusCode, bytes: Bytes) -> String {
    let message = String::from_utf8_lossy(&bytes).trim().to_string();
    if message.is_empty() {
        return default_message(status);
    }
    message
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

/// Statuses without an `AppError` kind keep their code and get a plain
/// message body.
fn app_error_from_status(status: StatusCode, message: String) -> Result<AppError, String> {
    match status {
        StatusCode::NOT_FOUND => Ok(AppError::not_found(message)),
        StatusCode::METHOD_NOT_ALLOWED => Ok(AppError::method_not_allowed(message)),
        _ if status.is_server_error() => Ok(AppError::internal(message)),
        _ => Err(message),
    }
}

fn copy_headers(src: &HeaderMap, dest: &mut Response) {
    for (name, value) in src {
        if name == header::CONTENT_TYPE || name == header::CONTENT_LENGTH {
            continue;
        }
        dest.headers_mut().insert(name.clone(), value.clone());
    }
}
