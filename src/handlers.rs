use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use log::{error, info};

use crate::config::CredentialStore;
use crate::error::SendError;
use crate::relay::Relay;
use crate::types::{SendRequest, StatusResponse, UpdateTokenRequest};

pub struct AppState {
    pub relay: Relay,
    pub credentials: Arc<CredentialStore>,
}

fn declares_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Extracts the send request from form fields; when `to` is absent and the
/// request declares a JSON content type, falls back to decoding a JSON body.
fn parse_send_request(headers: &HeaderMap, body: &Bytes) -> Result<SendRequest, SendError> {
    let form: SendRequest = serde_urlencoded::from_bytes(body).unwrap_or_default();
    if form.to.is_empty() && declares_json(headers) {
        return Ok(serde_json::from_slice(body)?);
    }
    Ok(form)
}

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../web/index.html"))
}

pub async fn responder(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let is_json = declares_json(&headers);

    let req = match parse_send_request(&headers, &body) {
        Ok(req) => req,
        Err(e) => {
            error!("Failed to decode send request: {}", e);
            return (StatusCode::BAD_REQUEST, "invalid body").into_response();
        }
    };

    info!("Send request for {}: {}", req.to, req.message);
    if let Err(e) = state.relay.send(&req.to, &req.message).await {
        error!("Failed to send message: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("erro ao enviar: {}", e),
        )
            .into_response();
    }

    if is_json || accepts_json(&headers) {
        return Json(StatusResponse {
            status: "ok".to_string(),
        })
        .into_response();
    }

    Redirect::to("/").into_response()
}

pub async fn update_token(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let req: UpdateTokenRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            error!("Failed to decode token update: {}", e);
            return (StatusCode::BAD_REQUEST, "invalid JSON").into_response();
        }
    };

    if req.token.is_empty() {
        return (StatusCode::BAD_REQUEST, "token is required").into_response();
    }

    if let Err(e) = state
        .credentials
        .update(&req.token, req.phone_number_id.as_deref())
        .await
    {
        error!("Failed to update token: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to update token: {}", e),
        )
            .into_response();
    }

    "token updated".into_response()
}
