use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::{
    database::Contact,
    error::AppError,
    state,
};

pub const CLIENT_IP_HEADER: &str = "x-nf-client-connection-ip";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SubmitPayload {
    pub name: String,
    pub email: String,
    pub organization: String,
    pub service: String,
    pub message: String,
    // Honeypot, real users never fill it.
    pub company: String,
}

/// Registered with `any()` so the method gate owns the 405 contract.
pub async fn submit_contact(
    State(state): State<Arc<state::State>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let payload = parse_payload(&body)?;

    // Suspected bots get a success response and nothing is stored.
    if !payload.company.is_empty() {
        return Ok(Json(json!({ "ok": true })));
    }

    if payload.name.is_empty() || payload.email.is_empty() || payload.message.is_empty() {
        return Err(AppError::MissingFields);
    }

    let contact = Contact {
        name: payload.name,
        email: payload.email,
        organization: payload.organization,
        service: payload.service,
        message: payload.message,
        ip: client_ip(&headers),
        user_agent: header_value(&headers, "user-agent"),
    };

    state.store.insert(&contact).await.map_err(|e| {
        error!("Supabase insert error: {e}");
        AppError::InsertFailed
    })?;

    Ok(Json(json!({ "ok": true })))
}

// A missing body behaves like `{}` and falls through to the required-field
// check; anything else must parse as a submission object.
fn parse_payload(body: &Bytes) -> Result<SubmitPayload, AppError> {
    if body.is_empty() {
        return Ok(SubmitPayload::default());
    }

    serde_json::from_slice(body).map_err(|_| AppError::InvalidJson)
}

fn client_ip(headers: &HeaderMap) -> String {
    let ip = header_value(headers, CLIENT_IP_HEADER);

    if ip.is_empty() {
        header_value(headers, FORWARDED_FOR_HEADER)
    } else {
        ip
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string()
}
