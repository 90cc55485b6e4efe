//! # Supabase
//!
//! Managed Postgres reached over its REST (PostgREST) surface.
//!
//! Core purpose is to hold one `contacts` row per accepted submission. Rows
//! are insert-only from this service; everything after the insert
//! (retention, indexing, export) belongs to the datastore.
//!
//! ## Schema
//! - Table `contacts`
//! - Fields: name, email, organization, service, message, ip, user_agent (all **text**)
//!
//! ## Commands
//!
//! Inspect recent rows.
//! ```sh
//! curl -H "apikey: $SUPABASE_SERVICE_ROLE_KEY" \
//!      -H "Authorization: Bearer $SUPABASE_SERVICE_ROLE_KEY" \
//!      "$SUPABASE_URL/rest/v1/contacts?select=*&limit=10"
//! ```
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::Serialize;
use thiserror::Error;

pub const CONTACTS_TABLE: &str = "contacts";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One accepted submission, shaped exactly like a `contacts` row.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub organization: String,
    pub service: String,
    pub message: String,
    pub ip: String,
    pub user_agent: String,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("insert request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("insert rejected: {0}")]
    Rejected(String),
}

/// Insert-only handle on the contacts collection. Injected into [`crate::state::State`]
/// so tests can swap in a recording fake.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert(&self, contact: &Contact) -> Result<(), StoreError>;
}

pub struct SupabaseStore {
    client: Client,
    url: String,
}

impl SupabaseStore {
    pub fn new(supabase_url: &str, service_key: &str) -> Self {
        let key = HeaderValue::from_str(service_key).expect("Secrets misconfigured!");
        let bearer = HeaderValue::from_str(&format!("Bearer {service_key}"))
            .expect("Secrets misconfigured!");

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .expect("Failed to build Supabase client");

        Self {
            client,
            url: supabase_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ContactStore for SupabaseStore {
    async fn insert(&self, contact: &Contact) -> Result<(), StoreError> {
        let response = self
            .client
            .post(format!("{}/rest/v1/{CONTACTS_TABLE}", self.url))
            .header("Prefer", "return=minimal")
            .json(contact)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // PostgREST puts the useful detail in the body.
            let detail = response.text().await.unwrap_or_default();

            return Err(StoreError::Rejected(format!("{status}: {detail}")));
        }

        Ok(())
    }
}
