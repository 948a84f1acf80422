//! Remote pet operations and response classification.
//!
//! Every response is folded into a closed outcome enum. Callers never see a
//! raw status code or a transport error; "not found" on fetch is its own
//! variant because it calls for a different remedy than a failure.

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, Response, StatusCode};
use shared::{
    domain::{PetAction, PetState},
    protocol::InteractRequest,
};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::{auth::Credential, error::ClientError};

const PET_PATH: &str = "pet";
const INTERACT_PATH: &str = "pet/interact";
const REQUEST_ID_HEADER: &str = "x-request-id";
pub const INTERACT_FALLBACK_REASON: &str = "failed to perform action";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(PetState),
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractOutcome {
    Applied(PetState),
    Failed(String),
}

#[async_trait]
pub trait PetApi: Send + Sync {
    async fn fetch_pet(&self, credential: &Credential) -> FetchOutcome;
    async fn interact(&self, credential: &Credential, action: PetAction) -> InteractOutcome;
}

pub struct HttpPetClient {
    http: Client,
    pet_url: Url,
    interact_url: Url,
}

impl HttpPetClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_http(Client::builder().build()?, base_url)
    }

    pub fn with_http(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let base = normalize_base_url(base_url)?;
        let join = |path: &str| {
            base.join(path).map_err(|source| ClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                source,
            })
        };
        Ok(Self {
            pet_url: join(PET_PATH)?,
            interact_url: join(INTERACT_PATH)?,
            http,
        })
    }

    pub fn pet_url(&self) -> &Url {
        &self.pet_url
    }

    pub fn interact_url(&self) -> &Url {
        &self.interact_url
    }
}

#[async_trait]
impl PetApi for HttpPetClient {
    async fn fetch_pet(&self, credential: &Credential) -> FetchOutcome {
        let response = match self
            .http
            .get(self.pet_url.clone())
            .header(AUTHORIZATION, credential.authorization_header())
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                let reason = transport_reason(&err);
                warn!(url = %self.pet_url, %reason, "pet: fetch transport failure");
                return FetchOutcome::Failed(reason);
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!("pet: not found");
            return FetchOutcome::NotFound;
        }
        if !status.is_success() {
            let reason = failure_reason(response, status_text(status)).await;
            warn!(status = status.as_u16(), %reason, "pet: fetch rejected");
            return FetchOutcome::Failed(reason);
        }

        match decode_pet(response).await {
            Ok(pet) => {
                info!(name = pet.name(), "pet: fetched");
                FetchOutcome::Found(pet)
            }
            Err(reason) => {
                warn!(%reason, "pet: fetch returned unusable body");
                FetchOutcome::Failed(reason)
            }
        }
    }

    async fn interact(&self, credential: &Credential, action: PetAction) -> InteractOutcome {
        let request_id = Uuid::new_v4();
        let response = match self
            .http
            .post(self.interact_url.clone())
            .header(AUTHORIZATION, credential.authorization_header())
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(&InteractRequest { action })
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                let reason = transport_reason(&err);
                warn!(%request_id, %action, %reason, "pet: interact transport failure");
                return InteractOutcome::Failed(reason);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let reason = failure_reason(response, INTERACT_FALLBACK_REASON.to_string()).await;
            warn!(%request_id, %action, status = status.as_u16(), %reason, "pet: interact rejected");
            return InteractOutcome::Failed(reason);
        }

        match decode_pet(response).await {
            Ok(pet) => {
                info!(%request_id, %action, name = pet.name(), "pet: interaction applied");
                InteractOutcome::Applied(pet)
            }
            Err(reason) => {
                warn!(%request_id, %action, %reason, "pet: interact returned unusable body");
                InteractOutcome::Failed(reason)
            }
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw.trim()).map_err(|source| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::UnsupportedBaseUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn decode_pet(response: Response) -> Result<PetState, String> {
    let body = response
        .text()
        .await
        .map_err(|err| format!("failed to read pet payload: {}", transport_reason(&err)))?;
    serde_json::from_str(&body).map_err(|err| format!("invalid pet payload: {err}"))
}

/// Server text wins; `fallback` is used only when the body is empty or unreadable.
async fn failure_reason(response: Response, fallback: String) -> String {
    match response.text().await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => fallback,
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

fn transport_reason(err: &reqwest::Error) -> String {
    let mut reason = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        reason.push_str(": ");
        reason.push_str(&inner.to_string());
        source = inner.source();
    }
    reason
}

#[cfg(test)]
#[path = "tests/pet_client_tests.rs"]
mod tests;
