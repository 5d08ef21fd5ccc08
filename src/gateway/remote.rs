//! Remote strategy: the configured heritage backend.
//!
//! Every method returns the raw outcome; the gateway decides what a failure
//! means. A 2xx response with an unexpected payload is a `Shape` error just
//! like a transport failure, so malformed records never reach a screen.

use crate::error::GatewayError;
use crate::i18n::Language;
use crate::models::{slug, Coordinates, HeritageSite, SiteQuery};
use futures::future::BoxFuture;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Chat endpoint request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub question: String,
    pub site_name: String,
    pub language: String,
}

impl ChatRequest {
    pub fn new(question: &str, site_name: &str, language: Language) -> Self {
        Self {
            question: question.to_string(),
            site_name: site_name.to_string(),
            language: language.name().to_string(),
        }
    }
}

/// A remote source of heritage data.
pub trait HeritageBackend: Send + Sync {
    fn search_sites<'a>(
        &'a self,
        query: &'a SiteQuery,
        language: Language,
    ) -> BoxFuture<'a, Result<Vec<HeritageSite>, GatewayError>>;

    fn site_details<'a>(
        &'a self,
        site_id: &'a str,
        language: Language,
    ) -> BoxFuture<'a, Result<HeritageSite, GatewayError>>;

    fn chat<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<String, GatewayError>>;

    fn coordinates<'a>(
        &'a self,
        site_name: &'a str,
        language: Language,
    ) -> BoxFuture<'a, Result<Coordinates, GatewayError>>;
}

// ==================== Wire shapes ====================

/// Search responses come either as a bare array or wrapped in `{"sites": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchPayload {
    Sites(Vec<SiteEntry>),
    Wrapped { sites: Vec<SiteEntry> },
}

/// A search entry is either a full record or a "Title, Location" string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SiteEntry {
    Record(RawSite),
    Listing(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSite {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    is_popular: bool,
    #[serde(default)]
    audio_available: bool,
}

impl RawSite {
    fn into_site(self, fallback_id: String) -> Result<HeritageSite, GatewayError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(GatewayError::shape("site record has no title"));
        }

        let id = match self.id {
            Some(serde_json::Value::String(id)) if !id.trim().is_empty() => id,
            Some(serde_json::Value::Number(id)) => id.to_string(),
            _ => fallback_id,
        };

        let description = if self.description.trim().is_empty() {
            format!("Learn more about {}", title)
        } else {
            self.description
        };

        Ok(HeritageSite {
            id,
            title: title.to_string(),
            location: self.location,
            description,
            image: self.image,
            is_popular: self.is_popular,
            audio_available: self.audio_available,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatPayload {
    response: String,
}

#[derive(Debug, Deserialize)]
struct CoordinatesPayload {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Normalize a search payload into site records
fn normalize_search(payload: SearchPayload, place: &str) -> Result<Vec<HeritageSite>, GatewayError> {
    let entries = match payload {
        SearchPayload::Sites(entries) | SearchPayload::Wrapped { sites: entries } => entries,
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            SiteEntry::Record(raw) => raw.into_site(format!("site-{}-{}", slug(place), index)),
            SiteEntry::Listing(listing) => HeritageSite::from_listing(place, index, &listing)
                .ok_or_else(|| GatewayError::shape(format!("unparsable listing {:?}", listing))),
        })
        .collect()
}

// ==================== HTTP backend ====================

/// JSON-over-HTTP heritage backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| GatewayError::shape(format!("invalid backend URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::shape("backend URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::transport("Failed to reach heritage backend", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::transport("Failed to read backend response", e))?;
        serde_json::from_str(&body).map_err(|e| GatewayError::shape(e.to_string()))
    }

    async fn get_sites(
        &self,
        query: &SiteQuery,
        language: Language,
    ) -> Result<Vec<HeritageSite>, GatewayError> {
        let url = self.endpoint(&["heritage-sites"])?;
        let mut params = vec![("place", query.place.trim()), ("language", language.name())];
        if let Some(district) = &query.district {
            params.push(("district", district.trim()));
        }

        debug!("Searching backend for {:?} in {}", query.place, language);
        let request = self
            .client
            .get(url)
            .query(&params)
            .header("Accept-Language", language.name());
        let payload: SearchPayload = self.fetch(request).await?;
        normalize_search(payload, query.place.trim())
    }

    async fn get_site(&self, site_id: &str, language: Language) -> Result<HeritageSite, GatewayError> {
        let url = self.endpoint(&["heritage-sites", site_id])?;
        let request = self
            .client
            .get(url)
            .query(&[("language", language.name())])
            .header("Accept-Language", language.name());
        let raw: RawSite = self.fetch(request).await?;
        raw.into_site(site_id.to_string())
    }

    async fn post_chat(&self, body: &ChatRequest) -> Result<String, GatewayError> {
        let url = self.endpoint(&["chat"])?;
        let request = self
            .client
            .post(url)
            .header("Accept-Language", body.language.as_str())
            .json(body);
        let payload: ChatPayload = self.fetch(request).await?;
        let reply = payload.response.trim();
        if reply.is_empty() {
            return Err(GatewayError::shape("chat reply is empty"));
        }
        Ok(reply.to_string())
    }

    async fn get_coordinates(
        &self,
        site_name: &str,
        language: Language,
    ) -> Result<Coordinates, GatewayError> {
        let url = self.endpoint(&["coordinates"])?;
        let request = self
            .client
            .get(url)
            .query(&[("site", site_name.trim())])
            .header("Accept-Language", language.name());
        let payload: CoordinatesPayload = self.fetch(request).await?;

        match (payload.latitude, payload.longitude) {
            (Some(lat), Some(lon)) => Coordinates::validated(lat, lon)
                .ok_or_else(|| GatewayError::shape(format!("coordinates out of range: {}, {}", lat, lon))),
            _ => Err(GatewayError::shape("coordinates missing latitude or longitude")),
        }
    }
}

impl HeritageBackend for HttpBackend {
    fn search_sites<'a>(
        &'a self,
        query: &'a SiteQuery,
        language: Language,
    ) -> BoxFuture<'a, Result<Vec<HeritageSite>, GatewayError>> {
        Box::pin(self.get_sites(query, language))
    }

    fn site_details<'a>(
        &'a self,
        site_id: &'a str,
        language: Language,
    ) -> BoxFuture<'a, Result<HeritageSite, GatewayError>> {
        Box::pin(self.get_site(site_id, language))
    }

    fn chat<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<String, GatewayError>> {
        Box::pin(self.post_chat(request))
    }

    fn coordinates<'a>(
        &'a self,
        site_name: &'a str,
        language: Language,
    ) -> BoxFuture<'a, Result<Coordinates, GatewayError>> {
        Box::pin(self.get_coordinates(site_name, language))
    }
}

// ==================== Offline backend ====================

/// Backend used when no remote URL is configured; always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

impl HeritageBackend for OfflineBackend {
    fn search_sites<'a>(
        &'a self,
        _query: &'a SiteQuery,
        _language: Language,
    ) -> BoxFuture<'a, Result<Vec<HeritageSite>, GatewayError>> {
        Box::pin(async { Err(GatewayError::Unavailable) })
    }

    fn site_details<'a>(
        &'a self,
        _site_id: &'a str,
        _language: Language,
    ) -> BoxFuture<'a, Result<HeritageSite, GatewayError>> {
        Box::pin(async { Err(GatewayError::Unavailable) })
    }

    fn chat<'a>(&'a self, _request: &'a ChatRequest) -> BoxFuture<'a, Result<String, GatewayError>> {
        Box::pin(async { Err(GatewayError::Unavailable) })
    }

    fn coordinates<'a>(
        &'a self,
        _site_name: &'a str,
        _language: Language,
    ) -> BoxFuture<'a, Result<Coordinates, GatewayError>> {
        Box::pin(async { Err(GatewayError::Unavailable) })
    }
}
