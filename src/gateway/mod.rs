//! Resilient data gateway.
//!
//! Every operation tries the configured remote backend once and falls back
//! to the deterministic [`LocalCatalog`]. Callers always get an
//! [`ApiResult`]; only a local miss produces a failure.

mod api_result;
pub mod intent;
pub mod local;
pub mod remote;

pub use api_result::ApiResult;
pub use local::LocalCatalog;
pub use remote::{ChatRequest, HeritageBackend, HttpBackend, OfflineBackend};

use crate::config::Config;
use crate::error::GatewayError;
use crate::fallback::attempt_then_fallback;
use crate::i18n::Language;
use crate::models::{Coordinates, HeritageSite, SiteQuery};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub struct DataGateway {
    backend: Arc<dyn HeritageBackend>,
    catalog: LocalCatalog,
    timeout: Duration,
}

impl DataGateway {
    pub fn new(backend: Arc<dyn HeritageBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            catalog: LocalCatalog::new(),
            timeout,
        }
    }

    /// HTTP backend when `HERITAGE_API_URL` is set, offline otherwise.
    pub fn from_config(client: &reqwest::Client, config: &Config) -> Self {
        let backend: Arc<dyn HeritageBackend> = if config.backend_enabled() {
            info!("Using heritage backend at {}", config.heritage_api_url);
            Arc::new(HttpBackend::new(client.clone(), &config.heritage_api_url))
        } else {
            info!("No heritage backend configured, serving local data only");
            Arc::new(OfflineBackend)
        };
        Self::new(backend, config.request_timeout)
    }

    pub fn catalog(&self) -> &LocalCatalog {
        &self.catalog
    }

    pub async fn search_sites(
        &self,
        query: &SiteQuery,
        language: Language,
    ) -> ApiResult<Vec<HeritageSite>> {
        debug!("search_sites({:?}, {})", query, language);
        let remote = async {
            let sites = self.backend.search_sites(query, language).await?;
            if sites.is_empty() {
                return Err(GatewayError::shape("backend returned no sites"));
            }
            Ok(sites)
        };
        attempt_then_fallback("search_sites", self.timeout, remote, || {
            self.catalog.search_sites(query)
        })
        .await
    }

    pub async fn site_details(&self, site_id: &str, language: Language) -> ApiResult<HeritageSite> {
        attempt_then_fallback(
            "site_details",
            self.timeout,
            self.backend.site_details(site_id, language),
            || self.catalog.site_details(site_id),
        )
        .await
    }

    pub async fn chat(&self, question: &str, site_name: &str, language: Language) -> ApiResult<String> {
        if question.trim().is_empty() {
            return ApiResult::failure("Please enter a question");
        }
        let request = ChatRequest::new(question, site_name, language);
        attempt_then_fallback("chat", self.timeout, self.backend.chat(&request), || {
            self.catalog.chat(question, site_name)
        })
        .await
    }

    pub async fn coordinates(&self, site_name: &str, language: Language) -> ApiResult<Coordinates> {
        attempt_then_fallback(
            "coordinates",
            self.timeout,
            self.backend.coordinates(site_name, language),
            || self.catalog.coordinates(site_name),
        )
        .await
    }
}
