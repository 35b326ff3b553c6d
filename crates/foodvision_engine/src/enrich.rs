use foodvision_core::{normalize_nutrients, Category, NutrientRecord, RawNutrient};
use foodvision_logging::{fv_info, fv_warn};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::http::build_client;
use crate::settings::{parse_url, ClientSettings, ConfigError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnrichError {
    #[error("nutrition search failed: {0}")]
    Network(String),
    #[error("nutrition service answered http {0}")]
    HttpStatus(u16),
    #[error("nutrition response is malformed: {0}")]
    Decode(String),
    #[error("no foods matched {0:?}")]
    NoResults(String),
}

#[async_trait::async_trait]
pub trait Enricher: Send + Sync {
    /// Search for `phrase` and return the nutrients of the best match, unfiltered.
    async fn search(&self, phrase: &str) -> Result<Vec<RawNutrient>, EnrichError>;
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    foods: Option<Vec<FoodBody>>,
}

#[derive(Debug, Deserialize)]
struct FoodBody {
    #[serde(rename = "foodNutrients", default)]
    food_nutrients: Option<Vec<FoodNutrientBody>>,
}

#[derive(Debug, Deserialize)]
struct FoodNutrientBody {
    #[serde(rename = "nutrientName", default)]
    nutrient_name: Option<String>,
    #[serde(default)]
    value: Option<f64>,
    #[serde(rename = "unitName", default)]
    unit_name: Option<String>,
}

/// Client for a USDA FoodData Central style `foods/search` endpoint.
#[derive(Debug, Clone)]
pub struct UsdaEnricher {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    data_type: String,
}

impl UsdaEnricher {
    pub fn new(settings: &ClientSettings) -> Result<Self, ConfigError> {
        Ok(Self::with_client(
            build_client(settings)?,
            parse_url("enrichment_url", &settings.enrichment_url)?,
            settings,
        ))
    }

    pub(crate) fn with_client(
        client: reqwest::Client,
        endpoint: Url,
        settings: &ClientSettings,
    ) -> Self {
        Self {
            client,
            endpoint,
            api_key: settings.enrichment_api_key.clone(),
            data_type: settings.enrichment_data_type.clone(),
        }
    }

    fn search_url(&self, phrase: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("query", phrase);
            query.append_pair("dataType", &self.data_type);
            if let Some(key) = &self.api_key {
                query.append_pair("api_key", key);
            }
        }
        url
    }
}

#[async_trait::async_trait]
impl Enricher for UsdaEnricher {
    async fn search(&self, phrase: &str) -> Result<Vec<RawNutrient>, EnrichError> {
        let response = self
            .client
            .get(self.search_url(phrase))
            .send()
            .await
            .map_err(|err| EnrichError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::HttpStatus(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| EnrichError::Network(err.to_string()))?;
        let body: SearchBody =
            serde_json::from_slice(&bytes).map_err(|err| EnrichError::Decode(err.to_string()))?;

        let food = body
            .foods
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| EnrichError::NoResults(phrase.to_string()))?;

        Ok(food
            .food_nutrients
            .unwrap_or_default()
            .into_iter()
            .map(|nutrient| RawNutrient {
                name: nutrient.nutrient_name.unwrap_or_default(),
                value: nutrient.value,
                unit_name: nutrient.unit_name.unwrap_or_default(),
            })
            .collect())
    }
}

/// Best-effort nutrition lookup for a classified category.
///
/// Never fails: any enrichment error is logged and yields an empty list.
pub async fn enrich(enricher: &dyn Enricher, category: Category) -> Vec<NutrientRecord> {
    let phrase = category.search_phrase();
    match enricher.search(phrase).await {
        Ok(raw) => {
            let raw_len = raw.len();
            let records = normalize_nutrients(raw);
            fv_info!(
                "Enrichment for {} ({:?}) kept {} of {} nutrients",
                category,
                phrase,
                records.len(),
                raw_len
            );
            records
        }
        Err(err) => {
            fv_warn!("Enrichment for {} ({:?}) failed: {}", category, phrase, err);
            Vec::new()
        }
    }
}
