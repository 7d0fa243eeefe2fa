//! Lookup endpoint client
//!
//! `GET <base>?smoothiename=<name>` answers with
//! `{ "data": { "name", "image", "taste", "ingredients": [...] } }`.
//! Any non-2xx status or transport failure is an error for the caller to log.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://storage01.dbe.academy/fswd/api-smoothie-mixer/";

/// Query parameter carrying the submitted name
pub const NAME_PARAM: &str = "smoothiename";

/// One smoothie record as returned by the endpoint
///
/// The first ingredient is raw free text; the rest are atomic names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub name: String,
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(rename = "taste")]
    pub category: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

#[derive(Deserialize)]
struct Envelope {
    data: LookupResult,
}

/// Parse a response body
pub fn decode_response(body: &str) -> Result<LookupResult> {
    serde_json::from_str::<Envelope>(body)
        .map(|envelope| envelope.data)
        .map_err(|e| Error::Decode(e.to_string()))
}

#[async_trait]
pub trait Lookup: Send + Sync {
    async fn lookup(&self, name: &str) -> Result<LookupResult>;
}

/// reqwest-backed lookup against a fixed base URL
#[derive(Debug, Clone)]
pub struct HttpLookup {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpLookup {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| Error::Config(format!("{}: {}", base_url, e)))?;
        Ok(HttpLookup {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Full request URL with the name form-encoded
    pub fn request_url(&self, name: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair(NAME_PARAM, name);
        url
    }
}

#[async_trait]
impl Lookup for HttpLookup {
    async fn lookup(&self, name: &str) -> Result<LookupResult> {
        let url = self.request_url(name);
        tracing::debug!(%url, "requesting smoothie");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let body = response.text().await?;
        decode_response(&body)
    }
}
