//! Overpass interpreter client.

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use super::OverpassQuery;
use crate::models::OverpassResponse;

pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_USER_AGENT: &str = "sanctuary/0.1 (nature reserve extractor)";

#[derive(Debug, Error)]
pub enum OverpassError {
    #[error("invalid Overpass endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Overpass request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The interpreter answered with a non-success status
    #[error("Error: {status} {body}")]
    Status { status: u16, body: String },
}

/// Issues a single GET against an Overpass interpreter
pub struct OverpassClient {
    client: Client,
    endpoint: Url,
}

impl OverpassClient {
    pub fn new(endpoint: &str, user_agent: &str) -> Result<Self, OverpassError> {
        let endpoint = Url::parse(endpoint).map_err(|source| OverpassError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;

        // No client timeout: the server-side limit is part of the query text
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self { client, endpoint })
    }

    /// Full request URL with the query in the `data` parameter
    pub fn request_url(&self, query: &OverpassQuery) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("data", &query.render());
        url
    }

    /// Run the query and decode the JSON body.
    ///
    /// Any non-2xx status becomes [`OverpassError::Status`] carrying the
    /// response text.
    pub async fn fetch(&self, query: &OverpassQuery) -> Result<OverpassResponse, OverpassError> {
        info!(
            "Querying {} for way[{}={}] in ({})",
            self.endpoint, query.tag.key, query.tag.value, query.bbox
        );
        debug!("Overpass query:\n{}", query.render());

        let response = self.client.get(self.request_url(query)).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OverpassError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: OverpassResponse = response.json().await?;
        info!("Received {} elements", data.elements.len());

        Ok(data)
    }
}
