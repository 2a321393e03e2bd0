use async_trait::async_trait;
use tracing::{error, info};

use crate::chain::DataSource;
use crate::config::Config;
use crate::error::FetchError;
use crate::records::RawResponse;
use crate::types::DataType;

/// Header carrying the API key on every request
pub const API_KEY_HEADER: &str = "X-Dune-API-Key";

/// Dune Echo API client
pub struct DuneClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DuneClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Full endpoint URL for `address`
    pub fn endpoint(&self, data_type: DataType, address: &str) -> String {
        format!("{}/{}/{}", self.base_url, data_type.endpoint_path(), address)
    }

    async fn get_json(
        &self,
        endpoint: &str,
        address: &str,
        data_type: DataType,
    ) -> Result<RawResponse, FetchError> {
        let response = self
            .client
            .get(endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                data_type,
                address: address.to_string(),
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        Ok(response.json::<RawResponse>().await?)
    }
}

#[async_trait]
impl DataSource for DuneClient {
    async fn fetch(&self, address: &str, data_type: DataType) -> Result<RawResponse, FetchError> {
        let endpoint = self.endpoint(data_type, address);

        info!(address, data_type = %data_type, "Fetching data from Dune Echo API");

        let result = self.get_json(&endpoint, address, data_type).await;

        if let Err(err) = &result {
            error!(
                error = %err,
                address,
                data_type = %data_type,
                "Error fetching data from Dune API"
            );
        }

        result
    }
}
