use async_trait::async_trait;

use crate::error::FetchError;
use crate::records::{decode_response, RawResponse, Record};
use crate::types::DataType;

/// Source of per-address chain data - implement this for each upstream API
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the raw response for one address
    async fn fetch(&self, address: &str, data_type: DataType) -> Result<RawResponse, FetchError>;

    /// Fetch one address and decode its records
    async fn fetch_records(
        &self,
        address: &str,
        data_type: DataType,
    ) -> Result<Vec<Record>, FetchError> {
        let response = self.fetch(address, data_type).await?;
        decode_response(data_type, address, response)
    }
}
