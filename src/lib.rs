mod args;
mod chain;
mod config;
mod dune;
mod error;
mod filter;
mod logging;
mod records;
mod types;

pub use args::{collect_args, parse_args, split_list, usage, wants_help, RawArgs};
pub use chain::DataSource;
pub use config::{ChainInfo, ChainRegistry, Config, API_KEY_VAR, BASE_URL_VAR, DEFAULT_BASE_URL};
pub use dune::{DuneClient, API_KEY_HEADER};
pub use error::{
    ConfigError, Error, FetchError, FieldIssue, FilterError, Result, ValidationError,
};
pub use filter::{apply_filters, parse_amount, parse_float, parse_timestamp, Amount};
pub use logging::{build_subscriber, setup_logging};
pub use records::{
    decode_response, EvmBalance, EvmTransaction, RawResponse, Record, Shape, SvmBalance,
    SvmTransaction,
};
pub use types::{ChainFamily, DataType, FilterOptions, Query};

use futures::future::try_join_all;
use tracing::info;

/// Run a validated query: check the chain, fetch every address, filter the merged records
pub async fn run<S>(source: &S, registry: &ChainRegistry, query: &Query) -> Result<Vec<Record>>
where
    S: DataSource + ?Sized,
{
    let chain = query.filters.chain();
    if !registry.validate(chain, query.data_type) {
        return Err(Error::ChainMismatch {
            chain: chain.unwrap_or_default().to_string(),
            data_type: query.data_type,
        });
    }

    info!(options = ?query, "Starting data fetch with options");

    let records = fetch_all(source, &query.addresses, query.data_type).await?;
    let results = apply_filters(records, query.data_type, &query.filters)?;

    info!(result_count = results.len(), "Data fetch completed");

    Ok(results)
}

/// Fetch all addresses concurrently and merge their records in address order.
///
/// The first failure aborts the whole batch; requests still in flight are dropped.
pub async fn fetch_all<S>(
    source: &S,
    addresses: &[String],
    data_type: DataType,
) -> Result<Vec<Record>, FetchError>
where
    S: DataSource + ?Sized,
{
    let batches = try_join_all(
        addresses
            .iter()
            .map(|address| source.fetch_records(address, data_type)),
    )
    .await?;

    Ok(batches.into_iter().flatten().collect())
}
