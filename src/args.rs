//! Command-line parsing.
//!
//! The first token is always the comma-separated address list; every later token
//! is either a known flag (consuming the following token as its value, except
//! `--success-only`) or ignored. Parsing never fails; [`RawArgs::validate`] turns
//! the collected strings into a [`Query`] or reports every bad field at once.

use chrono::NaiveDate;
use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::ChainRegistry;
use crate::error::{FieldIssue, ValidationError};
use crate::types::{ChainFamily, DataType, FilterOptions, Query};

static DATE_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

static INTEGER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?)(\d+)").expect("integer pattern is valid"));

/// Arguments as collected from the token list, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArgs {
    pub addresses: Vec<String>,
    pub data_type: String,
    pub chain: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_value: Option<String>,
    pub max_value: Option<String>,
    pub success_only: bool,
    pub limit: Option<String>,
    pub transaction_type: Option<String>,
    pub from: Vec<String>,
    pub to: Vec<String>,
}

impl Default for RawArgs {
    fn default() -> Self {
        Self {
            addresses: Vec::new(),
            data_type: DataType::default().as_str().to_string(),
            chain: None,
            start_date: None,
            end_date: None,
            min_value: None,
            max_value: None,
            success_only: false,
            limit: None,
            transaction_type: None,
            from: Vec::new(),
            to: Vec::new(),
        }
    }
}

/// Split a comma-separated list, trimming pieces and dropping empty ones
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}

/// Whether the user asked for usage help
pub fn wants_help<S: AsRef<str>>(tokens: &[S]) -> bool {
    tokens
        .iter()
        .any(|token| matches!(token.as_ref(), "--help" | "-h"))
}

/// Collect flags from the token list (program name excluded)
pub fn collect_args<I, S>(tokens: I) -> RawArgs
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tokens = tokens.into_iter().map(Into::into);
    let mut raw = RawArgs::default();

    if let Some(first) = tokens.next() {
        raw.addresses = split_list(&first);
    }

    while let Some(token) = tokens.next() {
        match token.as_str() {
            "--type" => raw.data_type = tokens.next().unwrap_or_default(),
            "--chain" => raw.chain = tokens.next(),
            "--start-date" => raw.start_date = tokens.next(),
            "--end-date" => raw.end_date = tokens.next(),
            "--min-value" => raw.min_value = tokens.next(),
            "--max-value" => raw.max_value = tokens.next(),
            "--success-only" => raw.success_only = true,
            "--limit" => raw.limit = Some(tokens.next().unwrap_or_default()),
            "--transaction-type" => raw.transaction_type = tokens.next(),
            "--from" => raw.from = tokens.next().map(|v| split_list(&v)).unwrap_or_default(),
            "--to" => raw.to = tokens.next().map(|v| split_list(&v)).unwrap_or_default(),
            other => debug!(token = other, "Ignoring unrecognized argument"),
        }
    }

    raw
}

/// Parse and validate a token list into a query
pub fn parse_args<I, S>(tokens: I) -> Result<Query, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    collect_args(tokens).validate()
}

impl RawArgs {
    pub fn validate(self) -> Result<Query, ValidationError> {
        let mut issues = Vec::new();

        if self.addresses.is_empty() {
            issues.push(issue("addresses", "At least one address is required"));
        }

        let data_type = match <DataType as ValueEnum>::from_str(&self.data_type, false) {
            Ok(data_type) => Some(data_type),
            Err(_) => {
                issues.push(issue(
                    "type",
                    format!(
                        "Expected one of {}, received '{}'",
                        data_type_literals().join(", "),
                        self.data_type
                    ),
                ));
                None
            }
        };

        for (field, date) in [("startDate", &self.start_date), ("endDate", &self.end_date)] {
            if let Some(date) = date {
                if !is_valid_date(date) {
                    issues.push(issue(field, "Date must be in YYYY-MM-DD format"));
                }
            }
        }

        let limit = self.limit.as_deref().and_then(|raw| {
            let limit = parse_limit(raw);
            if limit.is_none() {
                issues.push(issue(
                    "limit",
                    format!("Expected a positive integer, received '{}'", raw),
                ));
            }
            limit
        });

        match data_type {
            Some(data_type) if issues.is_empty() => Ok(Query {
                addresses: self.addresses,
                data_type,
                filters: FilterOptions {
                    chain: self.chain,
                    start_date: self.start_date,
                    end_date: self.end_date,
                    min_value: self.min_value,
                    max_value: self.max_value,
                    success_only: self.success_only,
                    limit,
                    transaction_type: self.transaction_type,
                    from: self.from,
                    to: self.to,
                },
            }),
            _ => Err(ValidationError { issues }),
        }
    }
}

fn issue(field: &'static str, message: impl Into<String>) -> FieldIssue {
    FieldIssue {
        field,
        message: message.into(),
    }
}

/// Leading base-10 integer of `raw`, trailing text ignored. Only positive values.
fn parse_limit(raw: &str) -> Option<usize> {
    let captures = INTEGER_PREFIX.captures(raw)?;
    if &captures[1] == "-" {
        return None;
    }
    captures[2].parse::<usize>().ok().filter(|limit| *limit > 0)
}

/// `YYYY-MM-DD` that is also a real calendar date
fn is_valid_date(date: &str) -> bool {
    DATE_FORMAT.is_match(date) && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

fn data_type_literals() -> Vec<String> {
    DataType::value_variants()
        .iter()
        .map(|data_type| data_type.to_string())
        .collect()
}

/// Usage text listing every option and the supported chains
pub fn usage(registry: &ChainRegistry) -> String {
    let evm_chains = registry.chain_names(ChainFamily::Evm).join(", ");
    let svm_chains = registry.chain_names(ChainFamily::Svm).join(", ");
    let data_types = data_type_literals().join(", ");

    format!(
        "
Usage: dune-echo <address or comma-separated addresses> [options]

Options:
  --type <type>               Data type ({data_types})
  --chain <chain>             Filter by chain
                              EVM chains: {evm_chains}
                              SVM chains: {svm_chains}
  --start-date <date>         Filter from date (format: YYYY-MM-DD, e.g., 2025-01-01)
  --end-date <date>           Filter to date (format: YYYY-MM-DD, e.g., 2025-12-31)
  --min-value <value>         Filter by minimum value
  --max-value <value>         Filter by maximum value
  --success-only              Only show successful transactions
  --limit <number>            Limit number of results (leading digits are used)
  --transaction-type <type>   Only show EVM transactions of this type
  --from <addresses>          Only show EVM transactions sent by these addresses
  --to <addresses>            Only show EVM transactions sent to these addresses
  -h, --help                  Print this help

Environment:
  DUNE_ECHO_API               Dune API key (required)
  DUNE_API_BASE_URL           API base URL (default: https://api.dune.com/api)
  RUST_LOG                    Log filter (default: info)

Examples:
  dune-echo 0x123... --type evm-transactions --chain ethereum --start-date 2025-01-01
  dune-echo 0x123...,0x456... --type evm-balances --chain polygon --min-value 1000
  dune-echo sol123... --type svm-transactions --success-only --limit 100
"
    )
}
