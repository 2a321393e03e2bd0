use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which Echo dataset a query targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DataType {
    #[default]
    EvmTransactions,
    EvmBalances,
    SvmTransactions,
    SvmBalances,
}

/// Chain family a data type belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFamily {
    Evm,
    Svm,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::EvmTransactions => "evm-transactions",
            DataType::EvmBalances => "evm-balances",
            DataType::SvmTransactions => "svm-transactions",
            DataType::SvmBalances => "svm-balances",
        }
    }

    pub fn family(&self) -> ChainFamily {
        match self {
            DataType::EvmTransactions | DataType::EvmBalances => ChainFamily::Evm,
            DataType::SvmTransactions | DataType::SvmBalances => ChainFamily::Svm,
        }
    }

    pub fn is_transactions(&self) -> bool {
        matches!(self, DataType::EvmTransactions | DataType::SvmTransactions)
    }

    /// Path of the Echo endpoint serving this data type, relative to the API base
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            DataType::EvmTransactions => "echo/v1/transactions/evm",
            DataType::EvmBalances => "echo/v1/balances/evm",
            DataType::SvmTransactions => "echo/beta/transactions/svm",
            DataType::SvmBalances => "echo/beta/balances/svm",
        }
    }

    /// Key of the record array in the response body
    pub fn response_key(&self) -> &'static str {
        if self.is_transactions() {
            "transactions"
        } else {
            "balances"
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, false)
    }
}

/// Client-side constraints applied after fetching. `None` means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub success_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
}

impl FilterOptions {
    /// The chain constraint, treating an empty name as no constraint
    pub fn chain(&self) -> Option<&str> {
        non_empty(&self.chain)
    }
}

/// One parsed and validated command invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub addresses: Vec<String>,
    #[serde(rename = "type")]
    pub data_type: DataType,
    pub filters: FilterOptions,
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
