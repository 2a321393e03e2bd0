//! Record shapes returned by the Echo API.
//!
//! A [`Record`] keeps the object exactly as it was received, which is what gets
//! printed, next to a typed view of the documented fields. The four shapes share
//! a few concepts under different field names. Each one is reached through an
//! accessor on [`Record`] that returns `None` when the shape does not carry the
//! field, so a filter on that field simply does not apply.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::FetchError;
use crate::types::DataType;

/// Raw JSON body as returned by the upstream API
pub type RawResponse = Value;

/// A transaction on an EVM chain
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvmTransaction {
    pub chain: Option<String>,
    pub chain_id: Option<u64>,
    pub address: Option<String>,
    pub block_time: String,
    pub block_number: Option<u64>,
    pub index: Option<u64>,
    pub hash: Option<String>,
    pub block_hash: Option<String>,
    pub value: Option<String>,
    pub transaction_type: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub nonce: Option<String>,
    pub gas_price: Option<String>,
    pub gas_used: Option<String>,
    pub effective_gas_price: Option<String>,
    pub success: Option<bool>,
    pub data: Option<String>,
    pub logs: Option<Vec<Value>>,
}

/// A transaction on Solana
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SvmTransaction {
    pub signature: Option<String>,
    pub slot: Option<u64>,
    pub timestamp: String,
    pub success: Option<bool>,
    pub fee: Option<u64>,
    pub token: Option<String>,
    pub program: Option<String>,
    pub instruction_name: Option<String>,
    pub instruction_data: Option<Value>,
    pub account_keys: Option<Vec<String>>,
    pub inner_instructions: Option<Vec<Value>>,
}

/// A native or token balance on an EVM chain
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvmBalance {
    pub chain: Option<String>,
    pub chain_id: Option<u64>,
    pub address: Option<String>,
    pub token_address: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: Option<u32>,
    pub raw_balance: Option<String>,
    pub balance: String,
    pub logo_url: Option<String>,
}

/// A token balance on Solana
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SvmBalance {
    pub chain: Option<String>,
    pub mint: Option<String>,
    pub owner: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: Option<u32>,
    pub raw_balance: Option<String>,
    pub balance: String,
    pub logo_url: Option<String>,
}

/// Typed view of a record. The variant is fixed by the data type the
/// collection was fetched with.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    EvmTransaction(EvmTransaction),
    SvmTransaction(SvmTransaction),
    EvmBalance(EvmBalance),
    SvmBalance(SvmBalance),
}

impl Shape {
    fn decode(data_type: DataType, value: &Value) -> Result<Self, serde_json::Error> {
        Ok(match data_type {
            DataType::EvmTransactions => Shape::EvmTransaction(EvmTransaction::deserialize(value)?),
            DataType::SvmTransactions => Shape::SvmTransaction(SvmTransaction::deserialize(value)?),
            DataType::EvmBalances => Shape::EvmBalance(EvmBalance::deserialize(value)?),
            DataType::SvmBalances => Shape::SvmBalance(SvmBalance::deserialize(value)?),
        })
    }
}

/// One entry of a fetched collection. Serializes back to the received object
/// unchanged, including nulls and fields the typed view does not know about.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    shape: Shape,
    fields: Map<String, Value>,
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl Record {
    /// Decode a single JSON object into the shape served for `data_type`
    pub fn decode(data_type: DataType, value: Value) -> Result<Self, serde_json::Error> {
        let shape = Shape::decode(data_type, &value)?;
        let fields = serde_json::from_value(value)?;
        Ok(Self { shape, fields })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// A field as received, `Some(Value::Null)` when it was sent as null
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn data_type(&self) -> DataType {
        match self.shape {
            Shape::EvmTransaction(_) => DataType::EvmTransactions,
            Shape::SvmTransaction(_) => DataType::SvmTransactions,
            Shape::EvmBalance(_) => DataType::EvmBalances,
            Shape::SvmBalance(_) => DataType::SvmBalances,
        }
    }

    /// `block_time` for EVM transactions, `timestamp` for SVM ones
    pub fn timestamp(&self) -> Option<&str> {
        match &self.shape {
            Shape::EvmTransaction(tx) => Some(&tx.block_time),
            Shape::SvmTransaction(tx) => Some(&tx.timestamp),
            _ => None,
        }
    }

    /// Chain name, for any shape that was sent one
    pub fn chain(&self) -> Option<&str> {
        self.get("chain").and_then(Value::as_str)
    }

    /// Whether the transaction succeeded. A missing flag counts as failed.
    pub fn succeeded(&self) -> bool {
        match &self.shape {
            Shape::EvmTransaction(tx) => tx.success.unwrap_or(false),
            Shape::SvmTransaction(tx) => tx.success.unwrap_or(false),
            _ => false,
        }
    }

    /// Transferred amount in base units
    pub fn value(&self) -> Option<&str> {
        match &self.shape {
            Shape::EvmTransaction(tx) => tx.value.as_deref(),
            _ => None,
        }
    }

    /// Human-scaled balance
    pub fn balance(&self) -> Option<&str> {
        match &self.shape {
            Shape::EvmBalance(balance) => Some(&balance.balance),
            Shape::SvmBalance(balance) => Some(&balance.balance),
            _ => None,
        }
    }

    pub fn transaction_type(&self) -> Option<&str> {
        match &self.shape {
            Shape::EvmTransaction(tx) => tx.transaction_type.as_deref(),
            _ => None,
        }
    }

    /// Sender address
    pub fn sender(&self) -> Option<&str> {
        match &self.shape {
            Shape::EvmTransaction(tx) => tx.from.as_deref(),
            _ => None,
        }
    }

    /// Recipient address
    pub fn recipient(&self) -> Option<&str> {
        match &self.shape {
            Shape::EvmTransaction(tx) => tx.to.as_deref(),
            _ => None,
        }
    }
}

/// Extract and decode the record array of a response fetched for `address`
pub fn decode_response(
    data_type: DataType,
    address: &str,
    mut response: RawResponse,
) -> Result<Vec<Record>, FetchError> {
    let key = data_type.response_key();
    let items = match response.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => {
            return Err(FetchError::UnexpectedResponse {
                data_type,
                address: address.to_string(),
                reason: format!("missing `{}` array", key),
            })
        }
    };

    items
        .into_iter()
        .map(|item| {
            Record::decode(data_type, item).map_err(|source| FetchError::Decode {
                data_type,
                address: address.to_string(),
                source,
            })
        })
        .collect()
}
