// SPDX-License-Identifier: BUSL-1.1
//! # Wire Types
//!
//! Request and response bodies for the two metering endpoints. Field names
//! are PascalCase on the wire to match the marketplace metering API.
//!
//! Decoding is lenient: absent fields and `null` values take their zero
//! value and unknown fields are ignored. A field that is present with the
//! wrong JSON type is still a decode error.

use serde::{Deserialize, Deserializer, Serialize};

/// Status reported for every record that lands in `Results`.
pub const STATUS_SUCCESS: &str = "Success";

/// Body of `POST /ResolveCustomer/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResolveCustomerRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub registration_token: String,
}

/// Canned customer identity returned for a recognized token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResolveCustomerResponse {
    pub customer_identifier: String,
    pub product_code: String,
}

/// A single billable event submitted for metering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UsageRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub customer_identifier: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dimension: String,
    #[serde(deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: i64,
}

/// Body of `POST /BatchMeterUsage/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BatchMeterUsageRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub product_code: String,
    #[serde(deserialize_with = "null_elements_as_default")]
    pub usage_records: Vec<UsageRecord>,
}

/// An accepted usage record together with its generated identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecordResult {
    #[serde(rename = "MeteringRecordId")]
    pub metering_record_id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "UsageRecord")]
    pub usage_record: UsageRecord,
}

/// Partition of a batch into accepted and unprocessed records.
///
/// Both sequences always serialize as arrays, never `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchMeterUsageResponse {
    pub results: Vec<UsageRecordResult>,
    pub unprocessed_records: Vec<UsageRecord>,
}

/// Decode `null` as the zero value of `T`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Decode a nullable array whose elements may themselves be `null`.
fn null_elements_as_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}
