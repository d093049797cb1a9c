//! Quote request and result types

use crate::errors::ValidationError;
use crate::ids::{DriverId, RouteId};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Free-form caller metadata, keyed in sorted order.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A single metadata value.
///
/// Carried verbatim through hashing and snapshotting; the engine never
/// looks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<MetadataValue>),
    Map(BTreeMap<String, MetadataValue>),
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::String(s.to_string())
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        MetadataValue::Number(n.into())
    }
}

/// Inbound quote request
///
/// Missing or `null` fields decode to their zero values, so an absent
/// `parcelCount` is rejected by [`QuoteInput::validate`] rather than by the
/// decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub route_id: RouteId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub planned_distance_km: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parcel_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<DriverId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl QuoteInput {
    pub fn new(route_id: impl Into<String>, planned_distance_km: f64, parcel_count: i64) -> Self {
        Self {
            route_id: RouteId::new(route_id),
            planned_distance_km,
            parcel_count,
            driver_id: None,
            metadata: None,
        }
    }

    pub fn with_driver(mut self, driver_id: impl Into<String>) -> Self {
        self.driver_id = Some(DriverId::new(driver_id));
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Check numeric ranges and return the parcel count as an unsigned value.
    pub fn validate(&self) -> Result<u32, ValidationError> {
        if !self.planned_distance_km.is_finite() {
            return Err(ValidationError::NonFiniteDistance);
        }
        if self.planned_distance_km < 0.0 {
            return Err(ValidationError::NegativeDistance(self.planned_distance_km));
        }
        if self.parcel_count < 1 {
            return Err(ValidationError::ParcelCountTooLow(self.parcel_count));
        }
        u32::try_from(self.parcel_count)
            .map_err(|_| ValidationError::ParcelCountTooHigh(self.parcel_count))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Priced quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub rate_per_parcel: f64,
    pub total_payout: f64,
    pub config_version: String,
    /// Hex SHA-256 of the canonical input
    pub trace: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_request() {
        let json = r#"{
            "routeId": "R-100",
            "plannedDistanceKm": 42.5,
            "parcelCount": 7,
            "driverId": "D-9",
            "metadata": {"zone": "north", "priority": 2, "fragile": true, "tags": ["a", null]}
        }"#;
        let input: QuoteInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.route_id.as_str(), "R-100");
        assert_eq!(input.planned_distance_km, 42.5);
        assert_eq!(input.parcel_count, 7);
        assert_eq!(input.driver_id, Some(DriverId::new("D-9")));

        let metadata = input.metadata.unwrap();
        assert_eq!(metadata["zone"], MetadataValue::from("north"));
        assert_eq!(metadata["priority"], MetadataValue::from(2));
        assert_eq!(metadata["fragile"], MetadataValue::Bool(true));
        assert_eq!(
            metadata["tags"],
            MetadataValue::List(vec![MetadataValue::from("a"), MetadataValue::Null])
        );
    }

    #[test]
    fn test_decode_nested_metadata() {
        let json = r#"{"routeId":"R","parcelCount":1,"metadata":{"dims":{"w":1.5,"h":2}}}"#;
        let input: QuoteInput = serde_json::from_str(json).unwrap();
        let metadata = input.metadata.unwrap();
        match &metadata["dims"] {
            MetadataValue::Map(inner) => {
                assert_eq!(inner.len(), 2);
                assert!(matches!(inner["w"], MetadataValue::Number(_)));
            }
            other => panic!("Expected nested map, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let input: QuoteInput = serde_json::from_str("{}").unwrap();
        assert!(input.route_id.is_empty());
        assert_eq!(input.planned_distance_km, 0.0);
        assert_eq!(input.parcel_count, 0);
        assert_eq!(
            input.validate(),
            Err(ValidationError::ParcelCountTooLow(0))
        );
    }

    #[test]
    fn test_null_fields_decode_as_zero_values() {
        let json = r#"{"routeId":null,"plannedDistanceKm":null,"parcelCount":2,"driverId":null,"metadata":null}"#;
        let input: QuoteInput = serde_json::from_str(json).unwrap();
        assert_eq!(input, QuoteInput::new("", 0.0, 2));
        assert_eq!(input.validate(), Ok(2));

        let input: QuoteInput = serde_json::from_str(r#"{"parcelCount":null}"#).unwrap();
        assert_eq!(input.parcel_count, 0);
    }

    #[test]
    fn test_validate_accepts_zero_distance() {
        let input = QuoteInput::new("R1", 0.0, 1);
        assert_eq!(input.validate(), Ok(1));
    }

    #[test]
    fn test_validate_rejects_negative_distance() {
        let input = QuoteInput::new("R1", -0.5, 3);
        assert_eq!(
            input.validate(),
            Err(ValidationError::NegativeDistance(-0.5))
        );
    }

    #[test]
    fn test_validate_rejects_negative_parcels() {
        let input = QuoteInput::new("R1", 5.0, -4);
        assert_eq!(
            input.validate(),
            Err(ValidationError::ParcelCountTooLow(-4))
        );
    }

    #[test]
    fn test_validate_rejects_oversized_parcel_count() {
        let input = QuoteInput::new("R1", 5.0, i64::from(u32::MAX) + 1);
        assert!(matches!(
            input.validate(),
            Err(ValidationError::ParcelCountTooHigh(_))
        ));
    }

    #[test]
    fn test_fractional_parcel_count_fails_to_decode() {
        let result = serde_json::from_str::<QuoteInput>(r#"{"parcelCount": 1.5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_result_wire_names() {
        let result = QuoteResult {
            rate_per_parcel: 31.25,
            total_payout: 62.5,
            config_version: "model_c_v1".into(),
            trace: "ab".into(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["ratePerParcel"], 31.25);
        assert_eq!(value["configVersion"], "model_c_v1");
    }
}
