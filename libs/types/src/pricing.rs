//! Per-parcel rate calculation
//!
//! Rates stay in `f64` with explicit round-half-up at two decimal places.
//! Conversion to integer cents happens only at the persistence boundary via
//! [`to_cents`].

use crate::errors::ParameterError;
use serde::{Deserialize, Serialize};

/// Pricing knobs supplied by configuration. Never computed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingParameters {
    pub base_rate: f64,
    /// Rate added per planned kilometre
    pub distance_coefficient: f64,
    pub min_rate: f64,
    pub max_rate: f64,
    /// Tag identifying this parameter set in quotes and ledger rows
    pub version: String,
}

impl Default for PricingParameters {
    fn default() -> Self {
        Self {
            base_rate: 30.00,
            distance_coefficient: 0.125,
            min_rate: 25.00,
            max_rate: 80.00,
            version: "model_c_v1".to_string(),
        }
    }
}

impl PricingParameters {
    /// Reject parameter sets whose clamp is undefined.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let fields = [
            ("baseRate", self.base_rate),
            ("distanceCoefficient", self.distance_coefficient),
            ("minRate", self.min_rate),
            ("maxRate", self.max_rate),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ParameterError::NonFinite { field });
            }
        }
        if self.min_rate > self.max_rate {
            return Err(ParameterError::InvertedBounds {
                min_rate: self.min_rate,
                max_rate: self.max_rate,
            });
        }
        if self.version.is_empty() {
            return Err(ParameterError::EmptyVersion);
        }
        Ok(())
    }

    /// Rate per parcel for the given distance under these parameters.
    pub fn rate_for(&self, distance_km: f64) -> f64 {
        compute_rate_per_parcel(
            self.base_rate,
            self.distance_coefficient,
            self.min_rate,
            self.max_rate,
            distance_km,
        )
    }
}

/// Compute the rate per parcel for a planned distance.
///
/// `base_rate + distance_coefficient * distance_km`, clamped to
/// `[min_rate, max_rate]`. An unclamped value is rounded half-up to cents;
/// a clamped value is returned as configured. Does not validate its inputs.
pub fn compute_rate_per_parcel(
    base_rate: f64,
    distance_coefficient: f64,
    min_rate: f64,
    max_rate: f64,
    distance_km: f64,
) -> f64 {
    let raw = base_rate + distance_coefficient * distance_km;
    if raw < min_rate {
        return min_rate;
    }
    if raw > max_rate {
        return max_rate;
    }
    round_half_up(raw)
}

/// Total payout for `parcel_count` parcels, rounded independently.
pub fn compute_total_payout(rate_per_parcel: f64, parcel_count: u32) -> f64 {
    round_half_up(rate_per_parcel * f64::from(parcel_count))
}

/// Round to two decimal places, halves rounding up on the cents digit.
pub fn round_half_up(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Convert a two-decimal amount to integer cents.
///
/// `amount * 100` lands within an ulp of an integer for any value produced
/// by [`round_half_up`], so nearest-integer rounding recovers it exactly.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BASE: f64 = 30.00;
    const KM_FACTOR: f64 = 0.125;
    const MIN_RATE: f64 = 25.00;
    const MAX_RATE: f64 = 80.00;

    fn rate(distance_km: f64) -> f64 {
        compute_rate_per_parcel(BASE, KM_FACTOR, MIN_RATE, MAX_RATE, distance_km)
    }

    #[test]
    fn test_rate_at_ten_km() {
        assert_eq!(rate(10.0), 31.25);
    }

    #[test]
    fn test_rate_at_zero_km_is_base() {
        assert_eq!(rate(0.0), 30.00);
    }

    #[test]
    fn test_rate_capped_at_max() {
        assert_eq!(rate(1000.0), 80.00);
    }

    #[test]
    fn test_rate_floored_at_min() {
        // base below the floor: 10 + 0.5 * 4 = 12 < 25
        let r = compute_rate_per_parcel(10.0, 0.5, 25.0, 80.0, 4.0);
        assert_eq!(r, 25.0);
    }

    #[test]
    fn test_rounding_half_up_on_cents() {
        // 30 + 0.125 * 1 = 30.125 -> 30.13
        assert_eq!(rate(1.0), 30.13);
        assert_eq!(round_half_up(1.005_000_1), 1.01);
        assert_eq!(round_half_up(2.344), 2.34);
    }

    #[test]
    fn test_total_payout() {
        assert_eq!(compute_total_payout(31.25, 12), 375.00);
        assert_eq!(compute_total_payout(30.13, 3), 90.39);
    }

    #[test]
    fn test_to_cents_exact() {
        assert_eq!(to_cents(31.25), 3125);
        assert_eq!(to_cents(0.29), 29);
        assert_eq!(to_cents(90.39), 9039);
        assert_eq!(to_cents(80.0), 8000);
    }

    #[test]
    fn test_parameters_rate_for_matches_free_function() {
        let params = PricingParameters::default();
        assert_eq!(params.rate_for(10.0), 31.25);
        assert_eq!(params.rate_for(1000.0), 80.0);
    }

    #[test]
    fn test_default_parameters_validate() {
        assert!(PricingParameters::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let params = PricingParameters {
            min_rate: 90.0,
            ..PricingParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParameterError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn test_non_finite_parameter_rejected() {
        let params = PricingParameters {
            distance_coefficient: f64::NAN,
            ..PricingParameters::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParameterError::NonFinite {
                field: "distanceCoefficient"
            })
        );
    }

    proptest! {
        #[test]
        fn prop_rate_within_bounds(distance in 0.0f64..1_000_000.0) {
            let r = rate(distance);
            prop_assert!(r >= MIN_RATE && r <= MAX_RATE);
        }

        #[test]
        fn prop_rate_non_decreasing(a in 0.0f64..10_000.0, b in 0.0f64..10_000.0) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(rate(near) <= rate(far));
        }

        #[test]
        fn prop_rate_pinned_at_min_below_floor(distance in 0.0f64..100.0) {
            // 10 + 0.1 * d stays under 25 for d < 150
            let r = compute_rate_per_parcel(10.0, 0.1, 25.0, 80.0, distance);
            prop_assert_eq!(r, 25.0);
        }

        #[test]
        fn prop_total_is_rate_times_count(distance in 0.0f64..2_000.0, count in 1u32..10_000) {
            let r = rate(distance);
            let total = compute_total_payout(r, count);
            prop_assert!((total - r * f64::from(count)).abs() <= 0.005 + 1e-9);
        }
    }
}
