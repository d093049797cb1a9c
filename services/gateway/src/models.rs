use rate_types::quote::QuoteResult;
use serde::Serialize;

/// Wire shape of a priced quote. Amounts are in ZAR.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteResponse {
    #[serde(rename = "ratePerParcelZar")]
    pub rate_per_parcel_zar: f64,
    #[serde(rename = "totalPayoutZar")]
    pub total_payout_zar: f64,
    #[serde(rename = "configVersion")]
    pub config_version: String,
    pub trace: String,
}

impl From<QuoteResult> for QuoteResponse {
    fn from(result: QuoteResult) -> Self {
        Self {
            rate_per_parcel_zar: result.rate_per_parcel,
            total_payout_zar: result.total_payout,
            config_version: result.config_version,
            trace: result.trace,
        }
    }
}
