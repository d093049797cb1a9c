use rate_engine::QuoteEngine;
use rate_types::pricing::PricingParameters;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: QuoteEngine,
    /// Read-only parameter snapshot; each request takes its own handle
    pub pricing: Arc<PricingParameters>,
}

impl AppState {
    pub fn new(engine: QuoteEngine, pricing: PricingParameters) -> Self {
        Self {
            engine,
            pricing: Arc::new(pricing),
        }
    }
}
