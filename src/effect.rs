//! Effects - side effects declared by the reducer

use crate::state::ForecastRequest;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Read the remembered city from storage
    LoadSavedCity,
    /// Fetch the forecast described by `request`
    FetchForecast { request: ForecastRequest, days: u8 },
    /// Remember `city` for the next start
    SaveCity { city: String },
    /// Look up locations matching `query`; `debounce` waits for a quiet period first
    SearchLocations {
        query: String,
        generation: u64,
        debounce: bool,
    },
    /// Drop any pending or running lookup
    CancelSearch,
}
