use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Slope {
    Flat,
    Moderate,
    Steep,
}

/// Curated reference data about a Marseille neighborhood
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighborhood {
    pub name: String,
    pub borough: String,
    /// Minutes by bike to Saint-Charles station
    pub bike_minutes_station: Option<u32>,
    /// Minutes by bike to the Vieux-Port
    pub bike_minutes_port: Option<u32>,
    pub slope: Option<Slope>,
    pub score: Option<u8>,
    pub notes: Option<String>,
}
