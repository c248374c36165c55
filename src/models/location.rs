//! State and district metadata.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub state_id: u32,
    pub state_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatesResponse {
    #[serde(default)]
    pub states: Vec<State>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub district_id: u32,
    pub district_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistrictsResponse {
    #[serde(default)]
    pub districts: Vec<District>,
}
