//! Center and session records from the appointment availability API.

use serde::{Deserialize, Serialize};

/// A vaccination center with its sessions for the queried week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Center {
    #[serde(default)]
    pub center_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub state_name: String,
    #[serde(default)]
    pub district_name: String,
    #[serde(default)]
    pub block_name: String,
    #[serde(default)]
    pub pincode: u32,
    /// Opening time, "HH:MM:SS"
    #[serde(default)]
    pub from: String,
    /// Closing time, "HH:MM:SS"
    #[serde(default)]
    pub to: String,
    /// "Free" or "Paid"
    #[serde(default)]
    pub fee_type: String,
    pub sessions: Vec<Session>,
}

/// One day's offering at a center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub session_id: String,
    /// "dd-mm-YYYY"
    pub date: String,
    pub available_capacity: u32,
    #[serde(default)]
    pub available_capacity_dose1: u32,
    #[serde(default)]
    pub available_capacity_dose2: u32,
    pub min_age_limit: u32,
    #[serde(default)]
    pub vaccine: String,
    #[serde(default)]
    pub slots: Vec<String>,
}

/// Response of the seven-day calendar endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarResponse {
    #[serde(default)]
    pub centers: Vec<Center>,
}

/// A single-day session row. The single-day endpoints return the center
/// fields inline on every session rather than nesting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySession {
    #[serde(default)]
    pub center_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub state_name: String,
    #[serde(default)]
    pub district_name: String,
    #[serde(default)]
    pub block_name: String,
    #[serde(default)]
    pub pincode: u32,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub fee_type: String,
    #[serde(flatten)]
    pub session: Session,
}

/// Response of the single-day endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaySessionsResponse {
    #[serde(default)]
    pub sessions: Vec<DaySession>,
}

impl DaySessionsResponse {
    /// Regroup the flat rows into centers, keeping first-seen order.
    pub fn into_centers(self) -> Vec<Center> {
        let mut centers: Vec<Center> = Vec::new();

        for row in self.sessions {
            if let Some(center) = centers.iter_mut().find(|c| c.center_id == row.center_id) {
                center.sessions.push(row.session);
                continue;
            }
            centers.push(Center {
                center_id: row.center_id,
                name: row.name,
                address: row.address,
                state_name: row.state_name,
                district_name: row.district_name,
                block_name: row.block_name,
                pincode: row.pincode,
                from: row.from,
                to: row.to,
                fee_type: row.fee_type,
                sessions: vec![row.session],
            });
        }

        centers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_response_parses_api_shape() {
        let json = r#"{
            "centers": [{
                "center_id": 1234,
                "name": "District General Hospital",
                "address": "45 M G Road",
                "state_name": "Maharashtra",
                "district_name": "Mumbai",
                "block_name": "Ward K",
                "pincode": 400067,
                "lat": 28,
                "long": 77,
                "from": "09:00:00",
                "to": "18:00:00",
                "fee_type": "Free",
                "sessions": [{
                    "session_id": "3fa85f64",
                    "date": "04-05-2021",
                    "available_capacity": 50,
                    "min_age_limit": 18,
                    "vaccine": "COVISHIELD",
                    "slots": ["FORENOON", "AFTERNOON"]
                }]
            }]
        }"#;

        let response: CalendarResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.centers.len(), 1);
        let center = &response.centers[0];
        assert_eq!(center.pincode, 400067);
        assert_eq!(center.fee_type, "Free");
        assert_eq!(center.sessions[0].available_capacity, 50);
        assert_eq!(center.sessions[0].available_capacity_dose1, 0);
        assert_eq!(center.sessions[0].slots.len(), 2);
    }

    #[test]
    fn test_missing_centers_key_is_empty() {
        let response: CalendarResponse = serde_json::from_str("{}").unwrap();
        assert!(response.centers.is_empty());
    }

    #[test]
    fn test_day_sessions_group_by_center() {
        let json = r#"{
            "sessions": [
                {"center_id": 1, "name": "A", "date": "04-05-2021", "available_capacity": 3, "min_age_limit": 18, "vaccine": "COVAXIN"},
                {"center_id": 2, "name": "B", "date": "04-05-2021", "available_capacity": 0, "min_age_limit": 45, "vaccine": "COVISHIELD"},
                {"center_id": 1, "name": "A", "date": "04-05-2021", "available_capacity": 7, "min_age_limit": 45, "vaccine": "COVISHIELD"}
            ]
        }"#;

        let response: DaySessionsResponse = serde_json::from_str(json).unwrap();
        let centers = response.into_centers();
        assert_eq!(centers.len(), 2);
        assert_eq!(centers[0].name, "A");
        assert_eq!(centers[0].sessions.len(), 2);
        assert_eq!(centers[0].sessions[1].available_capacity, 7);
        assert_eq!(centers[1].name, "B");
    }
}
