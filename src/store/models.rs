use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One captured car-purchase inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub id: String,
    pub car_number: String,
    pub car_model: String,
    pub phone_number: String,
    pub timestamp: DateTime<Utc>,
}

impl LeadRecord {
    /// Builds a record with a fresh id, stamped with the current time.
    pub fn new(car_number: String, car_model: String, phone_number: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            car_number,
            car_model,
            phone_number,
            timestamp: Utc::now(),
        }
    }
}

/// Orders records newest first. Equal timestamps keep the later insertion on top.
pub fn sort_newest_first(mut records: Vec<LeadRecord>) -> Vec<LeadRecord> {
    records.reverse();
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}
