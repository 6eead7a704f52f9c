//! Rider model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Rider - maps to the riders table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rider {
    pub id: i64,
    pub rider_name: String,
    pub rider_motor: String,
    pub rider_phone: Option<String>,
    pub created_ts: DateTime<Utc>,
    pub updated_ts: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRider {
    pub rider_name: String,
    pub rider_motor: String,
    pub rider_phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RiderChanges {
    pub rider_name: Option<String>,
    pub rider_motor: Option<String>,
    pub rider_phone: Option<String>,
}

impl RiderChanges {
    pub fn apply(self, mut rider: Rider) -> Rider {
        if let Some(v) = self.rider_name {
            rider.rider_name = v;
        }
        if let Some(v) = self.rider_motor {
            rider.rider_motor = v;
        }
        if self.rider_phone.is_some() {
            rider.rider_phone = self.rider_phone;
        }
        rider
    }
}
