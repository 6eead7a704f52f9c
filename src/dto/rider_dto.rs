use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::rider::{NewRider, Rider, RiderChanges};
use crate::utils::validation::{empty_as_none, validate_not_blank};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRiderRequest {
    #[validate(length(min = 1, max = 32), custom = "validate_not_blank")]
    pub rider_name: String,
    #[validate(length(min = 1, max = 32), custom = "validate_not_blank")]
    pub rider_motor: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(regex(path = "crate::utils::validation::PHONE_REGEX"))]
    pub rider_phone: Option<String>,
}

impl From<CreateRiderRequest> for NewRider {
    fn from(request: CreateRiderRequest) -> Self {
        Self {
            rider_name: request.rider_name,
            rider_motor: request.rider_motor,
            rider_phone: request.rider_phone,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRiderRequest {
    #[validate(length(min = 1, max = 32), custom = "validate_not_blank")]
    pub rider_name: Option<String>,
    #[validate(length(min = 1, max = 32), custom = "validate_not_blank")]
    pub rider_motor: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(regex(path = "crate::utils::validation::PHONE_REGEX"))]
    pub rider_phone: Option<String>,
}

impl From<UpdateRiderRequest> for RiderChanges {
    fn from(request: UpdateRiderRequest) -> Self {
        Self {
            rider_name: request.rider_name,
            rider_motor: request.rider_motor,
            rider_phone: request.rider_phone,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiderResponse {
    pub id: i64,
    pub rider_name: String,
    pub rider_motor: String,
    pub rider_phone: Option<String>,
    pub created_ts: DateTime<Utc>,
    pub updated_ts: DateTime<Utc>,
}

impl From<Rider> for RiderResponse {
    fn from(rider: Rider) -> Self {
        Self {
            id: rider.id,
            rider_name: rider.rider_name,
            rider_motor: rider.rider_motor,
            rider_phone: rider.rider_phone,
            created_ts: rider.created_ts,
            updated_ts: rider.updated_ts,
        }
    }
}
