use std::sync::Arc;

use crate::dto::rider_dto::{CreateRiderRequest, RiderResponse, UpdateRiderRequest};
use crate::repositories::RiderRepository;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct RiderController {
    riders: Arc<dyn RiderRepository>,
}

impl RiderController {
    pub fn new(state: &AppState) -> Self {
        Self {
            riders: state.repositories.riders.clone(),
        }
    }

    pub async fn create(&self, request: CreateRiderRequest) -> AppResult<RiderResponse> {
        Ok(self.riders.create(request.into()).await?.into())
    }

    pub async fn list(&self) -> AppResult<Vec<RiderResponse>> {
        let riders = self.riders.list_all().await?;
        Ok(riders.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: i64) -> AppResult<RiderResponse> {
        self.riders
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| not_found_error("Rider", id))
    }

    pub async fn update(&self, id: i64, request: UpdateRiderRequest) -> AppResult<RiderResponse> {
        self.riders
            .update(id, request.into())
            .await?
            .map(Into::into)
            .ok_or_else(|| not_found_error("Rider", id))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.riders.delete(id).await? {
            return Err(not_found_error("Rider", id));
        }
        log::info!("🗑️ Rider {} deleted", id);
        Ok(())
    }
}
