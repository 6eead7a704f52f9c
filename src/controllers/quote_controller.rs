use std::sync::Arc;

use crate::dto::quote_dto::{CreateQuoteRequest, QuoteResponse, UpdateQuoteRequest};
use crate::middleware::access::Requester;
use crate::models::quote::Quote;
use crate::repositories::QuoteRepository;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct QuoteController {
    quotes: Arc<dyn QuoteRepository>,
}

impl QuoteController {
    pub fn new(state: &AppState) -> Self {
        Self {
            quotes: state.repositories.quotes.clone(),
        }
    }

    /// Loads a quote and checks that the requester may touch it
    async fn owned(&self, id: i64, requester: &Requester, operation: &str) -> AppResult<Quote> {
        let quote = self
            .quotes
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Quote", id))?;
        requester.ensure_owner_or_staff(quote.user_id, operation)?;
        Ok(quote)
    }

    pub async fn submit(
        &self,
        requester: &Requester,
        request: CreateQuoteRequest,
    ) -> AppResult<QuoteResponse> {
        let quote = self.quotes.create(requester.account_id, request.into()).await?;
        Ok(quote.into())
    }

    /// Staff sees every quote, a client only its own
    pub async fn list(&self, requester: &Requester) -> AppResult<Vec<QuoteResponse>> {
        let quotes = if requester.is_staff {
            self.quotes.list_all().await?
        } else {
            self.quotes.list_by_owner(requester.account_id).await?
        };
        Ok(quotes.into_iter().map(Into::into).collect())
    }

    pub async fn list_all(&self) -> AppResult<Vec<QuoteResponse>> {
        let quotes = self.quotes.list_all().await?;
        Ok(quotes.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: i64, requester: &Requester) -> AppResult<QuoteResponse> {
        Ok(self.owned(id, requester, "read quote").await?.into())
    }

    pub async fn update(
        &self,
        id: i64,
        requester: &Requester,
        request: UpdateQuoteRequest,
    ) -> AppResult<QuoteResponse> {
        self.owned(id, requester, "update quote").await?;
        let quote = self
            .quotes
            .update(id, request.into())
            .await?
            .ok_or_else(|| not_found_error("Quote", id))?;
        Ok(quote.into())
    }

    pub async fn delete(&self, id: i64, requester: &Requester) -> AppResult<()> {
        self.owned(id, requester, "delete quote").await?;
        if !self.quotes.delete(id).await? {
            return Err(not_found_error("Quote", id));
        }
        log::info!("🗑️ Quote {} deleted by account {}", id, requester.account_id);
        Ok(())
    }
}
