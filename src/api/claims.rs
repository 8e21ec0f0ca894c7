//! Claim endpoints (`/api/claims`)

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        claim::{ClaimEnvelope, ClaimListResponse, ClaimMutationResponse},
        Claim, ClaimQuery, ClaimUpdate, NewClaim,
    },
};

use super::client::ApiClient;

#[derive(Clone)]
pub struct ClaimsApi {
    client: ApiClient,
}

impl ClaimsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Submit a claim; invalid verification text never leaves the client
    pub async fn create(&self, claim: &NewClaim) -> AppResult<ClaimMutationResponse> {
        claim.validate()?;
        let response: ClaimMutationResponse = self.client.post_json("/api/claims", claim).await?;
        tracing::info!("Claim submitted for item {}", claim.item_id);
        Ok(response)
    }

    /// Own claims for students, every claim for staff
    pub async fn list(&self, query: &ClaimQuery) -> AppResult<Vec<Claim>> {
        let response: ClaimListResponse = self
            .client
            .get_json("/api/claims", query.to_query_pairs())
            .await?;
        Ok(response.claims)
    }

    pub async fn get(&self, claim_id: i64) -> AppResult<Claim> {
        let response: ClaimEnvelope = self
            .client
            .get_json(&format!("/api/claims/{}", claim_id), Vec::new())
            .await?;
        Ok(response.claim)
    }

    pub async fn update_status(
        &self,
        claim_id: i64,
        update: &ClaimUpdate,
    ) -> AppResult<ClaimMutationResponse> {
        self.client
            .patch_json(&format!("/api/claims/{}", claim_id), update)
            .await
            .map_err(|e| match e {
                AppError::Validation(msg) if msg.is_empty() => {
                    AppError::BusinessRule(format!("Cannot move claim to {}", update.status))
                }
                other => other,
            })
    }
}
