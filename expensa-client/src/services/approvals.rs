use shared::models::{ApprovalDecision, ApprovalRequest, Page, PageQuery};

use crate::api::{ApiClient, ApiError, ApiRequest};

/// The approval queue of managers and admins.
#[derive(Debug, Clone, Copy)]
pub struct ApprovalService<'a> {
    api: &'a ApiClient,
}

impl<'a> ApprovalService<'a> {
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn pending(&self, page: PageQuery) -> Result<Page<ApprovalRequest>, ApiError> {
        self.api
            .send(ApiRequest::get("api/approvals/pending").query(page.to_query()))
            .await?
            .json()
    }

    pub async fn approve(
        &self,
        id: i64,
        decision: &ApprovalDecision,
    ) -> Result<ApprovalRequest, ApiError> {
        self.api
            .post_json(&format!("api/approvals/{id}/approve"), decision)
            .await
    }

    pub async fn reject(
        &self,
        id: i64,
        decision: &ApprovalDecision,
    ) -> Result<ApprovalRequest, ApiError> {
        self.api
            .post_json(&format!("api/approvals/{id}/reject"), decision)
            .await
    }
}
