use shared::models::{AuditEntry, AuditFilter, Page, PageQuery};

use crate::api::{ApiClient, ApiError, ApiRequest};

#[derive(Debug, Clone, Copy)]
pub struct AuditService<'a> {
    api: &'a ApiClient,
}

impl<'a> AuditService<'a> {
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(
        &self,
        filter: &AuditFilter,
        page: PageQuery,
    ) -> Result<Page<AuditEntry>, ApiError> {
        self.api
            .send(
                ApiRequest::get("api/audit-logs")
                    .query(page.to_query())
                    .query(filter.to_query()),
            )
            .await?
            .json()
    }
}
