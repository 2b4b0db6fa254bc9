use shared::models::{AnalyticsSummary, DateRange};

use crate::api::{ApiClient, ApiError, ApiRequest};

#[derive(Debug, Clone, Copy)]
pub struct AnalyticsService<'a> {
    api: &'a ApiClient,
}

impl<'a> AnalyticsService<'a> {
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Totals for `range`; an open range covers everything the user may see.
    pub async fn summary(&self, range: DateRange) -> Result<AnalyticsSummary, ApiError> {
        self.api
            .send(ApiRequest::get("api/analytics/summary").query(range.to_query()))
            .await?
            .json()
    }
}
