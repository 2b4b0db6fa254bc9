use shared::models::{Expense, ExpenseFilter, ExpenseRequest, Page, PageQuery};

use crate::api::{ApiClient, ApiError, ApiRequest};

#[derive(Debug, Clone, Copy)]
pub struct ExpenseService<'a> {
    api: &'a ApiClient,
}

impl<'a> ExpenseService<'a> {
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Expenses visible to the signed-in user, newest first.
    pub async fn list(
        &self,
        filter: &ExpenseFilter,
        page: PageQuery,
    ) -> Result<Page<Expense>, ApiError> {
        self.api
            .send(
                ApiRequest::get("api/expenses")
                    .query(filter.to_query())
                    .query(page.to_query()),
            )
            .await?
            .json()
    }

    pub async fn get(&self, id: i64) -> Result<Expense, ApiError> {
        self.api.get_json(&format!("api/expenses/{id}")).await
    }

    pub async fn create(&self, request: &ExpenseRequest) -> Result<Expense, ApiError> {
        self.api.post_json("api/expenses", request).await
    }

    pub async fn update(&self, id: i64, request: &ExpenseRequest) -> Result<Expense, ApiError> {
        self.api
            .put_json(&format!("api/expenses/{id}"), request)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("api/expenses/{id}")).await
    }

    /// Moves a draft into the approval chain.
    pub async fn submit(&self, id: i64) -> Result<Expense, ApiError> {
        self.api
            .send(ApiRequest::post(format!("api/expenses/{id}/submit")))
            .await?
            .json()
    }
}
