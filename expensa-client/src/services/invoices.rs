use shared::models::{Invoice, Page, PageQuery};

use crate::api::{ApiClient, ApiError, ApiRequest};

#[derive(Debug, Clone, Copy)]
pub struct InvoiceService<'a> {
    api: &'a ApiClient,
}

impl<'a> InvoiceService<'a> {
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, page: PageQuery) -> Result<Page<Invoice>, ApiError> {
        self.api
            .send(ApiRequest::get("api/invoices").query(page.to_query()))
            .await?
            .json()
    }

    /// Issues an invoice for an approved expense.
    pub async fn generate(&self, expense_id: i64) -> Result<Invoice, ApiError> {
        self.api
            .send(ApiRequest::post(format!("api/invoices/generate/{expense_id}")))
            .await?
            .json()
    }

    /// PDF rendition of an invoice.
    pub async fn download(&self, id: i64) -> Result<Vec<u8>, ApiError> {
        self.api.get_bytes(&format!("api/invoices/{id}/pdf")).await
    }
}
