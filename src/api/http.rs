use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{ApiError, LoginRequest, LoginResponse, ProductDraft, StockPatch, StorefrontApi};
use crate::domain::{CategoryRef, NewOrder, Order, Product, ProductId};

/// `reqwest`-backed implementation of [`StorefrontApi`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    http: Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn product_url(&self, id: ProductId) -> String {
        self.url(&format!("/api/products/{id}/"))
    }

    fn authorized(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header(reqwest::header::AUTHORIZATION, format!("Token {token}"))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(status = %status, "Received response");

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let error = status_error(status, text);
        warn!(error = %error, "Backend rejected request");
        Err(error)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Like [`send_json`](Self::send_json) for list endpoints, except that a
    /// malformed record is logged and skipped instead of failing the list.
    async fn send_list<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Vec<T>, ApiError> {
        let items: Vec<serde_json::Value> = self.send_json(builder).await?;
        Ok(decode_items(items))
    }
}

fn decode_items<T: DeserializeOwned>(items: Vec<serde_json::Value>) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect()
}

fn status_error(status: StatusCode, body: String) -> ApiError {
    let message = error_message(&body).unwrap_or(body);
    ApiError::Status { status, message }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Human-readable message from an error body, if the backend sent one.
fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.message.or(parsed.detail).or(parsed.error)
}

#[async_trait]
impl StorefrontApi for HttpApi {
    #[instrument(skip(self, request), fields(username = %request.username))]
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        debug!("Sending request");
        let builder = self.http.post(self.url("/api/login/")).json(&request);
        self.send_json(builder).await
    }

    #[instrument(skip(self, token))]
    async fn forgot_password(&self, token: &str, email: &str) -> Result<(), ApiError> {
        debug!("Sending request");
        let body = serde_json::json!({ "email": email });
        let builder = self.http.post(self.url("/api/forgot-password/")).json(&body);
        self.send(self.authorized(builder, token)).await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn list_products(&self, token: &str) -> Result<Vec<Product>, ApiError> {
        debug!("Sending request");
        let builder = self.http.get(self.url("/api/products/"));
        self.send_list(self.authorized(builder, token)).await
    }

    #[instrument(skip(self, token, draft), fields(title = %draft.title))]
    async fn create_product(&self, token: &str, draft: ProductDraft) -> Result<Product, ApiError> {
        debug!("Sending request");
        let builder = self.http.post(self.url("/api/products/")).json(&draft);
        self.send_json(self.authorized(builder, token)).await
    }

    #[instrument(skip(self, token, draft), fields(title = %draft.title))]
    async fn update_product(
        &self,
        token: &str,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, ApiError> {
        debug!("Sending request");
        let builder = self
            .http
            .patch(self.product_url(id))
            .json(&draft);
        self.send_json(self.authorized(builder, token)).await
    }

    #[instrument(skip(self, token))]
    async fn delete_product(&self, token: &str, id: ProductId) -> Result<(), ApiError> {
        debug!("Sending request");
        let builder = self.http.delete(self.product_url(id));
        self.send(self.authorized(builder, token)).await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn update_stock(&self, token: &str, id: ProductId, patch: StockPatch) -> Result<(), ApiError> {
        debug!("Sending request");
        let builder = self
            .http
            .patch(self.product_url(id))
            .json(&patch);
        self.send(self.authorized(builder, token)).await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn list_categories(&self, token: &str) -> Result<Vec<CategoryRef>, ApiError> {
        debug!("Sending request");
        let builder = self.http.get(self.url("/api/category/"));
        self.send_list(self.authorized(builder, token)).await
    }

    #[instrument(skip(self, token))]
    async fn list_orders(&self, token: &str) -> Result<Vec<Order>, ApiError> {
        debug!("Sending request");
        let builder = self.http.get(self.url("/api/orders/"));
        self.send_list(self.authorized(builder, token)).await
    }

    #[instrument(skip(self, token, order), fields(product_id = order.product_id, quantity = order.quantity))]
    async fn create_order(&self, token: &str, order: NewOrder) -> Result<(), ApiError> {
        debug!("Sending request");
        let builder = self.http.post(self.url("/api/orders/")).json(&order);
        self.send(self.authorized(builder, token)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = HttpApi::new("http://localhost:8000/");
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url("/api/orders/"), "http://localhost:8000/api/orders/");
    }

    #[test]
    fn authenticated_requests_carry_token_header_and_exact_paths() -> TestResult {
        let api = HttpApi::new("http://shop.test");

        let orders = api
            .authorized(api.http.get(api.url("/api/orders/")), "abc123")
            .build()?;
        assert_eq!(orders.method(), reqwest::Method::GET);
        assert_eq!(orders.url().as_str(), "http://shop.test/api/orders/");
        assert_eq!(
            orders
                .headers()
                .get(reqwest::header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok()),
            Some("Token abc123")
        );

        let patch = api
            .authorized(api.http.patch(api.product_url(42)), "abc123")
            .json(&StockPatch { stock: 17 })
            .build()?;
        assert_eq!(patch.url().as_str(), "http://shop.test/api/products/42/");
        let body = patch.body().and_then(|body| body.as_bytes()).unwrap_or_default();
        assert_eq!(serde_json::from_slice::<serde_json::Value>(body)?, serde_json::json!({"stock": 17}));
        Ok(())
    }

    #[test]
    fn non_success_status_maps_to_status_error_with_body_message() {
        let error = status_error(StatusCode::BAD_REQUEST, r#"{"detail": "Out of stock"}"#.to_string());
        assert!(matches!(
            &error,
            ApiError::Status { status, message } if *status == StatusCode::BAD_REQUEST && message == "Out of stock"
        ));

        let error = status_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert!(matches!(&error, ApiError::Status { message, .. } if message == "upstream down"));
    }

    #[test]
    fn malformed_list_records_are_skipped() {
        let items = vec![
            serde_json::json!({"id": 1, "title": "Pen"}),
            serde_json::json!("not an object"),
            serde_json::json!({"id": 3, "price": "", "stock": null}),
        ];

        let products: Vec<crate::domain::Product> = decode_items(items);

        let ids: Vec<_> = products.iter().filter_map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn error_message_prefers_message_then_detail_then_error() {
        assert_eq!(
            error_message(r#"{"message": "bad login", "detail": "x"}"#).as_deref(),
            Some("bad login")
        );
        assert_eq!(error_message(r#"{"detail": "Not found."}"#).as_deref(), Some("Not found."));
        assert_eq!(error_message(r#"{"error": "nope"}"#).as_deref(), Some("nope"));
        assert_eq!(error_message("<html>oops</html>"), None);
    }
}
