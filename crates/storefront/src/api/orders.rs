//! Order placement and order history.

use reqwest::StatusCode;
use tracing::{info, instrument, warn};

use super::types::{OrderConfirmation, OrderHistory, OrderRequest, Placement, ServerErrorBody};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Place an order.
    ///
    /// A 500 response whose body still reports the order as created
    /// (`order_id` or `success`) yields [`Placement::CreatedWithServerError`]
    /// rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when the session is missing or
    /// expired, [`ApiError::Api`] for any other non-success status, or an
    /// HTTP/parse error.
    #[instrument(skip(self, order), fields(user = %order.user, lines = order.items.len()))]
    pub async fn place_order(&self, order: &OrderRequest) -> Result<Placement, ApiError> {
        let url = self.endpoint("api/orders/place/")?;
        let response = self.post(url).json(order).send().await?;

        if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
            let body = response.text().await.unwrap_or_default();
            let reported = serde_json::from_str::<ServerErrorBody>(&body).unwrap_or_default();
            if reported.reports_created() {
                warn!(order_id = ?reported.order_id, "order created despite server error");
                return Ok(Placement::CreatedWithServerError {
                    order_id: reported.order_id,
                });
            }
            return Err(ApiError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                message: super::detail_message(&body),
            });
        }

        let response = Self::check(response).await?;
        let confirmation: OrderConfirmation = Self::json(response).await?;
        info!(order_id = %confirmation.id, total = %confirmation.total_amount, "order placed");
        Ok(Placement::Confirmed(confirmation))
    }

    /// Orders of the logged-in user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] without a session, or another error
    /// if the request fails.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<OrderHistory, ApiError> {
        let url = self.endpoint("api/orders/mine/")?;
        let response = Self::check(self.get(url).send().await?).await?;
        Self::json(response).await
    }
}
