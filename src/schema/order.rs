use async_graphql::{Context, Object, Result, ResultExt, ID};
use serde_json::json;

use super::{require_auth, store};
use crate::models::{order_date, Order};

#[Object]
impl Order {
    async fn id(&self) -> Option<ID> {
        self.id.map(|id| ID(id.to_hex()))
    }
    async fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
    async fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }
    async fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }
    async fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
    async fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }
    async fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }
    async fn zip_code(&self) -> Option<&str> {
        self.zip_code.as_deref()
    }
    async fn total_amount(&self) -> Option<f64> {
        self.total_amount
    }
    /// Line items, stored as an opaque client string.
    async fn items(&self) -> Option<&str> {
        self.items.as_deref()
    }
    async fn created_date(&self) -> &str {
        &self.created_date
    }
}

#[derive(Default)]
pub struct OrderQuery;

#[Object]
impl OrderQuery {
    /// Orders placed by user `id`, defaulting to the caller. Requires a valid
    /// bearer token.
    async fn get_all_orders(&self, ctx: &Context<'_>, id: Option<ID>) -> Result<Vec<Order>> {
        let claims = require_auth(ctx)?;
        let user_id = id.map(|id| id.0).unwrap_or_else(|| claims.id.clone());
        store(ctx).orders_for_user(&user_id).await.extend()
    }
}

#[derive(Default)]
pub struct OrderMutation;

#[Object]
impl OrderMutation {
    /// Stores an order and returns `{"message":"success"}` as a JSON string.
    #[allow(clippy::too_many_arguments)]
    async fn create_order(
        &self,
        ctx: &Context<'_>,
        user_id: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        address: Option<String>,
        city: Option<String>,
        country: Option<String>,
        zip_code: Option<String>,
        total_amount: Option<f64>,
        items: Option<String>,
    ) -> Result<String> {
        let order = Order {
            id: None,
            user_id,
            first_name,
            last_name,
            address,
            city,
            country,
            zip_code,
            total_amount,
            items,
            created_date: order_date(chrono::Local::now()),
        };
        let order = store(ctx).insert_order(order).await.extend()?;
        log::info!("created order {:?} for user {:?}", order.id, order.user_id);
        Ok(json!({ "message": "success" }).to_string())
    }
}
