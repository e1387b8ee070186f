use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::{ApiError, Result};
use crate::models::{Order, Product, ProductFields, User};

/// Persistence operations used by the resolvers.
///
/// Inserts return the stored document with its generated id filled in.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Fails with `AlreadyRegistered` when the email or username is taken.
    async fn insert_user(&self, user: User) -> Result<User>;

    async fn list_products(&self) -> Result<Vec<Product>>;

    async fn find_product(&self, id: ObjectId) -> Result<Option<Product>>;

    async fn insert_product(&self, fields: ProductFields) -> Result<Product>;

    /// Writes the `Some` fields of `changes` and returns the updated product.
    async fn update_product(&self, id: ObjectId, changes: ProductFields) -> Result<Option<Product>>;

    async fn delete_product(&self, id: ObjectId) -> Result<Option<Product>>;

    async fn insert_order(&self, order: Order) -> Result<Order>;

    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>>;
}

pub fn parse_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| ApiError::InvalidId(id.to_string()))
}
