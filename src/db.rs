use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::error::{ApiError, Result};
use crate::models::{Order, Product, ProductFields, User};
use crate::store::Store;

const DUPLICATE_KEY: i32 = 11000;

pub async fn connect(database_url: &str, database_name: &str) -> Result<Database> {
    let client_options = ClientOptions::parse(database_url).await?;
    let client = Client::with_options(client_options)?;
    Ok(client.database(database_name))
}

/// `Store` backed by the `users`, `products` and `orders` collections.
#[derive(Clone)]
pub struct MongoStore {
    users: Collection<User>,
    products: Collection<Product>,
    orders: Collection<Order>,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        MongoStore {
            users: db.collection("users"),
            products: db.collection("products"),
            orders: db.collection("orders"),
        }
    }

    /// Creates the unique indexes on `users.email` and `users.username`.
    pub async fn ensure_indexes(&self) -> Result<()> {
        for field in ["email", "username"] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();
            self.users.create_index(index, None).await?;
        }
        Ok(())
    }
}

/// `$set` body for a partial product update, or `None` when nothing changes.
fn product_changes(changes: &ProductFields) -> Result<Option<Document>> {
    let set = bson::to_document(changes)?;
    Ok(if set.is_empty() { None } else { Some(set) })
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl Store for MongoStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }, None).await?)
    }

    async fn insert_user(&self, mut user: User) -> Result<User> {
        match self.users.insert_one(&user, None).await {
            Ok(result) => {
                user.id = result.inserted_id.as_object_id();
                Ok(user)
            }
            Err(e) if is_duplicate_key(&e) => Err(ApiError::AlreadyRegistered),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let cursor = self.products.find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_product(&self, id: ObjectId) -> Result<Option<Product>> {
        Ok(self.products.find_one(doc! { "_id": id }, None).await?)
    }

    async fn insert_product(&self, fields: ProductFields) -> Result<Product> {
        let mut product = Product { id: None, fields };
        let result = self.products.insert_one(&product, None).await?;
        product.id = result.inserted_id.as_object_id();
        Ok(product)
    }

    async fn update_product(&self, id: ObjectId, changes: ProductFields) -> Result<Option<Product>> {
        let Some(set) = product_changes(&changes)? else {
            return self.find_product(id).await;
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .products
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await?)
    }

    async fn delete_product(&self, id: ObjectId) -> Result<Option<Product>> {
        Ok(self.products.find_one_and_delete(doc! { "_id": id }, None).await?)
    }

    async fn insert_order(&self, mut order: Order) -> Result<Order> {
        let result = self.orders.insert_one(&order, None).await?;
        order.id = result.inserted_id.as_object_id();
        Ok(order)
    }

    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>> {
        let cursor = self.orders.find(doc! { "userId": user_id }, None).await?;
        Ok(cursor.try_collect().await?)
    }
}
