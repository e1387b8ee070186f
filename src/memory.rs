use std::sync::RwLock;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::{ApiError, Result};
use crate::models::{Order, Product, ProductFields, User};
use crate::store::Store;

/// Process-local store with the same semantics as the MongoDB one.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    products: RwLock<Vec<Product>>,
    orders: RwLock<Vec<Order>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Poisoning only happens if a writer panicked; the data is still usable.
fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(read(&self.users).iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, mut user: User) -> Result<User> {
        let mut users = write(&self.users);
        if users
            .iter()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(ApiError::AlreadyRegistered);
        }
        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(read(&self.products).clone())
    }

    async fn find_product(&self, id: ObjectId) -> Result<Option<Product>> {
        Ok(read(&self.products)
            .iter()
            .find(|p| p.id == Some(id))
            .cloned())
    }

    async fn insert_product(&self, fields: ProductFields) -> Result<Product> {
        let product = Product {
            id: Some(ObjectId::new()),
            fields,
        };
        write(&self.products).push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: ObjectId, changes: ProductFields) -> Result<Option<Product>> {
        let mut products = write(&self.products);
        Ok(products.iter_mut().find(|p| p.id == Some(id)).map(|p| {
            p.fields.apply(changes);
            p.clone()
        }))
    }

    async fn delete_product(&self, id: ObjectId) -> Result<Option<Product>> {
        let mut products = write(&self.products);
        let position = products.iter().position(|p| p.id == Some(id));
        Ok(position.map(|i| products.remove(i)))
    }

    async fn insert_order(&self, mut order: Order) -> Result<Order> {
        order.id = Some(ObjectId::new());
        write(&self.orders).push(order.clone());
        Ok(order)
    }

    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>> {
        Ok(read(&self.orders)
            .iter()
            .filter(|o| o.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, email: &str) -> User {
        User {
            id: None,
            username: username.into(),
            email: email.into(),
            password: "hash".into(),
            is_admin: false,
        }
    }

    #[actix_web::test]
    async fn duplicate_email_or_username_is_rejected() {
        let store = MemoryStore::new();
        let stored = store.insert_user(user("ada", "ada@example.com")).await.unwrap();
        assert!(stored.id.is_some());

        let err = store.insert_user(user("other", "ada@example.com")).await.unwrap_err();
        assert!(matches!(err, ApiError::AlreadyRegistered));
        let err = store.insert_user(user("ada", "other@example.com")).await.unwrap_err();
        assert!(matches!(err, ApiError::AlreadyRegistered));
    }

    #[actix_web::test]
    async fn update_and_delete_missing_product() {
        let store = MemoryStore::new();
        let missing = ObjectId::new();
        assert!(store
            .update_product(missing, ProductFields::default())
            .await
            .unwrap()
            .is_none());
        assert!(store.delete_product(missing).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn orders_are_filtered_by_user() {
        let store = MemoryStore::new();
        for owner in ["a", "b", "a"] {
            store
                .insert_order(Order {
                    user_id: Some(owner.into()),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        assert_eq!(store.orders_for_user("a").await.unwrap().len(), 2);
        assert!(store.orders_for_user("c").await.unwrap().is_empty());
    }
}
