use async_graphql::{Context, Object, Result, ResultExt};
use serde_json::json;

use super::{store, tokens};
use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;
use crate::models::User;

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Registers an account and returns `{"token", "id", "isAdmin"}` as a
    /// JSON string.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        password: String,
        is_admin: Option<bool>,
    ) -> Result<String> {
        let store = store(ctx);
        if store.find_user_by_email(&email).await.extend()?.is_some() {
            return Err(ApiError::AlreadyRegistered).extend();
        }

        let user = User {
            id: None,
            username,
            email,
            password: hash_password(password).await.extend()?,
            is_admin: is_admin.unwrap_or(false),
        };
        let user = store.insert_user(user).await.extend()?;
        let id = user.id.map(|id| id.to_hex()).unwrap_or_default();
        log::info!("registered user {}", id);

        let token = tokens(ctx).issue(&id, user.is_admin).extend()?;
        Ok(json!({ "token": token, "id": id, "isAdmin": user.is_admin }).to_string())
    }

    /// Returns `{"token", "userId", "isAdmin"}` as a JSON string.
    async fn login_user(&self, ctx: &Context<'_>, email: String, password: String) -> Result<String> {
        let user = store(ctx)
            .find_user_by_email(&email)
            .await
            .extend()?
            .ok_or(ApiError::UnknownEmail)
            .extend()?;

        if !verify_password(user.password.clone(), password).await.extend()? {
            return Err(ApiError::InvalidPassword).extend();
        }

        let id = user.id.map(|id| id.to_hex()).unwrap_or_default();
        let token = tokens(ctx).issue(&id, user.is_admin).extend()?;
        Ok(json!({ "token": token, "userId": id, "isAdmin": user.is_admin }).to_string())
    }
}
