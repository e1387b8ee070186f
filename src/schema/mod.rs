//! GraphQL schema: object types plus the query and mutation roots.
//!
//! Query: `getAllProduct`, `getProduct`, `getAllOrders`
//! Mutation: `createProduct`, `updateProduct`, `deleteProduct`,
//! `createOrder`, `createUser`, `loginUser`

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, MergedObject, ResultExt, Schema};

use crate::auth::{Claims, Identity, TokenService};
use crate::error::ApiError;
use crate::store::Store;

mod order;
mod product;
mod user;

pub use order::{OrderMutation, OrderQuery};
pub use product::{ProductMutation, ProductQuery};
pub use user::UserMutation;

#[derive(MergedObject, Default)]
#[graphql(name = "RootQueryType")]
pub struct QueryRoot(ProductQuery, OrderQuery);

#[derive(MergedObject, Default)]
#[graphql(name = "Mutation")]
pub struct MutationRoot(ProductMutation, OrderMutation, UserMutation);

pub type ShopSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(store: Arc<dyn Store>, tokens: TokenService) -> ShopSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(store)
        .data(tokens)
        .finish()
}

fn store<'a>(ctx: &Context<'a>) -> &'a Arc<dyn Store> {
    ctx.data_unchecked::<Arc<dyn Store>>()
}

fn tokens<'a>(ctx: &Context<'a>) -> &'a TokenService {
    ctx.data_unchecked::<TokenService>()
}

/// Claims of the caller, or `Unauthenticated`. Requests executed without an
/// `Identity` attached count as anonymous.
fn require_auth<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Claims> {
    match ctx.data_opt::<Identity>() {
        Some(identity) => identity.require().extend(),
        None => Err(ApiError::Unauthenticated).extend(),
    }
}
