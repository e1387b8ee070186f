use async_graphql::{Context, Object, Result, ResultExt, ID};

use super::{require_auth, store};
use crate::models::{Product, ProductFields};
use crate::store::parse_id;

#[Object]
impl Product {
    async fn id(&self) -> Option<ID> {
        self.id.map(|id| ID(id.to_hex()))
    }
    async fn title(&self) -> Option<&str> {
        self.fields.title.as_deref()
    }
    async fn brand(&self) -> Option<&str> {
        self.fields.brand.as_deref()
    }
    async fn category(&self) -> Option<&str> {
        self.fields.category.as_deref()
    }
    async fn description(&self) -> Option<&str> {
        self.fields.description.as_deref()
    }
    async fn discount_percentage(&self) -> Option<f64> {
        self.fields.discount_percentage
    }
    /// Image URLs as the client supplied them.
    async fn images(&self) -> Option<&str> {
        self.fields.images.as_deref()
    }
    async fn price(&self) -> Option<f64> {
        self.fields.price
    }
    async fn rating(&self) -> Option<f64> {
        self.fields.rating
    }
    async fn stock(&self) -> Option<i32> {
        self.fields.stock
    }
    async fn thumbnail(&self) -> Option<&str> {
        self.fields.thumbnail.as_deref()
    }
}

#[derive(Default)]
pub struct ProductQuery;

#[Object]
impl ProductQuery {
    /// Every product. Requires a valid bearer token.
    async fn get_all_product(&self, ctx: &Context<'_>) -> Result<Vec<Product>> {
        require_auth(ctx)?;
        store(ctx).list_products().await.extend()
    }

    // No authentication check here, unlike getAllProduct.
    async fn get_product(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Product>> {
        let id = parse_id(&id).extend()?;
        store(ctx).find_product(id).await.extend()
    }
}

#[derive(Default)]
pub struct ProductMutation;

#[Object]
impl ProductMutation {
    #[allow(clippy::too_many_arguments)]
    async fn create_product(
        &self,
        ctx: &Context<'_>,
        title: Option<String>,
        brand: Option<String>,
        category: Option<String>,
        description: Option<String>,
        discount_percentage: Option<f64>,
        images: Option<String>,
        price: Option<f64>,
        rating: Option<f64>,
        stock: Option<i32>,
        thumbnail: Option<String>,
    ) -> Result<Product> {
        let fields = ProductFields {
            title,
            brand,
            category,
            description,
            discount_percentage,
            images,
            price,
            rating,
            stock,
            thumbnail,
        };
        let product = store(ctx).insert_product(fields).await.extend()?;
        log::info!("created product {:?}", product.id);
        Ok(product)
    }

    /// Overwrites the supplied fields; returns null when the id is unknown.
    #[allow(clippy::too_many_arguments)]
    async fn update_product(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: Option<String>,
        brand: Option<String>,
        category: Option<String>,
        description: Option<String>,
        discount_percentage: Option<f64>,
        images: Option<String>,
        price: Option<f64>,
        rating: Option<f64>,
        stock: Option<i32>,
        thumbnail: Option<String>,
    ) -> Result<Option<Product>> {
        let id = parse_id(&id).extend()?;
        let changes = ProductFields {
            title,
            brand,
            category,
            description,
            discount_percentage,
            images,
            price,
            rating,
            stock,
            thumbnail,
        };
        store(ctx).update_product(id, changes).await.extend()
    }

    /// Returns the removed product, or null when nothing matched.
    async fn delete_product(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Product>> {
        let id = parse_id(&id).extend()?;
        let removed = store(ctx).delete_product(id).await.extend()?;
        if removed.is_some() {
            log::info!("deleted product {}", id);
        }
        Ok(removed)
    }
}
