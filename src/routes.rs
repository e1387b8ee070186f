use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::auth::Identity;
use crate::schema::ShopSchema;

/// Executes a GraphQL request with the caller's `Identity` as context data.
async fn graphql(schema: web::Data<ShopSchema>, http: HttpRequest, req: GraphQLRequest) -> GraphQLResponse {
    let identity = http.extensions().get::<Identity>().cloned().unwrap_or_default();
    schema.execute(req.into_inner().data(identity)).await.into()
}

async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/graphql")
            .route(web::post().to(graphql))
            .route(web::get().to(graphiql)),
    );
}
