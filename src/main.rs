use std::io;
use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use shop_graphql::auth::TokenService;
use shop_graphql::config::Config;
use shop_graphql::db::{self, MongoStore};
use shop_graphql::memory::MemoryStore;
use shop_graphql::middleware::AuthMiddleware;
use shop_graphql::routes;
use shop_graphql::schema::build_schema;
use shop_graphql::store::Store;

fn startup_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

async fn open_store(config: &Config) -> io::Result<Arc<dyn Store>> {
    if config.uses_memory_store() {
        log::warn!("using in-memory store; data is lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let database = db::connect(&config.database_url, &config.database_name)
        .await
        .map_err(startup_error)?;
    let store = MongoStore::new(&database);
    store.ensure_indexes().await.map_err(startup_error)?;
    log::info!("connected to MongoDB database {}", config.database_name);
    Ok(Arc::new(store))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(startup_error)?;
    log::debug!("{:?}", config);

    let store = open_store(&config).await?;
    let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_hours);
    let schema = build_schema(store, tokens.clone());

    log::info!("listening on {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(schema.clone()))
            .wrap(AuthMiddleware::new(tokens.clone()))
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
