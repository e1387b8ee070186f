pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod memory;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schema;
pub mod store;
