pub mod config;
pub mod database;
pub mod error;
pub mod etl;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod sqlgen;
