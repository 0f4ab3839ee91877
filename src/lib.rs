pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod plans;
pub mod redemption;
pub mod util;
