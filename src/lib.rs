pub mod api;
pub mod config;
pub mod db;
pub mod decimal;
pub mod error;
pub mod handlers;
pub mod model;
