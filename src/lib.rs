pub mod config;
pub mod data;
pub mod features;
pub mod handlers;
pub mod schema;
