pub mod app;
pub mod config;
pub mod database;
pub mod http;
pub mod models;
pub mod services;
pub mod types;
pub mod util;

pub use app::App;
