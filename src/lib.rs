#![doc = "The `todolist_api` library crate."]
#![doc = ""]
#![doc = "A personal to-do list backend: user registration and login issuing signed"]
#![doc = "tokens, and task CRUD where every operation is scoped to the token's user."]
#![doc = "The binary (`main.rs`) wires these pieces into an actix-web server."]

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod tasks;

pub use app::AppState;
pub use config::Config;
pub use error::AppError;
