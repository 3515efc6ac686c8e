pub mod book;
pub mod cli_args;
pub mod error;
mod extractor;
mod middleware;
mod openapi;
mod route;
pub mod schema;
pub mod server;
pub mod state;
pub mod store;
pub mod traits;
mod utils;
