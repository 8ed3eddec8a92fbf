pub mod config;
mod http_layers;
mod release_routes;
pub mod serializers;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use release_routes::RELEASES_PATH;
pub use server::{make_app, run_server};
