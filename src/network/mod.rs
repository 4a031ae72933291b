pub mod cors;
pub mod routes;
pub mod server;

pub use cors::{CorsLayer, CorsPolicy};
pub use routes::router;
pub use server::Server;
