//! # minihttp - Entry Point
//! src/main.rs
//!
//! Registra las rutas de ejemplo y arranca el servidor.

use minihttp::config::Config;
use minihttp::http::Request;
use minihttp::logging;
use minihttp::router::{Reply, Router};
use minihttp::server::Server;
use serde_json::json;

fn routes() -> Router {
    let mut router = Router::new();

    router.get("/", |_req: &Request| "Hello World");
    router.get("/hello", |_req: &Request| "Hello");
    router.get("/world", |_req: &Request| "World");

    router.post("/echo", |req: &Request| {
        req.body_text().unwrap_or_default().into_owned()
    });

    router.get("/headers", |req: &Request| Reply::json(req.headers()));

    router.get("/status", |_req: &Request| {
        json!({
            "status": "running",
            "version": env!("CARGO_PKG_VERSION"),
        })
    });

    router
}

fn main() {
    let config = Config::new();
    logging::init(&config.log_level);
    config.log_summary();

    let server = match Server::bind(config, routes()) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start server");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!(error = %e, "Fatal error");
        std::process::exit(1);
    }
}
