#![warn(clippy::dbg_macro)]

use std::fmt::Display;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;

use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use url::Url;

use error::{IcondError, IoErrorContext, Result};

mod api;
mod config;
mod document;
mod error;
mod health;
mod icon;
mod ident;
mod metrics;
mod resolver;
mod root;
mod schema;
mod store;
mod template;
mod tls;
mod version;

const SITE_CSS: &str = include_str!("styles/site.css");

const CARGO_NAME: &str = env!("CARGO_PKG_NAME");
const CARGO_VERSION: &str = env!("CARGO_PKG_VERSION");
const CARGO_HOME_PAGE: &str = env!("CARGO_PKG_HOMEPAGE");

/// The single query/mutation endpoint.
const API_ENDPOINT: &str = "/graphql";

#[derive(Debug)]
struct ServerError {
    err: IcondError,
}

impl Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl actix_web::error::ResponseError for ServerError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
    }

    // Internal faults become a generic error envelope; the cause stays in
    // the server log.
    fn error_response(&self) -> HttpResponse {
        log::error!("request failed: {}", self.err);
        HttpResponse::InternalServerError().json(serde_json::json!({
            "errors": [{"message": "Internal server error"}]
        }))
    }
}

impl From<IcondError> for ServerError {
    fn from(err: IcondError) -> ServerError {
        ServerError { err }
    }
}

type ServerResult = std::result::Result<HttpResponse, ServerError>;

async fn inner_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::load()?;
    let enable_compression = config.enable_compression;

    let store = web::Data::new(store::IconStore::new());
    let metrics_data = web::Data::new(metrics::initialize()?);

    log::info!("listening on {}", config.bind);
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Condition::new(
                enable_compression,
                middleware::Compress::default(),
            ))
            .app_data(store.clone())
            .app_data(metrics_data.clone())
            .route("/", web::get().to(root::get))
            .route(API_ENDPOINT, web::post().to(api::post))
            .route(API_ENDPOINT, web::get().to(root::get))
            .route("/schema", web::get().to(schema::get))
            .route("/health", web::get().to(health::get))
            .route("/version", web::get().to(version::get))
            .route("/metrics", web::get().to(metrics::handler))
    })
    // the 5 second default cuts off slow clients doing bulk imports
    .client_request_timeout(Duration::from_secs(30))
    .workers(config.workers)
    .max_connection_rate(config.max_connection_rate);

    let try_url = Url::parse(&config.bind);
    let (bind, uds) = if let Ok(url) = try_url.as_ref() {
        if url.scheme() != "unix" {
            (config.bind.as_str(), false)
        } else if url.host().is_none() {
            (url.path(), true)
        } else {
            return Err(error::ServerError::Startup {
                reason: "Can only bind to file URLs without host portion.".to_string(),
            }
            .into());
        }
    } else {
        (config.bind.as_str(), false)
    };

    server = match (&config.tls_cert_path, &config.tls_key_path) {
        (Some(cert_path), Some(key_path)) => {
            if uds {
                return Err(error::ServerError::Startup {
                    reason: "TLS is not supported with Unix domain sockets.".to_string(),
                }
                .into());
            }
            let tls_config = tls::load_tls_config(cert_path, key_path)?;
            server
                .bind_rustls_0_23(config.bind.clone(), tls_config)
                .io_context("Failed to bind with TLS")?
        }
        (None, None) => {
            if uds {
                let socket_path = Path::new(bind);
                let server = server
                    .bind_uds(socket_path)
                    .io_context("Failed to bind to Unix domain socket")?;
                fs::set_permissions(socket_path, fs::Permissions::from_mode(0o777))
                    .io_context("Failed to set socket permissions")?;
                server
            } else {
                server
                    .bind(config.bind.clone())
                    .io_context("Failed to bind server")?
            }
        }
        _ => {
            return Err(error::ServerError::Startup {
                reason: "tls_cert_path and tls_key_path must be set together.".to_string(),
            }
            .into());
        }
    };

    server.run().await.io_context("Failed to start server")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    inner_main().await.map_err(std::io::Error::other)
}
