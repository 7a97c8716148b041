use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use cofounder_algo::config::{Settings, StorageBackend};
use cofounder_algo::core::Matcher;
use cofounder_algo::logging;
use cofounder_algo::routes::{self, matches::AppState};
use cofounder_algo::services::{DocumentStoreClient, MatchService, PostgresProfileStore, ProfileSource};
use std::io;
use std::sync::Arc;
use tracing::{info, error};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init(&Default::default());
            return Err(startup_error("Failed to load configuration", e));
        }
    };

    logging::init(&settings.logging);

    info!("Starting Cofounder Algo matching service...");
    info!("Configuration loaded successfully (storage backend: {:?})", settings.storage.backend);

    match settings.storage.backend {
        StorageBackend::Postgres => {
            let database = settings
                .database
                .clone()
                .ok_or_else(|| startup_error("Missing configuration", "[database] section is required"))?;
            let store = PostgresProfileStore::from_settings(
                &database.url,
                database.max_connections,
                database.min_connections,
                database.acquire_timeout_secs,
                database.idle_timeout_secs,
            )
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

            info!("PostgreSQL profile store initialized");
            serve(settings, store).await
        }
        StorageBackend::DocumentStore => {
            let document_store = settings
                .document_store
                .as_ref()
                .ok_or_else(|| startup_error("Missing configuration", "[document_store] section is required"))?;
            let store = DocumentStoreClient::new(document_store.to_client_config())
                .map_err(|e| startup_error("Failed to create document store client", e))?;

            info!("Document store client initialized");
            serve(settings, store).await
        }
    }
}

async fn serve<S: ProfileSource + 'static>(settings: Settings, store: S) -> io::Result<()> {
    let matcher = Matcher::new(settings.matching.rank_options());
    let defaults = settings.match_defaults();

    info!("Matcher initialized with weights: {:?}", defaults.weights);

    let app_state = AppState {
        service: Arc::new(MatchService::new(store, matcher, defaults)),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes::<S>)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
