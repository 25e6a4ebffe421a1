use actix_web::{middleware, web, App, HttpServer};
use flatchat_api::config::{Settings, StorageBackend};
use flatchat_api::routes::{configure_routes, cors, AppState};
use flatchat_api::services::{CacheManager, MemoryStore, PostgresStore, RecordStore, Records};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(settings: &Settings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

async fn build_store(settings: &Settings) -> std::io::Result<Arc<dyn RecordStore>> {
    match settings.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory record store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let db = &settings.database;
            let store = PostgresStore::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;

            info!(
                "PostgreSQL record store initialized (max: {} connections)",
                db.max_connections.unwrap_or(10)
            );
            Ok(Arc::new(store))
        }
    }
}

async fn build_cache(settings: &Settings) -> CacheManager {
    let ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let Some(redis_url) = settings.cache.redis_url.as_deref() else {
        info!("No Redis configured, using in-process cache only");
        return CacheManager::local(l1_size, ttl);
    };

    match CacheManager::new(redis_url, l1_size, ttl).await {
        Ok(cache) => {
            info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_size, ttl);
            cache
        }
        Err(e) => {
            warn!("Failed to connect to Redis ({}), using in-process cache only", e);
            CacheManager::local(l1_size, ttl)
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings);
    info!("Starting Flatchat API...");

    let store = build_store(&settings).await?;
    let cache = Arc::new(build_cache(&settings).await);

    let app_state = AppState {
        records: Records::new(store),
        cache,
        feed: settings.feed.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
