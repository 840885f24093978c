use actix_web::{web, App, HttpServer};
use gradebook::backup::spawn_backup_job;
use gradebook::config::db::DbProfile;
use gradebook::config::AppConfig;
use gradebook::infra::state::build_state;
use gradebook::middleware::cors::cors_middleware;
use gradebook::middleware::request_trace::RequestTrace;
use gradebook::middleware::structured_logger::StructuredLogger;
use gradebook::routes;
use gradebook::services::seed::ensure_seed_teacher;
use gradebook::telemetry::init_tracing;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Environment variables must be set by the runtime environment:
    // - Docker: env_file / --env-file
    // - Local dev: source an env file (set -a; . ./.env; set +a)
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let telemetry = match init_tracing(&config.log) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("❌ Failed to initialise logging: {e}");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_db(config.db_kind, DbProfile::Prod)
        .with_security(config.security.clone())
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };
    info!(db_kind = ?config.db_kind, "Database connected");

    let shutdown = CancellationToken::new();
    let mut backup_job = None;
    if let Some(db) = app_state.db() {
        if let Some(seed) = &config.seed_teacher {
            if let Err(e) = ensure_seed_teacher(db, seed).await {
                error!(error = %e, "Failed to seed teacher account");
                std::process::exit(1);
            }
        }
        if let Some(backup) = config.backup.clone() {
            backup_job = Some(spawn_backup_job(db.clone(), backup, shutdown.clone()));
        }
    }

    let data = web::Data::new(app_state);
    let cors_origins = config.cors_origins.clone();
    let (host, port) = (config.server.host.clone(), config.server.port);
    info!(%host, port, "Starting gradebook backend");

    let result = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&cors_origins))
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await;

    shutdown.cancel();
    if let Some(job) = backup_job {
        if let Err(e) = job.await {
            error!(error = %e, "Backup job terminated abnormally");
        }
    }
    telemetry.shutdown();

    result
}
