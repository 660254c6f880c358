//! GymHub Server — Class Scheduling and Membership Back Office
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use gymhub_core::clock::SystemClock;
use gymhub_core::config::AppConfig;
use gymhub_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("GYMHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting GymHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = gymhub_database::connection::DatabasePool::connect(&config.database).await?;

    gymhub_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Receipt storage ──────────────────────────────────
    tracing::info!(
        "Initializing receipt storage at '{}'...",
        config.storage.root
    );
    let receipts =
        Arc::new(gymhub_storage::LocalReceiptStorage::new(&config.storage.root).await?);

    // ── Step 3: Repositories ─────────────────────────────────────
    let pool = db.pool().clone();
    let member_repo = Arc::new(
        gymhub_database::repositories::member::MemberRepository::new(pool.clone()),
    );
    let staff_repo = Arc::new(gymhub_database::repositories::staff::StaffRepository::new(
        pool.clone(),
    ));
    let room_repo = Arc::new(gymhub_database::repositories::room::RoomRepository::new(
        pool.clone(),
    ));
    let plan_repo = Arc::new(gymhub_database::repositories::plan::PlanRepository::new(
        pool.clone(),
    ));
    let slot_repo = Arc::new(
        gymhub_database::repositories::slot::SlotTemplateRepository::new(pool.clone()),
    );
    let reservation_repo = Arc::new(
        gymhub_database::repositories::reservation::ReservationRepository::new(pool.clone()),
    );
    let checkin_repo = Arc::new(
        gymhub_database::repositories::checkin::CheckInRepository::new(pool.clone()),
    );
    let subscription_repo = Arc::new(
        gymhub_database::repositories::subscription::SubscriptionRepository::new(pool.clone()),
    );
    let order_repo = Arc::new(
        gymhub_database::repositories::payment_order::PaymentOrderRepository::new(pool),
    );

    // ── Step 4: Services ─────────────────────────────────────────
    tracing::info!("Initializing services...");
    let clock = Arc::new(SystemClock);

    let schedule_service = Arc::new(gymhub_service::ScheduleService::new(
        slot_repo.clone(),
        room_repo.clone(),
        staff_repo,
    ));
    let capacity_service = Arc::new(gymhub_service::CapacityService::new(
        slot_repo.clone(),
        reservation_repo.clone(),
        clock.clone(),
    ));
    let reservation_service = Arc::new(gymhub_service::ReservationService::new(
        reservation_repo.clone(),
        subscription_repo.clone(),
        slot_repo.clone(),
        plan_repo.clone(),
        clock.clone(),
    ));
    let checkin_service = Arc::new(gymhub_service::CheckInService::new(
        checkin_repo,
        member_repo.clone(),
        slot_repo,
        reservation_repo,
        clock.clone(),
        config.booking.clone(),
    ));
    let payment_service = Arc::new(gymhub_service::PaymentOrderService::new(
        order_repo,
        subscription_repo,
        plan_repo.clone(),
        member_repo.clone(),
        receipts,
        clock,
        config.booking.clone(),
    ));
    let directory_service = Arc::new(gymhub_service::DirectoryService::new(
        member_repo,
        room_repo,
        plan_repo,
    ));

    tracing::info!("Services initialized");

    // ── Step 5: Build and start HTTP server ──────────────────────
    let shutdown_grace = config.server.shutdown_grace_seconds;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let app_state = gymhub_api::AppState {
        config: Arc::new(config),
        db: db.clone(),
        schedule_service,
        capacity_service,
        reservation_service,
        checkin_service,
        payment_service,
        directory_service,
    };

    let app = gymhub_api::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("GymHub server listening on {}", addr);

    // ── Step 6: Graceful shutdown ────────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    // In-flight requests get the configured grace period to drain.
    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {}", e)))?;
        }
        _ = async {
            let _ = shutdown_rx.changed().await;
            tokio::time::sleep(Duration::from_secs(shutdown_grace)).await;
        } => {
            tracing::warn!(
                "Grace period of {}s elapsed, dropping remaining connections",
                shutdown_grace
            );
        }
    }

    db.close().await;

    tracing::info!("GymHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
