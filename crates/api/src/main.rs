use std::future::IntoFuture;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use rocketlab_api::bootstrap::ensure_admin;
use rocketlab_api::config::{AdminBootstrap, ServerConfig};
use rocketlab_api::router::build_app_router;
use rocketlab_api::state::AppState;
use rocketlab_db::DbPool;

const DEFAULT_LOG_FILTER: &str = "rocketlab_api=debug,rocketlab_db=info,tower_http=info";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let pool = prepare_database().await;

    if let Some(admin) = AdminBootstrap::from_env() {
        let outcome = ensure_admin(&pool, &admin)
            .await
            .expect("ADMIN_USERNAME/ADMIN_PASSWORD could not be provisioned");
        tracing::info!(username = %admin.username, ?outcome, "Admin account checked");
    } else {
        tracing::warn!("No ADMIN_USERNAME/ADMIN_PASSWORD; nobody can open the triage board until an admin exists");
    }

    let host: IpAddr = config.host.parse().expect("HOST must be an IP address");
    let addr = SocketAddr::new(host, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("cannot listen on {addr}: {e}"));

    let app = build_app_router(
        AppState {
            pool,
            config: Arc::new(config.clone()),
        },
        &config,
    );

    tracing::info!(%addr, "Lead API listening");
    serve(listener, app, Duration::from_secs(config.shutdown_timeout_secs)).await;
    tracing::info!("Lead API stopped");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify and migrate. Any failure aborts startup.
async fn prepare_database() -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL is required");
    let pool = rocketlab_db::create_pool(&url)
        .await
        .expect("cannot connect to DATABASE_URL");
    rocketlab_db::health_check(&pool)
        .await
        .expect("database did not answer SELECT 1");
    rocketlab_db::run_migrations(&pool)
        .await
        .expect("migrations failed");
    tracing::info!("Database ready");
    pool
}

/// Serve until a shutdown signal, then give in-flight requests `drain` to finish.
async fn serve(listener: TcpListener, app: axum::Router, drain: Duration) {
    let stopping = Arc::new(Notify::new());
    let notify = Arc::clone(&stopping);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_signal().await;
            notify.notify_one();
        })
        .into_future();

    let deadline = async {
        stopping.notified().await;
        tokio::time::sleep(drain).await;
    };

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Server terminated with an error");
            }
        }
        () = deadline => {
            tracing::warn!(drain_secs = drain.as_secs(), "Requests still running after drain period; exiting anyway");
        }
    }
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate()).expect("SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => tracing::info!(signal = "SIGINT", "Shutting down"),
            _ = sigterm.recv() => tracing::info!(signal = "SIGTERM", "Shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!(signal = "ctrl-c", "Shutting down");
    }
}
