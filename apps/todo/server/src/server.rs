//! Process lifecycle
//!
//! - Tracing initialization
//! - Database connection and migrations
//! - Binding both listeners before serving on either
//! - Shared shutdown across the gRPC and HTTP servers

use std::net::SocketAddr;

use axum_helpers::ShutdownCoordinator;
use core_config::{Environment, FromEnv, ListenerConfig};
use database::postgres::{
    check_health_detailed, close, connect_from_config_with_retry, run_migrations,
};
use domain_todo::{PgTodoStore, TodoService, TodoStore};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::{AppConfig, TransportConfig};
use crate::{gateway, grpc};

/// Both listeners, bound and not yet serving
pub struct Listeners {
    pub grpc: TcpListener,
    pub http: TcpListener,
}

impl Listeners {
    /// Bind both addresses; either failing aborts startup before anything serves
    pub async fn bind(grpc: &ListenerConfig, http: &ListenerConfig) -> Result<Self> {
        let grpc = TcpListener::bind(grpc.address())
            .await
            .wrap_err_with(|| format!("Failed to bind gRPC listener on {}", grpc.address()))?;
        let http = TcpListener::bind(http.address())
            .await
            .wrap_err_with(|| format!("Failed to bind HTTP listener on {}", http.address()))?;
        Ok(Self { grpc, http })
    }

    pub fn grpc_addr(&self) -> Result<SocketAddr> {
        Ok(self.grpc.local_addr()?)
    }

    pub fn http_addr(&self) -> Result<SocketAddr> {
        Ok(self.http.local_addr()?)
    }
}

/// Run the ToDo server
///
/// This is the main entry point. It:
/// 1. Sets up structured logging (JSON for prod, pretty for dev)
/// 2. Loads configuration; a missing port fails here
/// 3. Connects to PostgreSQL with retry and applies migrations
/// 4. Binds both listeners and serves until SIGINT/SIGTERM
/// 5. Closes the pool once both servers have stopped
pub async fn run() -> Result<()> {
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    let config = AppConfig::from_env().wrap_err("Failed to load configuration")?;

    info!(target_db = %config.database.display_target(), "Connecting to database...");
    let pool = connect_from_config_with_retry(&config.database, None)
        .await
        .wrap_err("Failed to connect to database")?;

    let health = check_health_detailed(&pool).await;
    info!(
        healthy = health.healthy,
        response_time_ms = health.response_time_ms,
        "Database health"
    );

    if config.run_migrations {
        run_migrations(&pool, &migration::MIGRATOR, "todo")
            .await
            .wrap_err("Failed to run migrations")?;
    }

    let listeners = Listeners::bind(&config.transport.grpc.listener, &config.transport.http).await?;
    let coordinator = ShutdownCoordinator::new();

    let signals = tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.wait_for_signal().await }
    });

    let service = TodoService::new(PgTodoStore::new(pool.clone()));
    let result = serve(listeners, service, &config.transport, coordinator.clone()).await;

    coordinator.shutdown();
    let _ = signals.await;
    close(&pool).await;

    result
}

/// Serve both transports on pre-bound listeners until `coordinator` is cancelled.
///
/// If either server fails, the coordinator is cancelled so the other stops
/// too. Returns once both have stopped, with the first error if any.
pub async fn serve<S: TodoStore>(
    listeners: Listeners,
    service: TodoService<S>,
    transport: &TransportConfig,
    coordinator: ShutdownCoordinator,
) -> Result<()> {
    let grpc_addr = listeners.grpc_addr()?;
    let router = gateway::router(grpc_addr, transport.grpc.request_timeout)
        .wrap_err("Failed to build gateway router")?;
    let grace = transport.shutdown_timeout;
    let Listeners {
        grpc: grpc_listener,
        http: http_listener,
    } = listeners;

    let grpc_server = {
        let coordinator = coordinator.clone();
        let config = transport.grpc.clone();
        async move {
            let result = grpc::serve(grpc_listener, service, &config, coordinator.clone(), grace).await;
            if result.is_err() {
                coordinator.shutdown();
            }
            result
        }
    };

    let http_server = {
        let coordinator = coordinator.clone();
        async move {
            let result = gateway::serve(http_listener, router, coordinator.clone(), grace).await;
            if result.is_err() {
                coordinator.shutdown();
            }
            result
        }
    };

    let (grpc_result, http_result) = tokio::join!(grpc_server, http_server);
    info!("All listeners stopped");

    grpc_result.wrap_err("gRPC server failed")?;
    http_result.wrap_err("HTTP gateway failed")?;
    Ok(())
}
