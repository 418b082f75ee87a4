//! Startup logging and health reporting for the gRPC listener.

use super::config::ServerConfig;
use tonic_health::ServingStatus;
use tonic_health::server::HealthReporter;
use tracing::info;

pub struct GrpcServer;

impl GrpcServer {
    /// Log server startup information.
    pub fn log_startup(config: &ServerConfig, service_name: &str) {
        info!(
            addr = %config.addr_string(),
            service = service_name,
            compression = config.enable_compression,
            request_timeout = ?config.request_timeout,
            "gRPC server starting"
        );
    }

    /// Mark the service, and the empty name used by generic probes, as serving.
    pub async fn setup_health(health_reporter: &mut HealthReporter, service_name: &str) {
        Self::set_status(health_reporter, service_name, ServingStatus::Serving).await;
        info!(service = service_name, "Service marked as serving");
    }

    /// Flip both names to not-serving once shutdown has begun.
    pub async fn mark_not_serving(health_reporter: &mut HealthReporter, service_name: &str) {
        Self::set_status(health_reporter, service_name, ServingStatus::NotServing).await;
        info!(service = service_name, "Service marked as not serving");
    }

    async fn set_status(health_reporter: &mut HealthReporter, service_name: &str, status: ServingStatus) {
        health_reporter
            .set_service_status(service_name, status)
            .await;
        health_reporter.set_service_status("", status).await;
    }
}

pub use tonic_health::server::health_reporter as create_health_service;
