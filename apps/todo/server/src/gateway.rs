//! HTTP/JSON gateway
//!
//! Each route decodes JSON, calls the co-located gRPC listener over a lazy
//! loopback channel and encodes the reply, so both transports share one
//! code path into the service.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use axum::Router;
use axum_helpers::{ShutdownCoordinator, create_router, serve_with_shutdown};
use domain_todo::grpc_router;
use grpc_client::{ChannelConfig, GrpcResult, create_channel_lazy_with_config};
use rpc::todo::v1::to_do_service_client::ToDoServiceClient;
use tokio::net::TcpListener;

/// URI that reaches `addr` from this host; wildcard binds map to loopback
pub fn loopback_uri(addr: SocketAddr) -> String {
    let ip = match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    format!("http://{}", SocketAddr::new(ip, addr.port()))
}

/// Gateway router forwarding to the gRPC listener at `grpc_addr`.
///
/// Each forwarded call is bounded by `request_timeout`.
pub fn router(grpc_addr: SocketAddr, request_timeout: Duration) -> GrpcResult<Router> {
    let channel = create_channel_lazy_with_config(
        loopback_uri(grpc_addr),
        ChannelConfig::default().with_request_timeout(request_timeout),
    )?;
    Ok(create_router(grpc_router(ToDoServiceClient::new(channel))))
}

/// Serve the gateway until shutdown, draining for at most `grace`
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: ShutdownCoordinator,
    grace: Duration,
) -> io::Result<()> {
    serve_with_shutdown(listener, router, shutdown, grace).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_uri() {
        assert_eq!(
            loopback_uri("0.0.0.0:50051".parse().unwrap()),
            "http://127.0.0.1:50051"
        );
        assert_eq!(loopback_uri("[::]:9000".parse().unwrap()), "http://[::1]:9000");
        assert_eq!(
            loopback_uri("10.0.0.5:50051".parse().unwrap()),
            "http://10.0.0.5:50051"
        );
    }
}
