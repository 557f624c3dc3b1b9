use crate::config::SharedConfig;
use crate::dns::handlers::Handler;
use crate::rebind_store::DynRebindStore;
use tokio::net::UdpSocket;
use trust_dns_server::ServerFuture;

/// Bind [`Config::bind_addr`][crate::config::Config::bind_addr] and build the UDP server.
///
/// # Errors
///
/// Returns an error if the UDP socket can't be bound.
pub async fn new(
    config: SharedConfig,
    rebind_store: DynRebindStore,
) -> anyhow::Result<ServerFuture<Handler>> {
    let socket = UdpSocket::bind(config.bind_addr).await?;
    Ok(with_socket(config, rebind_store, socket))
}

/// Build the server around an already bound socket. Must be called from within a tokio runtime.
#[must_use]
pub fn with_socket(
    config: SharedConfig,
    rebind_store: DynRebindStore,
    socket: UdpSocket,
) -> ServerFuture<Handler> {
    let dns_handler = Handler::new(config, rebind_store);
    let mut dns_server = ServerFuture::new(dns_handler);
    dns_server.register_socket(socket);
    dns_server
}
