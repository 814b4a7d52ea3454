use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{Instrument, info, info_span};

use crate::config::Config;
use crate::http::connection::{Connection, ConnectionSettings};
use crate::routing::RouteTable;

/// Binds the configured address and serves until the process stops.
pub async fn run(cfg: &Config, routes: RouteTable) -> anyhow::Result<()> {
    let listener = TcpListener::bind(cfg.listen_addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, Arc::new(routes), cfg.connection_settings()).await
}

/// Accept loop over an already bound listener.
///
/// Each connection runs on its own task; a failing connection never stops
/// the loop, and neither does a failed `accept`.
pub async fn serve(
    listener: TcpListener,
    routes: Arc<RouteTable>,
    settings: ConnectionSettings,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let routes = Arc::clone(&routes);
        tokio::spawn(
            async move {
                let conn = Connection::new(socket, routes, settings);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
            }
            .instrument(info_span!("conn", %peer)),
        );
    }
}
