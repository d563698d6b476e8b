use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

/// Static body returned for every request.
pub const LIVENESS_BODY: &str = "alttrend scanner alive";

/// [`Router`] answering every path & method with `200 OK` and [`LIVENESS_BODY`].
pub fn router() -> Router {
    Router::new().fallback(|| async { LIVENESS_BODY })
}

/// Serve the liveness [`router`] on the provided listener until the process exits.
///
/// Shares no state with the scanner.
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    info!(addr = ?listener.local_addr()?, "liveness listener started");
    axum::serve(listener, router()).await
}
