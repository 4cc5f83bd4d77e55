use std::{future::Future, sync::Arc};

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{app_state::AppState, handlers::handle_connection};

/// Accepts connections until `shutdown` resolves, serving each one on its own task.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, peer)) => {
                        let state = Arc::clone(&state);
                        tokio::spawn(async move {
                            tracing::trace!(%peer, "accepted connection");
                            handle_connection(stream, state).await;
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "failed to accept connection");
                    },
                }
            }
            _ = &mut shutdown => {
                info!("stopped accepting connections");
                break;
            }
        }
    }
}
