//! HTTP/1.1 server.
//!
//! ## Submodules
//!
//! - [`router`]: Path and method resolution, JSON handlers ([`dispatch`])
//! - [`pages`]: Server-rendered HTML pages
//! - [`assets`]: Cascade XML files for in-browser detection
//!
//! Each accepted connection runs on its own task. Request bodies are collected
//! in full before dispatch.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::app::App;
use crate::error::ApiError;

pub mod assets;
pub mod pages;
pub mod router;

pub use router::{dispatch, error_response, HttpResponse, Route};

/// Bind a listener on `host:port`.
pub async fn bind(addr: &str) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    Ok(listener)
}

/// Serve connections until `shutdown` resolves.
///
/// In-flight connections are not drained; they finish on their own tasks.
pub async fn serve<F>(listener: TcpListener, app: Arc<App>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let local = listener.local_addr()?;
    info!(addr = %local, mode = %app.mode(), "Eye health dashboard listening");

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                spawn_connection(stream, peer, app.clone());
            }
            _ = &mut shutdown => {
                info!("Shutting down");
                break;
            }
        }
    }

    app.watcher().stop();
    Ok(())
}

fn spawn_connection(stream: tokio::net::TcpStream, peer: SocketAddr, app: Arc<App>) {
    let io = TokioIo::new(stream);

    tokio::spawn(async move {
        let service = service_fn(move |req: Request<Incoming>| {
            let app = app.clone();
            async move { Ok::<_, Infallible>(handle_request(&app, req).await) }
        });

        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
            debug!(%peer, error = %e, "Connection error");
        }
    });
}

async fn handle_request(app: &App, req: Request<Incoming>) -> HttpResponse {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => return error_response(&ApiError::Body(e.to_string())),
    };

    dispatch(app, &parts.method, parts.uri.path(), body).await
}
