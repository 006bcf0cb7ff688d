//! asset_server — static host for the browser front end.
//!
//! Serves a directory over HTTP; `/` answers with its `index.html`.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use pose_mesh::config::{AppConfig, ServerConfig};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "asset_server", version, about = "Serve the pose_mesh web assets")]
struct Args {
    /// Listen port (default 3000)
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Directory to serve (default ./public)
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Read `[server]` defaults from this config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn router(dir: PathBuf) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();
    let server = match &args.config {
        Some(path) => AppConfig::load(path)?.server,
        None       => ServerConfig::default(),
    };
    let port = args.port.unwrap_or(server.port);
    let dir  = args.dir.unwrap_or(server.public_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(dir = %dir.display(), "serving assets on http://localhost:{}", port);

    axum::serve(listener, router(dir))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("asset server failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get(dir: &std::path::Path, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router(dir.to_path_buf())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn root_answers_with_index_html() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>stage</h1>").unwrap();

        let (status, body) = get(dir.path(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>stage</h1>");
    }

    #[tokio::test]
    async fn serves_nested_files_and_404s_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("js")).unwrap();
        std::fs::write(dir.path().join("js/app.js"), "run()").unwrap();

        assert_eq!(get(dir.path(), "/js/app.js").await, (StatusCode::OK, b"run()".to_vec()));
        assert_eq!(get(dir.path(), "/missing.css").await.0, StatusCode::NOT_FOUND);
    }
}
