use anyhow::{Context, Result};
use planner_server::AppState;
use std::path::Path;

pub fn run(root: &Path, port: Option<u16>, open_browser: bool) -> Result<()> {
    let state = AppState::load(root.to_path_buf())
        .with_context(|| format!("cannot serve {}", root.display()))?;
    let port = port.unwrap_or(state.config.server.port);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
            .await
            .with_context(|| format!("cannot bind port {port}"))?;
        let actual_port = listener.local_addr()?.port();
        println!("Planner API → http://localhost:{actual_port}  (PID {})", std::process::id());

        tokio::select! {
            res = planner_server::serve_on(state, listener, open_browser) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}
