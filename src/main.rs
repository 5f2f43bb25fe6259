use std::sync::Arc;

use futures::channel::mpsc;

use tunnelmux_ui::agent::AgentClient;
use tunnelmux_ui::app::App;
use tunnelmux_ui::bridge::Bridge;
use tunnelmux_ui::settings::Settings;
use tunnelmux_ui::terminal::{self, TerminalSurface};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("tunnelmux_ui=info"),
    )
    .init();

    log::info!(
        "tunnelmux-ui v{} starting (RUST_LOG={})",
        env!("CARGO_PKG_VERSION"),
        std::env::var("RUST_LOG").unwrap_or_else(|_| "<default: info>".into()),
    );

    let settings = Settings::load();
    log::info!(
        "[startup] agent socket: {}, poll interval: {}ms",
        settings.socket_path.display(),
        settings.poll_interval_ms,
    );

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            log::error!("[startup] failed to build runtime: {error}");
            std::process::exit(1);
        }
    };

    let local = tokio::task::LocalSet::new();
    runtime.block_on(local.run_until(async move {
        let (sender, receiver) = mpsc::unbounded();
        let bridge: Arc<dyn Bridge> = Arc::new(AgentClient::new(settings.socket_path.clone()));
        let surface = Box::new(TerminalSurface::new());

        terminal::print_help();
        tokio::task::spawn_local(terminal::read_input(sender));

        let mut app = App::new(bridge, surface, settings.poll_interval());
        app.run(receiver).await;
    }));

    log::info!("tunnelmux-ui exiting");
}
