use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rosterd::auth::AuthService;
use rosterd::backend::{ApiClient, MockBackend, MockServer};
use rosterd::config::Args;
use rosterd::ipc;
use rosterd::store::StudentStore;
use rosterd::theme::ThemePreference;
use rosterd::view::ListQuery;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries protocol lines only.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("rosterd={},warn", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let storage = args.open_storage()?;
    let mut store = StudentStore::open(storage.clone());
    if let Some(seed) = args.seed {
        store = store.with_seed(seed);
    }
    let server = MockServer::new(store.into_shared()).with_latency(args.latency());

    let mut state = ipc::AppState {
        api: ApiClient::new(MockBackend::new(server)),
        auth: AuthService::demo(storage.clone()),
        theme: ThemePreference::new(storage),
        list_query: ListQuery::default(),
        latency_ms: args.latency_ms,
    };
    info!(
        storage = %args.storage.to_string_lossy(),
        in_memory = args.in_memory,
        latency_ms = args.latency_ms,
        "rosterd ready"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(v)) => v,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => ipc::handle_request(&mut state, req).await,
            Err(e) => {
                // No request id to echo back.
                warn!(error = %e, "unparseable request line");
                ipc::err("", "bad_json", e.to_string(), None)
            }
        };

        let out = serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string());
        stdout.write_all(out.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("stdin closed; exiting");
    Ok(())
}
