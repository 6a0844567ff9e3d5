// src/main.rs
mod config;
mod models;
mod handlers;
mod storage;
mod upstream;
mod poller;
mod render;
mod utils;

use actix_web::{ web, App, HttpServer };
use clap::{ Parser, Subcommand };
use env_logger::Env;
use handlers::status::StatusProxy;
use poller::HttpStatusSource;
use reqwest::Url;
use std::io::Write;
use std::sync::Arc;
use upstream::ReqwestUpstream;
use crate::config::{ Config, POLL_INTERVAL };
use log::{ info, error };

#[derive(Parser)]
#[command(version, about = "Live status for a Valheim dedicated server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the status proxy
    Serve,
    /// Poll a status endpoint and render it in the terminal
    Watch {
        /// Endpoint to poll; defaults to VALHEIM_BACKEND_URL
        #[arg(long, env = "VALHEIM_STATUS_URL")]
        url: Option<Url>,
    },
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Serve => serve(config).await,
        Command::Watch { url } => watch(url.or(config.backend_url)).await,
    }
}

async fn serve(config: Config) -> std::io::Result<()> {
    if config.backend_url.is_none() {
        error!("VALHEIM_BACKEND_URL is missing or invalid, status requests will fail with 500");
    }

    let bind = config.bind();
    let proxy = web::Data::new(
        StatusProxy::new(config.backend_url.clone(), Arc::new(ReqwestUpstream::new(reqwest::Client::new())))
    );

    info!("Starting server on {}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(proxy.clone())
            .route("/api/valheim", web::get().to(handlers::status::get_status))
    })
        .bind(&bind)?
        .run().await
}

async fn watch(url: Option<Url>) -> std::io::Result<()> {
    let url = match url {
        Some(url) => url,
        None => {
            error!("No status URL configured, set VALHEIM_STATUS_URL or pass --url");
            return Err(
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "status URL is not configured")
            );
        }
    };

    info!("Polling {} every {}s", url, POLL_INTERVAL.as_secs());
    let source = Arc::new(HttpStatusSource::new(reqwest::Client::new(), url));
    let handle = poller::spawn(source, POLL_INTERVAL);
    let mut states = handle.subscribe();

    print_state(&handle.current())?;
    loop {
        let changed = tokio::select! {
            changed = states.changed() => changed.is_ok(),
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping status poller");
                false
            }
        };
        if !changed {
            break;
        }

        let state = states.borrow_and_update().clone();
        print_state(&state)?;
    }

    handle.shutdown();
    if let Some(status) = handle.last_data() {
        info!("Last seen {} with {} players online", status.server_name, status.player_count);
    }
    Ok(())
}

fn print_state(state: &storage::memory::ViewState) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", render::render(state))?;
    stdout.flush()
}
