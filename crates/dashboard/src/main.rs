use std::process;

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use cli::Args;
use cord19::Workspace;
use error::DashboardResult;
use state::AppState;

mod cli;
mod error;
mod routes;
mod state;
mod view;

async fn run(args: Args) -> DashboardResult<()> {
    let workspace = Workspace::discover()?;
    let config = workspace.config();

    let address = match args.address {
        Some(address) => address.to_string(),
        None => config.address().to_string(),
    };
    let port = args.port.unwrap_or(config.port());

    let state = web::Data::new(AppState::new(
        args.data.unwrap_or_else(|| workspace.data_path()),
        args.stats.unwrap_or_else(|| workspace.stats_path()),
    ));

    match state.dataset() {
        Ok(dataset) => log::info!(
            "loaded {} papers from {}",
            dataset.len(),
            state.data_path().display()
        ),
        Err(e) => log::warn!("{e}; run `cord19 download` to create it"),
    }

    log::info!("serving dashboard on http://{address}:{port}");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .workers(1)
    .bind((address.as_str(), port))?
    .run()
    .await?;

    Ok(())
}

#[actix_web::main]
async fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level()),
    )
    .init();

    match run(args).await {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}
