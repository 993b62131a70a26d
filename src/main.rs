use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use log::{error, info};
use std::io;

use todolist_api::{
    app::{cors, AppState},
    auth::{promote_to_admin, AuthMiddleware},
    cli::{Cli, Commands},
    routes,
    config::DatabaseConfig,
    store::PgStore,
    Config,
};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match Cli::parse().selected() {
        Commands::MakeAdmin { email } => make_admin(email).await,
        Commands::Serve => {
            let config =
                Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;
            let store = open_store(&config.database).await?;
            let state = AppState::with_store(store, &config)
                .map_err(|e| startup_error("Failed to initialise services", e))?;
            serve(config, state).await
        }
    }
}

async fn open_store(database: &DatabaseConfig) -> io::Result<PgStore> {
    let store = PgStore::connect(database)
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;
    store
        .migrate()
        .await
        .map_err(|e| startup_error("Failed to apply migrations", e))?;
    Ok(store)
}

/// Only the database settings are read; no token secret is needed.
async fn make_admin(email: &str) -> io::Result<()> {
    let database =
        DatabaseConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;
    let store = open_store(&database).await?;
    promote_to_admin(&store, email)
        .await
        .map_err(|e| startup_error("make-admin failed", e))?;
    println!("{} is now an admin", email);
    Ok(())
}

async fn serve(config: Config, state: AppState) -> io::Result<()> {
    info!("Starting todolist-api at {}", config.server_url());

    let state = web::Data::new(state);
    let bind = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(AuthMiddleware)
            .wrap(cors(&config))
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind(bind)?
    .run()
    .await
}
