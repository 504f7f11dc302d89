// ABOUTME: EvoFit API server binary
// ABOUTME: Loads configuration, opens the database, and serves the REST API until Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! # EvoFit API Server Binary
//!
//! Configuration comes from environment variables; the flags below override
//! the matching variables.

use anyhow::{Context, Result};
use clap::Parser;
use evofit_server::config::{DatabaseUrl, ServerConfig};
use evofit_server::database::Database;
use evofit_server::logging;
use evofit_server::resources::ServerResources;
use evofit_server::server;
use std::fs;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "evofit-server")]
#[command(about = "EvoFit API - Fitness tracking REST backend")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&database_url)?;
    }
    config.validate()?;

    info!("Starting EvoFit API");
    info!("{}", config.summary());

    if let DatabaseUrl::SQLite { path } = &config.database.url {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
    }

    let connection_string = config.database.url.to_connection_string();
    let database = if config.database.auto_migrate {
        Database::new(&connection_string).await?
    } else {
        Database::connect(&connection_string).await?
    };
    info!("Database initialized: {}", config.database.url);

    let resources = Arc::new(ServerResources::new(database, Arc::new(config)));

    if let Err(e) = server::run(resources).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}
