mod analytics;
mod cli;
mod config;
mod db;
mod models;
mod utils;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::debug;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    let db_path = match cli.db {
        Some(path) => path,
        None => {
            AppConfig::ensure_data_dir()?;
            AppConfig::db_path()?
        }
    };
    let conn = db::open(&db_path)?;

    // Read the clock once; everything below works against this date.
    let today = Local::now().date_naive();
    debug!("using database {:?}, today is {}", db_path, today);

    match cli.command {
        Some(Commands::Add { name, description, target }) => {
            handlers::handle_add(&conn, &config, &name, description.as_deref(), target)?;
        }
        Some(Commands::Edit { habit, name, description, target }) => {
            handlers::handle_edit(&conn, &habit, name.as_deref(), description.as_deref(), target)?;
        }
        Some(Commands::Remove { habit }) => {
            handlers::handle_remove(&conn, &habit)?;
        }
        Some(Commands::List { search, completed_today }) => {
            handlers::handle_list(&conn, today, search.as_deref(), completed_today)?;
        }
        Some(Commands::Done { habit, date }) => {
            handlers::handle_done(&conn, today, &habit, date.as_deref())?;
        }
        Some(Commands::Undo { habit, date }) => {
            handlers::handle_undo(&conn, today, &habit, date.as_deref())?;
        }
        Some(Commands::Week { habit, date, json }) => {
            handlers::handle_week(&conn, today, &habit, date.as_deref(), json)?;
        }
        Some(Commands::Streak { habit, json }) => {
            handlers::handle_streak(&conn, today, &habit, json)?;
        }
        Some(Commands::Stats { habit: Some(habit), weeks, json }) => {
            handlers::handle_stats(&conn, &config, today, &habit, weeks, json)?;
        }
        Some(Commands::Stats { habit: None, json, .. }) => {
            handlers::handle_overview(&conn, json)?;
        }
        Some(Commands::Config { init }) => {
            handlers::handle_config(&config, init)?;
        }

        // No subcommand → today's overview
        None => {
            handlers::handle_list(&conn, today, None, false)?;
        }
    }

    Ok(())
}
