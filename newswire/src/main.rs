use chrono::Local;
use clap::ArgMatches;
use commands::command_argument_builder;
use newswire::scheduler::Scheduler;
use newswire::server::{self, AppState};
use newswire_core::{Config, Database, run_cycle};
use newswire_scraper::Fetcher;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();

    match chosen_command.subcommand() {
        Some(("init", primary_command)) => handle_init(primary_command),
        Some(("serve", _)) => handle_serve().await,
        Some(("scrape", _)) => handle_scrape().await,
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

// Handler functions
fn handle_init(args: &ArgMatches) {
    let config_dir = args.get_one::<String>("PATH");
    let force = args.get_flag("force");
    let expanded_config_dir = shellexpand::tilde(config_dir.map(String::as_str).unwrap_or(""));
    let config_dir = Path::new(expanded_config_dir.as_ref());
    let db_path = config_dir.join("newswire.db");

    if Database::exists(&db_path) && !force {
        eprintln!(
            "✗ A database already exists at {}. Re-run with --force to overwrite it.",
            db_path.display()
        );
        std::process::exit(1);
    }

    if let Err(e) = fs::create_dir_all(config_dir) {
        eprintln!(
            "✗ Failed to create config directory {}: {}",
            config_dir.display(),
            e
        );
        std::process::exit(1);
    }

    if Database::exists(&db_path) {
        if let Err(e) = Database::drop(&db_path) {
            eprintln!("✗ Failed to remove existing database: {}", e);
            std::process::exit(1);
        }
    }

    match Database::new(&db_path) {
        Ok(_) => {
            println!("✓ Newswire initialization complete!");
            println!("✓ Database: {}", db_path.display());
        }
        Err(e) => {
            eprintln!("✗ Failed to create database: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_serve() {
    let config = load_config();
    let db = open_database(&config);
    let db = Arc::new(Mutex::new(db));

    let scheduler = Scheduler::new(
        Fetcher::new(),
        db.clone(),
        config.sources.clone(),
        config.scrape_interval,
        config.offset_step,
    );
    scheduler.start();

    info!(sources = config.sources.len(), "newswire starting");
    let state = AppState { db, scheduler };
    if let Err(e) = server::serve(config.port, state).await {
        eprintln!("✗ Server error: {}", e);
        std::process::exit(1);
    }
}

async fn handle_scrape() {
    let config = load_config();
    let db = Mutex::new(open_database(&config));

    let fetcher = Fetcher::new();
    let summary = run_cycle(&fetcher, &db, &config.sources, config.offset_step).await;

    println!(
        "\n✓ Scrape cycle finished at {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    for (site, count) in &summary.completed {
        println!("  ✓ {} ({} records)", site, count);
    }
    for (site, error) in &summary.failed {
        eprintln!("  ✗ {} ({})", site, error);
    }

    if summary.completed.is_empty() && !summary.failed.is_empty() {
        std::process::exit(1);
    }
}

fn load_config() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

fn open_database(config: &Config) -> Database {
    if let Some(parent) = config.database_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!(
                "✗ Failed to create database directory {}: {}",
                parent.display(),
                e
            );
            std::process::exit(1);
        }
    }

    match Database::new(&config.database_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!(
                "✗ Failed to open database at {}: {}",
                config.database_path.display(),
                e
            );
            std::process::exit(1);
        }
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
