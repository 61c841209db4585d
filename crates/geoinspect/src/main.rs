//! `geoinspect` - CLI for recording geotagged inspections
//!
//! This binary wires the inspection store to a SQLite-backed key-value store,
//! the local filesystem, and a directory-backed media library, then dispatches
//! the requested command.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;

use geoinspect::cli::render::{render_inspection, render_plain, render_table};
use geoinspect::cli::{
    confirm, AddCommand, Cli, Command, ConfigCommand, DeleteCommand, ListCommand, OutputFormat,
    ResetCommand, ShowCommand,
};
use geoinspect::{
    init_logging, Config, Coordinate, DirectoryMediaLibrary, InspectionDetails, InspectionStore,
    InspectionWizard, LocalFileSystem, SqliteKeyValueStore,
};

const DELETE_ONE_PROMPT: &str = "Are you sure you want to delete this inspection?";
const DELETE_ALL_PROMPT: &str = "Are you sure you want to delete all inspections?";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Add(cmd) => handle_add(&config, &open_store(&config)?, cmd).await,
        Command::List(cmd) => handle_list(&open_store(&config)?, &cmd).await,
        Command::Show(cmd) => handle_show(&open_store(&config)?, &cmd).await,
        Command::Delete(cmd) => handle_delete(&open_store(&config)?, &cmd).await,
        Command::Reset(cmd) => handle_reset(&open_store(&config)?, &cmd).await,
        Command::Status(cmd) => handle_status(&config, &open_store(&config)?, cmd.json).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<InspectionStore> {
    let db_path = config.database_path();
    let kv = SqliteKeyValueStore::open(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    let media = DirectoryMediaLibrary::new(config.gallery_dir(), config.media.permission_granted);

    Ok(InspectionStore::new(
        Arc::new(kv),
        Arc::new(LocalFileSystem),
        Arc::new(media),
        config.store_settings(),
    ))
}

async fn handle_add(
    config: &Config,
    store: &InspectionStore,
    cmd: AddCommand,
) -> anyhow::Result<()> {
    let location = match (cmd.lat, cmd.lon) {
        (Some(lat), Some(lon)) => Coordinate::new(lat, lon),
        _ => config.default_location(),
    };
    if !location.is_valid() {
        bail!("Location {location} is out of range");
    }

    let mut wizard = InspectionWizard::new();
    wizard.select_location(location).select_image(cmd.image)?;

    let details = InspectionDetails {
        title: cmd.title,
        description: cmd.description,
        marker_color: cmd
            .color
            .unwrap_or_else(|| config.markers.default_color.clone()),
        marker_icon: cmd
            .icon
            .unwrap_or_else(|| config.markers.default_icon.clone()),
    };

    let inspection = wizard
        .finish(store, details)
        .await
        .context("Failed to add inspection")?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
    } else {
        println!("Added inspection {}", inspection.id);
        println!("{}", render_inspection(&inspection));
    }
    Ok(())
}

async fn handle_list(store: &InspectionStore, cmd: &ListCommand) -> anyhow::Result<()> {
    let inspections = store.list_newest_first().await;

    match cmd.format {
        OutputFormat::Plain => println!("{}", render_plain(&inspections)),
        OutputFormat::Table => println!("{}", render_table(&inspections)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&inspections)?),
    }
    Ok(())
}

async fn handle_show(store: &InspectionStore, cmd: &ShowCommand) -> anyhow::Result<()> {
    let Some(inspection) = store.get(&cmd.id).await else {
        bail!("No inspection with id {}", cmd.id);
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
    } else {
        println!("{}", render_inspection(&inspection));
    }
    Ok(())
}

async fn handle_delete(store: &InspectionStore, cmd: &DeleteCommand) -> anyhow::Result<()> {
    if !cmd.yes && !confirm(DELETE_ONE_PROMPT, &mut io::stdin().lock(), &mut io::stdout())? {
        println!("Cancelled.");
        return Ok(());
    }

    if store.try_delete(&cmd.id).await? {
        println!("Deleted inspection {}", cmd.id);
    } else {
        println!("No inspection with id {}", cmd.id);
    }
    Ok(())
}

async fn handle_reset(store: &InspectionStore, cmd: &ResetCommand) -> anyhow::Result<()> {
    if !cmd.yes && !confirm(DELETE_ALL_PROMPT, &mut io::stdin().lock(), &mut io::stdout())? {
        println!("Cancelled.");
        return Ok(());
    }

    store.try_reset().await?;
    println!("All inspections deleted.");
    Ok(())
}

async fn handle_status(
    config: &Config,
    store: &InspectionStore,
    json: bool,
) -> anyhow::Result<()> {
    let count = store.try_list().await.map(|list| list.len());
    let settings = store.settings();

    if json {
        let status = serde_json::json!({
            "inspections": count.as_ref().ok(),
            "readable": count.is_ok(),
            "database_path": config.database_path(),
            "storage_key": settings.storage_key,
            "images_dir": settings.images_dir,
            "album": settings.album,
            "gallery_dir": config.gallery_dir(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("geoinspect status");
        println!("-----------------");
        match &count {
            Ok(n) => println!("Inspections:   {n}"),
            Err(e) => println!("Inspections:   unreadable ({e})"),
        }
        println!("Database:      {}", config.database_path().display());
        println!("Storage key:   {}", settings.storage_key);
        println!("Images:        {}", settings.images_dir.display());
        println!("Album:         {}", settings.album);
        println!("Gallery:       {}", config.gallery_dir().display());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Storage key:        {}", config.storage.storage_key);
                println!();
                println!("[Images]");
                println!("  Images directory:   {}", config.images_dir().display());
                println!("  Album:              {}", config.images.album);
                println!();
                println!("[Media]");
                println!("  Gallery directory:  {}", config.gallery_dir().display());
                println!("  Permission granted: {}", config.media.permission_granted);
                println!();
                println!("[Map]");
                println!("  Default location:   {}", config.default_location());
                println!();
                println!("[Markers]");
                println!("  Default color:      {}", config.markers.default_color);
                println!("  Default icon:       {}", config.markers.default_icon);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
