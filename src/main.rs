use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use uuid::Uuid;

use floorplan::config::FloorPlanConfig;
use floorplan::db;
use floorplan::error::LoadError;
use floorplan::layout::LayoutRecord;
use floorplan::model::ElementId;
use floorplan::occupancy::table_info;
use floorplan::projection::Size;
use floorplan::store::{LayoutStore, PgLayoutStore};
use floorplan::viewport::fit;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid layout JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("missing database URL; pass --database-url or set DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("layout load failed: {0}")]
    Load(#[from] LoadError),
    #[error("no layout stored for owner {0}")]
    NoLayout(Uuid),
    #[error("no table with id `{0}`")]
    NoTable(String),
}

#[derive(Parser, Debug)]
#[command(name = "floorplan", about = "Restaurant floor-plan layout tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert legacy pixel elements to meters and print the layout.
    Normalize { file: PathBuf },
    /// Print the viewport that frames the layout in a container.
    Fit {
        file: PathBuf,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        /// Use new-room framing (centered, may zoom in).
        #[arg(long)]
        new_room: bool,
    },
    /// Print one table's label and metric geometry.
    Table { file: PathBuf, id: String },
    /// Load an owner's layout from Postgres and print it normalized.
    Show {
        #[arg(long)]
        owner: Uuid,
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = FloorPlanConfig::from_env();

    match cli.command {
        Command::Normalize { file } => {
            let record = read_record(&file).await?;
            print_json(&serde_json::to_value(normalized(&config, &record))?)
        }
        Command::Fit { file, width, height, new_room } => run_fit(&config, &file, Size::new(width, height), new_room).await,
        Command::Table { file, id } => run_table(&config, &file, id).await,
        Command::Show { owner, database_url } => run_show(&config, owner, database_url).await,
    }
}

async fn run_fit(config: &FloorPlanConfig, file: &Path, container: Size, new_room: bool) -> Result<(), CliError> {
    let record = read_record(file).await?;
    let loaded = record.to_plan(config.legacy_pixels_per_meter, config.snapper().quantum());
    let options = if new_room { config.fit_new_room } else { config.fit_existing };
    let viewport = fit(loaded.plan.bounding_box(), config.pixels_per_meter, container, &options);
    print_json(&json!({
        "pixelsPerMeter": config.pixels_per_meter,
        "scale": viewport.scale,
        "offsetX": viewport.offset.x,
        "offsetY": viewport.offset.y,
    }))
}

async fn run_table(config: &FloorPlanConfig, file: &Path, id: String) -> Result<(), CliError> {
    let record = read_record(file).await?;
    let loaded = record.to_plan(config.legacy_pixels_per_meter, config.snapper().quantum());
    let Some(info) = table_info(&loaded.plan, &ElementId::from(id.as_str())) else {
        return Err(CliError::NoTable(id));
    };
    print_json(&serde_json::to_value(info)?)
}

async fn run_show(config: &FloorPlanConfig, owner: Uuid, database_url: Option<String>) -> Result<(), CliError> {
    let database_url = database_url.ok_or(CliError::MissingDatabaseUrl)?;
    let pool = db::init_pool(&database_url).await?;
    let store = PgLayoutStore::new(pool);
    let record = store.load(owner).await?.ok_or(CliError::NoLayout(owner))?;
    tracing::info!(%owner, elements = record.elements.len(), "layout fetched");
    print_json(&serde_json::to_value(normalized(config, &record))?)
}

/// The record with every element converted to meters; unknown keys kept.
fn normalized(config: &FloorPlanConfig, record: &LayoutRecord) -> LayoutRecord {
    let loaded = record.to_plan(config.legacy_pixels_per_meter, config.snapper().quantum());
    let mut out = record.clone();
    out.apply_plan(&loaded.plan, loaded.room_dimensions, record.timestamp);
    out
}

async fn read_record(path: &Path) -> Result<LayoutRecord, CliError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
