use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, Instrument};

use fuel_log::analytics::{AnalyticsOptions, FuelAnalyzer};
use fuel_log::calendar;
use fuel_log::config::{self, Config};
use fuel_log::date_parser::DateParser;
use fuel_log::display::DisplayManager;
use fuel_log::logging;
use fuel_log::models::Vehicle;
use fuel_log::reconcile::{FuelFields, LastEdited};
use fuel_log::store::{FuelLogDraft, LogBook, LogStore};
use fuel_log::transfer::{self, ExportFormat};

#[derive(Parser)]
#[command(name = "fuel-log")]
#[command(about = "Personal fuel expense tracker with efficiency analytics")]
#[command(version)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Data file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Default)]
struct LogFields {
    /// Fuel type label
    #[arg(long)]
    fuel_type: Option<String>,
    /// Unit price
    #[arg(long)]
    price: Option<f64>,
    /// Total cost
    #[arg(long)]
    cost: Option<f64>,
    /// Fuel volume
    #[arg(long, alias = "volume")]
    amount: Option<f64>,
    /// Odometer reading
    #[arg(long)]
    odometer: Option<u64>,
    #[arg(long)]
    notes: Option<String>,
    /// Field entered last; decides which value is derived
    #[arg(long, value_enum)]
    last_edited: Option<LastEdited>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a fill-up or odometer reading
    Add {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Vehicle id
        #[arg(long)]
        vehicle: u64,
        #[command(flatten)]
        fields: LogFields,
    },
    /// Edit a log; omitted fields keep their values
    Edit {
        id: u64,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Vehicle id
        #[arg(long)]
        vehicle: Option<u64>,
        #[command(flatten)]
        fields: LogFields,
    },
    /// Delete a log
    Delete { id: u64 },
    /// Show the logs for one day
    Day {
        /// Date (YYYY-MM-DD)
        date: String,
    },
    /// Show which days of a month have logs
    Month {
        /// Month (YYYY-MM)
        month: String,
    },
    /// Show spend, price and efficiency analytics
    Analytics {
        /// Restrict to one vehicle id
        #[arg(long)]
        vehicle: Option<u64>,
    },
    /// Manage vehicles
    Vehicles {
        #[command(subcommand)]
        action: VehicleCommand,
    },
    /// Manage the fuel type list
    FuelTypes {
        #[command(subcommand)]
        action: FuelTypeCommand,
    },
    /// Export logs as JSON or CSV
    Export {
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Output file, or "-" for stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import logs, replacing ALL existing logs
    Import {
        file: PathBuf,
        /// Input format (default: from file extension)
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
        /// Confirm that existing logs will be overwritten
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum VehicleCommand {
    List,
    Add {
        name: String,
        #[arg(long, default_value = "")]
        make: String,
        #[arg(long, default_value = "")]
        model: String,
    },
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        make: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
    /// Delete a vehicle; its logs are kept
    Delete { id: u64 },
}

#[derive(Subcommand)]
enum FuelTypeCommand {
    List,
    Add { name: String },
    Rename { old: String, new: String },
    Remove { name: String },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Add { .. } => "add",
            Commands::Edit { .. } => "edit",
            Commands::Delete { .. } => "delete",
            Commands::Day { .. } => "day",
            Commands::Month { .. } => "month",
            Commands::Analytics { .. } => "analytics",
            Commands::Vehicles { .. } => "vehicles",
            Commands::FuelTypes { .. } => "fuel-types",
            Commands::Export { .. } => "export",
            Commands::Import { .. } => "import",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    let config = match config::init_config() {
        Ok(config) => config,
        Err(e) => return report_error(e, json),
    };

    if config.logging.output != "console" {
        if let Err(e) = std::fs::create_dir_all(&config.paths.log_directory)
            .context("Failed to create log directory")
        {
            return report_error(e, json);
        }
    }
    // Dropped on return, flushing buffered file output
    let _log_guard = logging::init_logging(&config.logging, &config.paths.log_directory);

    let span = logging::run_span(cli.command.name());
    match run(cli, config).instrument(span).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(e, json),
    }
}

async fn run(cli: Cli, config: &Config) -> Result<()> {
    let json = cli.json;
    let store = LogStore::new(
        cli.data_file
            .unwrap_or_else(|| config.paths.data_file.clone()),
    );
    let mut book = store.load().await?;
    let display = DisplayManager::new(config.units.clone(), &config.output);

    match cli.command {
        Commands::Add {
            date,
            vehicle,
            fields,
        } => {
            let mut draft = FuelLogDraft {
                date: Some(DateParser::parse(&date)?),
                vehicle_id: Some(vehicle),
                fuel_type: book
                    .fuel_types()
                    .as_slice()
                    .first()
                    .cloned()
                    .unwrap_or_default(),
                ..Default::default()
            };
            apply_fields(&mut draft, fields);

            let id = book.save_log(draft, None)?;
            store.save(&book).await?;
            print_saved(&book, id, json, &display);
        }
        Commands::Edit {
            id,
            date,
            vehicle,
            fields,
        } => {
            let existing = book
                .get_log(id)
                .ok_or(fuel_log::FuelLogError::NotFound {
                    collection: "fuel_logs",
                    id,
                })?;
            let mut draft = FuelLogDraft::from_record(existing);
            if let Some(date) = date {
                draft.date = Some(DateParser::parse(&date)?);
            }
            if vehicle.is_some() {
                draft.vehicle_id = vehicle;
            }
            apply_fields(&mut draft, fields);

            book.save_log(draft, Some(id))?;
            store.save(&book).await?;
            print_saved(&book, id, json, &display);
        }
        Commands::Delete { id } => {
            let removed = book.delete_log(id)?;
            store.save(&book).await?;
            print_status(json, &display, serde_json::json!({ "deleted": removed.id }), || {
                format!("Deleted fuel log #{}", removed.id)
            });
        }
        Commands::Day { date } => {
            let date = DateParser::parse(&date)?;
            let logs = book.logs_by_date(date);
            display.display_day(&DateParser::format(date), &logs, &book, json);
        }
        Commands::Month { month } => {
            let (year, month) = DateParser::parse_month(&month)?;
            let indicators = calendar::month_indicators(&book.logs(), year, month);
            display.display_month(
                year,
                month,
                calendar::days_in_month(year, month),
                &indicators,
                json,
            );
        }
        Commands::Analytics { vehicle } => {
            let analyzer = FuelAnalyzer::with_config(&config.analytics);
            let report = analyzer.analyze(&book.logs(), &AnalyticsOptions { vehicle_id: vehicle });
            let scope = match vehicle {
                Some(_) => book.vehicle_name(vehicle).to_string(),
                None => "All Vehicles".to_string(),
            };
            display.display_analytics(&report, &scope, json);
        }
        Commands::Vehicles { action } => run_vehicle_command(&store, &mut book, action, json, &display).await?,
        Commands::FuelTypes { action } => {
            run_fuel_type_command(&store, &mut book, action, json, &display).await?
        }
        Commands::Export { format, output } => {
            let content = transfer::export(&book, format)?;
            let path = output.unwrap_or_else(|| {
                PathBuf::from(transfer::export_file_name(
                    format,
                    chrono::Local::now().naive_local(),
                ))
            });

            if path.as_os_str() == "-" {
                println!("{}", content);
            } else {
                tokio::fs::write(&path, content)
                    .await
                    .with_context(|| format!("Failed to write export: {}", path.display()))?;
                let count = book.log_count();
                print_status(
                    json,
                    &display,
                    serde_json::json!({ "exported": count, "path": path.display().to_string() }),
                    || format!("Exported {} log(s) to {}", count, path.display()),
                );
            }
        }
        Commands::Import { file, format, yes } => {
            if !yes {
                anyhow::bail!(
                    "Import replaces ALL existing fuel logs; re-run with --yes to confirm"
                );
            }
            let format = format.unwrap_or_else(|| detect_format(&file));
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read import file: {}", file.display()))?;

            let count = match format {
                ExportFormat::Json => transfer::import_json(&mut book, &text)?,
                ExportFormat::Csv => transfer::import_csv(&mut book, &text)?,
            };
            store.save(&book).await?;
            print_status(json, &display, serde_json::json!({ "imported": count }), || {
                format!("Imported {} log(s) from {}", count, file.display())
            });
        }
    }

    Ok(())
}

async fn run_vehicle_command(
    store: &LogStore,
    book: &mut LogBook,
    action: VehicleCommand,
    json: bool,
    display: &DisplayManager,
) -> Result<()> {
    match action {
        VehicleCommand::List => display.display_vehicles(&book.vehicles(), json),
        VehicleCommand::Add { name, make, model } => {
            let id = book.add_vehicle(Vehicle {
                id: 0,
                name,
                make,
                model,
            })?;
            store.save(book).await?;
            print_status(json, display, serde_json::json!({ "id": id }), || {
                format!("Added vehicle #{}", id)
            });
        }
        VehicleCommand::Edit {
            id,
            name,
            make,
            model,
        } => {
            let mut vehicle = book
                .get_vehicle(id)
                .cloned()
                .ok_or(fuel_log::FuelLogError::NotFound {
                    collection: "vehicles",
                    id,
                })?;
            if let Some(name) = name {
                vehicle.name = name;
            }
            if let Some(make) = make {
                vehicle.make = make;
            }
            if let Some(model) = model {
                vehicle.model = model;
            }
            book.put_vehicle(vehicle)?;
            store.save(book).await?;
            print_status(json, display, serde_json::json!({ "id": id }), || {
                format!("Updated vehicle #{}", id)
            });
        }
        VehicleCommand::Delete { id } => {
            let removed = book.delete_vehicle(id)?;
            store.save(book).await?;
            print_status(json, display, serde_json::json!({ "deleted": id }), || {
                format!(
                    "Deleted vehicle {}. Its fuel logs were kept.",
                    removed.name
                )
            });
        }
    }
    Ok(())
}

async fn run_fuel_type_command(
    store: &LogStore,
    book: &mut LogBook,
    action: FuelTypeCommand,
    json: bool,
    display: &DisplayManager,
) -> Result<()> {
    match action {
        FuelTypeCommand::List => {
            display.display_fuel_types(&book.fuel_types().sorted(), json);
            return Ok(());
        }
        FuelTypeCommand::Add { name } => {
            book.fuel_types_mut().add(&name)?;
        }
        FuelTypeCommand::Rename { old, new } => {
            book.fuel_types_mut().rename(&old, &new)?;
        }
        FuelTypeCommand::Remove { name } => {
            if !book.fuel_types_mut().remove(&name) {
                anyhow::bail!("Unknown fuel type: {}", name);
            }
        }
    }
    store.save(book).await?;
    display.display_fuel_types(&book.fuel_types().sorted(), json);
    Ok(())
}

/// Copy supplied CLI fields onto the draft. With no explicit
/// `--last-edited`, a single supplied price/cost/amount counts as the
/// last edit.
fn apply_fields(draft: &mut FuelLogDraft, fields: LogFields) {
    let supplied: Vec<LastEdited> = [
        (fields.price.is_some(), LastEdited::Price),
        (fields.cost.is_some(), LastEdited::Cost),
        (fields.amount.is_some(), LastEdited::Amount),
    ]
    .into_iter()
    .filter_map(|(given, field)| given.then_some(field))
    .collect();

    draft.last_edited = fields.last_edited.or(match supplied.as_slice() {
        [only] => Some(*only),
        _ => None,
    });

    let current = draft.fields;
    draft.fields = FuelFields::new(
        fields.price.unwrap_or(current.price),
        fields.cost.unwrap_or(current.total_cost),
        fields.amount.unwrap_or(current.amount),
    );
    if let Some(fuel_type) = fields.fuel_type {
        draft.fuel_type = fuel_type;
    }
    if let Some(odometer) = fields.odometer {
        draft.odometer = odometer;
    }
    if let Some(notes) = fields.notes {
        draft.notes = notes;
    }
}

fn detect_format(path: &std::path::Path) -> ExportFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
        _ => ExportFormat::Json,
    }
}

fn print_saved(book: &LogBook, id: u64, json: bool, display: &DisplayManager) {
    let record = book.get_log(id);
    print_status(
        json,
        display,
        serde_json::json!({ "id": id, "log": record }),
        || match record {
            Some(r) => format!(
                "Saved fuel log #{} ({}, {}, {})",
                id,
                r.date,
                display.money(r.total_cost),
                display.volume(r.amount)
            ),
            None => format!("Saved fuel log #{}", id),
        },
    );
}

fn print_status<F>(json: bool, display: &DisplayManager, value: serde_json::Value, message: F)
where
    F: FnOnce() -> String,
{
    if json {
        println!("{}", display.to_json(&value));
    } else {
        println!("✅ {}", message());
    }
}

fn report_error(e: anyhow::Error, json: bool) -> ExitCode {
    error!(error = %format!("{:#}", e), "Command failed");
    if json {
        println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
    } else {
        eprintln!("Error: {:#}", e);
    }
    ExitCode::FAILURE
}
