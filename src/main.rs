use clap::Parser;
use dialoguer::Confirm;
use species_map_common::{format_status_table, normalize_decimal_separator, parse_coordinate_with};
use species_map_rust::cli::{Cli, Commands};
use species_map_rust::config::Config;
use species_map_rust::error::{Result, SpeciesMapError};
use species_map_rust::gbif::GbifClient;
use species_map_rust::render::LeafletRenderer;
use species_map_rust::validator::{GbifValidator, ValidatorConfig};
use species_map_rust::{export, logging, pipeline, spreadsheet};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✖ {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Token cancelled on the first Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n⚠ Interrupted, finishing with partial results...");
            child.cancel();
        }
    });
    token
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    match cli.command {
        Commands::Validate {
            input,
            output,
            sheet,
            layout,
            region,
            map,
            coordinate_column,
            table,
            json,
        } => {
            sheet.apply(&mut config);
            layout.apply(&mut config);
            region.apply(&mut config);
            map.apply(&mut config);
            if let Some(column) = coordinate_column {
                config.columns.coordinates = column;
            }

            println!("🌿 species-map - validate\n");
            let sheet_table = spreadsheet::load_table(&input, config.sheet.as_deref())?;
            let client = GbifClient::new(&config.gbif)?;
            let validator = GbifValidator::new(client, ValidatorConfig::from_gbif(&config.gbif));
            let cancel = cancel_on_ctrl_c();

            let report = pipeline::run_validation(
                &sheet_table,
                &config,
                validator,
                &LeafletRenderer::new(),
                &output,
                &cancel,
            )
            .await?;

            println!(
                "\nSPECIES STATUS (region: {}):",
                config.region().unwrap_or("ALL")
            );
            println!("{}", format_status_table(&report.results, config.region()));

            if !report.dropped.is_empty() {
                println!("\n{} rows dropped:", report.dropped.len());
                for dropped in &report.dropped {
                    println!("  row {}: {}", dropped.row, dropped.reason);
                }
            }

            if let Some(path) = table {
                export::write_status_workbook(
                    &path,
                    &report.records,
                    &report.results,
                    config.region(),
                )?;
                println!("✔ Table saved: {}", path.display());
            }
            if let Some(path) = json {
                export::write_json(&path, &report.results)?;
                println!("✔ Results saved: {}", path.display());
            }

            if report.cancelled {
                println!("\n⚠ Partial results ({} markers)", report.marker_count);
            } else {
                println!("\n✅ Done ({} markers)", report.marker_count);
            }
        }

        Commands::Occurrences {
            input,
            output,
            sheet,
            region,
            limit,
            geometry,
        } => {
            sheet.apply(&mut config);
            region.apply(&mut config);
            if let Some(limit) = limit {
                config.gbif.occurrence_limit = limit;
            }
            if let Some(wkt) = geometry {
                config.gbif.geometry_wkt = Some(wkt);
            }

            println!("🌍 species-map - occurrences\n");
            let sheet_table = spreadsheet::load_table(&input, config.sheet.as_deref())?;
            let client = GbifClient::new(&config.gbif)?;
            let cancel = cancel_on_ctrl_c();

            let report = pipeline::run_occurrences(
                &sheet_table,
                &config,
                &client,
                &LeafletRenderer::new(),
                &output,
                &cancel,
            )
            .await?;

            if !report.skipped.is_empty() {
                println!("\nSkipped: {}", report.skipped.join(", "));
            }
            println!("\n{}", report.summary(config.region().unwrap_or("ALL")));
        }

        Commands::Plot {
            input,
            output,
            sheet,
            map,
            lat_column,
            lon_column,
        } => {
            sheet.apply(&mut config);
            map.apply(&mut config);
            if let Some(column) = lat_column {
                config.columns.latitude = column;
            }
            if let Some(column) = lon_column {
                config.columns.longitude = column;
            }

            println!("🗺 species-map - plot\n");
            let sheet_table = spreadsheet::load_table(&input, config.sheet.as_deref())?;
            let count = pipeline::run_plot(&sheet_table, &config, &LeafletRenderer::new(), &output)?;
            println!("\n✅ Done ({} markers)", count);
        }

        Commands::Parse { values, layout } => {
            layout.apply(&mut config);
            for value in &values {
                match parse_coordinate_with(&normalize_decimal_separator(value), config.layout) {
                    Ok(coord) => println!("{}\t{}\t{}", value, coord.latitude, coord.longitude),
                    Err(rejection) => println!("{}\trejected: {}", value, rejection),
                }
            }
        }

        Commands::Config { show, init } => {
            if init {
                let overwrite = !config_path.exists()
                    || Confirm::new()
                        .with_prompt(format!("{} exists. Overwrite?", config_path.display()))
                        .default(false)
                        .interact()
                        .map_err(|e| SpeciesMapError::Config(e.to_string()))?;
                if overwrite {
                    Config::default().save_to(&config_path)?;
                    config = Config::default();
                    println!("✔ Config written: {}", config_path.display());
                }
            }

            if show || !init {
                println!("Config: {}", config_path.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}
