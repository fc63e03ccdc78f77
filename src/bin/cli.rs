// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! dagmc-export CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dagmc_export::cli::{MeshInventory, Reporter};
use dagmc_export::export::{collect, DagmcExporter, ExportConfig, UniqueIdRegistry};
use dagmc_export::topology::{check_model, demo_model, BrepModel};
use dagmc_export::io;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dagmc-export")]
#[command(about = "Export B-rep models to DAGMC-style mesh databases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a model to a mesh file
    Export {
        /// Input model file
        model: PathBuf,

        /// Output mesh file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (defaults to dagmc.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum distance between facets and the true geometry
        #[arg(long)]
        faceting_tolerance: Option<f64>,

        /// Maximum angle between adjacent facet normals, in degrees
        #[arg(long)]
        normal_tolerance: Option<u32>,

        /// Maximum facet edge length
        #[arg(long)]
        length_tolerance: Option<f64>,

        /// Report every warning
        #[arg(short, long)]
        verbose: bool,

        /// Fail when a curve cannot be faceted
        #[arg(long)]
        fatal_on_curves: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a model for problems without exporting it
    Check {
        /// Input model file
        model: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the unique id every entity receives on export
    Uids {
        /// Input model file
        model: PathBuf,
    },

    /// Summarize a written mesh file
    Inspect {
        /// Mesh file
        mesh: PathBuf,
    },

    /// Write a sample two-body model
    Demo {
        /// Output model file
        #[arg(short, long, default_value = "demo.json")]
        output: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        Reporter::report_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Export {
            model,
            output,
            config,
            faceting_tolerance,
            normal_tolerance,
            length_tolerance,
            verbose,
            fatal_on_curves,
            json,
        } => {
            let mut config = match config {
                Some(path) => ExportConfig::from_file(path)?,
                None => ExportConfig::load()?,
            };
            if let Some(output) = output {
                config.output_filename = output;
            }
            if let Some(v) = faceting_tolerance {
                config.faceting_tolerance = v;
            }
            if let Some(v) = normal_tolerance {
                config.normal_tolerance = v;
            }
            if let Some(v) = length_tolerance {
                config.length_tolerance = v;
            }
            config.verbose |= verbose;
            config.fatal_on_curves |= fatal_on_curves;
            export_command(&model, config, json)
        }
        Commands::Check { model, json } => check_command(&model, json),
        Commands::Uids { model } => uids_command(&model),
        Commands::Inspect { mesh } => inspect_command(&mesh),
        Commands::Demo { output } => {
            demo_model().save(&output)?;
            Reporter::success(&format!("Wrote sample model to {}", output.display()));
            Ok(())
        }
    }
}

fn export_command(model: &Path, config: ExportConfig, json: bool) -> Result<()> {
    let host = BrepModel::load(model)?.into_host();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("Invalid progress template")?,
    );
    spinner.set_message(format!("Exporting {}", model.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let start = Instant::now();
    let mut exporter = DagmcExporter::new(config);
    let result = exporter.execute(&host);
    spinner.finish_and_clear();

    let summary = result.with_context(|| format!("Export of {} failed", model.display()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        Reporter::report_summary(&summary, start.elapsed());
    }
    Ok(())
}

fn check_command(model: &Path, json: bool) -> Result<()> {
    let host = BrepModel::load(model)?.into_host();
    let config = ExportConfig::load()?;
    let report = check_model(&host, &config.facet_params());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        Reporter::report_check(&model.display().to_string(), &report);
    }
    if !report.is_ok() {
        anyhow::bail!("{} issues found in {}", report.issues.len(), model.display());
    }
    Ok(())
}

fn uids_command(model: &Path) -> Result<()> {
    let host = BrepModel::load(model)?.into_host();
    let ids = UniqueIdRegistry::for_topology(&collect(&host));
    let ids: Vec<_> = ids.iter().collect();
    Reporter::report_uids(&ids);
    Ok(())
}

fn inspect_command(mesh: &Path) -> Result<()> {
    let database = io::read_document(mesh)
        .with_context(|| format!("Failed to read mesh file: {}", mesh.display()))?;
    let inventory = MeshInventory::of(&database)?;
    Reporter::report_inspect(&mesh.display().to_string(), &inventory);
    Ok(())
}
