//! # Column CLI
//!
//! Command-line front end for `column_core`.
//!
//! ```text
//! column_cli schedule design.csv --csv schedule.csv
//! column_cli inspect design.csv --level "1st Floor" --grid A-1 \
//!     --bars-b 4 --bars-h 4 --analysis a1.json
//! column_cli quick --bars 4 --bar-area 0.44 --fpc 5 --width 12 --depth 12
//! column_cli rebar
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG` or pass `--verbose`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

use column_core::calculations::column::axial_summary;
use column_core::calculations::design::{evaluate_record, ColumnDesignReport};
use column_core::calculations::interaction::RecordedAnalysis;
use column_core::calculations::section::{BarsPerFace, BendingAxis};
use column_core::materials::RebarTable;
use column_core::schedule::{read_schedule_file, ScheduleTable, SCHEDULE_COLUMNS};
use column_core::{load_settings, CalcError, DesignSettings};

#[derive(Parser, Debug)]
#[command(name = "column_cli", version, about = "ACI 318-14 concrete column capacity")]
struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[arg(long, short, global = true, help = "Enable debug logging")]
    verbose: bool,
    #[arg(long, global = true, help = "Design settings JSON file")]
    settings: Option<PathBuf>,
    #[arg(long, global = true, help = "Rebar size table CSV (designator,diameter_in,area_in2)")]
    rebar_table: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read a column design report and print the schedule
    Schedule {
        report: PathBuf,
        #[arg(long, help = "Export the schedule as CSV")]
        csv: Option<PathBuf>,
        #[arg(long = "export-json", help = "Export the schedule as JSON")]
        export_json: Option<PathBuf>,
    },
    /// Check one column against interaction results saved from a section analysis
    Inspect {
        report: PathBuf,
        #[arg(long)]
        level: String,
        #[arg(long)]
        grid: String,
        #[arg(long, default_value_t = 2, help = "Bars per side along x")]
        bars_b: u32,
        #[arg(long, default_value_t = 2, help = "Bars per side along y")]
        bars_h: u32,
        #[arg(long, help = "JSON with x and y interaction results")]
        analysis: PathBuf,
    },
    /// phi*Pn for a nonslender tied column
    Quick {
        #[arg(long, default_value_t = 4)]
        bars: u32,
        #[arg(long, default_value_t = 0.44, help = "Area of one bar (in^2)")]
        bar_area: f64,
        #[arg(long, default_value_t = 5.0, help = "f'c (ksi)")]
        fpc: f64,
        #[arg(long, default_value_t = 12.0, help = "Column width (in)")]
        width: f64,
        #[arg(long, default_value_t = 12.0, help = "Column depth (in)")]
        depth: f64,
    },
    /// List the rebar size table
    Rebar,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(calc) = e.downcast_ref::<CalcError>() {
                if let Ok(json) = serde_json::to_string_pretty(calc) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => DesignSettings::default(),
    };
    debug!("Using settings for {}", settings.code);

    let custom_table;
    let table = match &cli.rebar_table {
        Some(path) => {
            custom_table = RebarTable::load_from_csv(path)?;
            &custom_table
        }
        None => RebarTable::standard(),
    };

    match cli.command {
        Commands::Schedule {
            report,
            csv,
            export_json,
        } => {
            let schedule = load_schedule(&report)?;
            if let Some(path) = csv {
                schedule.write_csv(&path)?;
            }
            if let Some(path) = export_json {
                schedule.write_json(&path)?;
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&schedule.entries())?);
            } else {
                print_schedule(&schedule);
            }
        }
        Commands::Inspect {
            report,
            level,
            grid,
            bars_b,
            bars_h,
            analysis,
        } => {
            let schedule = load_schedule(&report)?;
            let Some(record) = schedule.get(&level, &grid) else {
                bail!("No column at level '{}', grid '{}' in {}", level, grid, report.display());
            };
            let analysis = RecordedAnalysis::load(&analysis)?;
            let bars = BarsPerFace {
                along_b: bars_b,
                along_h: bars_h,
            };
            let result = evaluate_record(record, bars, &analysis, table, &settings)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_report(&result);
            }
        }
        Commands::Quick {
            bars,
            bar_area,
            fpc,
            width,
            depth,
        } => {
            let summary = axial_summary(
                width,
                depth,
                fpc,
                bars,
                bar_area,
                settings.rebar.fy_ksi,
                &settings.phi,
            )?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("phi*Pn = {:.2} kips", summary.phi_pn_max_kips);
                println!("Column is {:.3}% reinforced.", summary.reinforcement_ratio * 100.0);
            }
        }
        Commands::Rebar => {
            if cli.json {
                let bars: Vec<_> = table.iter().collect();
                println!("{}", serde_json::to_string_pretty(&bars)?);
            } else {
                println!("{:<6} {:>10} {:>10}", "Size", "d (in)", "A (in2)");
                for bar in table.iter() {
                    println!(
                        "{:<6} {:>10.3} {:>10.2}",
                        bar.designator, bar.diameter_in, bar.area_in2
                    );
                }
            }
        }
    }
    Ok(())
}

fn load_schedule(report: &Path) -> Result<ScheduleTable> {
    let records = read_schedule_file(report)
        .with_context(|| format!("reading column design report {}", report.display()))?;
    Ok(ScheduleTable::from_records(records)?)
}

fn print_schedule(schedule: &ScheduleTable) {
    print!("{:<14} {:<10}", "story", "designs");
    for column in SCHEDULE_COLUMNS {
        print!(" {:>9}", column);
    }
    println!();
    for record in schedule.records() {
        print!("{:<14} {:<10}", record.level, record.grid_location);
        for column in SCHEDULE_COLUMNS {
            print!(" {:>9}", record.column_value(column).unwrap_or(""));
        }
        println!();
    }
}

fn print_report(report: &ColumnDesignReport) {
    let s = &report.section;
    println!("═══════════════════════════════════════");
    println!("  COLUMN {}", s.label);
    println!("═══════════════════════════════════════");
    println!();
    println!(
        "Section:   {}\" x {}\", {} x {} bars ({}, {} total)",
        s.b_in,
        s.h_in,
        s.bars.along_b,
        s.bars.along_h,
        s.bar.designator,
        report.bar_coordinates.len()
    );
    println!("Concrete:  {} (beta_1 = {:.3})", s.concrete.name, s.concrete.beta1());
    println!("Rebar:     {}", s.rebar.name);
    println!("Steel:     {:.2}%", s.reinforcement_ratio() * 100.0);
    println!();
    println!("Axial:");
    println!("  Pn,max     = {:.1} kips", report.pn_max.0);
    println!("  phi*Pn,max = {:.1} kips", report.phi_pn_max.0);
    println!();
    println!("Demand:");
    println!(
        "  Pu = {:.1} kips, Mux = {:.1} kip-ft, Muy = {:.1} kip-ft",
        report.demand.pu.0, report.demand.mu_x.0, report.demand.mu_y.0
    );
    println!();
    println!("Capacity Checks:");
    for check in &report.checks {
        let axis = match check.axis {
            BendingAxis::X => "x",
            BendingAxis::Y => "y",
        };
        match (check.phi_mn, check.utilization) {
            (Some(phi_mn), Some(ratio)) => println!(
                "  About {}: {:.2} ({:.1}/{:.1} kip-ft) {}",
                axis,
                ratio,
                check.mu.0,
                phi_mn.0,
                status_icon(check.adequate)
            ),
            _ => println!("  About {}: Pu outside design curve {}", axis, status_icon(false)),
        }
    }
    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }
    println!();
    println!("═══════════════════════════════════════");
    println!("  RESULT: {}", if report.is_adequate() { "PASS" } else { "FAIL" });
    println!("═══════════════════════════════════════");
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
