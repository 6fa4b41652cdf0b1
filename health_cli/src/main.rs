use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use health_core::*;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "health")]
#[command(about = "Daily drink, food and movement tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the event journal (.jsonl or .csv)
    #[arg(long, global = true)]
    journal: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Amount drunk on a day
    Drunk {
        /// Unit to report in (glass, liter, ...)
        #[arg(long)]
        unit: String,

        /// Day to report (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Amount eaten during a meal window
    Eaten {
        /// Named time window (all, breakfast, lunch, dinner, ...)
        #[arg(long, default_value = "all")]
        meal: String,

        /// Unit to report in (kilocalorie, ...)
        #[arg(long)]
        unit: String,

        /// Day to report (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Amount moved on a day
    Moved {
        /// Unit to report in (step, hour, ...)
        #[arg(long)]
        unit: String,

        /// Day to report (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// What is still missing to reach the daily targets
    Left {
        /// Day to report (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Completion rate of each daily target
    Day {
        /// Day to report (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Median daily totals over a date range
    Period {
        /// First day of the range (inclusive)
        #[arg(long)]
        from: NaiveDate,

        /// Last day of the range (inclusive)
        #[arg(long)]
        to: NaiveDate,

        /// Also print the per-day totals
        #[arg(long)]
        daily: bool,
    },

    /// List the events logged on a day
    Records {
        /// Day to list (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn main() -> ExitCode {
    health_core::logging::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let journal_path = cli
        .journal
        .clone()
        .unwrap_or_else(|| config.data.journal_path.clone());

    let mut service = HealthService::new(config)?;
    let summary = journal::load_into(&mut service, &journal_path)?;
    tracing::debug!(
        "Loaded {} records from {}",
        service.store().len(),
        journal_path.display()
    );
    if summary.rejected > 0 {
        eprintln!(
            "Warning: skipped {} invalid journal entries in {}",
            summary.rejected,
            journal_path.display()
        );
    }

    let today = Local::now().date_naive();
    let json = cli.json;

    match cli.command {
        Commands::Drunk { unit, date } => {
            let date = date.unwrap_or(today);
            let unit = Unit::from(unit);
            let amount = service.amount_drunk(&unit, date)?;
            print_amount(json, "drunk", date, &unit, amount)
        }
        Commands::Eaten { meal, unit, date } => {
            let date = date.unwrap_or(today);
            let unit = Unit::from(unit);
            let amount = service.amount_eaten(&meal, &unit, date)?;
            print_amount(json, &format!("eaten ({})", meal), date, &unit, amount)
        }
        Commands::Moved { unit, date } => {
            let date = date.unwrap_or(today);
            let unit = Unit::from(unit);
            let amount = service.amount_moved(&unit, date)?;
            print_amount(json, "moved", date, &unit, amount)
        }
        Commands::Left { date } => {
            let date = date.unwrap_or(today);
            let left = service.unfulfilled_day_report(date)?;
            if json {
                return print_json(&left);
            }
            println!("Still to do on {}:", date);
            println!("  Steps:        {:.0}", left.steps_left);
            println!("  Hours moving: {:.2}", left.hours_left);
            println!("  Kilocalories: {:.0}", left.kilocalories_left);
            println!("  Liters:       {:.2}", left.liters_left);
            Ok(())
        }
        Commands::Day { date } => {
            let report = service.day_report(date.unwrap_or(today))?;
            if json {
                return print_json(&report);
            }
            println!("Completion on {}:", report.date);
            println!("  Steps:        {}", percent(report.steps_completion));
            println!("  Hours moving: {}", percent(report.hours_completion));
            println!("  Kilocalories: {}", percent(report.kilocalories_completion));
            println!("  Liters:       {}", percent(report.liters_completion));
            Ok(())
        }
        Commands::Period { from, to, daily } => {
            let report = service.period_report(from, to)?;
            if json {
                return print_json(&report);
            }
            println!(
                "Medians from {} to {} ({} days):",
                report.start, report.end, report.days
            );
            println!("  Steps:        {:.0}", report.steps_median);
            println!("  Hours moving: {:.2}", report.hours_median);
            println!("  Kilocalories: {:.0}", report.kilocalories_median);
            println!("  Liters:       {:.2}", report.liters_median);

            if daily {
                println!();
                println!(
                    "  {:<10}  {:>8}  {:>6}  {:>8}  {:>6}",
                    "date", "steps", "hours", "kcal", "liters"
                );
                for day in &report.samples {
                    println!(
                        "  {:<10}  {:>8.0}  {:>6.2}  {:>8.0}  {:>6.2}",
                        day.date.to_string(),
                        day.steps,
                        day.hours_moved,
                        day.kilocalories,
                        day.liters
                    );
                }
            }
            Ok(())
        }
        Commands::Records { date } => {
            let date = date.unwrap_or(today);
            let records = service.records(date);
            if json {
                return print_json(&records);
            }
            if records.is_empty() {
                println!("Nothing logged on {}.", date);
                return Ok(());
            }
            for record in records {
                println!(
                    "  {}  {:<5}  {:>8} {:<12} {}",
                    record.timestamp.time().format("%H:%M"),
                    record.category.to_string(),
                    record.quantity,
                    record.unit.to_string(),
                    record.label.as_deref().unwrap_or("-")
                );
            }
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct Amount<'a> {
    date: NaiveDate,
    unit: &'a Unit,
    amount: f64,
}

fn print_amount(json: bool, what: &str, date: NaiveDate, unit: &Unit, amount: f64) -> Result<()> {
    if json {
        return print_json(&Amount { date, unit, amount });
    }
    println!("{} {} {} on {}", amount, unit, what, date);
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn percent(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}
