use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use semtask::cli;
use semtask::client::{DryRunSink, RestSink};
use semtask::config::Config;
use semtask::context::StandardContext;
use semtask::data::Schedule;
use semtask::model::WeekStatus;
use semtask::scheduler::{self, RunReport};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut root_override: Option<PathBuf> = None;
    let mut date_override: Option<NaiveDate> = None;
    let mut dry_run = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" | "help" => {
                cli::print_help();
                return Ok(());
            }
            "--root" | "-r" => {
                i += 1;
                let path = args.get(i).context("--root requires a path")?;
                root_override = Some(PathBuf::from(path));
            }
            "--date" => {
                i += 1;
                let raw = args.get(i).context("--date requires a YYYY-MM-DD date")?;
                let parsed = raw
                    .parse::<NaiveDate>()
                    .with_context(|| format!("'{raw}' is not a YYYY-MM-DD date"))?;
                date_override = Some(parsed);
            }
            "--dry-run" => dry_run = true,
            other => anyhow::bail!("unknown argument '{}' (try --help)", other),
        }
        i += 1;
    }

    TermLogger::init(
        LevelFilter::Info,
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let ctx = StandardContext::new(root_override);
    let config = match Config::load(&ctx) {
        Ok(c) => c,
        Err(e) if Config::is_missing_config_error(&e) => {
            log::warn!("no config file found, using defaults");
            Config::default()
        }
        Err(e) => return Err(e),
    };

    let data_dir = config.resolve_data_dir(&ctx)?;
    let mut schedule = Schedule::load(&data_dir)?;
    log::info!("{}", schedule.semester);

    // "Today" is resolved exactly once and threaded through the run.
    let today = date_override.unwrap_or_else(|| Local::now().date_naive());

    let report = if dry_run {
        let mut sink = DryRunSink::default();
        scheduler::run(&mut schedule, &mut sink, today, &config.timezone).await?
    } else {
        let token = config.resolve_token().with_context(|| {
            format!(
                "no API token: set {} or the `token` config key",
                semtask::config::TOKEN_ENV_VAR
            )
        })?;
        let mut sink = RestSink::new(&config.api_url, &token);
        scheduler::run(&mut schedule, &mut sink, today, &config.timezone).await?
    };

    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    match report.week {
        WeekStatus::OutOfSemester => println!("Not in semester. No tasks added."),
        WeekStatus::MidsemBreak => println!("Midsemester break. No tasks added."),
        WeekStatus::Teaching(week) => {
            println!(
                "{}, week {}: {} task(s) added.",
                report.today,
                week,
                report.total_added()
            );
            for (code, descriptions) in &report.added {
                println!("  {code}:");
                for line in descriptions {
                    println!("    {line}");
                }
            }
            if !report.failures.is_empty() {
                println!("{} task tree(s) failed:", report.failures.len());
                for failure in &report.failures {
                    println!("  {failure}");
                }
            }
        }
    }
}
