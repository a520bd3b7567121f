use anyhow::Context;
use castplan_orders::load_orders;
use castplan_planner::{
    plan_orders, render_json, report, BusinessCalendar, PlannerSettings, ResourceConfig,
    ResourceLedger,
};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "castplan")]
#[command(about = "Constraint-aware production planner for foundry castings")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a batch of orders and emit the schedule as JSON
    Plan {
        /// YAML file with the order book
        #[arg(long)]
        orders: PathBuf,

        /// YAML file with the resource capacities
        #[arg(long)]
        resources: PathBuf,

        /// YAML file listing the plant holidays
        #[arg(long)]
        holidays: PathBuf,

        /// Write the plan JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also print the day-by-day resource usage table
        #[arg(long)]
        usage: bool,

        /// Suppress the console report
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            orders,
            resources,
            holidays,
            out,
            usage,
            quiet,
        } => run_plan(orders, resources, holidays, out, usage, quiet),
    }
}

fn run_plan(
    orders_path: PathBuf,
    resources_path: PathBuf,
    holidays_path: PathBuf,
    out: Option<PathBuf>,
    usage: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let calendar = BusinessCalendar::load_from_file(&holidays_path)
        .with_context(|| format!("loading holidays from {}", holidays_path.display()))?;
    let config = ResourceConfig::load_from_file(&resources_path)
        .with_context(|| format!("loading resources from {}", resources_path.display()))?;
    let mut orders = load_orders(&orders_path)
        .with_context(|| format!("loading orders from {}", orders_path.display()))?;

    let today = Local::now().date_naive();
    let settings = PlannerSettings::default();
    let mut ledger = ResourceLedger::new(config);
    let full_plan = plan_orders(&mut orders, &calendar, &mut ledger, today, &settings);

    if !quiet {
        report::print_schedule_summary(&full_plan, &orders);
        if usage {
            let window_end = calendar.add_calendar_days(today, 14);
            report::print_daily_resource_usage(&full_plan, &orders, &ledger, today, window_end);
        }
    }

    let json = render_json(&full_plan)?;
    match out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("writing plan to {}", path.display()))?;
            log::info!("full plan saved to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
