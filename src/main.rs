// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use std::env;

use trashflow::{AppConfig, Dashboard, FacilityId};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = AppConfig::load()?;

    match args.get(1).map(String::as_str) {
        Some("list") => {
            trashflow::logging::init();
            run_list(&config)
        }
        Some("plan") => {
            trashflow::logging::init();
            let id: FacilityId = args
                .get(2)
                .context("Usage: trashflow plan <facility-id>")?
                .parse()
                .context("Facility id must be a number")?;
            run_plan(&config, id)
        }
        Some(other) => bail!("Unknown command: {} (expected: list, plan <id>)", other),
        None => run_ui_mode(&config),
    }
}

fn run_list(config: &AppConfig) -> Result<()> {
    let dashboard = Dashboard::from_config(config)?;

    println!("♻️  TrashFlow Jogja - Waste Bank Capacity");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for (index, record) in dashboard.records().iter().enumerate() {
        println!(
            "{:>3}  {:<14} {:<28} {:>3}%  {}",
            index + 1,
            record.district(),
            record.name(),
            record.capacity_percent(),
            record.status().label()
        );
    }

    let summary = dashboard.summary();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "Total {} | Aman {} | Peringatan {} | Overload {}",
        summary.total, summary.safe, summary.warning, summary.overload
    );

    Ok(())
}

fn run_plan(config: &AppConfig, id: FacilityId) -> Result<()> {
    let dashboard = Dashboard::from_config(config)?;

    match dashboard.plan_for(id) {
        Ok(plan) => {
            println!("🔁 Redistribution plan for facility {}", plan.source_id);
            println!("   Target facility: {}", plan.target_id);
            println!("   Amount moved:    {}%", plan.amount_percent);
            println!(
                "   Source after:    {}% ({})",
                plan.resulting_source_capacity,
                plan.resulting_source_status().label()
            );
            println!(
                "   Target after:    {}% ({})",
                plan.resulting_target_capacity,
                plan.resulting_target_status().label()
            );
        }
        Err(err) => println!("⚠️  {}", err),
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig) -> Result<()> {
    trashflow::logging::init_to_file(&config.log_file)?;

    let dashboard = Dashboard::from_config(config)?;
    println!("✓ Loaded {} facilities", dashboard.records().len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(dashboard, config);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin trashflow-server --features server");
    std::process::exit(1);
}
