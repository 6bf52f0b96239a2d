use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wl_analysis::{AnalysisConfig, TimeSelector, list_zones};
use wl_app::{AppError, AppResult, dataset_service, query};
use wl_hierarchy::AnnotatedNode;
use wl_store::MeterStore;

#[derive(Parser)]
#[command(name = "wl-cli")]
#[command(about = "WaterLoss CLI - Hierarchical water metering and loss accounting", long_about = None)]
struct Cli {
    /// Analysis config YAML (falls back to $WATERLOSS_CONFIG, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Range {
    /// First month of the range (defaults to the first month of the dataset)
    #[arg(long)]
    start: Option<String>,
    /// Last month of the range (defaults to the last month of the dataset)
    #[arg(long)]
    end: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BreakdownBy {
    Type,
    Tier,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a dataset and summarize its hierarchy
    Validate {
        /// Path to the dataset JSON file
        dataset: PathBuf,
    },
    /// Print the meter hierarchy with per-node loss
    Tree {
        /// Path to the dataset JSON file
        dataset: PathBuf,
        #[command(flatten)]
        range: Range,
    },
    /// Total system loss from the tree rollup, and where it happens
    Losses {
        /// Path to the dataset JSON file
        dataset: PathBuf,
        #[command(flatten)]
        range: Range,
        /// Number of largest losses to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Stage losses for a single month
    Stage {
        /// Path to the dataset JSON file
        dataset: PathBuf,
        /// Month key, e.g. Jan-25
        month: String,
    },
    /// Stage losses aggregated over a month range
    Aggregate {
        /// Path to the dataset JSON file
        dataset: PathBuf,
        #[command(flatten)]
        range: Range,
    },
    /// Bulk vs. individual comparison for one zone
    Zone {
        /// Path to the dataset JSON file
        dataset: PathBuf,
        /// Zone key, e.g. Zone_03_(A)
        zone: String,
        /// Single month; otherwise the range is used
        #[arg(long, conflicts_with_all = ["start", "end"])]
        month: Option<String>,
        #[command(flatten)]
        range: Range,
    },
    /// List zones with their topology
    Zones {
        /// Path to the dataset JSON file
        dataset: PathBuf,
    },
    /// Tree rollup and stage classification side by side
    Compare {
        /// Path to the dataset JSON file
        dataset: PathBuf,
        #[command(flatten)]
        range: Range,
    },
    /// Consumption grouped by meter type or tier
    Breakdown {
        /// Path to the dataset JSON file
        dataset: PathBuf,
        #[command(flatten)]
        range: Range,
        #[arg(long, value_enum, default_value_t = BreakdownBy::Type)]
        by: BreakdownBy,
    },
}

fn main() -> AppResult<()> {
    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = dataset_service::load_config(cli.config.as_deref())?;
    let json = cli.json;

    match cli.command {
        Commands::Validate { dataset } => cmd_validate(&dataset, &config, json),
        Commands::Tree { dataset, range } => cmd_tree(&dataset, &range, &config, json),
        Commands::Losses {
            dataset,
            range,
            top,
        } => cmd_losses(&dataset, &range, top, &config, json),
        Commands::Stage { dataset, month } => cmd_stage(&dataset, &month, &config, json),
        Commands::Aggregate { dataset, range } => cmd_aggregate(&dataset, &range, &config, json),
        Commands::Zone {
            dataset,
            zone,
            month,
            range,
        } => cmd_zone(&dataset, &zone, month, &range, &config, json),
        Commands::Zones { dataset } => cmd_zones(&dataset, &config, json),
        Commands::Compare { dataset, range } => cmd_compare(&dataset, &range, &config, json),
        Commands::Breakdown { dataset, range, by } => {
            cmd_breakdown(&dataset, &range, by, &config, json)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_window(dataset: &Path, range: &Range) -> AppResult<(MeterStore, wl_store::MonthWindow)> {
    let store = dataset_service::load_dataset(dataset)?;
    let window = query::resolve_window(&store, range.start.as_deref(), range.end.as_deref())?;
    Ok((store, window))
}

fn cmd_validate(dataset: &Path, config: &AnalysisConfig, json: bool) -> AppResult<()> {
    let store = dataset_service::load_dataset(dataset)?;
    let summary = dataset_service::summarize_dataset(&store, config)?;
    if json {
        return print_json(&summary);
    }

    println!("✓ Dataset is valid: {}", dataset.display());
    println!(
        "  {} meters, {} months ({} to {})",
        summary.meter_count,
        summary.month_count,
        summary.first_month.as_deref().unwrap_or("-"),
        summary.last_month.as_deref().unwrap_or("-"),
    );
    println!(
        "  Main source: {}",
        summary.main_source.as_deref().unwrap_or("(none)")
    );
    let tiers: Vec<String> = summary
        .tier_counts
        .iter()
        .map(|(t, n)| format!("{}={}", t.as_str(), n))
        .collect();
    println!("  Tiers: {}", tiers.join(", "));
    println!(
        "  Hierarchy: {} roots, depth {}",
        summary.root_count, summary.depth
    );
    if !summary.orphans.is_empty() {
        println!("  Unresolved parents ({}):", summary.orphans.len());
        for label in &summary.orphans {
            println!("    {}", label);
        }
    }
    Ok(())
}

fn print_node(node: &AnnotatedNode, indent: usize) {
    if node.is_leaf() {
        println!(
            "{:indent$}{} [{}] {:.2}",
            "",
            node.label,
            node.tier.as_str(),
            node.total_consumption,
            indent = indent
        );
    } else {
        println!(
            "{:indent$}{} [{}] {:.2} (children {:.2}, loss {:.2} / {:.1}%)",
            "",
            node.label,
            node.tier.as_str(),
            node.total_consumption,
            node.children_sum,
            node.loss,
            node.loss_percent,
            indent = indent
        );
    }
}

fn cmd_tree(dataset: &Path, range: &Range, config: &AnalysisConfig, json: bool) -> AppResult<()> {
    let (store, window) = load_window(dataset, range)?;
    let report = query::rollup_over(&store, &window, config)?;
    if json {
        return print_json(&report);
    }

    println!("Hierarchy for {}:", window.period());
    for (level, node) in report.walk() {
        print_node(node, 2 + 2 * level);
    }
    println!("Total system loss: {:.2}", report.total_system_loss);
    Ok(())
}

fn cmd_losses(
    dataset: &Path,
    range: &Range,
    top: usize,
    config: &AnalysisConfig,
    json: bool,
) -> AppResult<()> {
    let (store, window) = load_window(dataset, range)?;
    let report = query::rollup_over(&store, &window, config)?;

    let mut nodes: Vec<&AnnotatedNode> = report.internal_nodes().collect();
    nodes.sort_by(|a, b| b.loss.total_cmp(&a.loss));
    nodes.truncate(top);

    if json {
        #[derive(Serialize)]
        struct NodeLoss {
            label: String,
            loss: f64,
            loss_percent: f64,
        }
        #[derive(Serialize)]
        struct LossesOut {
            period: String,
            total_system_loss: f64,
            largest: Vec<NodeLoss>,
            gains: Vec<NodeLoss>,
        }
        let to_out = |n: &&AnnotatedNode| NodeLoss {
            label: n.label.clone(),
            loss: n.loss,
            loss_percent: n.loss_percent,
        };
        let gains: Vec<&AnnotatedNode> = report.gains().collect();
        return print_json(&LossesOut {
            period: window.period(),
            total_system_loss: report.total_system_loss,
            largest: nodes.iter().map(to_out).collect(),
            gains: gains.iter().map(to_out).collect(),
        });
    }

    println!(
        "Total system loss for {}: {:.2}",
        window.period(),
        report.total_system_loss
    );
    println!("Largest losses:");
    for n in &nodes {
        println!("  {:<32} {:>12.2} {:>7.1}%", n.label, n.loss, n.loss_percent);
    }
    let gains: Vec<&AnnotatedNode> = report.gains().collect();
    if !gains.is_empty() {
        println!("Meters reading less than their children:");
        for n in gains {
            println!("  {:<32} {:>12.2}", n.label, n.loss);
        }
    }
    Ok(())
}

fn cmd_stage(dataset: &Path, month: &str, config: &AnalysisConfig, json: bool) -> AppResult<()> {
    let store = dataset_service::load_dataset(dataset)?;
    let r = query::stage_for_month(&store, month, config)?;
    if json {
        return print_json(&r);
    }

    println!("Stage losses for {}:", month);
    print_stage_table(&r);
    Ok(())
}

fn print_stage_table(r: &wl_analysis::WaterLossResult) {
    println!("  Main source:        {:>12.2}", r.main_source_total);
    println!("  Zone distribution:  {:>12.2}", r.zone_distribution_total);
    println!("  Building level:     {:>12.2}", r.building_level_total);
    println!("  End users:          {:>12.2}", r.end_user_total);
    for (name, loss) in [
        ("Stage 1 loss", r.stage1_loss),
        ("Stage 2 loss", r.stage2_loss),
        ("Stage 3 loss", r.stage3_loss),
        ("Total loss", r.total_loss),
    ] {
        println!("  {:<19} {:>12.2} {:>7.1}%", format!("{}:", name), loss.absolute, loss.percent);
    }
    println!("  System efficiency:  {:>11.1}%", r.system_efficiency_percent);
}

fn cmd_aggregate(dataset: &Path, range: &Range, config: &AnalysisConfig, json: bool) -> AppResult<()> {
    let (store, window) = load_window(dataset, range)?;
    let agg = query::aggregate_over(&store, &window, config);
    if json {
        return print_json(&agg);
    }

    println!("Stage losses for {} ({} months):", agg.period, agg.months_count);
    print_stage_table(&agg.result);
    println!("Monthly total loss:");
    for m in &agg.monthly_breakdown {
        println!(
            "  {:<8} {:>12.2} {:>7.1}%",
            m.month, m.result.total_loss.absolute, m.result.total_loss.percent
        );
    }
    Ok(())
}

fn cmd_zone(
    dataset: &Path,
    zone: &str,
    month: Option<String>,
    range: &Range,
    config: &AnalysisConfig,
    json: bool,
) -> AppResult<()> {
    let store = dataset_service::load_dataset(dataset)?;
    let selector = match month {
        Some(m) => TimeSelector::Month(m),
        None => {
            let window = query::resolve_window(&store, range.start.as_deref(), range.end.as_deref())?;
            let (Some(start), Some(end)) = (window.start(), window.end()) else {
                return Err(AppError::InvalidInput("Empty month range".to_string()));
            };
            TimeSelector::range(start, end)
        }
    };
    let r = query::zone_report(&store, zone, &selector, config)?;
    if json {
        return print_json(&r);
    }

    println!("Zone {} ({:?}):", r.zone, r.topology);
    if let Some(range) = &r.date_range {
        println!("  Period: {} ({} months)", range, r.months_count.unwrap_or(0));
    }
    println!(
        "  Bulk ({}): {:.2}",
        r.bulk_meter.as_deref().unwrap_or("none"),
        r.zone_bulk_consumption
    );
    println!("  Individual: {:.2}", r.total_individual_consumption);
    if let (Some(b), Some(v), Some(o)) = (r.building_total, r.villa_total, r.other_total) {
        println!("    buildings {:.2}, villas {:.2}, other {:.2}", b, v, o);
    }
    match r.main_bulk_usage_percent {
        Some(usage) => println!("  Share of main source: {:.1}%", usage),
        None => {
            println!("  Difference: {:.2}", r.difference);
            println!(
                "  Loss: {:.1}%  Efficiency: {:.1}%",
                r.loss_percentage, r.efficiency_percentage
            );
        }
    }
    for m in &r.meters {
        let category = format!("{:?}", m.category);
        println!("    {:<32} {:<10} {:>12.2}", m.label, category, m.consumption);
    }
    Ok(())
}

fn cmd_zones(dataset: &Path, config: &AnalysisConfig, json: bool) -> AppResult<()> {
    let store = dataset_service::load_dataset(dataset)?;
    let zones = list_zones(&store, config);
    if json {
        return print_json(&zones);
    }

    if zones.is_empty() {
        println!("No zones found in dataset");
    } else {
        println!("Zones in dataset:");
        for z in zones {
            println!(
                "  {} - {:?}, bulk {} ({} meters)",
                z.zone,
                z.topology,
                z.bulk_meter.as_deref().unwrap_or("none"),
                z.meter_count
            );
        }
    }
    Ok(())
}

fn cmd_compare(dataset: &Path, range: &Range, config: &AnalysisConfig, json: bool) -> AppResult<()> {
    let (store, window) = load_window(dataset, range)?;
    let summaries = query::compare_models_over(&store, &window, config)?;
    if json {
        return print_json(&summaries);
    }

    println!("Loss models for {}:", window.period());
    println!(
        "  {:<22} {:>12} {:>12} {:>12} {:>8}",
        "model", "supply", "delivered", "loss", "loss %"
    );
    for s in summaries {
        println!(
            "  {:<22} {:>12.2} {:>12.2} {:>12.2} {:>7.1}%",
            s.model, s.supply, s.delivered, s.loss, s.loss_percent
        );
    }
    Ok(())
}

fn cmd_breakdown(
    dataset: &Path,
    range: &Range,
    by: BreakdownBy,
    config: &AnalysisConfig,
    json: bool,
) -> AppResult<()> {
    let (store, window) = load_window(dataset, range)?;
    let shares = match by {
        BreakdownBy::Type => query::breakdown_by_type(&store, &window, config),
        BreakdownBy::Tier => query::breakdown_by_tier(&store, &window),
    };
    if json {
        return print_json(&shares);
    }

    println!("Consumption for {}:", window.period());
    for s in shares {
        println!(
            "  {:<32} {:>12.2} {:>7.1}% ({} meters)",
            s.key, s.consumption, s.percent, s.meter_count
        );
    }
    Ok(())
}
