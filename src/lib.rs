// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod errors;
pub mod logging;
pub mod plan;
pub mod probe;
pub mod writer;

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::anyhow;
use tracing::info;

use crate::catalog::{CampaignCatalog, PoolCatalog};
use crate::cli::CliArgs;
use crate::errors::Result;
use crate::plan::planner::plan_campaigns;
use crate::probe::{scan_pools, XrootdStore};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - catalog loading (explicit path or built-in)
/// - the `--list-*` introspection modes
/// - campaign selection
/// - the remote storage scan and the single pre-planning catalog patch
/// - per-campaign planning
/// - serialization (to stdout with `--dry-run`, to disk otherwise)
pub async fn run(args: CliArgs) -> Result<()> {
    let mut catalog = catalog::load(args.catalog.as_deref())?;

    if args.list_campaigns {
        print_campaigns(&catalog.campaigns);
        return Ok(());
    }
    if args.list_pools {
        print_pools(&catalog.pools);
        return Ok(());
    }

    let Some(selector) = args.campaign.as_deref() else {
        // clap requires --campaign unless a --list-* flag is present, so
        // this is unreachable through the real CLI.
        return Err(anyhow!("no campaign selected (use --campaign or --list-campaigns)").into());
    };

    let selected: Vec<_> = catalog
        .campaigns
        .select(selector)?
        .into_iter()
        .cloned()
        .collect();
    let names: Vec<&str> = selected.iter().map(|c| c.name.as_str()).collect();
    info!(campaigns = ?names, jobs = args.jobs, "planning production DAG");

    // Union of pools any selected campaign needs.
    let required: Vec<String> = selected
        .iter()
        .flat_map(|c| c.inputs.iter().cloned())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();

    if args.skip_probe {
        info!("storage probe skipped; using catalog-declared pre-staged locations only");
    } else {
        let store = XrootdStore::new();
        let found = scan_pools(&store, &required, args.jobs).await;
        // The single sanctioned catalog mutation; completes before any
        // planning read.
        catalog.pools.apply_prestaged(&found);
    }

    for pool in required.iter() {
        if !catalog.pools.get(pool)?.is_prestaged() {
            info!(pool = %pool, "will be generated (insufficient files remotely)");
        }
    }

    // One invalid campaign is skipped with a warning while the others
    // proceed; a single explicitly selected campaign fails hard.
    let plans = plan_campaigns(&catalog.pools, &selected, args.jobs)?;

    let document = writer::render_document(&plans, args.jobs);

    if args.dry_run {
        println!("{document}");
        return Ok(());
    }

    let dag_path = writer::write_dag(Path::new(&args.output_dir), &args.output, &document)?;
    info!(path = %dag_path.display(), "DAG generation complete");
    println!("To submit: condor_submit_dag {}", dag_path.display());
    Ok(())
}

/// `--list-campaigns`: print the catalog grouped by category.
fn print_campaigns(campaigns: &CampaignCatalog) {
    println!("Available campaigns:");
    for category in campaigns.categories() {
        println!();
        println!("{category} campaigns:");
        for campaign in campaigns.iter().filter(|c| c.analysis == category) {
            let status = if campaign.deprecated { "[DEPRECATED] " } else { "" };
            println!("  {}{:<12} : {}", status, campaign.name, campaign.description);
            println!("                 inputs: {}", campaign.inputs.join(" + "));
            println!("                 modes:  {}", campaign.modes.join("/"));
        }
    }
}

/// `--list-pools`: print each pool with its pre-staged status.
fn print_pools(pools: &PoolCatalog) {
    println!("Available LHE pools:");
    for pool in pools.iter() {
        let status = if pool.is_prestaged() { "[EXISTS]" } else { "[GENERATE]" };
        println!();
        println!("{} {}", pool.name, status);
        println!("  process:     {}", pool.process);
        println!("  description: {}", pool.description);
        if let Some(ref path) = pool.remote_path {
            println!("  remote path: {path}");
        }
    }
}
