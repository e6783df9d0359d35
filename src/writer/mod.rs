// src/writer/mod.rs

//! Serialization of planned graphs into the DAGMan text format, plus the
//! static scheduler policy document.
//!
//! The writer performs no validation of its own; all graph invariants are
//! guaranteed upstream by the planner. Within each campaign, node
//! declarations are emitted before edge declarations - a constraint of the
//! text format only, the in-memory graph is already complete when we get
//! it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::errors::Result;
use crate::plan::graph::{JobNode, JobParams};
use crate::plan::planner::CampaignPlan;

/// Template of the synthetic terminal summary node.
pub const SUMMARY_TEMPLATE: &str = "processing/templates/summary.sub";

/// Name of the companion scheduler policy document, written next to the
/// DAG file.
pub const DAGMAN_CONFIG_FILENAME: &str = "dagman.config";

/// Render the complete DAG document for a set of planned campaigns.
///
/// The trailing `FINAL` summary directive is always present, last, and
/// carries no parent edges: DAGMan's declaration-plus-explicit-edge
/// semantics make it run after the rest of the graph. It is emitted even
/// for an empty plan set, so the document stays syntactically valid.
pub fn render_document(plans: &[CampaignPlan], n_jobs: u64) -> String {
    let mut lines: Vec<String> = Vec::new();
    let rule = format!("# {}", "=".repeat(70));

    lines.push(rule.clone());
    lines.push("# Full MC Production DAG".to_string());
    let names: Vec<&str> = plans.iter().map(|p| p.campaign.as_str()).collect();
    lines.push(format!("# Campaigns: {}", names.join(", ")));
    lines.push(format!("# Jobs per campaign: {n_jobs}"));
    lines.push(rule);
    lines.push(String::new());

    lines.push("# DAG Configuration".to_string());
    lines.push(format!("CONFIG {DAGMAN_CONFIG_FILENAME}"));
    lines.push(String::new());

    for plan in plans.iter() {
        render_campaign(&mut lines, plan);
    }

    lines.push(String::new());
    lines.push("# ============================================".to_string());
    lines.push("# Final Summary Node".to_string());
    lines.push("# ============================================".to_string());
    lines.push(format!("FINAL SUMMARY {SUMMARY_TEMPLATE}"));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_campaign(lines: &mut Vec<String>, plan: &CampaignPlan) {
    lines.push(String::new());
    lines.push("# ============================================".to_string());
    lines.push(format!("# Campaign: {}", plan.campaign));
    lines.push(format!("# Description: {}", plan.description));
    if plan.deprecated {
        lines.push("# *** DEPRECATED ***".to_string());
    }
    lines.push("# ============================================".to_string());

    // Node declarations first, then all edges.
    for node in plan.dag.nodes() {
        lines.push(format!("JOB {} {}", node.name, node.template));
        lines.push(render_vars(node));
        lines.push(format!("RETRY {} {}", node.name, node.retry));
    }

    for node in plan.dag.nodes() {
        if !node.parents.is_empty() {
            lines.push(format!(
                "PARENT {} CHILD {}",
                node.parents.join(" "),
                node.name
            ));
        }
    }
}

fn render_vars(node: &JobNode) -> String {
    match &node.params {
        JobParams::Generation(p) => format!(
            "VARS {} pool=\"{}\" seed=\"{}\" process=\"{}\" \
             min_pt_conia=\"{:?}\" min_pt_bonia=\"{:?}\" min_pt_q=\"{:?}\"",
            node.name,
            escape(&p.pool),
            p.seed,
            escape(&p.process),
            p.min_pt_conia,
            p.min_pt_bonia,
            p.min_pt_q,
        ),
        JobParams::Processing(p) => {
            let inputs: Vec<String> = p.inputs.iter().map(|i| i.to_string()).collect();
            format!(
                "VARS {} campaign=\"{}\" job_id=\"{}\" inputs=\"{}\" \
                 modes=\"{}\" analysis=\"{}\" n_sources=\"{}\"",
                node.name,
                escape(&p.campaign),
                p.job_id,
                escape(&inputs.join(",")),
                escape(&p.modes.join(",")),
                escape(&p.analysis),
                p.n_sources,
            )
        }
    }
}

/// Escape a VARS value for double-quoted DAGMan syntax.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// The companion scheduler policy document. Fixed tuning values, not
/// derived from any campaign.
pub fn dagman_config() -> &'static str {
    "\
# DAGMan Configuration
# ====================

# Maximum number of jobs to submit at once
DAGMAN_MAX_JOBS_SUBMITTED = 500

# Maximum number of jobs in idle state
DAGMAN_MAX_JOBS_IDLE = 200

# Retry failed jobs
DAGMAN_MAX_SUBMITS_PER_INTERVAL = 50
DAGMAN_SUBMIT_DELAY = 1

# Log settings
DAGMAN_SUPPRESS_NOTIFICATION = True

# Allow rescue DAG creation
DAGMAN_GENERATE_RESCUE_DAG = True
"
}

/// Persist the DAG document and the policy document.
///
/// Any failure here is fatal and surfaced directly to the invoker.
pub fn write_dag(output_dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {output_dir:?}"))?;

    let dag_path = output_dir.join(filename);
    fs::write(&dag_path, content)
        .with_context(|| format!("writing DAG file {dag_path:?}"))?;
    info!(path = %dag_path.display(), "wrote DAG file");

    let config_path = output_dir.join(DAGMAN_CONFIG_FILENAME);
    fs::write(&config_path, dagman_config())
        .with_context(|| format!("writing DAGMan config {config_path:?}"))?;
    info!(path = %config_path.display(), "wrote DAGMan config");

    Ok(dag_path)
}
