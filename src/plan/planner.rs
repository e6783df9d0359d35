// src/plan/planner.rs

//! The planning core: campaign definition + multiplicity -> job graph.
//!
//! Pure function of (campaign, catalog state, multiplicity); no I/O, no
//! locks. Pool pre-staged status must already be settled (the probe patch
//! step runs strictly before planning).

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::catalog::{CampaignDefinition, PoolCatalog};
use crate::errors::Result;
use crate::plan::graph::{
    Dag, GenerationParams, InputRef, JobNode, JobParams, ProcessingParams,
};

/// Retry budget for LHE generation jobs. External generation is the less
/// reliable stage and gets the larger budget.
pub const GENERATION_RETRIES: u32 = 3;

/// Retry budget for processing jobs.
pub const PROCESSING_RETRIES: u32 = 2;

/// First random seed handed to generation jobs; unit `i` of a pool gets
/// seed `SEED_BASE + i`.
pub const SEED_BASE: u64 = 100;

/// Submit-description template for generation jobs.
pub const LHE_GEN_TEMPLATE: &str = "processing/templates/lhe_gen.sub";

/// Submit-description template for processing jobs.
pub const PROCESSING_TEMPLATE: &str = "processing/templates/processing.sub";

/// Plan a set of campaigns with failure isolation at campaign granularity.
///
/// With more than one campaign requested, a campaign that fails to plan is
/// skipped with a warning and contributes nothing to the output; the
/// others proceed. A single requested campaign fails hard.
pub fn plan_campaigns(
    pools: &PoolCatalog,
    campaigns: &[CampaignDefinition],
    n_jobs: u64,
) -> Result<Vec<CampaignPlan>> {
    let strict = campaigns.len() == 1;
    let mut plans = Vec::with_capacity(campaigns.len());
    for campaign in campaigns.iter() {
        match plan_campaign(pools, campaign, n_jobs) {
            Ok(plan) => plans.push(plan),
            Err(err) if !strict => {
                warn!(campaign = %campaign.name, error = %err, "skipping campaign");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(plans)
}

/// One campaign's planned job graph plus the metadata the writer needs for
/// its banner comments.
#[derive(Debug, Clone)]
pub struct CampaignPlan {
    pub campaign: String,
    pub description: String,
    pub deprecated: bool,
    pub dag: Dag,
}

/// Plan the full job graph for one campaign at multiplicity `n_jobs`.
///
/// Generation jobs are created once per distinct pool, sized to the pool's
/// aggregate demand `usage_count(pool) * n_jobs`, never once per
/// occurrence; a pool reused within one campaign shares one block of
/// generated units. Processing job `j` consumes, for its occurrence `u` of
/// pool `p`, the generated unit at index `j * usage_count(p) + u`, so that
/// the units of each occurrence position form contiguous, non-overlapping
/// blocks that together cover the whole generated range.
///
/// An unknown pool name fails with `PoolNotFound` before any node is
/// emitted. `n_jobs = 0` is legal and yields an empty, structurally valid
/// graph.
pub fn plan_campaign(
    pools: &PoolCatalog,
    campaign: &CampaignDefinition,
    n_jobs: u64,
) -> Result<CampaignPlan> {
    // Resolve every input up front: fail fast, no partial graph.
    for input in campaign.inputs.iter() {
        pools.get(input)?;
    }

    if campaign.deprecated {
        warn!(campaign = %campaign.name, "planning deprecated campaign");
    }

    let mut dag = Dag::new();

    // Distinct pools in first-occurrence order, with their aggregate usage.
    let mut distinct: Vec<&str> = Vec::new();
    for input in campaign.inputs.iter() {
        if !distinct.contains(&input.as_str()) {
            distinct.push(input);
        }
    }

    // Stage 1: generation jobs for pools that are not pre-staged.
    let mut generation_jobs: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for &pool_name in distinct.iter() {
        let pool = pools.get(pool_name)?;
        if pool.is_prestaged() {
            debug!(pool = %pool.name, "pre-staged, skipping generation");
            generation_jobs.insert(pool_name, Vec::new());
            continue;
        }

        let usage = campaign.usage_count(pool_name) as u64;
        let units = usage * n_jobs;
        let mut names = Vec::with_capacity(units as usize);
        for i in 0..units {
            let name = format!("LHE_{}_{}", pool.name, i);
            dag.push(JobNode {
                name: name.clone(),
                template: LHE_GEN_TEMPLATE,
                params: JobParams::Generation(GenerationParams {
                    pool: pool.name.clone(),
                    seed: SEED_BASE + i,
                    process: pool.process.clone(),
                    min_pt_conia: pool.min_pt_conia,
                    min_pt_bonia: pool.min_pt_bonia,
                    min_pt_q: pool.min_pt_q,
                }),
                retry: GENERATION_RETRIES,
                parents: Vec::new(),
            });
            names.push(name);
        }
        generation_jobs.insert(pool_name, names);
    }

    // Stage 2: processing jobs, one unit consumed per positional input.
    for job_id in 0..n_jobs {
        let mut inputs: Vec<InputRef> = Vec::with_capacity(campaign.inputs.len());
        let mut parents: Vec<String> = Vec::new();
        let mut usage_counter: BTreeMap<&str, u64> = BTreeMap::new();

        for pool_name in campaign.inputs.iter() {
            let pool = pools.get(pool_name)?;
            let usage_idx = *usage_counter.get(pool_name.as_str()).unwrap_or(&0);
            usage_counter.insert(pool_name.as_str(), usage_idx + 1);

            if pool.is_prestaged() {
                inputs.push(InputRef::PreStaged {
                    pool: pool.name.clone(),
                    job_id,
                    usage_idx,
                });
            } else {
                let usage = campaign.usage_count(pool_name) as u64;
                let index = job_id * usage + usage_idx;
                parents.push(generation_jobs[pool_name.as_str()][index as usize].clone());
                inputs.push(InputRef::Generated {
                    pool: pool.name.clone(),
                    index,
                });
            }
        }

        dag.push(JobNode {
            name: format!("PROC_{}_{}", campaign.name, job_id),
            template: PROCESSING_TEMPLATE,
            params: JobParams::Processing(ProcessingParams {
                campaign: campaign.name.clone(),
                job_id,
                inputs,
                modes: campaign.modes.clone(),
                analysis: campaign.analysis.clone(),
                n_sources: campaign.n_sources(),
            }),
            retry: PROCESSING_RETRIES,
            parents,
        });
    }

    dag.check_acyclic()?;

    debug!(
        campaign = %campaign.name,
        generation = dag.generation_nodes().count(),
        processing = dag.processing_nodes().count(),
        "campaign planned"
    );

    Ok(CampaignPlan {
        campaign: campaign.name.clone(),
        description: campaign.description.clone(),
        deprecated: campaign.deprecated,
        dag,
    })
}
