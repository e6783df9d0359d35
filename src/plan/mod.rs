// src/plan/mod.rs

pub mod graph;
pub mod planner;

pub use graph::{Dag, GenerationParams, InputRef, JobNode, JobParams, ProcessingParams};
pub use planner::{
    plan_campaign, plan_campaigns, CampaignPlan, GENERATION_RETRIES, PROCESSING_RETRIES,
};
