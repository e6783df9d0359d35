// src/plan/graph.rs

//! In-memory job graph model.
//!
//! The planner builds the complete node-and-edge graph here before anything
//! is serialized; nothing in the core logic depends on emission order.

use std::fmt;

use anyhow::anyhow;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::Result;

/// Reference to one LHE resource unit consumed by a processing job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputRef {
    /// Unit produced by a generation job in this DAG.
    Generated { pool: String, index: u64 },
    /// Unit taken from a pre-staged pool; the processing job resolves the
    /// actual file at execution time, so there is no dependency edge.
    PreStaged {
        pool: String,
        job_id: u64,
        usage_idx: u64,
    },
}

impl fmt::Display for InputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputRef::Generated { pool, index } => write!(f, "GEN:{pool}:{index}"),
            InputRef::PreStaged {
                pool,
                job_id,
                usage_idx,
            } => write!(f, "EOS:{pool}:{job_id}:{usage_idx}"),
        }
    }
}

/// Parameters of an LHE generation job.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub pool: String,
    pub seed: u64,
    pub process: String,
    pub min_pt_conia: f64,
    pub min_pt_bonia: f64,
    pub min_pt_q: f64,
}

/// Parameters of a processing job (shower -> mix -> sim -> ntuple).
#[derive(Debug, Clone)]
pub struct ProcessingParams {
    pub campaign: String,
    pub job_id: u64,
    /// One resource unit per positional campaign input.
    pub inputs: Vec<InputRef>,
    /// Shower mode per input, parallel to `inputs`.
    pub modes: Vec<String>,
    pub analysis: String,
    pub n_sources: usize,
}

/// Typed parameter record of a job node. The two stages carry distinct
/// shapes so required fields are checked at construction, not at
/// stringification time.
#[derive(Debug, Clone)]
pub enum JobParams {
    Generation(GenerationParams),
    Processing(ProcessingParams),
}

/// One node of the planned DAG.
#[derive(Debug, Clone)]
pub struct JobNode {
    pub name: String,
    /// Submit-description template the external executor runs.
    pub template: &'static str,
    pub params: JobParams,
    /// Retry budget, enforced by the external executor, never by us.
    pub retry: u32,
    /// Names of jobs that must finish first. Parents always precede their
    /// children in the node sequence; the planner builds generation nodes
    /// before the processing nodes that consume them.
    pub parents: Vec<String>,
}

impl JobNode {
    pub fn is_generation(&self) -> bool {
        matches!(self.params, JobParams::Generation(_))
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.params, JobParams::Processing(_))
    }
}

/// Ordered sequence of job nodes with explicit dependency edges.
#[derive(Debug, Clone, Default)]
pub struct Dag {
    nodes: Vec<JobNode>,
}

impl Dag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: JobNode) {
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[JobNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn generation_nodes(&self) -> impl Iterator<Item = &JobNode> {
        self.nodes.iter().filter(|n| n.is_generation())
    }

    pub fn processing_nodes(&self) -> impl Iterator<Item = &JobNode> {
        self.nodes.iter().filter(|n| n.is_processing())
    }

    /// Sanity check: every parent reference resolves to a declared node and
    /// the edge set has no cycles. The planner guarantees both by
    /// construction; this is the planner's final self-check before the
    /// graph is handed to the writer.
    pub fn check_acyclic(&self) -> Result<()> {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for node in self.nodes.iter() {
            graph.add_node(node.name.as_str());
        }

        for node in self.nodes.iter() {
            for parent in node.parents.iter() {
                if !graph.contains_node(parent.as_str()) {
                    return Err(anyhow!(
                        "job '{}' references undeclared parent '{}'",
                        node.name,
                        parent
                    )
                    .into());
                }
                graph.add_edge(parent.as_str(), node.name.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(_order) => Ok(()),
            Err(cycle) => Err(anyhow!(
                "cycle detected in job DAG involving '{}'",
                cycle.node_id()
            )
            .into()),
        }
    }
}
