// src/probe/mod.rs

//! Remote storage probe.
//!
//! Determines, per pool, whether enough pre-generated LHE files already
//! exist at the remote endpoint. The probe is deliberately conservative in
//! one direction only: any failure (expired credential, missing directory,
//! timeout) degrades to "not sufficiently pre-staged", which means extra
//! generation work, never skipped generation.

pub mod remote;
pub mod scan;

pub use remote::{RemoteStore, XrootdStore};
pub use scan::scan_pools;

/// Remote endpoint host. Process-wide constant, not derived at runtime.
pub const EOS_HOST: &str = "cceos.ihep.ac.cn";

/// Remote base path under which pool directories live.
pub const EOS_PATH_BASE: &str = "/eos/ihep/cms/store/user/xcheng/MC_Production_v2";

/// Subdirectory of [`EOS_PATH_BASE`] holding per-pool LHE directories.
pub const LHE_POOL_SUBDIR: &str = "lhe_pools";

/// Pre-provisioned X509 proxy used for all remote access.
pub const X509_PROXY_PATH: &str = "/afs/cern.ch/user/x/xcheng/x509up_u180107";

/// Minimum remaining proxy lifetime, in seconds, to count as comfortably
/// valid. Below this (but above zero) the proxy is used with a warning.
pub const MIN_PROXY_LIFETIME_SECS: i64 = 3600;

/// Remote directory of a pool, as passed to the listing tool.
pub fn pool_remote_dir(pool: &str) -> String {
    format!("{EOS_PATH_BASE}/{LHE_POOL_SUBDIR}/{pool}")
}

/// Full XRootD URL of a pool, as recorded in the catalog when the pool is
/// found to be pre-staged.
pub fn pool_remote_url(pool: &str) -> String {
    format!("root://{EOS_HOST}/{EOS_PATH_BASE}/{LHE_POOL_SUBDIR}/{pool}")
}
