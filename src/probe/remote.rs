// src/probe/remote.rs

//! Pluggable remote storage abstraction.
//!
//! The scan logic talks to a [`RemoteStore`] instead of shelling out
//! directly. This makes it easy to swap in a fake store in tests while
//! keeping the production XRootD implementation here.
//!
//! - `XrootdStore` is the default implementation: `voms-proxy-info` for the
//!   credential check, `xrdfs ls` for directory listings.
//! - Tests can provide their own `RemoteStore` with canned counts.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{pool_remote_dir, EOS_HOST, MIN_PROXY_LIFETIME_SECS, X509_PROXY_PATH};

const CREDENTIAL_CHECK_TIMEOUT: Duration = Duration::from_secs(10);
const LISTING_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait abstracting the remote storage queries the scan needs.
pub trait RemoteStore {
    /// Whether the access credential is usable.
    ///
    /// Implementations must fail open: if the credential *cannot be
    /// checked* (tool missing, call error), report `true` so that transient
    /// probe infrastructure issues never block the whole pipeline. A
    /// credential that is demonstrably absent or expired reports `false`.
    fn check_credential(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;

    /// Number of LHE files in the pool's remote directory.
    ///
    /// Returns 0 on any error (missing directory, timeout, listing
    /// failure); "not generated yet" and "directory absent" are
    /// intentionally indistinguishable, both trigger regeneration.
    fn count_remote_files<'a>(
        &'a self,
        pool: &'a str,
    ) -> Pin<Box<dyn Future<Output = u64> + Send + 'a>>;
}

/// Production store backed by the XRootD command-line tools.
#[derive(Debug, Default)]
pub struct XrootdStore;

impl XrootdStore {
    pub fn new() -> Self {
        Self
    }

    async fn proxy_timeleft(&self) -> Option<i64> {
        let output = Command::new("voms-proxy-info")
            .arg("-file")
            .arg(X509_PROXY_PATH)
            .arg("-timeleft")
            .stdin(Stdio::null())
            .output();

        match timeout(CREDENTIAL_CHECK_TIMEOUT, output).await {
            Ok(Ok(out)) if out.status.success() => {
                std::str::from_utf8(&out.stdout)
                    .ok()
                    .and_then(|s| s.trim().parse::<i64>().ok())
            }
            Ok(Ok(out)) => {
                warn!(code = ?out.status.code(), "voms-proxy-info failed");
                None
            }
            Ok(Err(err)) => {
                warn!(error = %err, "could not run voms-proxy-info");
                None
            }
            Err(_) => {
                warn!("timeout checking proxy");
                None
            }
        }
    }
}

impl RemoteStore for XrootdStore {
    fn check_credential(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            if !Path::new(X509_PROXY_PATH).exists() {
                warn!(path = X509_PROXY_PATH, "X509 proxy not found");
                return false;
            }

            match self.proxy_timeleft().await {
                Some(timeleft) if timeleft > MIN_PROXY_LIFETIME_SECS => {
                    debug!(timeleft, "X509 proxy valid");
                    true
                }
                Some(timeleft) if timeleft > 0 => {
                    warn!(timeleft, "X509 proxy expiring soon");
                    true
                }
                Some(_) => false,
                // Could not check; assume valid so a broken probe tool
                // never blocks the pipeline.
                None => true,
            }
        })
    }

    fn count_remote_files<'a>(
        &'a self,
        pool: &'a str,
    ) -> Pin<Box<dyn Future<Output = u64> + Send + 'a>> {
        Box::pin(async move {
            let dir = pool_remote_dir(pool);
            let output = Command::new("xrdfs")
                .arg(EOS_HOST)
                .arg("ls")
                .arg(&dir)
                .env("X509_USER_PROXY", X509_PROXY_PATH)
                .stdin(Stdio::null())
                .output();

            match timeout(LISTING_TIMEOUT, output).await {
                Ok(Ok(out)) if out.status.success() => {
                    let listing = String::from_utf8_lossy(&out.stdout);
                    listing
                        .lines()
                        .filter(|line| line.trim_end().ends_with(".lhe"))
                        .count() as u64
                }
                // Directory might not exist yet.
                Ok(Ok(_)) => 0,
                Ok(Err(err)) => {
                    warn!(pool, error = %err, "error listing pool directory");
                    0
                }
                Err(_) => {
                    warn!(pool, "timeout listing pool directory");
                    0
                }
            }
        })
    }
}
