// src/catalog/validate.rs

use crate::catalog::model::CatalogFile;
use crate::errors::{McdagError, Result};

/// Run semantic validation against a loaded catalog.
///
/// This checks:
/// - there is at least one pool and one campaign
/// - every campaign has exactly one mode per input
/// - all campaign `inputs` refer to existing pools
///
/// Duplicate pool references within one campaign's `inputs` are legal and
/// expected (multi-source scattering); they are *not* flagged here.
pub fn validate_catalog(file: &CatalogFile) -> Result<()> {
    ensure_non_empty(file)?;
    validate_campaigns(file)?;
    Ok(())
}

fn ensure_non_empty(file: &CatalogFile) -> Result<()> {
    if file.pool.is_empty() {
        return Err(McdagError::EmptyCatalog("pool"));
    }
    if file.campaign.is_empty() {
        return Err(McdagError::EmptyCatalog("campaign"));
    }
    Ok(())
}

fn validate_campaigns(file: &CatalogFile) -> Result<()> {
    for (name, campaign) in file.campaign.iter() {
        if campaign.modes.len() != campaign.inputs.len() {
            return Err(McdagError::ModeCountMismatch {
                campaign: name.clone(),
                modes: campaign.modes.len(),
                inputs: campaign.inputs.len(),
            });
        }

        for input in campaign.inputs.iter() {
            if !file.pool.contains_key(input) {
                return Err(McdagError::UnknownPoolRef {
                    campaign: name.clone(),
                    pool: input.clone(),
                });
            }
        }
    }
    Ok(())
}
