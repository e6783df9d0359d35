use std::error::Error;
use std::io::Write;

use mcdag::catalog::loader::{load_default, load_from_path, load_from_str};
use mcdag::errors::McdagError;

type TestResult = Result<(), Box<dyn Error>>;

const SMALL_CATALOG: &str = r#"
[pool.pool_a]
process = "g g > a a"
description = "pool A"

[pool.pool_b]
process = "g g > b b"

[campaign.DPS]
analysis = "JJP"
inputs = ["pool_a", "pool_a", "pool_b"]
modes = ["normal", "phi", "normal"]
description = "double A plus B"
"#;

#[test]
fn valid_catalog_loads_and_counts_usage() -> TestResult {
    let catalog = load_from_str(SMALL_CATALOG)?;

    let campaign = catalog.campaigns.get("DPS")?;
    assert_eq!(campaign.n_sources(), 3);
    assert_eq!(campaign.usage_count("pool_a"), 2);
    assert_eq!(campaign.usage_count("pool_b"), 1);
    assert_eq!(campaign.usage_count("pool_missing"), 0);

    // Threshold defaults apply when the TOML omits them.
    let pool = catalog.pools.get("pool_b")?;
    assert_eq!(pool.min_pt_conia, 6.0);
    assert_eq!(pool.min_pt_bonia, 4.0);
    assert_eq!(pool.min_pt_q, 4.0);
    assert!(!pool.is_prestaged());

    Ok(())
}

#[test]
fn mode_count_mismatch_is_rejected() {
    let catalog = r#"
[pool.pool_a]
process = "g g > a a"

[campaign.BROKEN]
analysis = "JJP"
inputs = ["pool_a", "pool_a"]
modes = ["normal"]
"#;
    let err = load_from_str(catalog).unwrap_err();
    match err {
        McdagError::ModeCountMismatch {
            campaign,
            modes,
            inputs,
        } => {
            assert_eq!(campaign, "BROKEN");
            assert_eq!(modes, 1);
            assert_eq!(inputs, 2);
        }
        other => panic!("expected ModeCountMismatch, got {other:?}"),
    }
}

#[test]
fn unknown_pool_reference_is_rejected() {
    let catalog = r#"
[pool.pool_a]
process = "g g > a a"

[campaign.BROKEN]
analysis = "JJP"
inputs = ["pool_a", "pool_nope"]
modes = ["normal", "phi"]
"#;
    let err = load_from_str(catalog).unwrap_err();
    match err {
        McdagError::UnknownPoolRef { campaign, pool } => {
            assert_eq!(campaign, "BROKEN");
            assert_eq!(pool, "pool_nope");
        }
        other => panic!("expected UnknownPoolRef, got {other:?}"),
    }
}

#[test]
fn empty_catalog_sections_are_rejected() {
    assert!(matches!(
        load_from_str("").unwrap_err(),
        McdagError::EmptyCatalog("pool")
    ));

    let pools_only = r#"
[pool.pool_a]
process = "g g > a a"
"#;
    assert!(matches!(
        load_from_str(pools_only).unwrap_err(),
        McdagError::EmptyCatalog("campaign")
    ));
}

#[test]
fn lookup_of_absent_names_fails() -> TestResult {
    let catalog = load_from_str(SMALL_CATALOG)?;

    assert!(matches!(
        catalog.pools.get("pool_nope"),
        Err(McdagError::PoolNotFound(_))
    ));
    assert!(matches!(
        catalog.campaigns.get("NOPE"),
        Err(McdagError::CampaignNotFound(_))
    ));

    Ok(())
}

#[test]
fn selector_resolves_names_all_and_categories() -> TestResult {
    let catalog = load_from_str(
        r#"
[pool.pool_a]
process = "g g > a a"

[campaign.JJP_ONE]
analysis = "JJP"
inputs = ["pool_a"]
modes = ["phi"]

[campaign.JJP_TWO]
analysis = "JJP"
inputs = ["pool_a"]
modes = ["normal"]

[campaign.JUP_ONE]
analysis = "JUP"
inputs = ["pool_a"]
modes = ["phi"]
"#,
    )?;

    let one = catalog.campaigns.select("JJP_ONE")?;
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].name, "JJP_ONE");

    let all = catalog.campaigns.select("ALL")?;
    assert_eq!(all.len(), 3);

    let jjp = catalog.campaigns.select("JJP_ALL")?;
    assert_eq!(jjp.len(), 2);
    assert!(jjp.iter().all(|c| c.analysis == "JJP"));

    assert!(matches!(
        catalog.campaigns.select("XXX_ALL"),
        Err(McdagError::CampaignNotFound(_))
    ));
    assert!(matches!(
        catalog.campaigns.select("NOPE"),
        Err(McdagError::CampaignNotFound(_))
    ));

    Ok(())
}

#[test]
fn catalog_loads_from_file_path() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(SMALL_CATALOG.as_bytes())?;

    let catalog = load_from_path(file.path())?;
    assert_eq!(catalog.pools.len(), 2);

    Ok(())
}

#[test]
fn missing_catalog_file_is_an_error() {
    assert!(load_from_path("/nonexistent/catalog.toml").is_err());
}

#[test]
fn builtin_catalog_is_valid() -> TestResult {
    let catalog = load_default()?;

    assert_eq!(catalog.pools.len(), 6);
    assert_eq!(catalog.campaigns.select("ALL")?.len(), 9);
    assert_eq!(catalog.campaigns.select("JJP_ALL")?.len(), 4);
    assert_eq!(catalog.campaigns.select("JUP_ALL")?.len(), 5);

    // Deprecated campaigns stay selectable.
    assert!(catalog.campaigns.get("JUP_SPS")?.deprecated);

    // No pool is pre-staged until the probe says so.
    assert!(catalog.pools.iter().all(|p| !p.is_prestaged()));

    Ok(())
}
