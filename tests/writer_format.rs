use std::collections::BTreeMap;
use std::error::Error;
use std::fs;

use mcdag::catalog::loader::load_from_str;
use mcdag::plan::planner::plan_campaign;
use mcdag::probe::pool_remote_url;
use mcdag::writer::{dagman_config, render_document, write_dag, DAGMAN_CONFIG_FILENAME};

type TestResult = Result<(), Box<dyn Error>>;

fn small_document() -> Result<String, Box<dyn Error>> {
    let mut catalog = load_from_str(
        r#"
[pool.pool_a]
process = "g g > a a"

[pool.pool_b]
process = "g g > b b"

[campaign.DPS]
analysis = "JJP"
inputs = ["pool_a", "pool_a", "pool_b"]
modes = ["normal", "phi", "normal"]
description = "double A plus B"
"#,
    )?;
    let mut found = BTreeMap::new();
    found.insert("pool_b".to_string(), pool_remote_url("pool_b"));
    catalog.pools.apply_prestaged(&found);

    let campaign = catalog.campaigns.get("DPS")?.clone();
    let plan = plan_campaign(&catalog.pools, &campaign, 2)?;
    Ok(render_document(&[plan], 2))
}

#[test]
fn node_directives_precede_edges_and_final_is_last() -> TestResult {
    let doc = small_document()?;
    let lines: Vec<&str> = doc.lines().collect();

    let last_job = lines.iter().rposition(|l| l.starts_with("JOB ")).unwrap();
    let first_parent = lines.iter().position(|l| l.starts_with("PARENT ")).unwrap();
    assert!(last_job < first_parent, "all JOB lines precede PARENT lines");

    // Per-node ordering: JOB, then VARS, then RETRY.
    let job = lines
        .iter()
        .position(|l| l.starts_with("JOB LHE_pool_a_0 "))
        .unwrap();
    assert!(lines[job + 1].starts_with("VARS LHE_pool_a_0 "));
    assert!(lines[job + 2].starts_with("RETRY LHE_pool_a_0 3"));

    assert_eq!(
        *lines.last().unwrap(),
        "FINAL SUMMARY processing/templates/summary.sub"
    );
    assert!(doc.contains("CONFIG dagman.config"));

    Ok(())
}

#[test]
fn edges_exist_only_for_generated_inputs() -> TestResult {
    let doc = small_document()?;

    // 2 processing jobs, each with its two pool_a parents; pool_b is
    // pre-staged so it never appears in a PARENT line.
    assert!(doc.contains("PARENT LHE_pool_a_0 LHE_pool_a_1 CHILD PROC_DPS_0"));
    assert!(doc.contains("PARENT LHE_pool_a_2 LHE_pool_a_3 CHILD PROC_DPS_1"));
    assert!(!doc.contains("LHE_pool_b"));

    assert!(doc.contains(r#"inputs="GEN:pool_a:0,GEN:pool_a:1,EOS:pool_b:0:0""#));
    assert!(doc.contains(r#"modes="normal,phi,normal""#));
    assert!(doc.contains(r#"analysis="JJP""#));
    assert!(doc.contains(r#"n_sources="3""#));

    Ok(())
}

#[test]
fn generation_vars_carry_pool_parameters() -> TestResult {
    let doc = small_document()?;

    assert!(doc.contains(
        r#"VARS LHE_pool_a_0 pool="pool_a" seed="100" process="g g > a a" min_pt_conia="6.0" min_pt_bonia="4.0" min_pt_q="4.0""#
    ));

    Ok(())
}

#[test]
fn vars_values_are_escaped() -> TestResult {
    let catalog = load_from_str(
        r#"
[pool.pool_q]
process = 'define "all"; g g > q'

[campaign.ONE]
analysis = "JJP"
inputs = ["pool_q"]
modes = ["phi"]
"#,
    )?;
    let campaign = catalog.campaigns.get("ONE")?.clone();
    let plan = plan_campaign(&catalog.pools, &campaign, 1)?;
    let doc = render_document(&[plan], 1);

    assert!(doc.contains(r#"process="define \"all\"; g g > q""#));

    Ok(())
}

#[test]
fn empty_plan_set_still_renders_valid_document() {
    let doc = render_document(&[], 0);
    let lines: Vec<&str> = doc.lines().collect();

    assert!(lines.iter().any(|l| l.starts_with("CONFIG ")));
    assert!(doc.contains("# Final Summary Node"));
    assert_eq!(
        *lines.last().unwrap(),
        "FINAL SUMMARY processing/templates/summary.sub"
    );
    assert!(!doc.contains("JOB "));
    assert!(!doc.contains("PARENT "));
}

#[test]
fn deprecated_campaigns_are_marked_in_the_banner() -> TestResult {
    let catalog = load_from_str(
        r#"
[pool.pool_a]
process = "g g > a a"

[campaign.OLD]
analysis = "JUP"
inputs = ["pool_a"]
modes = ["phi"]
deprecated = true
"#,
    )?;
    let campaign = catalog.campaigns.get("OLD")?.clone();
    let plan = plan_campaign(&catalog.pools, &campaign, 1)?;
    let doc = render_document(&[plan], 1);

    assert!(doc.contains("# *** DEPRECATED ***"));

    Ok(())
}

#[test]
fn write_dag_persists_dag_and_policy_document() -> TestResult {
    let doc = small_document()?;
    let dir = tempfile::tempdir()?;

    let dag_path = write_dag(dir.path(), "test.dag", &doc)?;
    assert_eq!(fs::read_to_string(&dag_path)?, doc);

    let config = fs::read_to_string(dir.path().join(DAGMAN_CONFIG_FILENAME))?;
    assert_eq!(config, dagman_config());
    assert!(config.contains("DAGMAN_MAX_JOBS_SUBMITTED = 500"));
    assert!(config.contains("DAGMAN_MAX_JOBS_IDLE = 200"));
    assert!(config.contains("DAGMAN_GENERATE_RESCUE_DAG = True"));

    Ok(())
}
