use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use proptest::prelude::*;

use mcdag::catalog::loader::load_from_str;
use mcdag::plan::planner::plan_campaign;
use mcdag::plan::{InputRef, JobParams};

const POOL_COUNT: usize = 3;

/// Render a catalog whose campaign input list is given by pool indices.
fn catalog_toml(input_ids: &[usize]) -> String {
    let mut toml = String::new();
    for p in 0..POOL_COUNT {
        writeln!(toml, "[pool.p{p}]").unwrap();
        writeln!(toml, "process = \"g g > x{p}\"").unwrap();
    }
    writeln!(toml, "[campaign.T]").unwrap();
    writeln!(toml, "analysis = \"JJP\"").unwrap();
    let inputs: Vec<String> = input_ids.iter().map(|i| format!("\"p{i}\"")).collect();
    writeln!(toml, "inputs = [{}]", inputs.join(", ")).unwrap();
    let modes: Vec<&str> = input_ids.iter().map(|_| "\"normal\"").collect();
    writeln!(toml, "modes = [{}]", modes.join(", ")).unwrap();
    toml
}

proptest! {
    /// For every pool p used u times at multiplicity n, the generated-unit
    /// indices consumed across all processing jobs are exactly
    /// `0..u*n`, each consumed once - no gaps, no collisions - and exactly
    /// `u*n` generation jobs exist for p.
    #[test]
    fn index_assignment_is_an_exact_cover(
        input_ids in proptest::collection::vec(0..POOL_COUNT, 1..6),
        n in 0u64..6,
    ) {
        let catalog = load_from_str(&catalog_toml(&input_ids)).unwrap();
        let campaign = catalog.campaigns.get("T").unwrap().clone();
        let plan = plan_campaign(&catalog.pools, &campaign, n).unwrap();

        // Generation jobs per pool.
        let mut generated: BTreeMap<String, u64> = BTreeMap::new();
        for node in plan.dag.generation_nodes() {
            let JobParams::Generation(ref p) = node.params else { unreachable!() };
            *generated.entry(p.pool.clone()).or_default() += 1;
        }

        // Consumed indices per pool, collisions rejected as we go.
        let mut consumed: BTreeMap<String, BTreeSet<u64>> = BTreeMap::new();
        for node in plan.dag.processing_nodes() {
            let JobParams::Processing(ref p) = node.params else { unreachable!() };
            for input in p.inputs.iter() {
                let InputRef::Generated { pool, index } = input else {
                    panic!("nothing is pre-staged in this catalog");
                };
                prop_assert!(
                    consumed.entry(pool.clone()).or_default().insert(*index),
                    "index {} of pool {} consumed twice", index, pool
                );
            }
        }

        for pool_id in 0..POOL_COUNT {
            let pool = format!("p{pool_id}");
            let usage = campaign.usage_count(&pool) as u64;
            let expected_units = usage * n;

            prop_assert_eq!(
                generated.get(&pool).copied().unwrap_or(0),
                expected_units
            );

            let indices = consumed.remove(&pool).unwrap_or_default();
            let expected: BTreeSet<u64> = (0..expected_units).collect();
            prop_assert_eq!(indices, expected);
        }
    }
}
