//! Property-based tests for the permutation search
//!
//! Small groups (n <= 6) keep the exhaustive search fast enough for a
//! pre-commit run.
//!
//! Properties covered:
//! 1. Enumeration yields exactly n! distinct permutations
//! 2. Unranking agrees with enumeration order
//! 3. Ranked output is sorted and every candidate is a bijection
//! 4. Results are identical for any worker count
//! 5. Value parsing never panics

use proptest::prelude::*;
use qpcr_optimizer::input::{parse_values, ConditionText};
use qpcr_optimizer::optimize::{
    factorial, optimize, unrank, GroupInput, OptimizationRequest, OptimizeConfig,
    PermutationEnumerator,
};
use std::collections::HashSet;

fn labels(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{}{}", prefix, i)).collect()
}

fn group_values() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (2usize..=6).prop_flat_map(|n| {
        (
            prop::collection::vec(15.0f64..35.0, n),
            prop::collection::vec(15.0f64..35.0, n),
        )
    })
}

fn request(reference: Vec<f64>, sample: Vec<f64>) -> OptimizationRequest {
    let n = reference.len();
    OptimizationRequest::new(
        labels("R", n),
        reference,
        vec![GroupInput::new("cond", labels("S", n), sample)],
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_enumeration_is_complete_and_distinct(n in 1usize..=6) {
        let all: Vec<_> = PermutationEnumerator::new(n).unwrap().collect();
        let distinct: HashSet<_> = all.iter().cloned().collect();

        prop_assert_eq!(all.len() as u64, factorial(n).unwrap());
        prop_assert_eq!(distinct.len(), all.len());
    }

    #[test]
    fn prop_unrank_matches_enumeration(n in 1usize..=6, seed in any::<u64>()) {
        let total = factorial(n).unwrap();
        let rank = seed % total;
        let enumerated = PermutationEnumerator::new(n)
            .unwrap()
            .nth(rank as usize)
            .unwrap();

        prop_assert_eq!(unrank(n, rank).unwrap(), enumerated);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_ranking_sorted_and_bijective((reference, sample) in group_values()) {
        let n = reference.len();
        let result = optimize(&request(reference, sample), &OptimizeConfig::exhaustive()).unwrap();
        let condition = &result.conditions[0];

        prop_assert_eq!(condition.total_candidates, factorial(n).unwrap());
        prop_assert_eq!(condition.candidates.len() as u64, condition.total_candidates);

        for pair in condition.candidates.windows(2) {
            prop_assert!(pair[0].sd <= pair[1].sd);
            if pair[0].sd == pair[1].sd {
                prop_assert!(pair[0].enumeration_index < pair[1].enumeration_index);
            }
        }

        for (position, candidate) in condition.candidates.iter().enumerate() {
            prop_assert_eq!(candidate.rank, position + 1);
            let targets: HashSet<_> = candidate.permutation.iter().copied().collect();
            prop_assert_eq!(targets.len(), n);
            prop_assert!(candidate.permutation.iter().all(|&j| j < n));
            prop_assert!(candidate.sd >= 0.0);
        }
    }

    #[test]
    fn prop_top_k_is_prefix_of_full_ranking(
        (reference, sample) in group_values(),
        k in 1usize..10,
    ) {
        let req = request(reference, sample);
        let full = optimize(&req, &OptimizeConfig::exhaustive()).unwrap();
        let config = OptimizeConfig { top_k: Some(k), ..OptimizeConfig::default() };
        let truncated = optimize(&req, &config).unwrap();

        let full = &full.conditions[0].candidates;
        let truncated = &truncated.conditions[0].candidates;
        prop_assert_eq!(truncated.len(), k.min(full.len()));
        prop_assert_eq!(&full[..truncated.len()], &truncated[..]);
    }

    #[test]
    fn prop_workers_do_not_change_result(
        (reference, sample) in group_values(),
        workers in 2usize..9,
    ) {
        let req = request(reference, sample);
        let sequential = optimize(&req, &OptimizeConfig::exhaustive()).unwrap();
        let config = OptimizeConfig { workers, ..OptimizeConfig::exhaustive() };
        let parallel = optimize(&req, &config).unwrap();

        prop_assert_eq!(sequential.fingerprint(), parallel.fingerprint());
        prop_assert_eq!(sequential, parallel);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_parse_values_never_panics(text in ".{0,64}") {
        let _ = parse_values("fuzz", &text);
        let _ = ConditionText::from_spec(&text);
    }

    #[test]
    fn prop_parse_values_reads_formatted_numbers(
        values in prop::collection::vec(-1.0e6f64..1.0e6, 1..10),
    ) {
        let text = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        prop_assert_eq!(parse_values("g", &text).unwrap(), values);
    }
}
