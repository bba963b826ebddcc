//! Statistical properties of the sampling strategies and summaries,
//! checked through the public API.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use sim_core::{Bounds, Distribution, ParameterConfig, ParameterSpec};
use sim_engine::sampling::{generate_samples, latin_hypercube, strata_count};
use sim_engine::summary::{summarise, DEFAULT_CONFIDENCE_LEVELS, DEFAULT_PERCENTILES};
use sim_engine::rng::SimRng;
use sim_engine::SamplingStrategy;

fn unit_uniform() -> ParameterConfig {
    ParameterConfig::new().with_parameter(
        "x",
        ParameterSpec::new(Distribution::uniform(0.0, 1.0).unwrap()),
    )
}

#[test]
fn test_uniform_moments() {
    let samples = generate_samples(&unit_uniform(), 100_000, SamplingStrategy::SimpleRandom, Some(42))
        .unwrap();
    let summary = summarise(&samples["x"], &DEFAULT_PERCENTILES, &DEFAULT_CONFIDENCE_LEVELS);

    assert_abs_diff_eq!(summary.mean, 0.5, epsilon = 0.02);
    assert_abs_diff_eq!(summary.variance, 1.0 / 12.0, epsilon = 0.01);
}

#[test]
fn test_latin_hypercube_fills_every_bin() {
    let n = 200;
    let samples =
        generate_samples(&unit_uniform(), n, SamplingStrategy::LatinHypercube, Some(9)).unwrap();

    let mut counts = vec![0usize; n];
    for &value in &samples["x"] {
        counts[((value * n as f64) as usize).min(n - 1)] += 1;
    }
    assert!(counts.iter().all(|&c| c == 1));
}

#[test]
fn test_latin_hypercube_matrix_columns_are_independent_permutations() {
    let mut rng = SimRng::from_seed(3);
    let columns = latin_hypercube(50, 4, &mut rng);
    assert_eq!(columns.len(), 4);

    let bins = |column: &Vec<f64>| -> Vec<usize> {
        column.iter().map(|v| (v * 50.0) as usize).collect()
    };
    assert_ne!(bins(&columns[0]), bins(&columns[1]));
    for column in &columns {
        let mut sorted = bins(column);
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }
}

#[test]
fn test_stratified_strata_occupancy() {
    let n = 37;
    let strata = strata_count(n);
    let samples =
        generate_samples(&unit_uniform(), n, SamplingStrategy::Stratified, Some(5)).unwrap();

    let mut counts = vec![0usize; strata];
    for &value in &samples["x"] {
        counts[((value * strata as f64) as usize).min(strata - 1)] += 1;
    }
    // 37 rows over 7 strata: 5 each, the last one takes the remaining 7
    assert_eq!(counts, vec![5, 5, 5, 5, 5, 5, 7]);
}

#[test]
fn test_zero_samples() {
    let config = unit_uniform().with_parameter(
        "y",
        ParameterSpec::new(Distribution::exponential(2.0).unwrap()),
    );
    for strategy in SamplingStrategy::ALL {
        let samples = generate_samples(&config, 0, strategy, Some(1)).unwrap();
        assert_eq!(samples.len(), 2, "{}", strategy);
        assert!(samples.values().all(Vec::is_empty), "{}", strategy);
    }
}

#[test]
fn test_sobol_mean_beats_tolerance() {
    let samples = generate_samples(&unit_uniform(), 1 << 12, SamplingStrategy::Sobol, Some(17))
        .unwrap();
    let summary = summarise(&samples["x"], &[], &[]);
    assert_abs_diff_eq!(summary.mean, 0.5, epsilon = 1e-3);
}

proptest! {
    #[test]
    fn prop_percentiles_are_monotone(
        values in prop::collection::vec(-1e6f64..1e6, 1..300),
    ) {
        let summary = summarise(&values, &DEFAULT_PERCENTILES, &DEFAULT_CONFIDENCE_LEVELS);
        let ordered: Vec<f64> = DEFAULT_PERCENTILES
            .iter()
            .map(|p| summary.percentiles[&format!("p{}", p)])
            .collect();
        for pair in ordered.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for (lower, upper) in summary.confidence_intervals.values() {
            prop_assert!(min <= *lower && lower <= upper && *upper <= max);
        }
    }

    #[test]
    fn prop_bounds_hold_for_every_strategy(
        seed in any::<u64>(),
        n in 0usize..200,
        strategy_index in 0usize..5,
    ) {
        let bounds = Bounds::new(-1.0, 1.0).unwrap();
        let config = ParameterConfig::new().with_parameter(
            "z",
            ParameterSpec::new(Distribution::normal(0.0, 2.0).unwrap()).with_bounds(bounds),
        );
        let strategy = SamplingStrategy::ALL[strategy_index];
        let samples = generate_samples(&config, n, strategy, Some(seed)).unwrap();

        prop_assert_eq!(samples["z"].len(), n);
        prop_assert!(samples["z"].iter().all(|v| (-1.0..=1.0).contains(v)));
    }
}
