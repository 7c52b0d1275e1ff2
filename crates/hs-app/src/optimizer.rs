//! Integer differential evolution (best/1/bin) with deferred updating.
//!
//! Every generation builds its full set of trial vectors first, evaluates
//! them in parallel on a rayon pool, then replaces population members whose
//! trial scored no worse. Evaluated vectors are memoized for the run.

use crate::error::{AppError, AppResult};
use hs_core::{mean, std_dev};
use hs_project::OptimizerDef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeConfig {
    pub population_multiplier: usize,
    pub max_generations: usize,
    pub relative_tolerance: f64,
    pub absolute_tolerance: f64,
    /// Mutation factor drawn uniformly from this range each generation
    pub mutation: (f64, f64),
    pub recombination: f64,
    pub seed: u64,
    pub workers: Option<usize>,
}

impl Default for DeConfig {
    fn default() -> Self {
        Self::from(&OptimizerDef::default())
    }
}

impl From<&OptimizerDef> for DeConfig {
    fn from(def: &OptimizerDef) -> Self {
        Self {
            population_multiplier: def.population_multiplier,
            max_generations: def.max_generations,
            relative_tolerance: def.relative_tolerance,
            absolute_tolerance: def.absolute_tolerance,
            mutation: def.mutation,
            recombination: def.recombination,
            seed: def.seed,
            workers: def.workers,
        }
    }
}

/// Reported after the initial population and after every generation.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationEvent {
    pub generation: usize,
    pub best: Vec<i64>,
    pub best_value: f64,
    pub evaluations: usize,
    pub converged: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeOutcome {
    pub best: Vec<i64>,
    pub best_value: f64,
    pub generations: usize,
    /// Distinct vectors evaluated
    pub evaluations: usize,
    pub converged: bool,
    /// Best value after each generation, initial population first
    pub history: Vec<f64>,
}

fn round_clip(x: &[f64], bounds: &[(i64, i64)]) -> Vec<i64> {
    x.iter()
        .zip(bounds)
        .map(|(v, &(lo, hi))| (v.round() as i64).clamp(lo, hi))
        .collect()
}

/// Spread test on the population energies; never true while any is infinite.
fn has_converged(energies: &[f64], config: &DeConfig) -> bool {
    if energies.iter().any(|e| !e.is_finite()) {
        return false;
    }
    match (mean(energies), std_dev(energies)) {
        (Some(m), Some(sd)) => sd <= config.absolute_tolerance + config.relative_tolerance * m.abs(),
        _ => false,
    }
}

fn best_index(energies: &[f64]) -> usize {
    energies
        .iter()
        .enumerate()
        .fold(0, |best, (i, e)| if *e < energies[best] { i } else { best })
}

struct Memo<'a, F> {
    objective: &'a F,
    cache: HashMap<Vec<i64>, f64>,
}

impl<F> Memo<'_, F>
where
    F: Fn(&[i64]) -> f64 + Sync,
{
    /// Scores `candidates`, evaluating unseen vectors in parallel.
    fn score(&mut self, candidates: &[Vec<i64>]) -> Vec<f64> {
        let mut fresh: Vec<&Vec<i64>> = candidates
            .iter()
            .filter(|c| !self.cache.contains_key(*c))
            .collect();
        fresh.sort();
        fresh.dedup();

        let objective = self.objective;
        let scored: Vec<(Vec<i64>, f64)> = fresh
            .into_par_iter()
            .map(|c| {
                let value = objective(c);
                // NaN would break every comparison below.
                (c.clone(), if value.is_nan() { f64::INFINITY } else { value })
            })
            .collect();
        self.cache.extend(scored);

        candidates
            .iter()
            .map(|c| self.cache.get(c).copied().unwrap_or(f64::INFINITY))
            .collect()
    }
}

fn validate(bounds: &[(i64, i64)], config: &DeConfig) -> AppResult<()> {
    if bounds.is_empty() || bounds.iter().any(|(lo, hi)| hi < lo) {
        return Err(AppError::Optimizer {
            message: "bounds must be non-empty with lo <= hi".to_string(),
        });
    }
    if config.population_multiplier == 0 || config.max_generations == 0 {
        return Err(AppError::Optimizer {
            message: "population multiplier and generation limit must be positive".to_string(),
        });
    }
    let (lo, hi) = config.mutation;
    if !(0.0 <= lo && lo <= hi && hi <= 2.0) {
        return Err(AppError::Optimizer {
            message: format!("mutation range ({lo}, {hi}) outside [0, 2]"),
        });
    }
    if !(0.0..=1.0).contains(&config.recombination) {
        return Err(AppError::Optimizer {
            message: format!("recombination {} outside [0, 1]", config.recombination),
        });
    }
    Ok(())
}

/// Minimize `objective` over the integer box `bounds`.
pub fn differential_evolution<F>(
    bounds: &[(i64, i64)],
    config: &DeConfig,
    objective: F,
    mut progress_cb: Option<&mut dyn FnMut(GenerationEvent)>,
) -> AppResult<DeOutcome>
where
    F: Fn(&[i64]) -> f64 + Sync,
{
    validate(bounds, config)?;
    let pool = {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = config.workers {
            builder = builder.num_threads(n);
        }
        builder.build()?
    };

    let dims = bounds.len();
    // Best/1 needs the best member plus two distinct others.
    let pop_size = (config.population_multiplier * dims).max(4);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut memo = Memo {
        objective: &objective,
        cache: HashMap::new(),
    };

    // Continuous positions keep mutation differences meaningful;
    // only the rounded vector is ever evaluated.
    let mut population: Vec<Vec<f64>> = (0..pop_size)
        .map(|_| {
            bounds
                .iter()
                .map(|&(lo, hi)| rng.gen_range(lo as f64..=hi as f64))
                .collect()
        })
        .collect();
    let mut members: Vec<Vec<i64>> = population.iter().map(|x| round_clip(x, bounds)).collect();
    let mut energies = pool.install(|| memo.score(&members));

    let mut best = best_index(&energies);
    let mut history = vec![energies[best]];
    let mut converged = has_converged(&energies, config);
    let mut generations = 0;
    info!(
        population = pop_size,
        best = energies[best],
        "initial population evaluated"
    );
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(GenerationEvent {
            generation: 0,
            best: members[best].clone(),
            best_value: energies[best],
            evaluations: memo.cache.len(),
            converged,
        });
    }

    while !converged && generations < config.max_generations {
        generations += 1;
        let (f_lo, f_hi) = config.mutation;
        let scale = if f_hi > f_lo { rng.gen_range(f_lo..f_hi) } else { f_lo };

        let trials: Vec<Vec<f64>> = (0..pop_size)
            .map(|i| {
                let (r1, r2) = loop {
                    let r1 = rng.gen_range(0..pop_size);
                    let r2 = rng.gen_range(0..pop_size);
                    if r1 != r2 && r1 != i && r2 != i {
                        break (r1, r2);
                    }
                };
                let forced = rng.gen_range(0..dims);
                (0..dims)
                    .map(|j| {
                        if j == forced || rng.r#gen::<f64>() < config.recombination {
                            let (lo, hi) = bounds[j];
                            let v = population[best][j] + scale * (population[r1][j] - population[r2][j]);
                            v.clamp(lo as f64, hi as f64)
                        } else {
                            population[i][j]
                        }
                    })
                    .collect()
            })
            .collect();
        let trial_members: Vec<Vec<i64>> = trials.iter().map(|x| round_clip(x, bounds)).collect();
        let trial_energies = pool.install(|| memo.score(&trial_members));

        for (i, (trial, energy)) in trials.into_iter().zip(trial_energies).enumerate() {
            if energy <= energies[i] {
                population[i] = trial;
                members[i] = trial_members[i].clone();
                energies[i] = energy;
            }
        }

        best = best_index(&energies);
        history.push(energies[best]);
        converged = has_converged(&energies, config);
        info!(
            generation = generations,
            best = energies[best],
            config = ?members[best],
            evaluations = memo.cache.len(),
            "generation finished"
        );
        if let Some(cb) = progress_cb.as_deref_mut() {
            cb(GenerationEvent {
                generation: generations,
                best: members[best].clone(),
                best_value: energies[best],
                evaluations: memo.cache.len(),
                converged,
            });
        }
    }

    debug!(converged, generations, "differential evolution finished");
    Ok(DeOutcome {
        best: members[best].clone(),
        best_value: energies[best],
        generations,
        evaluations: memo.cache.len(),
        converged,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn small_config(seed: u64) -> DeConfig {
        DeConfig {
            population_multiplier: 10,
            max_generations: 200,
            relative_tolerance: 0.0,
            absolute_tolerance: 1e-12,
            seed,
            workers: Some(2),
            ..DeConfig::default()
        }
    }

    fn paraboloid(x: &[i64]) -> f64 {
        ((x[0] - 7).pow(2) + (x[1] + 3).pow(2) + (x[2] - 40).pow(2)) as f64
    }

    #[test]
    fn finds_integer_minimum() {
        let bounds = [(0, 20), (-10, 10), (0, 100)];
        let out = differential_evolution(&bounds, &small_config(3), paraboloid, None).unwrap();
        assert_eq!(out.best, vec![7, -3, 40]);
        assert_eq!(out.best_value, 0.0);
        assert_eq!(*out.history.last().unwrap(), 0.0);
    }

    #[test]
    fn same_seed_same_result() {
        let bounds = [(0, 20), (-10, 10), (0, 100)];
        let a = differential_evolution(&bounds, &small_config(11), paraboloid, None).unwrap();
        let b = differential_evolution(&bounds, &small_config(11), paraboloid, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn infinite_values_do_not_stop_the_search() {
        let bounds = [(0, 30), (0, 30)];
        let objective = |x: &[i64]| {
            if x[0] < 5 {
                f64::INFINITY
            } else {
                ((x[0] - 12).pow(2) + (x[1] - 4).pow(2)) as f64
            }
        };
        let out = differential_evolution(&bounds, &small_config(5), objective, None).unwrap();
        assert_eq!(out.best, vec![12, 4]);
    }

    #[test]
    fn repeated_vectors_are_evaluated_once() {
        let calls = AtomicUsize::new(0);
        let bounds = [(0, 2), (0, 2)];
        let objective = |x: &[i64]| {
            calls.fetch_add(1, Ordering::Relaxed);
            (x[0] + x[1]) as f64
        };
        let config = DeConfig {
            max_generations: 30,
            ..small_config(9)
        };
        let out = differential_evolution(&bounds, &config, objective, None).unwrap();
        assert!(calls.load(Ordering::Relaxed) <= 9);
        assert_eq!(calls.load(Ordering::Relaxed), out.evaluations);
        assert_eq!(out.best, vec![0, 0]);
    }

    #[test]
    fn progress_is_reported_every_generation() {
        let bounds = [(0, 20), (-10, 10), (0, 100)];
        let mut events = Vec::new();
        let mut cb = |e: GenerationEvent| events.push(e);
        let out = differential_evolution(&bounds, &small_config(3), paraboloid, Some(&mut cb)).unwrap();
        assert_eq!(events.len(), out.generations + 1);
        assert_eq!(events[0].generation, 0);
        assert!(events.windows(2).all(|w| w[1].best_value <= w[0].best_value));
    }

    #[test]
    fn rejects_bad_settings() {
        let bounds = [(0, 1)];
        let config = DeConfig {
            mutation: (1.5, 0.5),
            ..DeConfig::default()
        };
        assert!(differential_evolution(&bounds, &config, |_| 0.0, None).is_err());
        assert!(differential_evolution(&[(3, 1)], &DeConfig::default(), |_| 0.0, None).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn best_stays_inside_bounds(lo in -50i64..50, width in 0i64..40, seed in 0u64..1000) {
            let bounds = [(lo, lo + width), (0, 5)];
            let config = DeConfig { max_generations: 5, ..small_config(seed) };
            let out = differential_evolution(&bounds, &config, |x| (x[0] * x[1]) as f64, None).unwrap();
            prop_assert!(out.best[0] >= lo && out.best[0] <= lo + width);
            prop_assert!(out.best[1] >= 0 && out.best[1] <= 5);
            prop_assert!(out.best_value.is_finite());
        }
    }
}
