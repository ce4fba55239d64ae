//! Genetic search over lane partitions.
//!
//! Evolves a population of pool permutations toward the partition with the
//! best worst-case outcome against the adversary. Each generation scores
//! every candidate in parallel against a fresh matchup cache, then breeds
//! the next population through elitism, tournament selection, order
//! crossover, and swap mutation.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::schema::{AdversaryTeam, ConfigError, Power, Scenario, SearchConfig};

use super::{FitnessEvaluator, FitnessRecord, MatchupCache, Partition, PartitionRng};

/// A candidate partition in the population.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The permutation.
    pub partition: Partition,
    /// Fitness scores, present once the generation's evaluation pass ran.
    pub fitness: Option<FitnessRecord>,
}

impl Candidate {
    fn total(&self) -> f64 {
        self.fitness.as_ref().map_or(f64::NEG_INFINITY, |f| f.total)
    }
}

/// Per-generation series of fitness statistics.
#[derive(Debug, Clone, Default)]
pub struct SearchHistory {
    /// Best total fitness of each generation.
    pub best_fitness: Vec<f64>,
    /// Population mean total fitness of each generation.
    pub avg_fitness: Vec<f64>,
}

/// Snapshot reported after each generation's evaluation pass.
#[derive(Debug, Clone)]
pub struct GenerationProgress {
    /// Zero-based generation index.
    pub generation: usize,
    pub total_generations: usize,
    /// All-time best total fitness.
    pub best_fitness: f64,
    /// This generation's best total fitness.
    pub generation_best: f64,
    /// This generation's mean total fitness.
    pub avg_fitness: f64,
    /// Universal lanes of the generation's best individual.
    pub universal_lanes: usize,
    /// Distinct matchups estimated this generation.
    pub cached_matchups: usize,
}

/// Final search output: the all-time best partition and its scores.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub partition: Partition,
    pub record: FitnessRecord,
    pub history: SearchHistory,
    /// Lane size the partition was searched under.
    pub lane_size: usize,
    /// Fitness evaluations performed across the run.
    pub evaluations: u64,
}

impl SearchResult {
    /// The best partition's lanes, sorted ascending for display.
    pub fn lanes(&self) -> [Vec<Power>; 3] {
        self.partition.lanes_sorted(self.lane_size)
    }
}

/// Search engine that evolves lane partitions.
pub struct SearchEngine {
    config: SearchConfig,
    pool: Vec<Power>,
    adversary: AdversaryTeam,
    evaluator: FitnessEvaluator,
    rng: PartitionRng,
    population: Vec<Candidate>,
    generation: usize,
    best: Option<(Partition, FitnessRecord)>,
    history: SearchHistory,
    cached_matchups: usize,
}

impl SearchEngine {
    /// Create an engine from a scenario, failing fast on invalid input.
    pub fn new(scenario: Scenario) -> Result<Self, ConfigError> {
        scenario.validate()?;
        let Scenario {
            pool,
            adversary,
            search,
        } = scenario;

        let rng = match search.random_seed {
            Some(seed) => PartitionRng::new(seed),
            None => PartitionRng::from_entropy(),
        };
        let evaluator =
            FitnessEvaluator::new(search.battle.clone(), search.fitness.clone(), search.lane_size);

        Ok(Self {
            config: search,
            pool,
            adversary,
            evaluator,
            rng,
            population: Vec::new(),
            generation: 0,
            best: None,
            history: SearchHistory::default(),
            cached_matchups: 0,
        })
    }

    /// Build the initial random population.
    pub fn initialize(&mut self) {
        self.generation = 0;
        self.population = (0..self.config.ga.population_size)
            .map(|_| Candidate {
                partition: self.rng.random_partition(&self.pool),
                fitness: None,
            })
            .collect();
    }

    /// Score every individual against the adversary.
    ///
    /// A fresh cache scopes memoized matchups to this generation. Candidates
    /// evaluate in parallel, each with its own trial RNG seeded from the
    /// master RNG so draws stay independent across workers.
    fn evaluate_population(&mut self) {
        let cache = MatchupCache::new();
        let seeds: Vec<u64> = self
            .population
            .iter()
            .map(|_| self.rng.next_seed())
            .collect();

        let evaluator = &self.evaluator;
        let adversary = &self.adversary;
        self.population
            .par_iter_mut()
            .zip(seeds.par_iter())
            .for_each(|(candidate, &seed)| {
                let mut trial_rng = StdRng::seed_from_u64(seed);
                candidate.fitness = Some(evaluator.evaluate(
                    &candidate.partition,
                    adversary,
                    &cache,
                    &mut trial_rng,
                ));
            });

        self.cached_matchups = cache.len();
        log::debug!(
            "generation {}: {} distinct matchups estimated",
            self.generation,
            self.cached_matchups
        );
    }

    /// Sort descending by total fitness, record history, and fold the
    /// generation's best into the all-time best on strict improvement.
    fn record_generation(&mut self) {
        self.population
            .sort_by(|a, b| b.total().total_cmp(&a.total()));

        let generation_best = self.population[0].total();
        let avg = self.population.iter().map(Candidate::total).sum::<f64>()
            / self.population.len() as f64;
        self.history.best_fitness.push(generation_best);
        self.history.avg_fitness.push(avg);

        let improved = self
            .best
            .as_ref()
            .is_none_or(|(_, record)| generation_best > record.total);
        if improved && let Some(record) = self.population[0].fitness.clone() {
            self.best = Some((self.population[0].partition.clone(), record));
        }
    }

    /// Tournament selection: index of the fittest of a random sample.
    fn select(&mut self) -> usize {
        let mut best_idx = self.rng.index(self.population.len());
        for _ in 1..self.config.ga.tournament_size {
            let idx = self.rng.index(self.population.len());
            if self.population[idx].total() > self.population[best_idx].total() {
                best_idx = idx;
            }
        }
        best_idx
    }

    /// Produce the next generation: elites carried unchanged, the remainder
    /// bred from tournament-selected parents.
    fn breed_next_generation(&mut self) {
        let ga = self.config.ga.clone();
        let mut next: Vec<Candidate> = Vec::with_capacity(ga.population_size);

        for elite in self.population.iter().take(ga.elitism) {
            next.push(elite.clone());
        }

        while next.len() < ga.population_size {
            let idx1 = self.select();
            let idx2 = self.select();
            let parent1 = self.population[idx1].partition.clone();
            let parent2 = &self.population[idx2].partition;

            let mut child = if self.rng.chance(ga.crossover_rate) {
                self.rng.order_crossover(&parent1, parent2)
            } else {
                parent1.clone()
            };
            if self.rng.chance(ga.mutation_rate) {
                self.rng.swap_mutate(&mut child);
            }

            // Offspring that lost or duplicated units are replaced by a
            // copy of parent 1, never surfaced as an error.
            let partition = if child.is_permutation_of(&self.pool) {
                child
            } else {
                parent1
            };
            next.push(Candidate {
                partition,
                fitness: None,
            });
        }

        self.population = next;
    }

    /// Snapshot of the current standing after an evaluation pass.
    fn progress(&self) -> GenerationProgress {
        let generation_best = self.population.first();
        GenerationProgress {
            generation: self.generation,
            total_generations: self.config.ga.generations,
            best_fitness: self
                .best
                .as_ref()
                .map_or(f64::NEG_INFINITY, |(_, record)| record.total),
            generation_best: generation_best.map_or(f64::NEG_INFINITY, Candidate::total),
            avg_fitness: self
                .history
                .avg_fitness
                .last()
                .copied()
                .unwrap_or(f64::NEG_INFINITY),
            universal_lanes: generation_best
                .and_then(|c| c.fitness.as_ref())
                .map_or(0, |record| record.universal_lanes),
            cached_matchups: self.cached_matchups,
        }
    }

    /// Run the full search, reporting after every generation's evaluation.
    pub fn run_with_callback<F>(&mut self, callback: F) -> SearchResult
    where
        F: Fn(&GenerationProgress),
    {
        self.initialize();

        for generation in 0..self.config.ga.generations {
            self.generation = generation;
            self.evaluate_population();
            self.record_generation();
            callback(&self.progress());

            // The final generation is scored but not bred further
            if generation + 1 < self.config.ga.generations {
                self.breed_next_generation();
            }
        }

        let (partition, record) = self.best.clone().expect("no generations evaluated");
        let evaluations =
            self.config.ga.generations as u64 * self.config.ga.population_size as u64;
        SearchResult {
            partition,
            record,
            history: self.history.clone(),
            lane_size: self.config.lane_size,
            evaluations,
        }
    }

    /// Run the full search without progress reporting.
    pub fn run(&mut self) -> SearchResult {
        self.run_with_callback(|_| {})
    }
}
