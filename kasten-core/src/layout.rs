//! 3D graph layout.
//!
//! The scene builder only depends on the [`Layout`] trait. [`SpringLayout`]
//! is the stock implementation: a seeded Fruchterman-Reingold force
//! simulation in three dimensions.
//!
//! # Algorithm
//!
//! - Initial positions drawn uniformly from `[0, 1)^3` with a seeded RNG
//! - Repulsion `k^2 / d` between every pair, attraction `d^2 / k` along edges,
//!   with optimal distance `k = 1 / sqrt(n)`
//! - Step length capped by a temperature that cools linearly to zero
//! - Result centred on the origin and scaled into `[-1, 1]`
//!
//! O(n^2) per iteration, which is fine for a personal note collection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use thiserror::Error;

use crate::graph::NoteGraph;

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 42;

/// Coordinates per node identifier.
pub type Positions = HashMap<String, [f64; 3]>;

const DIM: usize = 3;
const MIN_DISTANCE: f64 = 0.01;
const CONVERGENCE_THRESHOLD: f64 = 1e-4;

/// Errors raised by a layout function.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The graph has no nodes to place.
    #[error("cannot lay out an empty graph")]
    EmptyGraph,

    /// The simulation produced a non-finite coordinate.
    #[error("numerical failure: {0}")]
    Numerical(String),
}

/// Assigns 3D coordinates to graph nodes.
///
/// Implementations must be deterministic for a given graph and seed and
/// should return one position per node. Node attributes are irrelevant;
/// only the node set and the edges matter.
pub trait Layout {
    fn positions(&self, graph: &NoteGraph, seed: u64) -> Result<Positions, LayoutError>;
}

/// Seeded Fruchterman-Reingold layout.
#[derive(Debug, Clone)]
pub struct SpringLayout {
    iterations: usize,
}

impl SpringLayout {
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl Default for SpringLayout {
    fn default() -> Self {
        Self::new(50)
    }
}

impl Layout for SpringLayout {
    fn positions(&self, graph: &NoteGraph, seed: u64) -> Result<Positions, LayoutError> {
        let ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
        let n = ids.len();

        if n == 0 {
            return Err(LayoutError::EmptyGraph);
        }
        if n == 1 {
            return Ok(HashMap::from([(ids[0].to_string(), [0.0; DIM])]));
        }

        let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let mut adjacent = vec![vec![false; n]; n];
        for (a, b) in graph.edges() {
            let (ia, ib) = (index[a], index[b]);
            adjacent[ia][ib] = true;
            adjacent[ib][ia] = true;
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut pos: Vec<[f64; DIM]> = (0..n)
            .map(|_| [rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>()])
            .collect();

        let k = (1.0 / n as f64).sqrt();
        let mut temperature = initial_temperature(&pos);
        let cooling = temperature / (self.iterations as f64 + 1.0);

        for _ in 0..self.iterations {
            let mut displacement = vec![[0.0; DIM]; n];

            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let delta = sub(pos[i], pos[j]);
                    let distance = norm(delta).max(MIN_DISTANCE);
                    let attraction = if adjacent[i][j] { distance / k } else { 0.0 };
                    let force = k * k / (distance * distance) - attraction;
                    for d in 0..DIM {
                        displacement[i][d] += delta[d] * force;
                    }
                }
            }

            let mut total_step = 0.0;
            for i in 0..n {
                let length = norm(displacement[i]).max(MIN_DISTANCE);
                let scale = temperature / length;
                let mut step = [0.0; DIM];
                for d in 0..DIM {
                    step[d] = displacement[i][d] * scale;
                    pos[i][d] += step[d];
                }
                total_step += norm(step);
            }

            temperature -= cooling;
            if total_step / (n as f64) < CONVERGENCE_THRESHOLD {
                break;
            }
        }

        rescale(&mut pos);

        let mut positions = HashMap::with_capacity(n);
        for (id, p) in ids.iter().zip(pos) {
            if p.iter().any(|c| !c.is_finite()) {
                return Err(LayoutError::Numerical(format!(
                    "non-finite position for node '{}'",
                    id
                )));
            }
            positions.insert(id.to_string(), p);
        }

        Ok(positions)
    }
}

/// A tenth of the widest extent of the initial cloud.
fn initial_temperature(pos: &[[f64; DIM]]) -> f64 {
    (0..DIM)
        .map(|d| {
            let (lo, hi) = pos.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[d]), hi.max(p[d]))
            });
            hi - lo
        })
        .fold(0.0, f64::max)
        * 0.1
}

/// Centre on the origin and scale so the largest coordinate magnitude is 1.
fn rescale(pos: &mut [[f64; DIM]]) {
    let n = pos.len() as f64;
    let mut mean = [0.0; DIM];
    for p in pos.iter() {
        for d in 0..DIM {
            mean[d] += p[d] / n;
        }
    }

    let mut limit: f64 = 0.0;
    for p in pos.iter_mut() {
        for d in 0..DIM {
            p[d] -= mean[d];
            limit = limit.max(p[d].abs());
        }
    }

    if limit > 0.0 {
        for p in pos.iter_mut() {
            for c in p.iter_mut() {
                *c /= limit;
            }
        }
    }
}

fn sub(a: [f64; DIM], b: [f64; DIM]) -> [f64; DIM] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn norm(v: [f64; DIM]) -> f64 {
    v.iter().map(|c| c * c).sum::<f64>().sqrt()
}
