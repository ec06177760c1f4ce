//! Seeded k-means clustering with k-means++ initialization

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Result of a k-means fit
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    /// Cluster index per input row
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances to the assigned centroid
    pub inertia: f64,
    pub iterations: usize,
}

/// K-means estimator
#[derive(Debug, Clone)]
pub struct KMeans {
    pub n_clusters: usize,
    pub seed: u64,
    /// Independent restarts; the lowest-inertia run is kept
    pub n_init: usize,
    pub max_iterations: usize,
    /// Stop when no centroid moves more than this (squared distance)
    pub tolerance: f64,
}

impl KMeans {
    pub fn new(n_clusters: usize, seed: u64) -> Self {
        Self {
            n_clusters,
            seed,
            n_init: 10,
            max_iterations: 300,
            tolerance: 1e-8,
        }
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Fit on `rows` and return the best of `n_init` runs.
    ///
    /// `n_clusters` is clamped to the number of rows. Empty input yields an
    /// empty result.
    pub fn fit(&self, rows: &[Vec<f64>]) -> KMeansResult {
        let k = self.n_clusters.min(rows.len()).max(1);
        if rows.is_empty() {
            return KMeansResult {
                labels: Vec::new(),
                centroids: Vec::new(),
                inertia: 0.0,
                iterations: 0,
            };
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<KMeansResult> = None;

        for run in 0..self.n_init.max(1) {
            let result = self.single_run(rows, k, &mut rng);
            debug!(
                "k-means run {}: k={}, inertia={:.6}, iterations={}",
                run, k, result.inertia, result.iterations
            );
            let better = match &best {
                Some(current) => result.inertia < current.inertia,
                None => true,
            };
            if better {
                best = Some(result);
            }
        }

        best.unwrap_or_else(|| self.single_run(rows, k, &mut rng))
    }

    fn single_run(&self, rows: &[Vec<f64>], k: usize, rng: &mut StdRng) -> KMeansResult {
        let mut centroids = init_plus_plus(rows, k, rng);
        let mut labels = vec![0usize; rows.len()];
        let mut iterations = 0;

        for _ in 0..self.max_iterations {
            iterations += 1;

            for (label, row) in labels.iter_mut().zip(rows) {
                *label = nearest(row, &centroids).0;
            }

            let mut updated = compute_centroids(rows, &labels, k, &centroids);
            relocate_empty_clusters(rows, &mut labels, &mut updated);

            let shift: f64 = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| squared_distance(old, new))
                .sum();
            centroids = updated;

            if shift <= self.tolerance {
                break;
            }
        }

        // Final assignment against the converged centroids
        for (label, row) in labels.iter_mut().zip(rows) {
            *label = nearest(row, &centroids).0;
        }
        let inertia = rows
            .iter()
            .zip(&labels)
            .map(|(row, &label)| squared_distance(row, &centroids[label]))
            .sum();

        KMeansResult {
            labels,
            centroids,
            inertia,
            iterations,
        }
    }
}

/// k-means++ seeding: first centroid uniformly, the rest proportional to the
/// squared distance from the nearest chosen centroid
fn init_plus_plus(rows: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(rows[rng.gen_range(0..rows.len())].clone());

    while centroids.len() < k {
        let distances: Vec<f64> = rows.iter().map(|row| nearest(row, &centroids).1).collect();
        let total: f64 = distances.iter().sum();

        let next = if total > 0.0 {
            let mut target = rng.gen::<f64>() * total;
            let mut chosen = distances.len() - 1;
            for (i, d) in distances.iter().enumerate() {
                if target < *d {
                    chosen = i;
                    break;
                }
                target -= d;
            }
            chosen
        } else {
            // Every row coincides with a centroid already
            rng.gen_range(0..rows.len())
        };

        centroids.push(rows[next].clone());
    }

    centroids
}

/// Index of and squared distance to the nearest centroid; ties go to the lowest index
fn nearest(row: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(row, centroid);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

fn compute_centroids(
    rows: &[Vec<f64>],
    labels: &[usize],
    k: usize,
    previous: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let dims = rows.first().map(Vec::len).unwrap_or(0);
    let mut sums = vec![vec![0.0; dims]; k];
    let mut counts = vec![0usize; k];

    for (row, &label) in rows.iter().zip(labels) {
        counts[label] += 1;
        for (s, v) in sums[label].iter_mut().zip(row) {
            *s += v;
        }
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (sum, count))| {
            if count == 0 {
                previous[i].clone()
            } else {
                sum.into_iter().map(|s| s / count as f64).collect()
            }
        })
        .collect()
}

/// Move each empty cluster's centroid onto the row farthest from its own centroid
fn relocate_empty_clusters(rows: &[Vec<f64>], labels: &mut [usize], centroids: &mut [Vec<f64>]) {
    let k = centroids.len();
    let mut counts = vec![0usize; k];
    for &label in labels.iter() {
        counts[label] += 1;
    }

    for cluster in 0..k {
        if counts[cluster] > 0 {
            continue;
        }

        let farthest = rows
            .iter()
            .enumerate()
            .filter(|(i, _)| counts[labels[*i]] > 1)
            .map(|(i, row)| (i, squared_distance(row, &centroids[labels[i]])))
            .fold(None, |acc: Option<(usize, f64)>, (i, d)| match acc {
                Some((_, best)) if best >= d => acc,
                _ => Some((i, d)),
            });

        if let Some((i, _)) = farthest {
            counts[labels[i]] -= 1;
            labels[i] = cluster;
            counts[cluster] = 1;
            centroids[cluster] = rows[i].clone();
        }
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
