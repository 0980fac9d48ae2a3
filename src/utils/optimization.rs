//! Derivative-free minimization used for smoothing-parameter estimation.

use std::cmp::Ordering;

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The best point found.
    pub optimal_point: Vec<f64>,
    /// The objective value at the best point (`+inf` if nothing finite was seen).
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the simplex met the tolerance before `max_iter`.
    pub converged: bool,
    /// Whether the stop callback ended the search early.
    pub cancelled: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Stop when the spread of objective values across the simplex drops below this.
    pub tolerance: f64,
    /// Reflection coefficient (default: 1.0).
    pub alpha: f64,
    /// Expansion coefficient (default: 2.0).
    pub gamma: f64,
    /// Contraction coefficient (default: 0.5).
    pub rho: f64,
    /// Shrinkage coefficient (default: 0.5).
    pub sigma: f64,
    /// Initial simplex step size (default: 0.05).
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Perform Nelder-Mead simplex minimization.
///
/// NaN objective values are treated as `+inf`, so a diverging candidate is
/// never preferred over a finite one.
///
/// # Example
/// ```
/// use hw_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 0.4).powi(2) + (x[1] - 0.7).powi(2),
///     &[0.3, 0.1],
///     Some(&[(0.0, 1.0), (0.0, 1.0)]),
///     NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 0.4).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    nelder_mead_until(objective, initial, bounds, config, || false)
}

/// Nelder-Mead with a stop callback polled once per iteration.
///
/// When `should_stop` returns true the best vertex so far is returned with
/// `cancelled` set.
pub fn nelder_mead_until<F, S>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
    should_stop: S,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
    S: Fn() -> bool,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
            cancelled: false,
        };
    }

    let eval = |point: &[f64]| {
        let value = objective(point);
        if value.is_nan() {
            f64::INFINITY
        } else {
            value
        }
    };

    // Initial simplex: the starting point plus one step along each axis
    let start = apply_bounds(initial, bounds);
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(start.clone());
    for i in 0..n {
        let mut vertex = start.clone();
        let step = if start[i].abs() > 1e-10 {
            config.initial_step * start[i].abs()
        } else {
            config.initial_step
        };
        vertex[i] += step;
        // Step inward if the bound clipped the vertex back onto the start
        let mut vertex = apply_bounds(&vertex, bounds);
        if vertex == start {
            vertex[i] -= step;
            vertex = apply_bounds(&vertex, bounds);
        }
        simplex.push(vertex);
    }

    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;
    let mut cancelled = false;

    while iterations < config.max_iter {
        if should_stop() {
            cancelled = true;
            break;
        }
        iterations += 1;

        let order = rank(&values);
        let best_idx = order[0];
        let worst_idx = order[n];
        let second_worst_idx = order[n - 1];

        let spread = values[worst_idx] - values[best_idx];
        if spread < config.tolerance {
            converged = true;
            break;
        }

        let centroid = compute_centroid(&simplex, worst_idx);
        let max_dist = simplex
            .iter()
            .map(|v| euclidean_distance(v, &centroid))
            .fold(0.0, f64::max);
        if max_dist < config.tolerance {
            converged = true;
            break;
        }

        // Reflection
        let reflected = apply_bounds(&reflect(&simplex[worst_idx], &centroid, config.alpha), bounds);
        let reflected_value = eval(&reflected);

        if reflected_value < values[second_worst_idx] && reflected_value >= values[best_idx] {
            simplex[worst_idx] = reflected;
            values[worst_idx] = reflected_value;
            continue;
        }

        if reflected_value < values[best_idx] {
            let expanded = apply_bounds(&expand(&centroid, &reflected, config.gamma), bounds);
            let expanded_value = eval(&expanded);

            if expanded_value < reflected_value {
                simplex[worst_idx] = expanded;
                values[worst_idx] = expanded_value;
            } else {
                simplex[worst_idx] = reflected;
                values[worst_idx] = reflected_value;
            }
            continue;
        }

        // Contraction, outside or inside depending on the reflected value
        let toward = if reflected_value < values[worst_idx] {
            &reflected
        } else {
            &simplex[worst_idx]
        };
        let contracted = apply_bounds(&contract(&centroid, toward, config.rho), bounds);
        let contracted_value = eval(&contracted);
        if contracted_value < values[worst_idx].min(reflected_value) {
            simplex[worst_idx] = contracted;
            values[worst_idx] = contracted_value;
            continue;
        }

        // Shrink towards the best vertex
        let best = simplex[best_idx].clone();
        for i in 0..=n {
            if i != best_idx {
                for j in 0..n {
                    simplex[i][j] = best[j] + config.sigma * (simplex[i][j] - best[j]);
                }
                simplex[i] = apply_bounds(&simplex[i], bounds);
                values[i] = eval(&simplex[i]);
            }
        }
    }

    let best_idx = rank(&values)[0];

    NelderMeadResult {
        optimal_point: simplex[best_idx].clone(),
        optimal_value: values[best_idx],
        iterations,
        converged,
        cancelled,
    }
}

/// Vertex indices ordered by ascending objective value.
fn rank(values: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
    indices
}

/// Compute centroid of simplex excluding the worst vertex.
fn compute_centroid(simplex: &[Vec<f64>], exclude_idx: usize) -> Vec<f64> {
    let n = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; n];

    for (_, vertex) in simplex.iter().enumerate().filter(|(i, _)| *i != exclude_idx) {
        for (c, x) in centroid.iter_mut().zip(vertex) {
            *c += x;
        }
    }

    for c in &mut centroid {
        *c /= count;
    }

    centroid
}

fn reflect(point: &[f64], centroid: &[f64], alpha: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(point)
        .map(|(c, p)| c + alpha * (c - p))
        .collect()
}

fn expand(centroid: &[f64], reflected: &[f64], gamma: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(reflected)
        .map(|(c, r)| c + gamma * (r - c))
        .collect()
}

fn contract(centroid: &[f64], point: &[f64], rho: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(point)
        .map(|(c, p)| c + rho * (p - c))
        .collect()
}

/// Clamp each coordinate into its `(min, max)` box, if bounds are given.
fn apply_bounds(point: &[f64], bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    match bounds {
        None => point.to_vec(),
        Some(b) => point
            .iter()
            .enumerate()
            .map(|(i, &x)| match b.get(i) {
                Some(&(lo, hi)) => x.clamp(lo, hi),
                None => x,
            })
            .collect(),
    }
}

fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    #[test]
    fn nelder_mead_quadratic_3d_inside_unit_box() {
        let result = nelder_mead(
            |x| (x[0] - 0.6).powi(2) + (x[1] - 0.2).powi(2) + (x[2] - 0.9).powi(2),
            &[0.3, 0.1, 0.1],
            Some(&[(0.0, 1.0), (0.0, 1.0), (0.0, 1.0)]),
            NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert!(!result.cancelled);
        assert_relative_eq!(result.optimal_point[0], 0.6, epsilon = 1e-3);
        assert_relative_eq!(result.optimal_point[1], 0.2, epsilon = 1e-3);
        assert_relative_eq!(result.optimal_point[2], 0.9, epsilon = 1e-3);
    }

    #[test]
    fn nelder_mead_respects_bounds() {
        // Unconstrained minimum at 5, box is [0, 1]
        let result = nelder_mead(
            |x| (x[0] - 5.0).powi(2),
            &[0.3],
            Some(&[(0.0, 1.0)]),
            NelderMeadConfig::default(),
        );

        assert_relative_eq!(result.optimal_point[0], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn nelder_mead_starting_on_upper_bound_still_moves() {
        let result = nelder_mead(
            |x| (x[0] - 0.25).powi(2),
            &[1.0],
            Some(&[(0.0, 1.0)]),
            NelderMeadConfig::default(),
        );

        assert_relative_eq!(result.optimal_point[0], 0.25, epsilon = 1e-3);
    }

    #[test]
    fn nelder_mead_treats_nan_as_worst() {
        // Objective is undefined for x > 0.5
        let result = nelder_mead(
            |x| {
                if x[0] > 0.5 {
                    f64::NAN
                } else {
                    (x[0] - 0.4).powi(2)
                }
            },
            &[0.3],
            Some(&[(0.0, 1.0)]),
            NelderMeadConfig::default(),
        );

        assert!(result.optimal_value.is_finite());
        assert_relative_eq!(result.optimal_point[0], 0.4, epsilon = 1e-3);
    }

    #[test]
    fn nelder_mead_reports_infinite_when_nothing_is_finite() {
        let result = nelder_mead(
            |_| f64::NAN,
            &[0.3, 0.1],
            None,
            NelderMeadConfig {
                max_iter: 20,
                ..Default::default()
            },
        );

        assert!(result.optimal_value.is_infinite());
    }

    #[test]
    fn nelder_mead_stop_callback_cancels() {
        let polls = Cell::new(0usize);
        let result = nelder_mead_until(
            |x| (x[0] - 2.0).powi(2),
            &[0.0],
            None,
            NelderMeadConfig::default(),
            || {
                polls.set(polls.get() + 1);
                polls.get() > 3
            },
        );

        assert!(result.cancelled);
        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
    }

    #[test]
    fn nelder_mead_empty_initial() {
        let result = nelder_mead(|_| 0.0, &[], None, NelderMeadConfig::default());

        assert!(!result.converged);
        assert!(result.optimal_value.is_nan());
    }

    #[test]
    fn nelder_mead_iteration_cap() {
        let config = NelderMeadConfig {
            max_iter: 5,
            tolerance: 0.0,
            ..Default::default()
        };
        let result = nelder_mead(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2),
            &[0.0, 0.0],
            None,
            config,
        );

        assert_eq!(result.iterations, 5);
        assert!(!result.converged);
    }
}
