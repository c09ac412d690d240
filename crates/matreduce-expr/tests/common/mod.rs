//! Shared utilities for integration tests

#![allow(dead_code)]

pub use approx::assert_relative_eq;

use matreduce_core::{DynamicMatrix, Matrix};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const EPSILON: f64 = 1e-10;

/// Row and column counts that hit the edge cases of the SIMD kernels
pub fn edge_case_lengths() -> Vec<usize> {
    vec![
        0,  // Empty
        1,  // Single element
        2,  // Two-row unroll
        3,  // Unroll + 1
        4,  // f64 lane count
        5,  // Lane count + 1
        8,  // f32 lane count
        9,  // f32 lane count + 1
        16, // Two packs
        17, // Two packs + 1
    ]
}

/// Deterministic pseudo-random matrix with entries in `[-1, 1)`
pub fn random_matrix<const SO: bool>(rows: usize, columns: usize, seed: u64) -> DynamicMatrix<f64, SO> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    DynamicMatrix::from_fn(rows, columns, |_, _| rng.gen_range(-1.0..1.0))
}

/// Small integer matrix whose products stay exact
pub fn pattern_matrix<const SO: bool>(rows: usize, columns: usize) -> DynamicMatrix<i64, SO> {
    DynamicMatrix::from_fn(rows, columns, |i, j| ((i * 5 + j * 3) % 7) as i64 - 3)
}

/// Brute-force double-loop reduction; `init` is used for empty matrices
pub fn brute_reduce<M, F>(m: &M, init: M::Element, f: F) -> M::Element
where
    M: Matrix,
    F: Fn(M::Element, M::Element) -> M::Element,
{
    let mut acc: Option<M::Element> = None;
    for i in 0..m.rows() {
        for j in 0..m.columns() {
            let x = m.get(i, j);
            acc = Some(match acc {
                Some(a) => f(a, x),
                None => x,
            });
        }
    }
    acc.unwrap_or(init)
}

/// Brute-force column reductions
pub fn brute_columns<M, F>(m: &M, f: F) -> Vec<M::Element>
where
    M: Matrix,
    F: Fn(M::Element, M::Element) -> M::Element,
{
    (0..m.columns())
        .map(|j| {
            if m.rows() == 0 {
                return M::Element::default();
            }
            (1..m.rows()).fold(m.get(0, j), |acc, i| f(acc, m.get(i, j)))
        })
        .collect()
}

/// Brute-force row reductions
pub fn brute_rows<M, F>(m: &M, f: F) -> Vec<M::Element>
where
    M: Matrix,
    F: Fn(M::Element, M::Element) -> M::Element,
{
    (0..m.rows())
        .map(|i| {
            if m.columns() == 0 {
                return M::Element::default();
            }
            (1..m.columns()).fold(m.get(i, 0), |acc, j| f(acc, m.get(i, j)))
        })
        .collect()
}

/// Assert two vectors are equal within tolerance
pub fn assert_vectors_equal(actual: &[f64], expected: &[f64], context: &str) {
    assert_eq!(actual.len(), expected.len(), "length mismatch for {context}");
    for (&a, &e) in actual.iter().zip(expected) {
        assert_relative_eq!(a, e, epsilon = EPSILON, max_relative = 1e-12);
    }
}
