//! Shared utilities for integration tests

#![allow(dead_code)]

pub use approx::assert_relative_eq;

pub const EPSILON: f64 = 1e-10;

/// Matrix dimensions that hit the edge cases of padded storage
pub fn edge_case_lengths() -> Vec<usize> {
    vec![
        0,  // Empty
        1,  // Single element
        2,  // Two elements
        3,  // Odd
        4,  // f64 lane count
        5,  // f64 lane count + 1
        7,  // f32 lane count - 1
        8,  // f32 lane count
        9,  // f32 lane count + 1
        16, // Two f32 packs
        17, // Two f32 packs + 1
    ]
}

/// Special floating-point values for edge case testing
pub fn special_values() -> Vec<f64> {
    vec![
        0.0,
        -0.0,
        1.0,
        -1.0,
        f64::MIN_POSITIVE,
        f64::EPSILON,
        std::f64::consts::PI,
        std::f64::consts::E,
        1e-300,
        1e300,
    ]
}

/// Generate test data with a specific pattern
pub fn generate_test_data(len: usize) -> Vec<f64> {
    (0..len).map(|i| i as f64 + 0.1).collect()
}
