//! Shared intrinsics for AVX2 implementations

use std::arch::x86_64::*;

/// Horizontal sum of a __m256d (4 f64s)
#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_sum_pd(v: __m256d) -> f64 {
    // Extract high and low 128-bit lanes
    let high = _mm256_extractf128_pd(v, 1);
    let low = _mm256_castpd256_pd128(v);

    let sum128 = _mm_add_pd(high, low);

    // Horizontal add within 128-bit lane
    let sum = _mm_hadd_pd(sum128, sum128);

    _mm_cvtsd_f64(sum)
}

/// Horizontal sum of a __m256 (8 f32s)
#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_sum_ps(v: __m256) -> f32 {
    let high = _mm256_extractf128_ps(v, 1);
    let low = _mm256_castps256_ps128(v);

    let sum128 = _mm_add_ps(high, low);

    // Horizontal add within 128-bit lane (two steps)
    let shuf = _mm_shuffle_ps(sum128, sum128, 0b00_11_00_01);
    let sums = _mm_add_ps(sum128, shuf);
    let shuf = _mm_shuffle_ps(sums, sums, 0b00_00_00_10);
    let result = _mm_add_ps(sums, shuf);

    _mm_cvtss_f32(result)
}
