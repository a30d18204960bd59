//! Vector similarity functions

use crate::domain::DomainError;

/// Calculate the cosine similarity between two vectors, clamped to `[0, 1]`
///
/// Dot product and both magnitudes are accumulated in a single pass, in
/// `f64` so that squaring any finite `f32` neither overflows nor underflows.
/// Empty vectors and zero vectors carry no direction and score `0.0`.
///
/// The lower clamp is a policy of this cache: true cosine similarity ranges
/// over `[-1, 1]`, but an anti-correlated candidate is as useless as an
/// unrelated one, so negative scores are reported as `0.0`. The upper clamp
/// absorbs rounding overshoot on near-identical vectors.
///
/// Vectors of different lengths are a caller bug and fail with
/// [`DomainError::InvalidInput`].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, DomainError> {
    if a.len() != b.len() {
        return Err(DomainError::invalid_input(format!(
            "Cannot compare vectors of different lengths: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let (dot_product, norm_a_sq, norm_b_sq) = a.iter().zip(b.iter()).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    if norm_a_sq == 0.0 || norm_b_sq == 0.0 {
        return Ok(0.0);
    }

    let similarity = (dot_product / (norm_a_sq.sqrt() * norm_b_sq.sqrt())) as f32;

    if !similarity.is_finite() {
        return Ok(0.0);
    }

    Ok(similarity.clamp(0.0, 1.0))
}

/// Scale a vector to unit length
///
/// A zero vector is returned unchanged.
pub fn normalize(vector: &[f32]) -> Vec<f32> {
    let norm = vector
        .iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt();

    if norm == 0.0 || !norm.is_finite() {
        return vector.to_vec();
    }

    vector
        .iter()
        .map(|&x| (f64::from(x) / norm) as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];

        let similarity = cosine_similarity(&a, &b).unwrap();

        assert!((similarity - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];

        let similarity = cosine_similarity(&a, &b).unwrap();

        assert!(similarity.abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_opposite_clamped_to_zero() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];

        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_ignores_magnitude() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![10.0, 20.0, 30.0];

        let similarity = cosine_similarity(&a, &b).unwrap();

        assert!((similarity - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_known_angle() {
        // cos(45deg)
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 1.0];

        let similarity = cosine_similarity(&a, &b).unwrap();

        assert!((similarity - std::f32::consts::FRAC_1_SQRT_2).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_empty() {
        let empty: Vec<f32> = vec![];

        assert_eq!(cosine_similarity(&empty, &empty).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let zero = vec![0.0, 0.0, 0.0];
        let other = vec![0.3, 0.1, 0.9];

        assert_eq!(cosine_similarity(&zero, &other).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&other, &zero).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_different_lengths() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];

        let err = cosine_similarity(&a, &b).unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput { .. }));
    }

    #[test]
    fn test_cosine_similarity_empty_against_non_empty() {
        let empty: Vec<f32> = vec![];
        let non_empty = vec![1.0, 2.0];

        assert!(cosine_similarity(&empty, &non_empty).is_err());
    }

    #[test]
    fn test_cosine_similarity_large_components() {
        let v = vec![1e20f32, 1e20];

        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&[f32::MAX, 0.0], &[f32::MAX, f32::MAX]).unwrap()
            - std::f32::consts::FRAC_1_SQRT_2)
            .abs()
            < 1e-4);
    }

    #[test]
    fn test_cosine_similarity_tiny_components() {
        let v = vec![1e-25f32, 1e-25];
        let subnormal = vec![f32::from_bits(1), 0.0];

        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&subnormal, &subnormal).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_extreme_magnitudes() {
        let large = normalize(&[3e30, 4e30]);
        let tiny = normalize(&[3e-30, 4e-30]);

        assert!((large[0] - 0.6).abs() < 1e-4 && (large[1] - 0.8).abs() < 1e-4);
        assert!((tiny[0] - 0.6).abs() < 1e-4 && (tiny[1] - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_normalize_unit_length() {
        let normalized = normalize(&[3.0, 4.0]);

        assert!((normalized[0] - 0.6).abs() < 0.0001);
        assert!((normalized[1] - 0.8).abs() < 0.0001);
    }

    #[test]
    fn test_normalize_zero_vector_unchanged() {
        assert_eq!(normalize(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
        assert!(normalize(&[]).is_empty());
    }

    fn vector_pair() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
        (1usize..32).prop_flat_map(|len| {
            (
                prop::collection::vec(-100.0f32..100.0, len),
                prop::collection::vec(-100.0f32..100.0, len),
            )
        })
    }

    fn finite_f32() -> impl Strategy<Value = f32> {
        prop::num::f32::NORMAL | prop::num::f32::SUBNORMAL | prop::num::f32::ZERO
    }

    fn finite_vector_pair() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
        (1usize..32).prop_flat_map(|len| {
            (
                prop::collection::vec(finite_f32(), len),
                prop::collection::vec(finite_f32(), len),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_self_similarity_is_one(v in prop::collection::vec(-100.0f32..100.0, 1..32)) {
            prop_assume!(v.iter().any(|x| x.abs() > 1e-3));
            let similarity = cosine_similarity(&v, &v).unwrap();
            prop_assert!((similarity - 1.0).abs() < 1e-4);
        }

        #[test]
        fn prop_zero_vector_scores_zero(v in prop::collection::vec(-100.0f32..100.0, 1..32)) {
            let zero = vec![0.0; v.len()];
            prop_assert_eq!(cosine_similarity(&v, &zero).unwrap(), 0.0);
        }

        #[test]
        fn prop_symmetric((a, b) in vector_pair()) {
            let ab = cosine_similarity(&a, &b).unwrap();
            let ba = cosine_similarity(&b, &a).unwrap();
            prop_assert!((ab - ba).abs() < 1e-6);
        }

        #[test]
        fn prop_bounded((a, b) in vector_pair()) {
            let similarity = cosine_similarity(&a, &b).unwrap();
            prop_assert!((0.0..=1.0).contains(&similarity));
        }

        #[test]
        fn prop_bounded_over_full_range((a, b) in finite_vector_pair()) {
            let similarity = cosine_similarity(&a, &b).unwrap();
            prop_assert!((0.0..=1.0).contains(&similarity), "out of [0,1]: {}", similarity);
        }

        #[test]
        fn prop_self_similarity_over_full_range(v in prop::collection::vec(finite_f32(), 1..32)) {
            prop_assume!(v.iter().any(|x| *x != 0.0));
            let similarity = cosine_similarity(&v, &v).unwrap();
            prop_assert!((similarity - 1.0).abs() < 1e-4, "self-similarity {}", similarity);
        }

        #[test]
        fn prop_mismatched_lengths_rejected(
            a in prop::collection::vec(-1.0f32..1.0, 1..16),
            extra in 1usize..8,
        ) {
            let b = vec![0.5; a.len() + extra];
            prop_assert!(cosine_similarity(&a, &b).is_err());
        }

        #[test]
        fn prop_normalize_yields_unit_norm(v in prop::collection::vec(-100.0f32..100.0, 1..32)) {
            prop_assume!(v.iter().any(|x| x.abs() > 1e-3));
            let norm = normalize(&v).iter().map(|x| x * x).sum::<f32>().sqrt();
            prop_assert!((norm - 1.0).abs() < 1e-4);
        }
    }
}
