use std::cmp::Ordering;

/// Brier score: mean squared difference between forecast and binary outcome.
/// Returns 0.0 for empty input.
pub fn brier(pairs: impl IntoIterator<Item = (f64, f64)>) -> f64 {
    let (sum, n) = pairs
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), (p, y)| (sum + (p - y).powi(2), n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Stable descending sort by `key`, truncated to `k` entries.
///
/// Equal keys keep their input order.
pub fn top_k_by<T, K, F>(mut items: Vec<T>, k: usize, mut key: F) -> Vec<T>
where
    K: PartialOrd,
    F: FnMut(&T) -> K,
{
    items.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    items.truncate(k);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brier_perfect_is_zero() {
        assert_eq!(brier([(1.0, 1.0), (0.0, 0.0)]), 0.0);
    }

    #[test]
    fn test_brier_worst_is_one() {
        assert_eq!(brier([(1.0, 0.0), (0.0, 1.0)]), 1.0);
    }

    #[test]
    fn test_brier_grows_with_error() {
        let small = brier([(0.9, 1.0)]);
        let large = brier([(0.6, 1.0)]);
        assert!(small < large);
    }

    #[test]
    fn test_top_k_by_is_stable_and_truncates() {
        let items = vec![("a", 1), ("b", 3), ("c", 1), ("d", 3), ("e", 2)];
        let top = top_k_by(items, 4, |(_, n)| *n);
        assert_eq!(top, vec![("b", 3), ("d", 3), ("e", 2), ("a", 1)]);
    }

    #[test]
    fn test_top_k_by_zero() {
        let top = top_k_by(vec![1.0, 2.0], 0, |v| *v);
        assert!(top.is_empty());
    }
}
