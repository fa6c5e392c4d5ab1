//! Internal utility functions and helpers.

use std::cmp::Ordering;

/// True when `p` holds every index `0..p.len()` exactly once.
pub(crate) fn is_permutation(p: &[usize]) -> bool {
    let mut seen = vec![false; p.len()];
    for &j in p {
        if j >= p.len() || seen[j] {
            return false;
        }
        seen[j] = true;
    }
    true
}

// stable, so equal keys keep their original relative order
pub(crate) fn sortperm_by<T, F>(p: &mut [usize], v: &[T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    assert_eq!(p.len(), v.len());
    p.iter_mut().enumerate().for_each(|(i, p)| *p = i);
    p.sort_by(|&i, &j| compare(&v[i], &v[j]));
}

#[test]
fn test_permutations() {
    assert!(is_permutation(&[2, 0, 3, 1]));
    assert!(is_permutation(&[]));
    assert!(!is_permutation(&[0, 0, 1]));
    assert!(!is_permutation(&[0, 3, 1]));
}

#[test]
fn test_sortperm_by_stable() {
    let w = [1.0, 3.0, 1.0, 3.0, 2.0];
    let mut p = vec![0; 5];
    sortperm_by(&mut p, &w, |a: &f64, b: &f64| b.partial_cmp(a).unwrap());
    assert_eq!(p, vec![1, 3, 4, 0, 2]);
}
