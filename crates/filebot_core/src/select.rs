//! Random selection among search matches.

use rand::RngCore;
use rand::seq::SliceRandom;

/// Pick one element of `matches` using `rng`.
///
/// Returns `None` for an empty slice. Pass a seeded generator for
/// reproducible picks.
pub fn pick_one<'a, T>(matches: &'a [T], rng: &mut dyn RngCore) -> Option<&'a T> {
    matches.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_empty_returns_none() {
        let mut rng = StdRng::seed_from_u64(7);
        let empty: [u8; 0] = [];
        assert!(pick_one(&empty, &mut rng).is_none());
    }

    #[test]
    fn test_seeded_pick_is_reproducible() {
        let items = ["a", "b", "c", "d", "e"];
        let first = pick_one(&items, &mut StdRng::seed_from_u64(42)).copied();
        let second = pick_one(&items, &mut StdRng::seed_from_u64(42)).copied();
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn test_single_match_always_chosen() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(pick_one(&["only"], &mut rng), Some(&"only"));
        }
    }
}
