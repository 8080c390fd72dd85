//! Uniform sampling without replacement
//!
//! The random source is always passed in, so a seeded `Pcg32` (or a mock
//! generator) makes every draw reproducible.

use rand::Rng;

/// Remove one uniformly chosen element.
///
/// Returns the drawn element and the remaining elements in their original
/// relative order.
///
/// # Panics
/// Panics if `items` is empty. Callers check for exhaustion first (see
/// [`NotePool::draw`](crate::pool::NotePool::draw)).
///
/// # Example
/// ```
/// use flashcards::sampler::sample;
/// use rand::SeedableRng;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(7);
/// let (drawn, rest) = sample(vec!['a', 'b', 'c'], &mut rng);
/// assert_eq!(rest.len(), 2);
/// assert!(!rest.contains(&drawn));
/// ```
pub fn sample<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> (T, Vec<T>) {
    assert!(!items.is_empty(), "sample() called on an empty pool");
    let index = rng.gen_range(0..items.len());
    let drawn = items.remove(index);
    (drawn, items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_draws_visit_every_element_once() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut remaining: Vec<u32> = (0..20).collect();
        let mut drawn = Vec::new();

        while !remaining.is_empty() {
            let before = remaining.len();
            let (value, rest) = sample(remaining, &mut rng);
            assert_eq!(rest.len(), before - 1);
            drawn.push(value);
            remaining = rest;
        }

        drawn.sort();
        assert_eq!(drawn, (0..20).collect::<Vec<u32>>());
    }

    #[test]
    fn test_remaining_order_is_preserved() {
        let mut rng = Pcg32::seed_from_u64(3);
        let (drawn, rest) = sample(vec![1, 2, 3, 4, 5, 6], &mut rng);
        let expected: Vec<i32> = vec![1, 2, 3, 4, 5, 6].into_iter().filter(|v| *v != drawn).collect();
        assert_eq!(rest, expected);
    }

    #[test]
    fn test_same_seed_same_draws() {
        let draw_all = |seed| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut items: Vec<u8> = (0..10).collect();
            let mut order = Vec::new();
            while !items.is_empty() {
                let (value, rest) = sample(items, &mut rng);
                order.push(value);
                items = rest;
            }
            order
        };
        assert_eq!(draw_all(11), draw_all(11));
    }

    #[test]
    fn test_zero_source_picks_first() {
        let mut rng = StepRng::new(0, 0);
        let (drawn, rest) = sample(vec!["x", "y", "z"], &mut rng);
        assert_eq!(drawn, "x");
        assert_eq!(rest, vec!["y", "z"]);
    }

    #[test]
    #[should_panic(expected = "empty pool")]
    fn test_empty_input_panics() {
        let mut rng = StepRng::new(0, 0);
        let _ = sample(Vec::<u8>::new(), &mut rng);
    }
}
