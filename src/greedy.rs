//! Greedy strategy: largest packs first, then close the remainder.

use log::error;

use crate::model::{Solution, normalize_sizes};
use crate::optimizer::{Solver, Strategy};

/// Fast heuristic whose cost does not depend on the quantity.
///
/// Not optimal: it may overshoot where the exact strategy would not, but it
/// always covers the quantity.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedySolver;

impl Solver for GreedySolver {
    fn strategy(&self) -> Strategy {
        Strategy::Greedy
    }

    fn solve(&self, quantity: u64, sizes: &[u64]) -> Solution {
        let catalogue = normalize_sizes(sizes);
        let (Some(&smallest), Some(&largest)) = (catalogue.first(), catalogue.last()) else {
            return Solution::empty();
        };
        if quantity == 0 {
            return Solution::empty();
        }
        // The patched total stays below `quantity + largest`.
        if quantity.checked_add(largest).is_none() {
            error!(
                "❌ Greedy total for quantity {} with max pack size {} may exceed {}",
                quantity,
                largest,
                u64::MAX
            );
            return Solution::empty();
        }

        let mut remaining = quantity;
        let mut counts: Vec<(u64, u64)> = Vec::with_capacity(catalogue.len() + 1);
        for &size in catalogue.iter().rev() {
            let count = remaining / size;
            remaining -= count * size;
            counts.push((size, count));
        }

        if remaining > 0 {
            match catalogue.iter().find(|&&size| size >= remaining) {
                Some(&size) => counts.push((size, 1)),
                // Repeat the smallest pack until the remainder is gone.
                None => counts.push((smallest, remaining.div_ceil(smallest))),
            }
        }

        Solution::from_counts(counts)
    }
}

/// Solves with the greedy strategy.
///
/// # Parameters
/// * `quantity` - Items to cover
/// * `sizes` - Allowed pack sizes (duplicates are ignored)
///
/// # Returns
/// A covering solution, or the empty solution for a zero quantity or empty catalogue
pub fn solve_greedy(quantity: u64, sizes: &[u64]) -> Solution {
    GreedySolver.solve(quantity, sizes)
}
