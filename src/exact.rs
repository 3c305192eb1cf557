//! Exact strategy: dynamic programming over reachable item totals.
//!
//! The table covers every total in `0..=quantity + max_size`. An entry is reachable
//! when some multiset of catalogue sizes sums to exactly that index. The first
//! reachable index at or above the quantity is the smallest covering total, since
//! no minimal covering overshoots by more than one largest pack.

use log::{debug, error};

use crate::model::{Solution, normalize_sizes};
use crate::optimizer::{Solver, Strategy};

/// Marks a table entry no multiset of sizes can reach.
const UNREACHABLE: u32 = u32::MAX;

/// One table entry: fewest packs that reach this total and the catalogue slot
/// of the last pack added on that path.
#[derive(Clone, Copy, Debug)]
struct Cell {
    packs: u32,
    slot: u32,
}

impl Cell {
    const EMPTY: Self = Self {
        packs: UNREACHABLE,
        slot: 0,
    };

    #[inline]
    fn is_reachable(&self) -> bool {
        self.packs != UNREACHABLE
    }
}

/// Provably minimal covering within `[quantity, quantity + max_size]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactSolver;

impl Solver for ExactSolver {
    fn strategy(&self) -> Strategy {
        Strategy::Exact
    }

    fn solve(&self, quantity: u64, sizes: &[u64]) -> Solution {
        let catalogue = normalize_sizes(sizes);
        let Some(&max_size) = catalogue.last() else {
            return Solution::empty();
        };
        if quantity == 0 {
            return Solution::empty();
        }

        let Some(table_len) = table_len(quantity, max_size) else {
            error!(
                "❌ Exact table for quantity {} with max pack size {} does not fit in memory",
                quantity, max_size
            );
            return Solution::empty();
        };

        // Every size is at most `max_size`, which fits because the table length does.
        let steps: Vec<usize> = catalogue.iter().map(|&size| size as usize).collect();
        let table = build_table(&steps, table_len);

        // `quantity < table_len`, so the conversion cannot truncate.
        let start = quantity as usize;
        match (start..table_len).find(|&total| table[total].is_reachable()) {
            Some(total) => {
                debug!(
                    "Exact table of {} entries settled on total {} for quantity {}",
                    table_len, total, quantity
                );
                reconstruct(&table, &catalogue, &steps, total)
            }
            None => {
                error!(
                    "❌ No reachable total in [{}, {}] for sizes {:?}",
                    quantity,
                    quantity + max_size,
                    catalogue
                );
                Solution::empty()
            }
        }
    }
}

/// Solves with the exact strategy.
///
/// # Parameters
/// * `quantity` - Items to cover
/// * `sizes` - Allowed pack sizes (duplicates are ignored)
///
/// # Returns
/// The smallest covering total with a concrete breakdown, or the empty solution
/// for a zero quantity or empty catalogue
///
/// # Examples
/// ```
/// use pack_solver::exact::solve_exact;
///
/// let solution = solve_exact(2300, &[250, 500, 1000]);
/// assert_eq!(solution.total(), 2500);
/// ```
pub fn solve_exact(quantity: u64, sizes: &[u64]) -> Solution {
    ExactSolver.solve(quantity, sizes)
}

/// Number of table entries (`quantity + max_size + 1`) if it is addressable.
fn table_len(quantity: u64, max_size: u64) -> Option<usize> {
    let last = quantity.checked_add(max_size)?;
    usize::try_from(last).ok()?.checked_add(1)
}

/// Fills the table in increasing index order.
///
/// Predecessors with fewer packs win; on equal pack counts the larger size wins,
/// which keeps breakdowns compact and deterministic.
fn build_table(steps: &[usize], table_len: usize) -> Vec<Cell> {
    let mut table = vec![Cell::EMPTY; table_len];
    table[0] = Cell { packs: 0, slot: 0 };

    for total in 1..table_len {
        let mut best = Cell::EMPTY;
        for (slot, &step) in steps.iter().enumerate().rev() {
            if step > total {
                continue;
            }
            let prev = table[total - step];
            if !prev.is_reachable() {
                continue;
            }
            let packs = prev.packs.saturating_add(1);
            if packs < best.packs {
                best = Cell {
                    packs,
                    slot: slot as u32,
                };
            }
        }
        table[total] = best;
    }

    table
}

/// Walks the predecessor chain from `total` back to zero, counting sizes.
fn reconstruct(table: &[Cell], catalogue: &[u64], steps: &[usize], total: usize) -> Solution {
    let mut counts = vec![0u64; catalogue.len()];
    let mut cursor = total;
    while cursor > 0 {
        let cell = table[cursor];
        if !cell.is_reachable() {
            break;
        }
        let slot = cell.slot as usize;
        counts[slot] += 1;
        cursor -= steps[slot];
    }

    Solution::from_counts(catalogue.iter().copied().zip(counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PackLine;
    use test_case::test_case;

    #[test_case(&[250, 500, 1000], 2000 => 2000; "exact cover")]
    #[test_case(&[250, 500, 1000], 2300 => 2500; "rounds up to next reachable")]
    #[test_case(&[250, 500, 1000], 1 => 250; "single smallest pack")]
    #[test_case(&[100, 250, 500, 1000], 12001 => 12050; "no gross overshoot")]
    #[test_case(&[23, 31, 53], 263 => 263; "coprime sizes hit exactly")]
    #[test_case(&[6, 9, 20], 43 => 44; "largest unreachable mcnugget number")]
    #[test_case(&[1000, 250, 500, 250], 750 => 750; "duplicates are ignored")]
    fn test_exact_total(sizes: &[u64], quantity: u64) -> u64 {
        let solution = solve_exact(quantity, sizes);
        let recomputed: u64 = solution.packs().iter().map(PackLine::items).sum();
        assert_eq!(recomputed, solution.total());
        solution.total()
    }

    #[test]
    fn test_exact_prefers_fewest_packs() {
        let solution = solve_exact(2000, &[250, 500, 1000]);
        assert_eq!(
            solution.packs(),
            &[PackLine {
                size: 1000,
                count: 2
            }]
        );
    }

    #[test]
    fn test_exact_breakdown_for_overshoot() {
        let solution = solve_exact(2300, &[250, 500, 1000]);
        assert_eq!(
            solution.packs(),
            &[
                PackLine {
                    size: 1000,
                    count: 2
                },
                PackLine {
                    size: 500,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_exact_degenerate_inputs() {
        assert_eq!(solve_exact(0, &[250, 500, 1000]), Solution::empty());
        assert_eq!(solve_exact(1000, &[]), Solution::empty());
    }

    #[test]
    fn test_exact_large_quantity_with_coprime_sizes() {
        let solution = solve_exact(500_000, &[23, 31, 53]);
        assert_eq!(solution.total(), 500_000);
        assert!(solution.packs().iter().all(|line| line.count > 0));
    }

    #[test]
    fn test_table_len_overflow() {
        assert_eq!(table_len(10, 5), Some(16));
        assert_eq!(table_len(u64::MAX, 1), None);
    }
}
