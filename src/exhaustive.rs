//! Exhaustive strategy: bounded depth-first enumeration of pack combinations.
//!
//! Intended for small catalogues and quantities, mainly as a reference oracle
//! for the other strategies. Cost grows combinatorially with the quantity and
//! the catalogue length, so every search also carries a node budget.

use log::{debug, error, warn};

use crate::model::{Solution, normalize_sizes};
use crate::optimizer::{Solver, Strategy};

/// Depth-capped enumeration over "take one more of this size" / "move to the next size".
#[derive(Clone, Copy, Debug)]
pub struct ExhaustiveSolver {
    max_units: usize,
    max_nodes: u64,
}

impl ExhaustiveSolver {
    pub const DEFAULT_MAX_UNITS: usize = 64;
    pub const DEFAULT_MAX_NODES: u64 = 2_000_000;

    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of packs a single path may consume.
    ///
    /// Zero is raised to one so the search can always take at least one pack.
    pub fn with_max_units(max_units: usize) -> Self {
        Self {
            max_units: max_units.max(1),
            ..Self::default()
        }
    }

    /// Caps the number of search nodes; a search that hits the cap yields no result.
    ///
    /// Zero is raised to one.
    pub fn node_limit(mut self, max_nodes: u64) -> Self {
        self.max_nodes = max_nodes.max(1);
        self
    }

    pub fn max_units(&self) -> usize {
        self.max_units
    }

    pub fn max_nodes(&self) -> u64 {
        self.max_nodes
    }
}

impl Default for ExhaustiveSolver {
    fn default() -> Self {
        Self {
            max_units: Self::DEFAULT_MAX_UNITS,
            max_nodes: Self::DEFAULT_MAX_NODES,
        }
    }
}

impl Solver for ExhaustiveSolver {
    fn strategy(&self) -> Strategy {
        Strategy::Exhaustive
    }

    fn solve(&self, quantity: u64, sizes: &[u64]) -> Solution {
        let mut catalogue = normalize_sizes(sizes);
        let (Some(&smallest), Some(&largest)) = (catalogue.first(), catalogue.last()) else {
            return Solution::empty();
        };
        if quantity == 0 {
            return Solution::empty();
        }
        let Some(reach) = quantity.checked_add(largest) else {
            error!(
                "❌ Exhaustive totals for quantity {} with max pack size {} may exceed {}",
                quantity,
                largest,
                u64::MAX
            );
            return Solution::empty();
        };

        // A minimal covering never holds more than (quantity + largest) / smallest packs.
        let needed = reach / smallest + 1;
        let unit_budget = usize::try_from(needed).map_or(self.max_units, |n| n.min(self.max_units));

        // Larger sizes first so good candidates turn up early.
        catalogue.reverse();
        let mut search = Search {
            quantity,
            counts: vec![0; catalogue.len()],
            sizes: catalogue,
            unit_budget,
            max_nodes: self.max_nodes,
            best: None,
            visited: 0,
            truncated: false,
        };
        search.explore(0, 0, 0, 0);

        if search.truncated {
            warn!(
                "⚠️ Exhaustive search for quantity {} stopped after {} nodes; no result",
                quantity, search.max_nodes
            );
            return Solution::empty();
        }
        debug!(
            "Exhaustive search visited {} nodes (unit budget {}) for quantity {}",
            search.visited, unit_budget, quantity
        );
        search.best.unwrap_or_default()
    }
}

/// Solves with the exhaustive strategy using the default unit cap.
///
/// # Returns
/// The best covering found within the caps, or the empty solution if the unit
/// cap is too small to reach the quantity or the node budget runs out
pub fn solve_exhaustive(quantity: u64, sizes: &[u64]) -> Solution {
    ExhaustiveSolver::default().solve(quantity, sizes)
}

struct Search {
    quantity: u64,
    /// Sizes in descending order.
    sizes: Vec<u64>,
    counts: Vec<u64>,
    unit_budget: usize,
    max_nodes: u64,
    best: Option<Solution>,
    visited: u64,
    /// Set once `visited` reaches `max_nodes`; the partial best is then unreliable.
    truncated: bool,
}

impl Search {
    /// Visits the node at `index` with `acc` items from `units` packs across `lines` sizes.
    fn explore(&mut self, index: usize, acc: u64, units: usize, lines: usize) {
        if self.visited >= self.max_nodes {
            self.truncated = true;
            return;
        }
        self.visited += 1;

        if acc >= self.quantity {
            self.record();
            return;
        }
        if index == self.sizes.len() || units == self.unit_budget {
            return;
        }
        // Nothing below this node can beat a perfect fit with as few lines.
        if let Some(best) = &self.best {
            if best.total() == self.quantity && best.line_count() <= lines {
                return;
            }
        }

        let size = self.sizes[index];
        let opens_line = usize::from(self.counts[index] == 0);
        self.counts[index] += 1;
        self.explore(index, acc + size, units + 1, lines + opens_line);
        self.counts[index] -= 1;

        self.explore(index + 1, acc, units, lines);
    }

    fn record(&mut self) {
        let candidate =
            Solution::from_counts(self.sizes.iter().copied().zip(self.counts.iter().copied()));
        let improves = match &self.best {
            Some(best) => candidate.ranks_before(best),
            None => true,
        };
        if improves {
            self.best = Some(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::solve_exact;
    use crate::model::PackLine;
    use test_case::test_case;

    #[test_case(&[250, 500, 1000], 2000 => 2000; "exact cover")]
    #[test_case(&[250, 500, 1000], 2300 => 2500; "minimal excess")]
    #[test_case(&[250, 500, 1000], 1 => 250; "below smallest pack")]
    #[test_case(&[6, 9, 20], 43 => 44; "unreachable quantity")]
    #[test_case(&[3, 5], 7 => 8; "two coprime sizes")]
    fn test_exhaustive_total(sizes: &[u64], quantity: u64) -> u64 {
        solve_exhaustive(quantity, sizes).total()
    }

    #[test]
    fn test_exhaustive_collapses_repeated_sizes() {
        let solution = solve_exhaustive(2000, &[250, 500, 1000]);
        assert_eq!(
            solution.packs(),
            &[PackLine {
                size: 1000,
                count: 2
            }]
        );
    }

    #[test]
    fn test_exhaustive_prefers_fewer_lines_on_equal_totals() {
        // 1000 is reachable as 1×1000, 2×500, 4×250 or mixes; one line wins.
        let solution = solve_exhaustive(1000, &[250, 500, 1000]);
        assert_eq!(solution.line_count(), 1);
        assert_eq!(solution.total(), 1000);
    }

    #[test]
    fn test_exhaustive_matches_exact_on_small_inputs() {
        let sizes = [4, 7, 9];
        for quantity in 1..=80 {
            assert_eq!(
                solve_exhaustive(quantity, &sizes).total(),
                solve_exact(quantity, &sizes).total(),
                "quantity {}",
                quantity
            );
        }
    }

    #[test]
    fn test_unit_cap_limits_reach() {
        // Two packs of 10 cannot reach 25.
        let capped = ExhaustiveSolver::with_max_units(2);
        assert!(capped.solve(25, &[10]).is_empty());
        assert_eq!(capped.solve(20, &[10]).total(), 20);
    }

    #[test]
    fn test_node_budget_gives_up_on_wide_catalogues() {
        // Up to 64 packs of at most 8 never reach 1000, so every multiset would be visited.
        let sizes: Vec<u64> = (1..=8).collect();
        let solver = ExhaustiveSolver::new().node_limit(10_000);
        assert!(solver.solve(1000, &sizes).is_empty());
        assert!(solve_exhaustive(1000, &sizes).is_empty());
    }

    #[test]
    fn test_tiny_node_budget_yields_no_result() {
        let solver = ExhaustiveSolver::new().node_limit(1);
        assert_eq!(solver.max_nodes(), 1);
        assert!(solver.solve(2000, &[250, 500, 1000]).is_empty());
        assert_eq!(
            ExhaustiveSolver::new().node_limit(0).max_nodes(),
            1,
            "zero is raised to one"
        );
    }

    #[test]
    fn test_exhaustive_rejects_totals_beyond_u64() {
        assert!(solve_exhaustive(u64::MAX - 1, &[4]).is_empty());
    }

    #[test]
    fn test_exhaustive_degenerate_inputs() {
        assert!(solve_exhaustive(0, &[5]).is_empty());
        assert!(solve_exhaustive(5, &[]).is_empty());
    }
}
