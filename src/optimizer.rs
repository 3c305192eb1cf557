//! Strategieauswahl für die Paketoptimierung.
//!
//! Dieses Modul bündelt die einzelnen Strategien hinter einem Aufruf:
//! - `Greedy` und `Exact` laufen immer
//! - `Exhaustive` läuft nur im Verifikationsmodus und nur für kleine Mengen
//! - Gewinner ist die Lösung mit der kleinsten Gesamtmenge, bei Gleichstand die mit weniger Zeilen

use std::fmt;

use log::{debug, error, warn};
use serde::Serialize;

use crate::exact::ExactSolver;
use crate::exhaustive::ExhaustiveSolver;
use crate::greedy::GreedySolver;
use crate::model::{Solution, normalize_sizes};

/// Gemeinsame Schnittstelle aller Strategien.
///
/// Implementierungen sind reine Funktionen ihrer Eingaben und halten keinen Zustand
/// zwischen Aufrufen.
pub trait Solver: Send + Sync {
    /// Liefert die Kennung der Strategie.
    fn strategy(&self) -> Strategy;

    /// Berechnet eine Aufteilung, deren Gesamtmenge `quantity` nicht unterschreitet.
    ///
    /// # Parameter
    /// * `quantity` - Angeforderte Stückzahl
    /// * `sizes` - Erlaubte Paketgrößen (Duplikate werden ignoriert)
    fn solve(&self, quantity: u64, sizes: &[u64]) -> Solution;
}

/// Verfügbare Strategien.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Exact,
    Greedy,
    Exhaustive,
}

impl Strategy {
    pub fn code(&self) -> &'static str {
        match self {
            Strategy::Exact => "exact",
            Strategy::Greedy => "greedy",
            Strategy::Exhaustive => "exhaustive",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Konfiguration für die Strategieauswahl.
///
/// Enthält alle Grenzwerte zur Steuerung von Speicherbedarf und Verifikation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Obergrenze für `quantity + größtes Paket`; darüber wird `Exact` übersprungen
    pub table_ceiling: u64,
    /// Ob `Exhaustive` als Orakel mitläuft
    pub verify: bool,
    /// Größte Menge, für die `Exhaustive` im Verifikationsmodus läuft
    pub verify_max_quantity: u64,
    /// Maximale Paketanzahl pro Suchpfad in `Exhaustive`
    pub exhaustive_max_units: usize,
    /// Maximale Anzahl besuchter Knoten in `Exhaustive`; darüber entfällt das Orakel
    pub exhaustive_max_nodes: u64,
    /// Ob `Greedy` und `Exact` parallel über rayon laufen
    pub parallel: bool,
}

impl OptimizerConfig {
    pub const DEFAULT_TABLE_CEILING: u64 = 20_000_000;
    pub const DEFAULT_VERIFY: bool = false;
    pub const DEFAULT_VERIFY_MAX_QUANTITY: u64 = 5_000;
    pub const DEFAULT_EXHAUSTIVE_MAX_UNITS: usize = ExhaustiveSolver::DEFAULT_MAX_UNITS;
    pub const DEFAULT_EXHAUSTIVE_MAX_NODES: u64 = ExhaustiveSolver::DEFAULT_MAX_NODES;
    pub const DEFAULT_PARALLEL: bool = false;

    /// Erstellt einen Builder für benutzerdefinierte Konfiguration.
    pub fn builder() -> OptimizerConfigBuilder {
        OptimizerConfigBuilder::default()
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            table_ceiling: Self::DEFAULT_TABLE_CEILING,
            verify: Self::DEFAULT_VERIFY,
            verify_max_quantity: Self::DEFAULT_VERIFY_MAX_QUANTITY,
            exhaustive_max_units: Self::DEFAULT_EXHAUSTIVE_MAX_UNITS,
            exhaustive_max_nodes: Self::DEFAULT_EXHAUSTIVE_MAX_NODES,
            parallel: Self::DEFAULT_PARALLEL,
        }
    }
}

/// Builder-Pattern für OptimizerConfig.
#[derive(Clone, Debug, Default)]
pub struct OptimizerConfigBuilder {
    config: OptimizerConfig,
}

impl OptimizerConfigBuilder {
    /// Setzt die Obergrenze für die DP-Tabelle.
    pub fn table_ceiling(mut self, ceiling: u64) -> Self {
        self.config.table_ceiling = ceiling;
        self
    }

    /// Aktiviert oder deaktiviert den Verifikationsmodus.
    pub fn verify(mut self, verify: bool) -> Self {
        self.config.verify = verify;
        self
    }

    /// Setzt die größte Menge für den Verifikationsmodus.
    pub fn verify_max_quantity(mut self, quantity: u64) -> Self {
        self.config.verify_max_quantity = quantity;
        self
    }

    /// Setzt die maximale Paketanzahl pro Suchpfad.
    pub fn exhaustive_max_units(mut self, units: usize) -> Self {
        self.config.exhaustive_max_units = units;
        self
    }

    /// Setzt das Knotenbudget für `Exhaustive`.
    pub fn exhaustive_max_nodes(mut self, nodes: u64) -> Self {
        self.config.exhaustive_max_nodes = nodes;
        self
    }

    /// Aktiviert oder deaktiviert die parallele Ausführung.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Erstellt die finale Konfiguration.
    pub fn build(self) -> OptimizerConfig {
        self.config
    }
}

/// Ergebnis einer Strategie innerhalb einer Auswahl.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CandidateSummary {
    pub strategy: Strategy,
    pub total: u64,
}

/// Ergebnis der Strategieauswahl mit Diagnosedaten.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub solution: Solution,
    /// Gewinnende Strategie; `None`, wenn keine Berechnung nötig war
    pub strategy: Option<Strategy>,
    /// Alle betrachteten Kandidaten in Ausführungsreihenfolge
    pub candidates: Vec<CandidateSummary>,
}

impl Selection {
    fn empty() -> Self {
        Self {
            solution: Solution::empty(),
            strategy: None,
            candidates: Vec::new(),
        }
    }

    /// Wählt den besten Kandidaten, der `quantity` abdeckt.
    ///
    /// Bei vollständigem Gleichstand gewinnt der frühere Kandidat.
    fn from_candidates(quantity: u64, candidates: Vec<(Strategy, Solution)>) -> Self {
        let summaries: Vec<CandidateSummary> = candidates
            .iter()
            .map(|(strategy, solution)| CandidateSummary {
                strategy: *strategy,
                total: solution.total(),
            })
            .collect();

        let mut winner: Option<(Strategy, Solution)> = None;
        for (strategy, solution) in candidates {
            if solution.is_empty() || !solution.covers(quantity) {
                continue;
            }
            let better = match &winner {
                Some((_, best)) => solution.ranks_before(best),
                None => true,
            };
            if better {
                winner = Some((strategy, solution));
            }
        }

        match winner {
            Some((strategy, solution)) => Self {
                solution,
                strategy: Some(strategy),
                candidates: summaries,
            },
            None => {
                error!(
                    "❌ No strategy covered quantity {} (candidates: {:?})",
                    quantity, summaries
                );
                Self {
                    solution: Solution::empty(),
                    strategy: None,
                    candidates: summaries,
                }
            }
        }
    }

    /// Überschuss der gewählten Lösung gegenüber `quantity`.
    pub fn overage(&self, quantity: u64) -> u64 {
        self.solution.overage(quantity)
    }
}

/// Strategieauswahl: einziger Einstiegspunkt für Aufrufer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Berechnet die beste Aufteilung.
    ///
    /// # Parameter
    /// * `quantity` - Angeforderte Stückzahl
    /// * `sizes` - Erlaubte Paketgrößen
    ///
    /// # Rückgabewert
    /// Die Lösung mit minimaler Gesamtmenge unter allen beteiligten Strategien
    pub fn solve(&self, quantity: u64, sizes: &[u64]) -> Solution {
        self.select(quantity, sizes).solution
    }

    /// Wie `solve`, liefert aber zusätzlich Gewinner und alle Kandidaten.
    pub fn select(&self, quantity: u64, sizes: &[u64]) -> Selection {
        let catalogue = normalize_sizes(sizes);
        let Some(&largest) = catalogue.last() else {
            return Selection::empty();
        };
        if quantity == 0 {
            return Selection::empty();
        }

        let run_exact = quantity
            .checked_add(largest)
            .is_some_and(|end| end <= self.config.table_ceiling);
        if !run_exact {
            warn!(
                "⚠️ Skipping exact strategy: quantity {} + pack size {} exceeds table ceiling {}",
                quantity, largest, self.config.table_ceiling
            );
        }

        let (exact, greedy) = if run_exact && self.config.parallel {
            let (exact, greedy) = rayon::join(
                || ExactSolver.solve(quantity, &catalogue),
                || GreedySolver.solve(quantity, &catalogue),
            );
            (Some(exact), greedy)
        } else {
            let exact = run_exact.then(|| ExactSolver.solve(quantity, &catalogue));
            (exact, GreedySolver.solve(quantity, &catalogue))
        };

        let mut candidates = Vec::with_capacity(3);
        if let Some(exact) = exact {
            candidates.push((Strategy::Exact, exact));
        }
        candidates.push((Strategy::Greedy, greedy));

        if self.config.verify && quantity <= self.config.verify_max_quantity {
            let oracle = ExhaustiveSolver::with_max_units(self.config.exhaustive_max_units)
                .node_limit(self.config.exhaustive_max_nodes)
                .solve(quantity, &catalogue);
            check_against_oracle(quantity, &candidates, &oracle);
            candidates.push((Strategy::Exhaustive, oracle));
        }

        let selection = Selection::from_candidates(quantity, candidates);
        debug!(
            "Selected {:?} for quantity {}: total {} ({} lines)",
            selection.strategy,
            quantity,
            selection.solution.total(),
            selection.solution.line_count()
        );
        selection
    }
}

/// Meldet, wenn das Orakel eine kleinere Gesamtmenge findet als `Exact`.
fn check_against_oracle(quantity: u64, candidates: &[(Strategy, Solution)], oracle: &Solution) {
    if oracle.is_empty() || !oracle.covers(quantity) {
        return;
    }
    let exact = candidates
        .iter()
        .find(|(strategy, _)| *strategy == Strategy::Exact);
    if let Some((_, exact)) = exact {
        if oracle.total() < exact.total() {
            error!(
                "❌ Exact strategy is not minimal for quantity {}: exact {} vs exhaustive {}",
                quantity,
                exact.total(),
                oracle.total()
            );
        }
    }
}

/// Berechnet die beste Aufteilung mit Standardkonfiguration.
///
/// # Examples
/// ```
/// use pack_solver::solve;
///
/// let solution = solve(2300, &[250, 500, 1000]);
/// assert_eq!(solution.total(), 2500);
/// ```
pub fn solve(quantity: u64, sizes: &[u64]) -> Solution {
    Optimizer::default().solve(quantity, sizes)
}
