//! Closed option enums shared across the crate and the alias tables that map
//! user-facing spellings onto them.
//!
//! Every category has exactly one table below. The tables are the single
//! source of truth for CLI validation (`--help` lists them) and for
//! [`crate::core::resolve`]. The canonical symbol of each variant is the
//! preprocessor name the solver's `Definitions.h` expects.
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A closed option category whose values are selected through string aliases.
pub trait AliasTable: Copy + Sized + 'static {
    /// Category name used in diagnostics (matches the CLI flag).
    const CATEGORY: &'static str;

    /// Case-sensitive alias -> variant table. Several aliases may share a variant.
    const ALIASES: &'static [(&'static str, Self)];

    /// Preprocessor symbol written into the configuration artifact.
    fn symbol(&self) -> &'static str;

    /// Human-readable name, as the solver prints it.
    fn label(&self) -> &'static str;

    /// Look up `alias`, rejecting anything outside the table.
    fn from_alias(alias: &str) -> Result<Self> {
        Self::ALIASES
            .iter()
            .find(|(name, _)| *name == alias)
            .map(|(_, value)| *value)
            .ok_or_else(|| Error::UnknownAlias {
                category: Self::CATEGORY,
                alias: alias.to_string(),
            })
    }

    /// All accepted spellings, in table order.
    fn aliases() -> impl Iterator<Item = &'static str> {
        Self::ALIASES.iter().map(|(name, _)| *name)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Algorithm {
    AStar,
    IdaStar,
    PeaStar,
    LayeredAStar,
}

impl AliasTable for Algorithm {
    const CATEGORY: &'static str = "alg";
    const ALIASES: &'static [(&'static str, Self)] = &[
        ("a", Algorithm::AStar),
        ("astar", Algorithm::AStar),
        ("ida", Algorithm::IdaStar),
        ("idastar", Algorithm::IdaStar),
        ("pea", Algorithm::PeaStar),
        ("peastar", Algorithm::PeaStar),
        ("layer", Algorithm::LayeredAStar),
        ("layered", Algorithm::LayeredAStar),
        ("layeredastar", Algorithm::LayeredAStar),
    ];

    fn symbol(&self) -> &'static str {
        match self {
            Algorithm::AStar => "AlgAStar",
            Algorithm::IdaStar => "AlgIDAStar",
            Algorithm::PeaStar => "AlgPEAStar",
            Algorithm::LayeredAStar => "AlgLayeredAStar",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Algorithm::AStar => "A*",
            Algorithm::IdaStar => "IDA*",
            Algorithm::PeaStar => "Partial Expansion A*",
            Algorithm::LayeredAStar => "Layered A*",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Heuristic {
    AllFinalStates,
    OneFinalState,
}

impl AliasTable for Heuristic {
    const CATEGORY: &'static str = "heu";
    const ALIASES: &'static [(&'static str, Self)] = &[
        ("afs", Heuristic::AllFinalStates),
        ("allfinalstates", Heuristic::AllFinalStates),
        ("ofs", Heuristic::OneFinalState),
        ("onefinalstate", Heuristic::OneFinalState),
    ];

    fn symbol(&self) -> &'static str {
        match self {
            Heuristic::AllFinalStates => "HeuAllFinalStates",
            Heuristic::OneFinalState => "HeuOneFinalState",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Heuristic::AllFinalStates => "All Final States",
            Heuristic::OneFinalState => "One Final State",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum TieBreaking {
    H,
    GoalCount,
    GoalCountH,
    HGoalCount,
    FillOrder,
    NumberRealizablePaths,
    None,
}

impl AliasTable for TieBreaking {
    const CATEGORY: &'static str = "tb";
    const ALIASES: &'static [(&'static str, Self)] = &[
        ("h", TieBreaking::H),
        ("gc", TieBreaking::GoalCount),
        ("goalcount", TieBreaking::GoalCount),
        ("gch", TieBreaking::GoalCountH),
        ("goalcounth", TieBreaking::GoalCountH),
        ("hgc", TieBreaking::HGoalCount),
        ("hgoalcount", TieBreaking::HGoalCount),
        ("fo", TieBreaking::FillOrder),
        ("fillorder", TieBreaking::FillOrder),
        ("nrp", TieBreaking::NumberRealizablePaths),
        ("numrealizablepaths", TieBreaking::NumberRealizablePaths),
        ("none", TieBreaking::None),
    ];

    fn symbol(&self) -> &'static str {
        match self {
            TieBreaking::H => "TBH",
            TieBreaking::GoalCount => "TBGoalCount",
            TieBreaking::GoalCountH => "TBGoalCountH",
            TieBreaking::HGoalCount => "TBHGoalCount",
            TieBreaking::FillOrder => "TBFillOrder",
            TieBreaking::NumberRealizablePaths => "TBNumberRealizablePaths",
            TieBreaking::None => "None",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TieBreaking::H => "h",
            TieBreaking::GoalCount => "Goal Count",
            TieBreaking::GoalCountH => "Goal Count - h",
            TieBreaking::HGoalCount => "h - Goal Count",
            TieBreaking::FillOrder => "Fill Order",
            TieBreaking::NumberRealizablePaths => "Number of Realizable Paths",
            TieBreaking::None => "None",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum PdbStrategy {
    Static,
    Dynamic,
    MultiGoal,
    None,
}

impl AliasTable for PdbStrategy {
    const CATEGORY: &'static str = "pdb";
    const ALIASES: &'static [(&'static str, Self)] = &[
        ("static", PdbStrategy::Static),
        ("dynamic", PdbStrategy::Dynamic),
        ("multigoal", PdbStrategy::MultiGoal),
        ("none", PdbStrategy::None),
    ];

    fn symbol(&self) -> &'static str {
        match self {
            PdbStrategy::Static => "PDBStatic",
            PdbStrategy::Dynamic => "PDBDynamic",
            PdbStrategy::MultiGoal => "PDBMultiGoal",
            PdbStrategy::None => "None",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PdbStrategy::Static => "Static",
            PdbStrategy::Dynamic => "Dynamic",
            PdbStrategy::MultiGoal => "Multi-goal",
            PdbStrategy::None => "None",
        }
    }
}

/// How the solver picks partitions when several random static PDBs are built.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum RandomStaticPdb {
    /// Random partitions minimizing inter-group distance.
    Greedy,
    /// One greedy partition, the rest fully random.
    Random,
}

impl AliasTable for RandomStaticPdb {
    const CATEGORY: &'static str = "randomstatic";
    const ALIASES: &'static [(&'static str, Self)] = &[
        ("greedy", RandomStaticPdb::Greedy),
        ("random", RandomStaticPdb::Random),
    ];

    fn symbol(&self) -> &'static str {
        match self {
            RandomStaticPdb::Greedy => "RandomStaticPDBGreedy",
            RandomStaticPdb::Random => "RandomStaticPDBRandom",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            RandomStaticPdb::Greedy => "Random Static PDB Greedy",
            RandomStaticPdb::Random => "Random Static PDB Random",
        }
    }
}

macro_rules! display_as_label {
    ($($ty:ty),* $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.label())
                }
            }
        )*
    };
}

display_as_label!(Algorithm, Heuristic, TieBreaking, PdbStrategy, RandomStaticPdb);
