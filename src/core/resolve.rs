//! Turns [`RawOptions`] into [`RunOptions`]: every alias goes through its
//! table in [`crate::types`], then the cross-option constraints are checked.
use crate::core::params::{RawOptions, RunOptions};
use crate::error::{Error, Result};
use crate::types::{AliasTable, Algorithm, Heuristic, PdbStrategy, RandomStaticPdb, TieBreaking};

pub fn resolve(raw: &RawOptions) -> Result<RunOptions> {
    if raw.numstatic == 0 {
        return Err(Error::InvalidArgument {
            arg: "numstatic",
            value: raw.numstatic.to_string(),
        });
    }

    let options = RunOptions {
        memory_limit_mb: raw.memory,
        time_limit_secs: raw.time,
        algorithm: Algorithm::from_alias(&raw.alg)?,
        heuristic: Heuristic::from_alias(&raw.heu)?,
        tie_breaking: TieBreaking::from_alias(&raw.tb)?,
        pdb: PdbStrategy::from_alias(&raw.pdb)?,
        random_static_pdb: RandomStaticPdb::from_alias(&raw.randomstatic)?,
        seed: raw.seed,
        num_random_static_pdbs: raw.numstatic,
        silent: raw.silent,
        print_path: raw.path,
        print_initial_heuristic: raw.initial,
        build_only: raw.build,
        jobs: raw.nproc,
        ndebug: raw.ndebug,
    };

    check_compatibility(&options)?;
    Ok(options)
}

/// The One Final State heuristic is only implemented for IDA* and Layered A*.
pub fn check_compatibility(options: &RunOptions) -> Result<()> {
    if options.heuristic == Heuristic::OneFinalState
        && matches!(options.algorithm, Algorithm::AStar | Algorithm::PeaStar)
    {
        return Err(Error::InvalidOptionCombination {
            heuristic: options.heuristic.label(),
            algorithm: options.algorithm.label(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(alg: &str, heu: &str) -> RawOptions {
        RawOptions {
            alg: alg.to_string(),
            heu: heu.to_string(),
            ..RawOptions::default()
        }
    }

    #[test]
    fn defaults_resolve() {
        let options = resolve(&RawOptions::default()).unwrap();
        assert_eq!(options, RunOptions::default());
    }

    #[test]
    fn resolves_every_category() {
        let options = resolve(&RawOptions {
            alg: "ida".into(),
            heu: "ofs".into(),
            tb: "nrp".into(),
            pdb: "multigoal".into(),
            randomstatic: "random".into(),
            seed: 42,
            numstatic: 3,
            path: true,
            nproc: 8,
            ..RawOptions::default()
        })
        .unwrap();
        assert_eq!(options.algorithm, Algorithm::IdaStar);
        assert_eq!(options.heuristic, Heuristic::OneFinalState);
        assert_eq!(options.tie_breaking, TieBreaking::NumberRealizablePaths);
        assert_eq!(options.pdb, PdbStrategy::MultiGoal);
        assert_eq!(options.random_static_pdb, RandomStaticPdb::Random);
        assert_eq!(options.seed, 42);
        assert_eq!(options.num_random_static_pdbs, 3);
        assert!(options.print_path);
        assert_eq!(options.jobs, 8);
    }

    #[test]
    fn one_final_state_rejects_astar_variants() {
        for alg in ["a", "astar", "pea", "peastar"] {
            let err = resolve(&raw(alg, "ofs")).unwrap_err();
            assert!(
                matches!(err, Error::InvalidOptionCombination { .. }),
                "{alg}: {err}"
            );
        }
    }

    #[test]
    fn one_final_state_accepts_ida_and_layered() {
        for alg in ["ida", "idastar", "layer", "layered", "layeredastar"] {
            assert!(resolve(&raw(alg, "onefinalstate")).is_ok(), "{alg}");
        }
    }

    #[test]
    fn all_final_states_accepts_every_algorithm() {
        for (alias, _) in Algorithm::ALIASES {
            assert!(resolve(&raw(alias, "afs")).is_ok(), "{alias}");
        }
    }

    #[test]
    fn combination_check_ignores_other_options() {
        let options = RunOptions {
            heuristic: Heuristic::OneFinalState,
            algorithm: Algorithm::AStar,
            pdb: PdbStrategy::None,
            tie_breaking: TieBreaking::None,
            silent: true,
            ..RunOptions::default()
        };
        assert!(check_compatibility(&options).is_err());
    }

    #[test]
    fn unknown_alias_names_its_category() {
        let err = resolve(&RawOptions {
            tb: "random".into(),
            ..RawOptions::default()
        })
        .unwrap_err();
        match err {
            Error::UnknownAlias { category, alias } => {
                assert_eq!(category, "tb");
                assert_eq!(alias, "random");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_numstatic_is_rejected() {
        let err = resolve(&RawOptions {
            numstatic: 0,
            ..RawOptions::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "numstatic", .. }));
    }

    #[test]
    fn preset_fields_default_when_missing() {
        let raw: RawOptions = serde_json::from_str(r#"{"alg": "ida", "time": 120}"#).unwrap();
        assert_eq!(raw.alg, "ida");
        assert_eq!(raw.time, 120);
        assert_eq!(raw.memory, 500);
        assert_eq!(raw.randomstatic, "greedy");
    }
}
