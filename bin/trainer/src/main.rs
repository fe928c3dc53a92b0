//! Thin CLI driver for the CFR solver core: reads a subgame JSON config,
//! trains one algorithm to a checkpoint schedule or target exploitability,
//! prints progress, and writes a strategy dump.

mod config;

use anyhow::{Context, Result};
use cfr_mccfr::{
    expand_mccfr_profile, exploitability_vector, MccfrConfig, MccfrTrainer, VectorCfrConfig, VectorCfrTrainer,
    VectorProfile,
};
use cfr_river::{RiverState, RiverTree};
use clap::{Parser, ValueEnum};
use config::{build_river_config, InfosetDump, PlayerDump, StrategyDumpFile, SubgameConfigFile};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algo {
    Cfr,
    #[value(name = "cfr+")]
    CfrPlus,
    Lcfr,
    Dcfr,
    Mccfr,
}

impl std::fmt::Display for Algo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Algo::Cfr => "cfr",
            Algo::CfrPlus => "cfr+",
            Algo::Lcfr => "lcfr",
            Algo::Dcfr => "dcfr",
            Algo::Mccfr => "mccfr",
        };
        write!(f, "{s}")
    }
}

/// Trains a counterfactual-regret-minimization solver over a river
/// subgame and reports its exploitability.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the subgame JSON config.
    #[arg(long)]
    config: PathBuf,

    /// Which update rule to train with.
    #[arg(long, value_enum)]
    algo: Algo,

    /// Where to write the trained strategy, as JSON.
    #[arg(long)]
    dump_strategy: Option<PathBuf>,

    /// Iteration counts at which to report exploitability, e.g. "50,100,500".
    #[arg(long, value_delimiter = ',')]
    checkpoints: Vec<usize>,

    /// Stop early once exploitability (in chips) falls at or below this.
    #[arg(long)]
    target_exp: Option<f64>,

    /// RNG seed for `--algo mccfr`.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.config).with_context(|| format!("reading {}", cli.config.display()))?;
    let file: SubgameConfigFile = serde_json::from_str(&text).context("parsing subgame config")?;
    let river_config = build_river_config(&file).map_err(|e| anyhow::anyhow!("invalid subgame config: {e}"))?;
    let pot = river_config.pot as f64;
    let tree = Rc::new(RiverTree::new(river_config));

    spawn_interrupt_reader();

    let mut checkpoints = cli.checkpoints.clone();
    checkpoints.sort_unstable();
    checkpoints.dedup();
    if checkpoints.is_empty() {
        checkpoints.push(1000);
    }

    let result = match cli.algo {
        Algo::Mccfr => run_mccfr(&tree, &checkpoints, cli.target_exp, pot, cli.seed),
        algo => run_vector(&tree, algo, &checkpoints, cli.target_exp, pot),
    };

    if let Some(path) = cli.dump_strategy {
        write_strategy_dump(&tree, &result, &path)?;
    }

    Ok(())
}

fn interrupt_flag_active() -> bool {
    cfr_core::interrupted()
}

/// Spawns the "press Q to stop" reader thread spec.md's concurrency model
/// calls for. Only the binary ever does this; library crates stay
/// single-threaded and merely poll [`cfr_core::interrupted`].
fn spawn_interrupt_reader() {
    let started = Arc::new(AtomicBool::new(false));
    let marker = started.clone();
    std::thread::spawn(move || {
        marker.store(true, Ordering::Relaxed);
        log::info!("press 'q' + enter to stop gracefully");
        let mut line = String::new();
        loop {
            line.clear();
            if std::io::stdin().read_line(&mut line).is_err() {
                return;
            }
            if line.trim().eq_ignore_ascii_case("q") {
                cfr_core::request_stop();
                return;
            }
        }
    });
}

fn print_progress(algo: Algo, epoch: usize, exp_chips: f64, pot: f64) {
    println!(
        "{algo}: Exploitability (chips): {exp_chips:.4} | Exploitability (% of pot): {:.4} [iteration {epoch}]",
        100.0 * exp_chips / pot
    );
}

fn run_vector(tree: &Rc<RiverTree>, algo: Algo, checkpoints: &[usize], target_exp: Option<f64>, pot: f64) -> VectorProfile {
    let config = match algo {
        Algo::Cfr => VectorCfrConfig::default(),
        Algo::CfrPlus => VectorCfrConfig {
            use_plus: true,
            ..VectorCfrConfig::default()
        },
        Algo::Lcfr => VectorCfrConfig {
            linear_weighting: true,
            ..VectorCfrConfig::default()
        },
        Algo::Dcfr => VectorCfrConfig {
            use_dcfr: true,
            ..VectorCfrConfig::default()
        },
        Algo::Mccfr => unreachable!("handled by run_mccfr"),
    };
    let mut trainer = VectorCfrTrainer::new(tree.clone(), config);

    let mut done = 0usize;
    for &checkpoint in checkpoints {
        if interrupt_flag_active() {
            break;
        }
        let step = checkpoint.saturating_sub(done);
        if step > 0 {
            trainer.run(step);
            done = checkpoint;
        }
        let profile = trainer.average_strategy_profile();
        let exp = exploitability_vector(tree, &profile, tree.config().pot as f32) as f64;
        print_progress(algo, done, exp, pot);
        if let Some(target) = target_exp {
            if exp <= target {
                break;
            }
        }
        if interrupt_flag_active() {
            break;
        }
    }
    trainer.average_strategy_profile()
}

fn run_mccfr(tree: &Rc<RiverTree>, checkpoints: &[usize], target_exp: Option<f64>, pot: f64, seed: u64) -> VectorProfile {
    let mut trainer = MccfrTrainer::new(tree.clone(), MccfrConfig::default());
    let mut rng = StdRng::seed_from_u64(seed);

    let mut done = 0usize;
    for &checkpoint in checkpoints {
        if interrupt_flag_active() {
            break;
        }
        let step = checkpoint.saturating_sub(done);
        if step > 0 {
            trainer.run(step, &mut rng);
            done = checkpoint;
        }
        let scalar_profile = trainer.average_strategy_profile();
        let profile = expand_mccfr_profile(tree, &scalar_profile);
        let exp = exploitability_vector(tree, &profile, tree.config().pot as f32) as f64;
        print_progress(Algo::Mccfr, done, exp, pot);
        if let Some(target) = target_exp {
            if exp <= target {
                break;
            }
        }
        if interrupt_flag_active() {
            break;
        }
    }
    expand_mccfr_profile(tree, &trainer.average_strategy_profile())
}

/// Every history key reachable from the root, alongside the action list
/// that produced its legal moves — the dump format needs real action
/// tokens (`c`, `b500`, …), not positional indices, and a [`VectorProfile`]
/// only carries probability rows.
fn history_key_actions(tree: &RiverTree) -> std::collections::HashMap<String, Vec<String>> {
    let mut out = std::collections::HashMap::new();
    fn walk(tree: &RiverTree, state: &RiverState, out: &mut std::collections::HashMap<String, Vec<String>>) {
        if tree.is_terminal(state) {
            return;
        }
        let actions = tree.legal_actions(state);
        let key = tree.history_key(state);
        out.entry(key)
            .or_insert_with(|| actions.iter().map(|a| a.to_string()).collect());
        for action in &actions {
            walk(tree, &tree.next_state(state, *action), out);
        }
    }
    walk(tree, &tree.initial_state(), &mut out);
    out
}

fn write_strategy_dump(tree: &RiverTree, profile: &VectorProfile, path: &PathBuf) -> Result<()> {
    let actions_by_key = history_key_actions(tree);

    let players = [0usize, 1].map(|player| {
        let range = &tree.config().ranges[player];
        let hands: Vec<String> = range.hands.iter().map(|h| h.hole.to_string()).collect();
        let weights = range.hands.iter().map(|h| h.weight).collect();

        let mut profile_map = std::collections::HashMap::new();
        for (key, rows) in profile {
            let actions = actions_by_key
                .get(key)
                .cloned()
                .unwrap_or_else(|| (0..rows.first().map(Vec::len).unwrap_or(0)).map(|i| i.to_string()).collect());
            profile_map.insert(key.clone(), InfosetDump { actions, strategy: rows.clone() });
        }
        PlayerDump {
            hands,
            weights,
            profile: profile_map,
        }
    });

    let dump = StrategyDumpFile { players };
    let json = serde_json::to_string_pretty(&dump).context("serializing strategy dump")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
