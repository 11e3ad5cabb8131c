//! Sweep driver: runs every trial of every sweep point and aggregates them.
//!
//! Trials of one point are independent. Seeds are drawn from the context in
//! repeat order before any trial is dispatched, and each trial writes into its
//! own directory, so a parallel run reproduces the sequential one exactly.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::capture::{adversary_indices, evaluate, CaptureWindow, NodeRole, TrialOutcome};
use crate::config::{Config, FailurePolicy, ValidationError};
use crate::simulator::{Invocation, Simulator, SimulatorError};

use super::aggregate::aggregate;
use super::types::*;

/// Errors that abort a sweep
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Simulator(#[from] SimulatorError),

    #[error("Failed to prepare trial directory {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build trial worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Mutable state threaded through a sweep: the seed cursor and the partial
/// result table
#[derive(Debug)]
pub struct SweepContext {
    seed: u64,
    state: PointState,
    results: Vec<PointResult>,
}

impl SweepContext {
    pub fn new(start_seed: u64) -> Self {
        Self {
            seed: start_seed,
            state: PointState::Aggregated,
            results: Vec::new(),
        }
    }

    /// Advance the cursor and return the new seed; seeds are never reused
    pub fn next_seed(&mut self) -> u64 {
        self.seed += 1;
        self.seed
    }

    /// Last seed handed out (the starting seed before any trial)
    pub fn current_seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> PointState {
        self.state
    }

    /// Points aggregated so far
    pub fn results(&self) -> &[PointResult] {
        &self.results
    }

    /// Start a new sweep on this context. A sweep aborted by an error may
    /// have left the point state mid-trial.
    fn begin(&mut self) -> usize {
        if self.state != PointState::Aggregated {
            log::debug!("Discarding interrupted sweep point in state {:?}", self.state);
            self.state = PointState::Aggregated;
        }
        self.results.len()
    }

    fn advance(&mut self, next: PointState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal sweep state transition {:?} -> {:?}",
            self.state,
            next
        );
        log::trace!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// A trial whose seed and directory are fixed but which has not run yet
#[derive(Debug, Clone)]
struct PlannedTrial {
    repeat: u32,
    invocation: Invocation,
}

/// Enumerate the sweep points of a configuration
pub fn sweep_points(config: &Config) -> Vec<SweepPoint> {
    config
        .sweep
        .values
        .points()
        .into_iter()
        .enumerate()
        .map(|(index, value)| SweepPoint {
            index,
            value,
            params: config.sweep.dimension.apply(&config.parameters, value),
        })
        .collect()
}

/// Run the whole sweep described by `config`.
///
/// Failed trials never abort the sweep; only a simulator that cannot be
/// started at all, or an unusable output directory, does.
pub fn run_sweep(
    config: &Config,
    simulator: &dyn Simulator,
    ctx: &mut SweepContext,
) -> Result<SweepResult, SweepError> {
    config.validate()?;
    let first_result = ctx.begin();

    let points = sweep_points(config);
    let trials_root = config.output.directory.join("trials");
    create_dir(&trials_root)?;

    let pool = if config.sweep.workers > 1 {
        log::info!("Running up to {} trials concurrently", config.sweep.workers);
        Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(config.sweep.workers)
                .build()?,
        )
    } else {
        None
    };

    log::info!(
        "Sweeping {} over {} points, {} repeats each, starting seed {}",
        config.sweep.dimension.slug(),
        points.len(),
        config.sweep.repeats,
        ctx.current_seed()
    );

    for point in &points {
        ctx.advance(PointState::Pending);
        log::info!(
            "Sweep point {}/{}: {} = {}",
            point.index + 1,
            points.len(),
            config.sweep.dimension.slug(),
            point.value
        );

        let point_dir = trials_root.join(point.label(config.sweep.dimension));
        let mut planned: Vec<PlannedTrial> = (0..config.sweep.repeats)
            .map(|repeat| plan_trial(ctx, point, repeat, &point_dir))
            .collect();

        let mut trials: Vec<Trial> = Vec::new();
        let mut replacements_left = match config.sweep.failed_trials {
            FailurePolicy::Replace => config.sweep.max_replacements,
            _ => 0,
        };

        loop {
            let batch = run_batch(&planned, point, config, simulator, pool.as_ref(), ctx)?;
            let failures = batch.iter().filter(|t| !t.is_success()).count() as u32;
            trials.extend(batch);

            if failures == 0 || replacements_left == 0 {
                break;
            }
            let replacements = failures.min(replacements_left);
            replacements_left -= replacements;
            log::info!(
                "Replacing {} failed trial(s) with fresh seeds ({} replacements left)",
                replacements,
                replacements_left
            );
            let next_repeat = trials.len() as u32;
            planned = (0..replacements)
                .map(|k| plan_trial(ctx, point, next_repeat + k, &point_dir))
                .collect();
        }

        let result = summarize_point(point, trials, config);
        match result.metric {
            Some(metric) => log::info!(
                "{} = {}: {} = {:.2} ({} of {} trials completed, {} captured)",
                config.sweep.dimension.slug(),
                point.value,
                config.metric.label(),
                metric,
                result.completed,
                result.attempted,
                result.captured
            ),
            None => log::warn!(
                "{} = {}: no data ({} of {} trials completed)",
                config.sweep.dimension.slug(),
                point.value,
                result.completed,
                result.attempted
            ),
        }

        ctx.advance(PointState::Aggregated);
        ctx.results.push(result);
    }

    Ok(SweepResult {
        dimension: config.sweep.dimension,
        metric: config.metric,
        points: ctx.results[first_result..].to_vec(),
    })
}

fn plan_trial(ctx: &mut SweepContext, point: &SweepPoint, repeat: u32, point_dir: &Path) -> PlannedTrial {
    let seed = ctx.next_seed();
    PlannedTrial {
        repeat,
        invocation: Invocation {
            params: point.params.clone(),
            seed,
            output_dir: point_dir.join(format!("seed-{}", seed)),
        },
    }
}

fn run_batch(
    planned: &[PlannedTrial],
    point: &SweepPoint,
    config: &Config,
    simulator: &dyn Simulator,
    pool: Option<&rayon::ThreadPool>,
    ctx: &mut SweepContext,
) -> Result<Vec<Trial>, SweepError> {
    match pool {
        Some(pool) if planned.len() > 1 => {
            let trials: Vec<Trial> = pool.install(|| {
                planned
                    .par_iter()
                    .map(|p| run_trial(p, point, config, simulator))
                    .collect::<Result<Vec<_>, _>>()
            })?;
            // Concurrent trials are recorded in repeat order once the batch is done
            for trial in &trials {
                ctx.advance(PointState::Running { trial: trial.repeat });
                ctx.advance(PointState::Evaluated { trial: trial.repeat });
            }
            Ok(trials)
        }
        _ => {
            let mut trials = Vec::with_capacity(planned.len());
            for p in planned {
                ctx.advance(PointState::Running { trial: p.repeat });
                trials.push(run_trial(p, point, config, simulator)?);
                ctx.advance(PointState::Evaluated { trial: p.repeat });
            }
            Ok(trials)
        }
    }
}

fn run_trial(
    planned: &PlannedTrial,
    point: &SweepPoint,
    config: &Config,
    simulator: &dyn Simulator,
) -> Result<Trial, SweepError> {
    let invocation = &planned.invocation;
    let dir = &invocation.output_dir;

    // Stale captures from an earlier run with the same seed must not be read
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|source| SweepError::Io {
            path: dir.clone(),
            source,
        })?;
    }
    create_dir(dir)?;

    let params = &invocation.params;
    let layout = &config.evaluation.captures;
    let base_index = params.adversary_base_index();
    let capture_files: Vec<PathBuf> = adversary_indices(base_index, params.adversary_nodes)
        .map(|index| layout.path(dir, NodeRole::Adversary, index))
        .collect();

    log::debug!("Trial {} of point {}: seed {}", planned.repeat, point.index, invocation.seed);
    let status = simulator.run(invocation)?;

    let outcome = if status.is_success() {
        let window = CaptureWindow::new(params.total_time, config.evaluation.capture_margin);
        let outcome = evaluate(dir, layout, base_index, params.adversary_nodes, window);
        log::debug!(
            "Seed {}: {} packets at the adversary, last at {:.3}s, captured = {}",
            invocation.seed,
            outcome.total_packets,
            outcome.last_timestamp,
            outcome.captured
        );
        Some(outcome)
    } else {
        log::warn!("Seed {}: trial failed: {:?}", invocation.seed, status);
        None
    };

    if !config.output.keep_trial_output {
        if let Err(e) = fs::remove_dir_all(dir) {
            log::warn!("Failed to remove trial directory {}: {}", dir.display(), e);
        }
    }

    Ok(Trial {
        point_index: point.index,
        repeat: planned.repeat,
        seed: invocation.seed,
        output_dir: dir.clone(),
        capture_files,
        status,
        outcome,
    })
}

/// Fold the trials of one point into its result row
fn summarize_point(point: &SweepPoint, trials: Vec<Trial>, config: &Config) -> PointResult {
    let completed = trials.iter().filter(|t| t.is_success()).count() as u32;
    let attempted = trials.len() as u32;

    let outcomes: Vec<TrialOutcome> = trials
        .iter()
        .filter_map(|t| match (&t.outcome, config.sweep.failed_trials) {
            (Some(outcome), _) => Some(outcome.clone()),
            (None, FailurePolicy::CountAsMiss) => Some(TrialOutcome::miss()),
            (None, _) => None,
        })
        .collect();

    // A point without a single completed trial has no data, whatever the policy
    let metric = if completed == 0 {
        None
    } else {
        aggregate(&outcomes, &config.metric)
    };

    PointResult {
        value: point.value,
        metric,
        attempted,
        completed,
        failed: attempted - completed,
        captured: outcomes.iter().filter(|o| o.captured).count() as u32,
        total_packets: outcomes.iter().map(|o| o.total_packets).sum(),
        trials,
    }
}

fn create_dir(path: &Path) -> Result<(), SweepError> {
    fs::create_dir_all(path).map_err(|source| SweepError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::testutil::write_timestamps;
    use crate::capture::CaptureLayout;
    use crate::config::{MetricConfig, SweepDimension, SweepValues, TimeFilter};
    use crate::simulator::TrialStatus;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Writes adversary captures according to a per-seed script
    struct ScriptedSimulator {
        behaviour: Box<dyn Fn(&Invocation) -> Scripted + Send + Sync>,
        seeds: Mutex<Vec<u64>>,
    }

    enum Scripted {
        /// Last adversary packet at this time
        Capture(f64),
        /// Empty adversary captures
        Quiet,
        /// Exit without writing anything
        NoFiles,
        Fail,
    }

    impl ScriptedSimulator {
        fn new(behaviour: impl Fn(&Invocation) -> Scripted + Send + Sync + 'static) -> Self {
            Self {
                behaviour: Box::new(behaviour),
                seeds: Mutex::new(Vec::new()),
            }
        }

        fn seeds(&self) -> Vec<u64> {
            self.seeds.lock().unwrap().clone()
        }
    }

    impl Simulator for ScriptedSimulator {
        fn run(&self, invocation: &Invocation) -> Result<TrialStatus, SimulatorError> {
            self.seeds.lock().unwrap().push(invocation.seed);
            let layout = CaptureLayout::default();
            let base = invocation.params.adversary_base_index();
            let adversaries = adversary_indices(base, invocation.params.adversary_nodes);
            match (self.behaviour)(invocation) {
                Scripted::Capture(at) => {
                    for index in adversaries {
                        let path = layout.path(&invocation.output_dir, NodeRole::Adversary, index);
                        write_timestamps(&path, &[at / 2.0, at]);
                    }
                    Ok(TrialStatus::Completed)
                }
                Scripted::Quiet => {
                    for index in adversaries {
                        let path = layout.path(&invocation.output_dir, NodeRole::Adversary, index);
                        write_timestamps(&path, &[]);
                    }
                    Ok(TrialStatus::Completed)
                }
                Scripted::NoFiles => Ok(TrialStatus::Completed),
                Scripted::Fail => Ok(TrialStatus::Exited {
                    detail: "exit code 1".to_string(),
                }),
            }
        }
    }

    struct MissingSimulator;

    impl Simulator for MissingSimulator {
        fn run(&self, _invocation: &Invocation) -> Result<TrialStatus, SimulatorError> {
            Err(SimulatorError::Unavailable {
                program: PathBuf::from("./waf"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    fn test_config(output: &Path, values: SweepValues, repeats: u32) -> Config {
        let yaml = r#"
simulator:
  program: ./waf
parameters:
  protocol: flooding
  nodes: 75
  adversary_nodes: 2
  total_time: 200
  send_start: 10
  transmit_power: -4
  deltax: 25
  deltay: 25
  node_speed: 4
  mobility_model: mobile
sweep:
  dimension: node_speed
  values: [1]
  repeats: 1
"#;
        let mut config: Config = serde_yaml::from_str(yaml).unwrap();
        config.sweep.values = values;
        config.sweep.repeats = repeats;
        config.output.directory = output.to_path_buf();
        config
    }

    #[test]
    fn test_one_entry_per_sweep_point() {
        let dir = TempDir::new().unwrap();
        let config = test_config(
            dir.path(),
            SweepValues::Range {
                start: 0.5,
                stop: 2.0,
                step: 0.5,
            },
            3,
        );
        let sim = ScriptedSimulator::new(|_| Scripted::Capture(42.0));

        let result = run_sweep(&config, &sim, &mut SweepContext::new(50)).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(
            result.series(),
            vec![(0.5, Some(100.0)), (1.0, Some(100.0)), (1.5, Some(100.0))]
        );
        assert_eq!(result.total_trials(), 9);
        // Three trials, two adversaries, two packets each
        assert_eq!(result.points[0].total_packets, 12);
    }

    #[test]
    fn test_seeds_are_monotonic_and_reproducible() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), SweepValues::List(vec![1.0, 2.0]), 4);

        let first = ScriptedSimulator::new(|_| Scripted::Quiet);
        let mut ctx = SweepContext::new(50);
        run_sweep(&config, &first, &mut ctx).unwrap();
        assert_eq!(first.seeds(), (51..=58).collect::<Vec<u64>>());
        assert_eq!(ctx.current_seed(), 58);
        assert_eq!(ctx.state(), PointState::Aggregated);

        let second = ScriptedSimulator::new(|_| Scripted::Quiet);
        run_sweep(&config, &second, &mut SweepContext::new(50)).unwrap();
        assert_eq!(first.seeds(), second.seeds());
    }

    #[test]
    fn test_sixty_percent_capture_ratio() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), SweepValues::List(vec![2.0]), 10);
        // Seeds 51..=60; the first six capture
        let sim = ScriptedSimulator::new(|inv| {
            if inv.seed <= 56 {
                Scripted::Capture(80.0)
            } else {
                Scripted::Capture(199.5)
            }
        });

        let result = run_sweep(&config, &sim, &mut SweepContext::new(50)).unwrap();
        assert_eq!(result.points[0].metric, Some(60.0));
        assert_eq!(result.points[0].captured, 6);
    }

    #[test]
    fn test_failed_trials_are_skipped() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), SweepValues::List(vec![1.0]), 10);
        // Three failures, and one of the seven completed trials captures
        let sim = ScriptedSimulator::new(|inv| match inv.seed {
            52 | 55 | 58 => Scripted::Fail,
            51 => Scripted::Capture(30.0),
            _ => Scripted::Quiet,
        });

        let result = run_sweep(&config, &sim, &mut SweepContext::new(50)).unwrap();
        let point = &result.points[0];
        assert_eq!(point.attempted, 10);
        assert_eq!(point.completed, 7);
        assert_eq!(point.failed, 3);
        assert_eq!(point.metric, Some(100.0 / 7.0));
    }

    #[test]
    fn test_count_as_miss_policy() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(dir.path(), SweepValues::List(vec![1.0]), 4);
        config.sweep.failed_trials = FailurePolicy::CountAsMiss;
        let sim = ScriptedSimulator::new(|inv| match inv.seed {
            51 => Scripted::Fail,
            _ => Scripted::Capture(20.0),
        });

        let result = run_sweep(&config, &sim, &mut SweepContext::new(50)).unwrap();
        assert_eq!(result.points[0].metric, Some(75.0));
    }

    #[test]
    fn test_replace_policy_uses_fresh_seeds() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(dir.path(), SweepValues::List(vec![1.0, 2.0]), 3);
        config.sweep.failed_trials = FailurePolicy::Replace;
        config.sweep.max_replacements = 1;
        let sim = ScriptedSimulator::new(|inv| match inv.seed {
            52 | 53 => Scripted::Fail,
            _ => Scripted::Capture(20.0),
        });

        let result = run_sweep(&config, &sim, &mut SweepContext::new(50)).unwrap();
        let first = &result.points[0];
        // 51 ok, 52 and 53 fail, one replacement (54) succeeds
        assert_eq!(first.attempted, 4);
        assert_eq!(first.completed, 2);
        assert_eq!(first.trials[3].seed, 54);
        assert_eq!(first.trials[3].repeat, 3);
        assert_eq!(first.metric, Some(100.0));

        // The second point continues after the replacement seed
        let seeds: Vec<u64> = result.points[1].trials.iter().map(|t| t.seed).collect();
        assert_eq!(seeds, vec![55, 56, 57]);

        let unique: HashSet<u64> = sim.seeds().into_iter().collect();
        assert_eq!(unique.len(), sim.seeds().len());
    }

    #[test]
    fn test_all_failures_is_no_data() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(dir.path(), SweepValues::List(vec![1.0, 2.0]), 3);
        config.sweep.failed_trials = FailurePolicy::CountAsMiss;
        let sim = ScriptedSimulator::new(|inv| {
            if inv.params.node_speed == Some(1.0) {
                Scripted::Fail
            } else {
                Scripted::Quiet
            }
        });

        let result = run_sweep(&config, &sim, &mut SweepContext::new(50)).unwrap();
        assert_eq!(result.points[0].metric, None);
        assert_eq!(result.points[1].metric, Some(0.0));
    }

    #[test]
    fn test_missing_captures_are_negative_evidence() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), SweepValues::List(vec![3.0]), 5);
        let sim = ScriptedSimulator::new(|_| Scripted::NoFiles);

        let result = run_sweep(&config, &sim, &mut SweepContext::new(50)).unwrap();
        let point = &result.points[0];
        assert_eq!(point.metric, Some(0.0));
        for trial in &point.trials {
            let outcome = trial.outcome.as_ref().unwrap();
            assert!(!outcome.captured);
            assert_eq!(outcome.total_packets, 0);
            assert_eq!(outcome.missing_files, 2);
        }
    }

    #[test]
    fn test_unavailable_simulator_aborts() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), SweepValues::List(vec![1.0, 2.0]), 5);

        let err = run_sweep(&config, &MissingSimulator, &mut SweepContext::new(50)).unwrap_err();
        assert!(matches!(
            err,
            SweepError::Simulator(SimulatorError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_reused_context_returns_only_its_own_points() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), SweepValues::List(vec![1.0, 2.0]), 2);
        let sim = ScriptedSimulator::new(|_| Scripted::Quiet);
        let mut ctx = SweepContext::new(50);

        let first = run_sweep(&config, &sim, &mut ctx).unwrap();
        let second = run_sweep(&config, &sim, &mut ctx).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(ctx.results().len(), 4);

        // The cursor carries on, so the second sweep uses fresh seeds
        assert_eq!(second.points[0].trials[0].seed, 55);
        assert_eq!(ctx.current_seed(), 58);
    }

    #[test]
    fn test_context_recovers_after_aborted_sweep() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), SweepValues::List(vec![1.0, 2.0]), 3);
        let mut ctx = SweepContext::new(50);

        assert!(run_sweep(&config, &MissingSimulator, &mut ctx).is_err());
        assert_eq!(ctx.state(), PointState::Running { trial: 0 });

        let sim = ScriptedSimulator::new(|_| Scripted::Capture(20.0));
        let result = run_sweep(&config, &sim, &mut ctx).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.series(), vec![(1.0, Some(100.0)), (2.0, Some(100.0))]);
        assert_eq!(ctx.state(), PointState::Aggregated);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let behaviour = |inv: &Invocation| {
            if inv.seed % 3 == 0 {
                Scripted::Fail
            } else if inv.seed % 2 == 0 {
                Scripted::Capture(inv.seed as f64)
            } else {
                Scripted::Quiet
            }
        };

        let seq_dir = TempDir::new().unwrap();
        let mut config = test_config(seq_dir.path(), SweepValues::List(vec![1.0, 2.0]), 6);
        config.metric = MetricConfig::MeanCaptureTime {
            include: TimeFilter::Observed,
        };
        let sequential =
            run_sweep(&config, &ScriptedSimulator::new(behaviour), &mut SweepContext::new(50)).unwrap();

        let par_dir = TempDir::new().unwrap();
        config.output.directory = par_dir.path().to_path_buf();
        config.sweep.workers = 4;
        let parallel =
            run_sweep(&config, &ScriptedSimulator::new(behaviour), &mut SweepContext::new(50)).unwrap();

        assert_eq!(sequential.series(), parallel.series());
        let seeds = |r: &SweepResult| -> Vec<u64> {
            r.points.iter().flat_map(|p| p.trials.iter().map(|t| t.seed)).collect()
        };
        assert_eq!(seeds(&sequential), seeds(&parallel));
    }

    #[test]
    fn test_trial_directories_are_removed_unless_kept() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(dir.path(), SweepValues::List(vec![1.0]), 2);
        let sim = ScriptedSimulator::new(|_| Scripted::Capture(10.0));

        let result = run_sweep(&config, &sim, &mut SweepContext::new(50)).unwrap();
        assert!(!result.points[0].trials[0].output_dir.exists());

        config.output.keep_trial_output = true;
        let result = run_sweep(&config, &sim, &mut SweepContext::new(50)).unwrap();
        let trial = &result.points[0].trials[0];
        assert!(trial.output_dir.ends_with("trials/node_speed-1/seed-51"));
        assert!(trial.capture_files.iter().all(|f| f.exists()));
        assert_eq!(
            trial.capture_files[0].file_name().unwrap().to_str(),
            Some("advNode-75-0.pcap")
        );
    }

    #[test]
    fn test_node_count_sweep_moves_adversary_indices() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(dir.path(), SweepValues::List(vec![50.0, 100.0]), 1);
        config.sweep.dimension = SweepDimension::NodeCount;
        config.output.keep_trial_output = true;
        let sim = ScriptedSimulator::new(|_| Scripted::Capture(15.0));

        let result = run_sweep(&config, &sim, &mut SweepContext::new(0)).unwrap();
        assert_eq!(result.series(), vec![(50.0, Some(100.0)), (100.0, Some(100.0))]);
        let files = &result.points[1].trials[0].capture_files;
        assert!(files[0].ends_with("advNode-100-0.pcap"));
        assert!(files[1].ends_with("advNode-101-0.pcap"));
    }
}
