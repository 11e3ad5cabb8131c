//! Blocking simulator invocation through `subprocess`.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use subprocess::{ExitStatus, Popen, PopenConfig, PopenError, Redirection};

use crate::config::SimulatorConfig;
use crate::utils::binary::{validate_program, BinaryError};

use super::command::build_args;
use super::{Invocation, Simulator, SimulatorError, TrialStatus};

/// Simulator output (stdout and stderr) is kept next to the captures
pub const SIMULATOR_LOG: &str = "simulator.log";

/// Runs the simulator as an external process, one trial at a time
#[derive(Debug, Clone)]
pub struct ProcessSimulator {
    program: PathBuf,
    config: SimulatorConfig,
}

impl ProcessSimulator {
    /// Resolve and validate the configured program
    pub fn new(config: &SimulatorConfig) -> Result<Self, BinaryError> {
        let program = validate_program(&config.program)?;
        log::info!("Using simulator program {}", program.display());
        Ok(Self {
            program,
            config: config.clone(),
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn describe_exit(status: ExitStatus) -> TrialStatus {
        match status {
            ExitStatus::Exited(0) => TrialStatus::Completed,
            ExitStatus::Exited(code) => TrialStatus::Exited {
                detail: format!("exit code {}", code),
            },
            ExitStatus::Signaled(signal) => TrialStatus::Exited {
                detail: format!("killed by signal {}", signal),
            },
            other => TrialStatus::Exited {
                detail: format!("{:?}", other),
            },
        }
    }
}

impl Simulator for ProcessSimulator {
    fn run(&self, invocation: &Invocation) -> Result<TrialStatus, SimulatorError> {
        let args = build_args(
            &self.config,
            &invocation.params,
            invocation.seed,
            &invocation.output_dir,
        );
        log::debug!("{} {}", self.program.display(), args.join(" "));

        let log_path = invocation.output_dir.join(SIMULATOR_LOG);
        let log_file = File::create(&log_path).map_err(|source| SimulatorError::Io {
            path: log_path.clone(),
            source,
        })?;

        let mut argv: Vec<OsString> = vec![self.program.clone().into_os_string()];
        argv.extend(args.iter().map(OsString::from));

        // The simulator (waf) forks the scenario binary; a fresh process
        // group lets a timeout reach both
        #[allow(unused_mut)]
        let mut popen_config = PopenConfig {
            stdout: Redirection::File(log_file),
            stderr: Redirection::Merge,
            cwd: self
                .config
                .output_dir_flag
                .is_none()
                .then(|| invocation.output_dir.clone().into_os_string()),
            ..Default::default()
        };
        #[cfg(unix)]
        {
            popen_config.setpgid = true;
        }

        let mut process = match Popen::create(&argv, popen_config) {
            Ok(process) => process,
            Err(PopenError::IoError(source))
                if matches!(source.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) =>
            {
                return Err(SimulatorError::Unavailable {
                    program: self.program.clone(),
                    source,
                });
            }
            Err(e) => {
                return Ok(TrialStatus::LaunchFailed {
                    reason: e.to_string(),
                })
            }
        };

        match process.wait_timeout(self.config.timeout) {
            Ok(Some(status)) => Ok(Self::describe_exit(status)),
            Ok(None) => {
                log::warn!(
                    "Simulator exceeded {:?} for seed {}, killing it",
                    self.config.timeout,
                    invocation.seed
                );
                if let Err(e) = kill_process_group(&mut process) {
                    log::warn!("Failed to kill simulator process: {}", e);
                }
                let _ = process.wait();
                Ok(TrialStatus::TimedOut {
                    after_secs: self.config.timeout.as_secs_f64(),
                })
            }
            Err(e) => {
                let _ = kill_process_group(&mut process);
                let _ = process.wait();
                Ok(TrialStatus::LaunchFailed {
                    reason: format!("failed to wait for simulator: {}", e),
                })
            }
        }
    }
}

/// Kill the simulator and everything it spawned
#[cfg(unix)]
fn kill_process_group(process: &mut Popen) -> io::Result<()> {
    use subprocess::unix::PopenExt;

    process
        .send_signal_group(libc::SIGKILL)
        .or_else(|_| process.kill())
}

#[cfg(not(unix))]
fn kill_process_group(process: &mut Popen) -> io::Result<()> {
    process.kill()
}
