//! Keeps the machine awake while a session runs.
//!
//! A suspended machine misses polls, so a session holds an OS sleep
//! inhibitor: `caffeinate` on macOS, `systemd-inhibit` on Linux. The helper
//! process lives until the inhibitor is released or dropped.

use std::io;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

const CAFFEINATE_ARGS: &[&str] = &["-di"];

const SYSTEMD_INHIBIT_ARGS: &[&str] = &[
    "--what=idle:sleep",
    "--who=fwatch",
    "--why=Monitoring follower count",
    "--mode=block",
    "sleep",
    "infinity",
];

/// A running sleep-inhibitor process.
#[derive(Debug)]
pub struct SleepInhibitor {
    program: String,
    child: Child,
}

impl SleepInhibitor {
    /// Program and arguments that inhibit sleep on this platform.
    pub fn platform_command() -> Option<(&'static str, &'static [&'static str])> {
        if cfg!(target_os = "macos") {
            Some(("caffeinate", CAFFEINATE_ARGS))
        } else if cfg!(target_os = "linux") {
            Some(("systemd-inhibit", SYSTEMD_INHIBIT_ARGS))
        } else {
            None
        }
    }

    /// Starts the platform inhibitor, or returns `Ok(None)` when this
    /// platform has none.
    pub fn for_platform() -> io::Result<Option<Self>> {
        match Self::platform_command() {
            Some((program, args)) => Self::spawn(program, args).map(Some),
            None => Ok(None),
        }
    }

    /// Starts `program` as the inhibitor. It is killed when the returned
    /// value is released or dropped.
    pub fn spawn(program: &str, args: &[&str]) -> io::Result<Self> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        debug!(program, pid = ?child.id(), "Sleep inhibitor started");
        Ok(Self {
            program: program.to_string(),
            child,
        })
    }

    /// OS process id, while the process has not been reaped.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Stops the inhibitor and waits for it to exit.
    pub async fn release(mut self) {
        if let Err(e) = self.child.kill().await {
            warn!("Failed to stop sleep inhibitor {}: {}", self.program, e);
        } else {
            debug!(program = %self.program, "Sleep inhibitor stopped");
        }
    }
}
