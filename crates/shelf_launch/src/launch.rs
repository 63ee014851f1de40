use std::{
    io,
    process::ExitStatus,
    sync::atomic::{AtomicBool, Ordering},
};

use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::plan::LaunchPlan;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Executable `{0}` not found.")]
    NotFound(String),
    #[error("Permission denied while running `{0}`.")]
    PermissionDenied(String),
    #[error("Launch error. {0}")]
    Other(String),
}

impl Error {
    fn spawn(program: &str, error: &io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Error::NotFound(program.to_owned()),
            io::ErrorKind::PermissionDenied => Error::PermissionDenied(program.to_owned()),
            _ => Error::Other(format!("Unable to run `{program}`. {error}")),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Exited(ExitStatus),
    Cancelled,
    /// Another launch was already running.
    Ignored,
}

/// Runs launch plans, one at a time.
#[derive(Debug, Default)]
pub struct Launcher {
    busy: AtomicBool,
}

struct Busy<'a>(&'a AtomicBool);

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Launcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn begin(&self) -> Option<Busy<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Busy(&self.busy))
    }

    /// Creates the prefix directories of `plan`, runs it and waits for it to exit.
    ///
    /// While a launch is in flight, further calls return [`Outcome::Ignored`]
    /// without doing anything. Cancelling `cancel` before the process is spawned
    /// leaves the filesystem untouched where possible; afterwards it kills the
    /// process.
    pub async fn launch(
        &self,
        plan: &LaunchPlan,
        cancel: CancellationToken,
    ) -> Result<Outcome, Error> {
        let Some(_busy) = self.begin() else {
            info!("A launch is already in progress, ignoring");
            return Ok(Outcome::Ignored);
        };

        if cancel.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        if let Some(prefix) = &plan.prefix {
            prefix.ensure();
        }

        let Some(mut command) = plan.command() else {
            return Err(Error::Other("Nothing to launch.".to_owned()));
        };

        if cancel.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        info!("Launching: {}", plan.preview());
        let program = plan.argv.first().map_or("", String::as_str);
        let mut child = command.spawn().map_err(|e| Error::spawn(program, &e))?;

        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|e| Error::Other(e.to_string()))?;
                info!("`{program}` exited with {status}");
                Ok(Outcome::Exited(status))
            }
            () = cancel.cancelled() => {
                info!("Launch cancelled, stopping `{program}`");
                if let Err(e) = child.kill().await {
                    warn!("Unable to stop `{program}`. {e}");
                }
                Ok(Outcome::Cancelled)
            }
        }
    }
}
