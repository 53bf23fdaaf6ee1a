//! Single-instance process launcher for external tools.

use std::process::{Child, Command, ExitStatus};

use tracing::{debug, info, instrument};

use crate::application::services::toolset::VPROJECT_VAR;
use crate::application::services::LaunchRequest;
use crate::infrastructure::{InfraError, InfraResult};

/// Result of a launch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    Started { pid: u32 },
    /// The previously started instance is still alive; nothing was spawned.
    AlreadyRunning { pid: u32 },
}

/// Starts at most one tool instance at a time.
///
/// Only the child spawned by this value is tracked. Each `kvtree tools launch`
/// invocation creates a fresh launcher, so `AlreadyRunning` is reported to
/// long-lived library callers only; separate CLI runs never see each other.
#[derive(Debug, Default)]
pub struct ToolLauncher {
    child: Option<Child>,
}

impl ToolLauncher {
    pub fn new() -> Self {
        Self { child: None }
    }

    /// Start `request` unless the previous instance is still running.
    #[instrument(level = "debug", skip(self), fields(name = %request.name))]
    pub fn launch(&mut self, request: &LaunchRequest) -> InfraResult<LaunchOutcome> {
        if let Some(pid) = self.running_pid()? {
            info!("instance already running (pid {})", pid);
            return Ok(LaunchOutcome::AlreadyRunning { pid });
        }

        let mut command = Command::new(&request.program);
        command.args(&request.args);
        if let Some(vproject) = &request.vproject {
            command.env(VPROJECT_VAR, vproject);
        }

        let child = command.spawn().map_err(|source| InfraError::Launch {
            program: request.program.clone(),
            source,
        })?;
        let pid = child.id();
        debug!("started {} (pid {})", request.program.display(), pid);
        self.child = Some(child);
        Ok(LaunchOutcome::Started { pid })
    }

    /// Pid of the tracked instance if it has not exited yet.
    pub fn running_pid(&mut self) -> InfraResult<Option<u32>> {
        let Some(child) = self.child.as_mut() else {
            return Ok(None);
        };
        match child
            .try_wait()
            .map_err(|e| InfraError::io("poll tool process", e))?
        {
            None => Ok(Some(child.id())),
            Some(status) => {
                debug!("previous instance exited: {}", status);
                self.child = None;
                Ok(None)
            }
        }
    }

    /// Block until the tracked instance exits.
    pub fn wait(&mut self) -> InfraResult<Option<ExitStatus>> {
        match self.child.take() {
            Some(mut child) => child
                .wait()
                .map(Some)
                .map_err(|e| InfraError::io("wait for tool process", e)),
            None => Ok(None),
        }
    }

    /// Terminate the tracked instance, if any.
    pub fn kill(&mut self) -> InfraResult<()> {
        if let Some(mut child) = self.child.take() {
            child
                .kill()
                .map_err(|e| InfraError::io("kill tool process", e))?;
            child
                .wait()
                .map_err(|e| InfraError::io("reap tool process", e))?;
        }
        Ok(())
    }
}
