//! Read a child's working directory and environment from the OS process table.
//!
//! Lookups are best effort: the child may exit between the caller learning
//! its pid and the lookup, which surfaces as [`ProcessTableError::ProcessGone`].
//!
//! The environment is the one the process was started with. On Linux it is
//! read from `/proc/<pid>/environ`, which never reflects later `export`s.

use std::path::PathBuf;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use thiserror::Error;

/// What the process table knows about one process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessInfo {
    /// Current working directory, if readable
    pub cwd: Option<PathBuf>,
    /// Initial environment as `NAME=value` entries
    pub environ: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessTableError {
    /// No process with this pid exists (it already exited)
    #[error("process {0} no longer exists")]
    ProcessGone(u32),
}

/// Source of per-process cwd and environment
pub trait ProcessTable {
    fn lookup(&mut self, pid: u32) -> Result<ProcessInfo, ProcessTableError>;
}

/// `ProcessTable` backed by `sysinfo`
pub struct SysinfoProcessTable {
    system: System,
}

impl SysinfoProcessTable {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SysinfoProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SysinfoProcessTable {
    fn lookup(&mut self, pid: u32) -> Result<ProcessInfo, ProcessTableError> {
        let sys_pid = Pid::from_u32(pid);
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[sys_pid]),
            true,
            ProcessRefreshKind::nothing()
                .with_cwd(UpdateKind::Always)
                .with_environ(UpdateKind::Always),
        );

        let process = self
            .system
            .process(sys_pid)
            .ok_or(ProcessTableError::ProcessGone(pid))?;

        let environ = process
            .environ()
            .iter()
            .map(|entry| entry.to_string_lossy().into_owned())
            .collect();

        Ok(ProcessInfo {
            cwd: process.cwd().map(|p| p.to_path_buf()),
            environ,
        })
    }
}
