//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

/// How often a child is polled while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured result of a finished (or killed) child process.
#[derive(Debug)]
pub struct ProcessOutput {
    /// Exit status; `None` if the deadline passed before the process and its
    /// output were done.
    pub status: Option<ExitStatus>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    fn killed() -> Self {
        ProcessOutput {
            status: None,
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.status.is_some_and(|s| s.success())
    }

    pub fn timed_out(&self) -> bool {
        self.status.is_none()
    }

    pub fn code(&self) -> Option<i32> {
        self.status.and_then(|s| s.code())
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Kill the process if it runs longer than `timeout`.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    /// Execute the command and wait for completion or timeout.
    ///
    /// Only spawning and waiting can fail here; a non-zero exit or a timeout
    /// is reported through [`ProcessOutput`]. Once the deadline passes no
    /// further waiting happens, even if a descendant of the child still holds
    /// the output pipes open.
    pub fn exec(&self) -> Result<ProcessOutput> {
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        let mut child = self
            .build_command()
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        // Drain both pipes concurrently so a full pipe cannot stall the child.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match deadline {
            Some(deadline) => self.wait_until(&mut child, deadline)?,
            None => Some(
                child
                    .wait()
                    .with_context(|| format!("failed to wait for `{}`", self.program.display()))?,
            ),
        };

        let Some(status) = status else {
            return Ok(ProcessOutput::killed());
        };

        match (collect(stdout, deadline), collect(stderr, deadline)) {
            (Some(stdout), Some(stderr)) => Ok(ProcessOutput {
                status: Some(status),
                stdout,
                stderr,
            }),
            _ => {
                tracing::debug!(
                    "`{}` exited but its output was still open at the deadline",
                    self.display_command()
                );
                Ok(ProcessOutput::killed())
            }
        }
    }

    fn wait_until(&self, child: &mut Child, deadline: Instant) -> Result<Option<ExitStatus>> {
        loop {
            let polled = child
                .try_wait()
                .with_context(|| format!("failed to wait for `{}`", self.program.display()))?;
            if let Some(status) = polled {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                tracing::debug!(
                    "killing `{}` after {:?}",
                    self.display_command(),
                    self.timeout.unwrap_or_default()
                );
                // The child may exit between try_wait and kill; either way it is gone.
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>> {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        // Detached: a reader blocked on a pipe held by a grandchild must not
        // hold up the caller.
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
        rx
    })
}

/// Collect a drained pipe. `None` means the deadline passed first.
fn collect(rx: Option<Receiver<Vec<u8>>>, deadline: Option<Instant>) -> Option<Vec<u8>> {
    let Some(rx) = rx else {
        return Some(Vec::new());
    };
    match deadline {
        Some(deadline) => {
            match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(buf) => Some(buf),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => Some(Vec::new()),
            }
        }
        None => Some(rx.recv().unwrap_or_default()),
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find a java launcher.
///
/// Checks `JAVA_HOME` first, then `PATH`.
pub fn find_java() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("JAVA_HOME") {
        let bin = PathBuf::from(home).join("bin");
        let candidate = if cfg!(windows) {
            bin.join("java.exe")
        } else {
            bin.join("java")
        };
        if candidate.is_file() {
            return Some(candidate);
        }
        tracing::debug!("JAVA_HOME has no launcher at {}", candidate.display());
    }

    find_executable("java")
}
