//! External command execution
//!
//! Every process launch in the engine goes through [`CommandRunner`], so
//! tests can swap in a fake and assert on the exact commands issued.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use wait_timeout::ChildExt;

/// Interpreter used for shell-string invocations.
pub const SHELL: &str = "/bin/sh";

/// What to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// A program with discrete arguments.
    Exec {
        /// Program path or name.
        program: PathBuf,
        /// Arguments, passed verbatim.
        args: Vec<OsString>,
    },
    /// A command string run through [`SHELL`] `-c`.
    Shell(String),
}

/// A fully described process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Program or shell string.
    pub invocation: Invocation,
    /// Working directory; inherits the caller's when unset.
    pub cwd: Option<PathBuf>,
    /// Extra environment variables.
    pub env: Vec<(String, String)>,
    /// Kill the process after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Capture stdout/stderr instead of inheriting the terminal.
    pub capture: bool,
}

impl CommandRequest {
    /// Run `program` with `args`, inheriting stdio.
    pub fn exec<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            invocation: Invocation::Exec {
                program: program.into(),
                args: args.into_iter().map(Into::into).collect(),
            },
            cwd: None,
            env: Vec::new(),
            timeout: None,
            capture: false,
        }
    }

    /// Run `script` through the shell, inheriting stdio.
    pub fn shell(script: impl Into<String>) -> Self {
        Self {
            invocation: Invocation::Shell(script.into()),
            cwd: None,
            env: Vec::new(),
            timeout: None,
            capture: false,
        }
    }

    /// Set the working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Capture output and enforce a timeout.
    pub fn captured(mut self, timeout: Duration) -> Self {
        self.capture = true;
        self.timeout = Some(timeout);
        self
    }

    /// The program that will be launched.
    pub fn program(&self) -> &Path {
        match &self.invocation {
            Invocation::Exec { program, .. } => program,
            Invocation::Shell(_) => Path::new(SHELL),
        }
    }

    /// Human-readable command line.
    pub fn display(&self) -> String {
        match &self.invocation {
            Invocation::Exec { program, args } => {
                let mut line = program.display().to_string();
                for arg in args {
                    line.push(' ');
                    line.push_str(&arg.to_string_lossy());
                }
                line
            }
            Invocation::Shell(script) => script.clone(),
        }
    }

    fn to_command(&self) -> Command {
        let mut cmd = match &self.invocation {
            Invocation::Exec { program, args } => {
                let mut c = Command::new(program);
                c.args(args);
                c
            }
            Invocation::Shell(script) => {
                let mut c = Command::new(SHELL);
                c.arg("-c").arg(script);
                c
            }
        };
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        if self.capture {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        }
        cmd
    }
}

/// Result of a finished (or killed) process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when killed by a signal or on timeout.
    pub exit_code: Option<i32>,
    /// Captured stdout (empty when not capturing).
    pub stdout: String,
    /// Captured stderr (empty when not capturing).
    pub stderr: String,
    /// The process was killed after exceeding its timeout.
    pub timed_out: bool,
}

impl CommandOutput {
    /// A zero exit within the time limit.
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        text
    }

    /// Output for a process that exited with `code` and printed nothing.
    pub fn exited(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Self::default()
        }
    }
}

/// Capability to run external commands.
pub trait CommandRunner: Send + Sync {
    /// Launch the request and block until it exits or times out.
    ///
    /// # Errors
    ///
    /// Returns an error only when the process cannot be launched or waited on;
    /// a non-zero exit is reported through [`CommandOutput`].
    fn run(&self, request: &CommandRequest) -> std::io::Result<CommandOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<T> {
    fn run(&self, request: &CommandRequest) -> std::io::Result<CommandOutput> {
        (**self).run(request)
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, request: &CommandRequest) -> std::io::Result<CommandOutput> {
        tracing::debug!(command = %request.display(), cwd = ?request.cwd, "running");

        let started = Instant::now();
        let mut child = request.to_command().spawn()?;

        // Drain pipes on helper threads so a chatty child can't fill the pipe
        // buffer and stall while we wait on it.
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = match wait(&mut child, request.timeout) {
            Ok(status) => status,
            Err(e) => {
                reap(&mut child);
                return Err(e);
            }
        };

        let Some(status) = status else {
            reap(&mut child);
            tracing::debug!(command = %request.display(), "timed out");
            // Reader threads are left to finish on their own; a grandchild may
            // still hold the pipe open.
            return Ok(CommandOutput {
                timed_out: true,
                ..CommandOutput::default()
            });
        };

        // A background grandchild can keep the pipes open after the child
        // exits; stop collecting once the time limit is used up.
        let deadline = request.timeout.map(|limit| started + limit);
        Ok(CommandOutput {
            exit_code: status.code(),
            stdout: stdout.map(|rx| collect(&rx, deadline)).unwrap_or_default(),
            stderr: stderr.map(|rx| collect(&rx, deadline)).unwrap_or_default(),
            timed_out: false,
        })
    }
}

fn wait(child: &mut Child, timeout: Option<Duration>) -> std::io::Result<Option<ExitStatus>> {
    match timeout {
        Some(limit) => child.wait_timeout(limit),
        None => child.wait().map(Some),
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

fn collect(rx: &Receiver<String>, deadline: Option<Instant>) -> String {
    let text = match deadline {
        Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
        None => rx.recv().map_err(Into::into),
    };
    text.unwrap_or_else(|_| {
        tracing::debug!("output pipe still open after the time limit");
        String::new()
    })
}
