//! LaTeX compiler driver.
//!
//! Writes `<name>.tex` into the target directory and runs the engine there.
//! The engine's working directory is set on the child process, so the
//! caller's working directory is never touched.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::CompileError;
use crate::tools::{Engine, TEX_HINT, require_tool};

/// Log lines kept from a failed run.
pub const MAX_DIAGNOSTICS: usize = 3;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// One document to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationRequest {
    pub source: String,
    /// Existing directory that receives every output file.
    pub directory: PathBuf,
    /// Sanitized base name, without extension.
    pub name: String,
}

impl CompilationRequest {
    pub fn new(
        source: impl Into<String>,
        directory: impl Into<PathBuf>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            directory: directory.into(),
            name: name.into(),
        }
    }

    fn file(&self, extension: &str) -> PathBuf {
        self.directory.join(format!("{}.{extension}", self.name))
    }

    pub fn tex_path(&self) -> PathBuf {
        self.file("tex")
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.file("pdf")
    }

    pub fn log_path(&self) -> PathBuf {
        self.file("log")
    }
}

/// Progress of a single compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStage {
    Idle,
    SourceWritten,
    CompilerInvoked,
    Success,
    Failure,
}

impl fmt::Display for CompileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::SourceWritten => "source-written",
            Self::CompilerInvoked => "compiler-invoked",
            Self::Success => "success",
            Self::Failure => "failure",
        })
    }
}

/// Collect up to [`MAX_DIAGNOSTICS`] error lines (those starting with `!`).
pub fn log_diagnostics(log: &str) -> Vec<String> {
    log.lines()
        .filter(|line| line.starts_with('!'))
        .take(MAX_DIAGNOSTICS)
        .map(|line| line.trim_end().to_string())
        .collect()
}

/// Runs a LaTeX engine.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    engine: Engine,
    timeout: Option<Duration>,
}

impl Compiler {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            timeout: None,
        }
    }

    /// Kill the engine if it runs longer than `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Compile the request and return the path of the PDF.
    ///
    /// On failure the `.tex` file, and usually the `.log`, are left behind.
    pub fn compile(&self, request: &CompilationRequest) -> Result<PathBuf, CompileError> {
        let _span = tracing::info_span!("compile", name = %request.name, engine = %self.engine)
            .entered();
        let mut stage = CompileStage::Idle;
        tracing::debug!(%stage, directory = %request.directory.display());

        if !request.directory.is_dir() {
            return Err(CompileError::MissingDirectory {
                path: request.directory.clone(),
            });
        }
        let program = require_tool(self.engine.program(), TEX_HINT)?;

        let tex = request.tex_path();
        fs::write(&tex, &request.source).map_err(|source| CompileError::Io {
            path: tex.clone(),
            source,
        })?;
        let pdf = request.pdf_path();
        if pdf.exists() {
            fs::remove_file(&pdf).map_err(|source| CompileError::Io {
                path: pdf.clone(),
                source,
            })?;
        }
        stage = CompileStage::SourceWritten;
        tracing::debug!(%stage, path = %tex.display());

        let tex_name = format!("{}.tex", request.name);
        let mut child = Command::new(&program)
            .args(["-interaction=nonstopmode", "-halt-on-error", tex_name.as_str()])
            .current_dir(&request.directory)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CompileError::Spawn {
                program: program.display().to_string(),
                source,
            })?;
        stage = CompileStage::CompilerInvoked;
        tracing::debug!(%stage, program = %program.display());

        let started = Instant::now();
        let status = match self.wait(&mut child, started)? {
            Some(status) => status,
            None => {
                stage = CompileStage::Failure;
                let elapsed_ms = started.elapsed().as_millis();
                tracing::warn!(%stage, elapsed_ms, "compiler timed out");
                return Err(CompileError::Timeout {
                    program: self.engine.program().to_string(),
                    timeout: self.timeout.unwrap_or_default(),
                });
            }
        };

        if status.success() && pdf.exists() {
            stage = CompileStage::Success;
            let elapsed_ms = started.elapsed().as_millis();
            tracing::info!(%stage, elapsed_ms, path = %pdf.display(), "compiled");
            return Ok(pdf);
        }

        stage = CompileStage::Failure;
        let log_path = request.log_path();
        let log = fs::read(&log_path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();
        let diagnostics = log_diagnostics(&log);
        let message = if !diagnostics.is_empty() {
            diagnostics.join("\n")
        } else if status.success() {
            format!("compiler exited successfully but {} was not produced", pdf.display())
        } else {
            match status.code() {
                Some(code) => format!("compilation failed with exit code {code}"),
                None => "compilation failed: compiler terminated by a signal".to_string(),
            }
        };
        tracing::error!(%stage, exit_code = ?status.code(), %message, "compilation failed");
        Err(CompileError::Failed {
            message,
            exit_code: status.code(),
            diagnostics,
            log: log_path,
        })
    }

    /// Wait for the child; `None` means it was killed after the timeout.
    fn wait(
        &self,
        child: &mut std::process::Child,
        started: Instant,
    ) -> Result<Option<ExitStatus>, CompileError> {
        let io_error = |source| CompileError::Spawn {
            program: self.engine.program().to_string(),
            source,
        };
        let Some(timeout) = self.timeout else {
            return child.wait().map(Some).map_err(io_error);
        };
        loop {
            if let Some(status) = child.try_wait().map_err(io_error)? {
                return Ok(Some(status));
            }
            if started.elapsed() >= timeout {
                let _ = child.kill();
                child.wait().map_err(io_error)?;
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Compile with default engine settings.
pub fn compile(request: &CompilationRequest) -> Result<PathBuf, CompileError> {
    Compiler::default().compile(request)
}
