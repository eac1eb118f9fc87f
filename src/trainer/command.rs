//! External training program invocation
//!
//! The training program runs as a managed child process: its stdout is
//! forwarded to the log line by line, stderr is forwarded and its tail is
//! kept for the error report, and a non-zero exit fails the stage.
//!
//! Progress bars redraw with bare `\r`, so both `\r` and `\n` end a line
//! and every line is capped at [`MAX_LINE_BYTES`].

use crate::config::ModelTrainerConfig;
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use tracing::{debug, info, warn};

/// Number of trailing stderr lines kept for failure reports
pub const STDERR_TAIL_LINES: usize = 40;

/// Longest line kept from the child's output; the rest of the line is dropped
pub const MAX_LINE_BYTES: usize = 4096;

/// Fully resolved training command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainCommand {
    /// Executable (the interpreter)
    pub program: String,
    /// Arguments, starting with the training script
    pub args: Vec<String>,
    /// Working directory of the child process
    pub current_dir: PathBuf,
}

impl TrainCommand {
    /// Build the command for `config`, pointing `--data` at `data_yaml`.
    ///
    /// The child runs inside `program_dir`, so the data path is made
    /// absolute; the architecture config is given relative to `program_dir`.
    pub fn from_config(config: &ModelTrainerConfig, data_yaml: &Path) -> Result<Self> {
        let data = std::path::absolute(data_yaml)?;
        let cfg = Path::new(".")
            .join(&config.models_subdir)
            .join(config.custom_config_name());

        let mut args = vec![
            config.train_script.clone(),
            "--img".to_string(),
            config.img_size.to_string(),
            "--batch".to_string(),
            config.batch_size.to_string(),
            "--epochs".to_string(),
            config.no_epochs.to_string(),
            "--data".to_string(),
            data.display().to_string(),
            "--cfg".to_string(),
            cfg.display().to_string(),
            "--weights".to_string(),
            config.weight_name.clone(),
            "--name".to_string(),
            config.run_name.clone(),
        ];
        if config.cache {
            args.push("--cache".to_string());
        }

        Ok(Self {
            program: config.interpreter.clone(),
            args,
            current_dir: config.program_dir.clone(),
        })
    }

    /// Run to completion, blocking the caller.
    pub fn run(&self) -> Result<()> {
        info!(command = %self, "Starting training");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.current_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Error::ConfigError(format!(
                    "cannot start {:?} in {}: {}",
                    self.program,
                    self.current_dir.display(),
                    e
                )),
                _ => Error::Io(e),
            })?;

        let Some(stderr) = child.stderr.take() else {
            terminate(&mut child);
            return Err(Error::Io(io::Error::other("child stderr was not captured")));
        };
        let stderr_pump = thread::spawn(move || tail_lines(stderr, STDERR_TAIL_LINES));

        let forwarded = match child.stdout.take() {
            Some(stdout) => {
                for_each_line(stdout, |line| info!(target: "detect_trainer::train_output", "{line}"))
            }
            None => Ok(()),
        };

        // The pump is left detached on failure: a grandchild may still hold
        // the stderr pipe open.
        let status = match forwarded.and_then(|()| child.wait()) {
            Ok(status) => status,
            Err(e) => {
                terminate(&mut child);
                return Err(Error::Io(e));
            }
        };
        let tail = stderr_pump
            .join()
            .map_err(|_| Error::Io(io::Error::other("stderr reader panicked")))??;

        if !status.success() {
            return Err(Error::TrainingFailed {
                code: status.code(),
                stderr: tail.into_iter().collect::<Vec<_>>().join("\n"),
            });
        }

        info!(status = %status, "Training finished");
        Ok(())
    }
}

impl fmt::Display for TrainCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cd {} && {}", self.current_dir.display(), self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Kill the child and reap it so no zombie outlives a failed run.
fn terminate(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!(pid = child.id(), error = %e, "Kill failed, child already exited");
    }
    if let Err(e) = child.wait() {
        warn!(pid = child.id(), error = %e, "Failed to reap training process");
    }
}

/// Call `f` for each non-empty line of `reader`, tolerating non-UTF-8 output.
///
/// Lines end at `\r` or `\n`. At most [`MAX_LINE_BYTES`] bytes of a line are
/// kept, so memory stays bounded whatever the child writes.
fn for_each_line<R: Read>(reader: R, mut f: impl FnMut(&str)) -> io::Result<()> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::with_capacity(256);
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            emit_line(&mut line, &mut f);
            return Ok(());
        }
        let consumed = chunk.len();
        for &byte in chunk {
            match byte {
                b'\r' | b'\n' => emit_line(&mut line, &mut f),
                _ if line.len() < MAX_LINE_BYTES => line.push(byte),
                _ => {}
            }
        }
        reader.consume(consumed);
    }
}

fn emit_line(line: &mut Vec<u8>, f: &mut impl FnMut(&str)) {
    if !line.is_empty() {
        f(&String::from_utf8_lossy(line));
        line.clear();
    }
}

/// Forward `reader` to the debug log, keeping its last `keep` lines.
fn tail_lines<R: Read>(reader: R, keep: usize) -> io::Result<VecDeque<String>> {
    let mut tail = VecDeque::with_capacity(keep);
    for_each_line(reader, |line| {
        debug!(target: "detect_trainer::train_output", "{line}");
        if tail.len() == keep {
            tail.pop_front();
        }
        tail.push_back(line.to_string());
    })?;
    Ok(tail)
}
