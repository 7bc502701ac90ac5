// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// External translator — runs a configured program per request, writing the
// request as JSON to its stdin and reading `{ "text": ... }` from its stdout.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use mittools_core::config::CommandConfig;
use mittools_core::error::{MitToolsError, Result};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::backend::{TranslationBackend, TranslationRequest, TranslatorKind};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Deserialize)]
struct Reply {
    text: String,
}

#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandBackend {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &CommandConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.args.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

impl TranslationBackend for CommandBackend {
    fn kind(&self) -> TranslatorKind {
        TranslatorKind::Command
    }

    #[instrument(skip_all, fields(program = %self.program.display(), to = %request.to))]
    fn translate(&self, request: &TranslationRequest<'_>) -> Result<String> {
        let input = serde_json::to_vec(request)?;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                MitToolsError::BackendUnavailable(format!(
                    "spawning {}: {}",
                    self.program.display(),
                    err
                ))
            })?;

        let output = exchange(&mut child, input, self.timeout)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MitToolsError::Translation(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }
        if !output.stderr.is_empty() {
            debug!(stderr = %String::from_utf8_lossy(&output.stderr).trim(), "Translator stderr");
        }

        let reply: Reply = serde_json::from_slice(&output.stdout)?;
        Ok(reply.text)
    }
}

type Pipe<T> = JoinHandle<std::io::Result<T>>;

fn drain(reader: Option<impl Read + Send + 'static>) -> Pipe<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut reader) = reader {
            reader.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn join<T>(handle: Pipe<T>) -> Result<T> {
    handle
        .join()
        .map_err(|_| MitToolsError::Translation("translator pipe thread panicked".into()))?
        .map_err(MitToolsError::from)
}

fn kill(child: &mut Child) -> Result<()> {
    if let Err(err) = child.kill() {
        debug!(error = %err, "Translator already gone");
    }
    child.wait()?;
    Ok(())
}

/// Feed `input` to `child` and collect its output. Writing and reading run
/// on their own threads so a program that answers while still reading
/// cannot block either side; the whole exchange is bounded by `timeout`.
fn exchange(child: &mut Child, input: Vec<u8>, timeout: Duration) -> Result<Output> {
    let stdin = child.stdin.take();
    let stdout_thread = drain(child.stdout.take());
    let stderr_thread = drain(child.stderr.take());
    let mut writer: Option<Pipe<()>> = Some(std::thread::spawn(move || {
        if let Some(mut stdin) = stdin {
            stdin.write_all(&input)?;
            stdin.flush()?;
        }
        Ok(())
    }));

    let start = Instant::now();
    loop {
        if let Some(handle) = writer.take_if(|w| w.is_finished()) {
            if let Err(err) = join(handle) {
                warn!(error = %err, "Writing the request failed");
                kill(child)?;
                let stderr = join(stderr_thread).unwrap_or_default();
                let _ = join(stdout_thread);
                return Err(MitToolsError::Translation(format!(
                    "writing request to translator: {}: {}",
                    err,
                    String::from_utf8_lossy(&stderr).trim()
                )));
            }
        }

        if writer.is_none() {
            if let Some(status) = child.try_wait()? {
                return Ok(Output {
                    status,
                    stdout: join(stdout_thread)?,
                    stderr: join(stderr_thread)?,
                });
            }
        }

        if start.elapsed() > timeout {
            warn!(?timeout, "Translator timed out");
            kill(child)?;
            if let Some(handle) = writer {
                let _ = join(handle);
            }
            let stderr = join(stderr_thread).unwrap_or_default();
            let _ = join(stdout_thread);
            return Err(MitToolsError::Translation(format!(
                "translator timed out after {:?}: {}",
                timeout,
                String::from_utf8_lossy(&stderr).trim()
            )));
        }

        std::thread::sleep(POLL_INTERVAL);
    }
}
