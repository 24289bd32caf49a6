//! Invocation of the external formatter over the half-duplex pipe protocol.
//!
//! The ordering here is the load-bearing contract: spawn with all three
//! standard streams piped, start draining stdout and stderr, write the whole
//! document to stdin, close stdin, then wait. Waiting before the output pipes
//! are drained deadlocks on several platforms once the child fills a pipe
//! buffer, and writing stdin while nothing drains the output side can
//! deadlock the same way.

use crate::config::FormatConfig;
use crate::request::FormatRequest;
use std::io::{self, Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Error during formatter invocation.
#[derive(Error, Debug)]
pub enum InvokeError {
    /// The executable could not be started
    #[error("Cannot execute '{tool}': {source}. Make sure it is installed and discoverable on the PATH")]
    Launch { tool: String, source: io::Error },

    /// The tool ran but exited nonzero; `stderr` holds its diagnostics verbatim
    #[error("'{tool}' exited with code {code}:\n{stderr}")]
    ToolFailed {
        tool: String,
        code: i32,
        stderr: String,
    },

    /// No response within the configured bound; the child was killed
    #[error("'{tool}' timed out after {timeout_ms}ms")]
    Timeout { tool: String, timeout_ms: u64 },

    /// Pipe I/O with the child failed
    #[error("I/O error while talking to '{tool}': {source}")]
    Io { tool: String, source: io::Error },
}

/// Build the argument vector for a request.
///
/// The assume-filename switch uses the configured value if non-empty, falls
/// back to the request's source path, and is omitted when neither is known.
pub fn build_args(request: &FormatRequest, config: &FormatConfig) -> Vec<String> {
    let mut args = vec![
        "-offset".to_string(),
        request.start.to_string(),
        "-length".to_string(),
        request.length.to_string(),
        "-output-replacements-xml".to_string(),
        "-style".to_string(),
        config.style.as_arg().to_string(),
        "-fallback-style".to_string(),
        config.fallback_style.as_arg().to_string(),
    ];
    if config.sort_includes {
        args.push("-sort-includes".to_string());
    }
    let assume_filename = if !config.assume_filename.is_empty() {
        Some(config.assume_filename.as_str().to_string())
    } else {
        request
            .source_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
    };
    if let Some(name) = assume_filename {
        args.push("-assume-filename".to_string());
        args.push(name);
    }
    args
}

/// Render a command line for logging, quoting arguments that need it.
fn render_command(tool: &str, args: &[String]) -> String {
    let mut rendered = String::from(tool);
    for arg in args {
        rendered.push(' ');
        if arg.contains(' ') || arg.contains('"') {
            rendered.push('"');
            rendered.push_str(&arg.replace('"', "\\\""));
            rendered.push('"');
        } else {
            rendered.push_str(arg);
        }
    }
    rendered
}

/// Run the formatter over the request and return its raw standard output.
///
/// One child process per call: spawned, drained, and reaped (or killed on
/// timeout) before this function returns. No retries are attempted.
///
/// # Errors
///
/// Returns [`InvokeError::Launch`] if the executable cannot be started,
/// [`InvokeError::ToolFailed`] with the complete stderr text on a nonzero
/// exit, [`InvokeError::Timeout`] if the configured bound elapses, and
/// [`InvokeError::Io`] on pipe failures.
pub fn invoke(request: &FormatRequest, config: &FormatConfig) -> Result<Vec<u8>, InvokeError> {
    let tool = &config.tool;
    let args = build_args(request, config);
    log::debug!("[fmtbridge] running {}", render_command(tool, &args));

    let mut cmd = Command::new(tool);
    cmd.args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &request.working_dir {
        cmd.current_dir(dir);
    }
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    let mut child = cmd.spawn().map_err(|e| InvokeError::Launch {
        tool: tool.clone(),
        source: e,
    })?;

    // Drain both output pipes on their own threads before anything is written
    // to stdin. The tool is expected to read all of its input before emitting
    // output, but with both drains running even a misbehaving child cannot
    // fill a pipe buffer and stall the write below.
    let mut stdout_handle = child
        .stdout
        .take()
        .map(|stdout| thread::spawn(move || read_pipe(stdout)));
    let mut stderr_handle = child
        .stderr
        .take()
        .map(|stderr| thread::spawn(move || read_pipe(stderr)));

    // Write the entire document, then drop the handle to signal end-of-input.
    // The child starts processing once it sees EOF.
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(request.text.as_bytes()) {
            reap(&mut child);
            let _ = join_pipe(stdout_handle.take());
            let _ = join_pipe(stderr_handle.take());
            return Err(InvokeError::Io {
                tool: tool.clone(),
                source: e,
            });
        }
    }

    let timeout = Duration::from_millis(config.timeout);
    let status = if timeout.is_zero() {
        child.wait().map_err(|e| InvokeError::Io {
            tool: tool.clone(),
            source: e,
        })?
    } else {
        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    reap(&mut child);
                    let _ = join_pipe(stdout_handle.take());
                    let _ = join_pipe(stderr_handle.take());
                    return Err(InvokeError::Io {
                        tool: tool.clone(),
                        source: e,
                    });
                }
            }
            if start.elapsed() >= timeout {
                reap(&mut child);
                let _ = join_pipe(stdout_handle.take());
                let _ = join_pipe(stderr_handle.take());
                return Err(InvokeError::Timeout {
                    tool: tool.clone(),
                    timeout_ms: config.timeout,
                });
            }
            thread::sleep(Duration::from_millis(10));
        }
    };

    let stdout = join_pipe(stdout_handle.take()).map_err(|e| InvokeError::Io {
        tool: tool.clone(),
        source: e,
    })?;
    let stderr = join_pipe(stderr_handle.take()).map_err(|e| InvokeError::Io {
        tool: tool.clone(),
        source: e,
    })?;

    if !status.success() {
        return Err(InvokeError::ToolFailed {
            tool: tool.clone(),
            code: status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        });
    }
    Ok(stdout)
}

fn read_pipe<R: Read>(mut pipe: R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(buf)
}

fn join_pipe(handle: Option<thread::JoinHandle<io::Result<Vec<u8>>>>) -> io::Result<Vec<u8>> {
    match handle {
        Some(handle) => match handle.join() {
            Ok(res) => res,
            Err(_) => Err(io::Error::other("output reader thread panicked")),
        },
        None => Ok(Vec::new()),
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
