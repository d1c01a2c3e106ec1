// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Child-process execution.
//!
//! Synchronous runs block until the child exits; asynchronous runs return
//! immediately with exit code 0 and a monitor thread logs the outcome. When
//! `destroy_on_shutdown` is set, async children are killed when the runner
//! is dropped, so a still-running child does not outlive the build. The
//! runner, not the OS, owns that policy.

use crate::error::{FxError, Result};
use crate::exec::CommandSpec;
use log::{debug, error};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Where the child's output goes. The two modes are mutually exclusive.
#[derive(Debug, Clone)]
pub enum OutputSink {
    /// Inherit the parent's stdout/stderr
    Inherit,
    /// Redirect both streams into a single buffered file
    File(PathBuf),
}

pub struct ProcessRunner {
    async_mode: bool,
    destroy_on_shutdown: bool,
    destroyer: Option<ProcessDestroyer>,
}

impl ProcessRunner {
    pub fn new(async_mode: bool, destroy_on_shutdown: bool) -> Self {
        Self {
            async_mode,
            destroy_on_shutdown,
            destroyer: None,
        }
    }

    /// Execute the command. Returns the child's exit code, or 0 immediately
    /// in async mode. A launch failure is an error; a non-zero exit code is
    /// not, the caller decides what it means.
    pub fn run(&mut self, spec: CommandSpec, sink: &OutputSink) -> Result<i32> {
        let command_line = spec.command_line();
        let mut command = Command::new(&spec.executable);
        command
            .args(&spec.args)
            .current_dir(&spec.working_dir)
            .env_clear()
            .envs(&spec.env);

        match sink {
            OutputSink::Inherit => {
                command
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            OutputSink::File(_) => {
                command
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
        }

        let mut child = command.spawn().map_err(|e| FxError::CommandLaunch {
            command: command_line.clone(),
            source: e,
        })?;

        let pump = StreamPump::start(&mut child, sink)?;

        if self.async_mode {
            let slot = Arc::new(Mutex::new(Some(child)));
            if self.destroy_on_shutdown {
                self.destroyer
                    .get_or_insert_with(ProcessDestroyer::new)
                    .register(Arc::clone(&slot));
            }
            monitor_async(slot, pump, command_line);
            return Ok(0);
        }

        // Stop the pump on every exit path before surfacing the result.
        let wait_result = child.wait();
        pump.stop();
        let status = wait_result.map_err(|e| FxError::CommandLaunch {
            command: command_line,
            source: e,
        })?;
        Ok(status.code().unwrap_or(1))
    }
}

fn monitor_async(slot: Arc<Mutex<Option<Child>>>, pump: StreamPump, command_line: String) {
    thread::spawn(move || {
        loop {
            {
                let mut guard = slot.lock().expect("async child slot poisoned");
                match guard.as_mut() {
                    None => break, // already reaped or destroyed
                    Some(child) => match child.try_wait() {
                        Ok(Some(status)) => {
                            let code = status.code().unwrap_or(1);
                            if code == 0 {
                                debug!(
                                    "Async process complete, exit value = {code} for: {command_line}"
                                );
                            } else {
                                error!("Async process failed ({code}) for: {command_line}");
                            }
                            *guard = None;
                            break;
                        }
                        Ok(None) => {}
                        Err(e) => {
                            error!("Async process failed for: {command_line}: {e}");
                            *guard = None;
                            break;
                        }
                    },
                }
            }
            thread::sleep(Duration::from_millis(50));
        }
        pump.stop();
    });
}

/// Kills still-running async children when dropped.
struct ProcessDestroyer {
    children: Vec<Arc<Mutex<Option<Child>>>>,
}

impl ProcessDestroyer {
    fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    fn register(&mut self, child: Arc<Mutex<Option<Child>>>) {
        self.children.push(child);
    }
}

impl Drop for ProcessDestroyer {
    fn drop(&mut self) {
        for slot in &self.children {
            if let Ok(mut guard) = slot.lock()
                && let Some(child) = guard.as_mut()
            {
                debug!("Destroying still-running async child");
                let _ = child.kill();
                let _ = child.wait();
                *guard = None;
            }
        }
    }
}

/// Pumps the child's piped streams into the configured sink. Started before
/// the child is waited on, stopped exactly once afterwards.
struct StreamPump {
    handles: Vec<JoinHandle<()>>,
}

impl StreamPump {
    fn start(child: &mut Child, sink: &OutputSink) -> Result<Self> {
        let mut handles = Vec::new();

        if let OutputSink::File(path) = sink {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                std::fs::create_dir_all(parent)?;
            }
            let writer = Arc::new(Mutex::new(BufWriter::new(File::create(path)?)));

            if let Some(stdout) = child.stdout.take() {
                handles.push(pump_into(stdout, Arc::clone(&writer)));
            }
            if let Some(stderr) = child.stderr.take() {
                handles.push(pump_into(stderr, writer));
            }
        }

        Ok(Self { handles })
    }

    fn stop(self) {
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

fn pump_into<R: Read + Send + 'static>(
    mut reader: R,
    writer: Arc<Mutex<BufWriter<File>>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut buffer = [0u8; 8192];
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    let mut writer = writer.lock().expect("output sink poisoned");
                    if writer.write_all(&buffer[..n]).is_err() {
                        break;
                    }
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(_) => break,
            }
        }
        if let Ok(mut writer) = writer.lock() {
            let _ = writer.flush();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Instant;
    use tempfile::TempDir;

    fn spec(program: &str, args: &[&str]) -> CommandSpec {
        CommandSpec {
            executable: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            working_dir: std::env::temp_dir(),
            env: std::env::vars().collect::<HashMap<_, _>>(),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_sync_run_returns_exit_code() {
        let mut runner = ProcessRunner::new(false, false);
        let code = runner
            .run(spec("sh", &["-c", "exit 7"]), &OutputSink::Inherit)
            .unwrap();
        assert_eq!(code, 7);
    }

    #[test]
    fn test_launch_failure_is_an_error() {
        let mut runner = ProcessRunner::new(false, false);
        let err = runner
            .run(spec("definitely-not-a-tool", &[]), &OutputSink::Inherit)
            .unwrap_err();
        assert!(matches!(err, FxError::CommandLaunch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_output_redirected_to_file() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("logs/run.log");

        let mut runner = ProcessRunner::new(false, false);
        let code = runner
            .run(
                spec("sh", &["-c", "echo out; echo err 1>&2"]),
                &OutputSink::File(out.clone()),
            )
            .unwrap();
        assert_eq!(code, 0);

        let contents = std::fs::read_to_string(&out).unwrap();
        assert!(contents.contains("out"));
        assert!(contents.contains("err"));
    }

    #[cfg(unix)]
    #[test]
    fn test_async_returns_immediately_with_zero() {
        let mut runner = ProcessRunner::new(true, false);
        let start = Instant::now();
        let code = runner
            .run(spec("sh", &["-c", "sleep 5"]), &OutputSink::Inherit)
            .unwrap();
        assert_eq!(code, 0);
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[cfg(unix)]
    #[test]
    fn test_async_failure_is_only_logged() {
        let mut runner = ProcessRunner::new(true, true);
        let code = runner
            .run(spec("sh", &["-c", "exit 3"]), &OutputSink::Inherit)
            .unwrap();
        assert_eq!(code, 0);
        // the destroyer reaps whatever is still around on drop
        drop(runner);
    }
}
