// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   reader task per KEEP_IN_STRING stream
//!   unbounded mpsc channels buffer lines
//!   wait
//!   --> ProcessOutput { stdout, stderr, exit_code }
//! ```

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};
use crate::error::ProcessError;

/// Spawns a reader task for one piped stream if it is being captured.
fn spawn_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &'static str,
    tx: mpsc::UnboundedSender<String>,
) -> Option<JoinHandle<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    if !flags.contains(StreamFlags::KEEP_IN_STRING) {
        return None;
    }
    stream.map(|stream| {
        let name = process_name.to_string();
        tokio::spawn(async move {
            read_stream(stream, &name, stream_name, tx).await;
        })
    })
}

/// Collects output from a channel into a string.
fn collect_output(rx: &mut mpsc::UnboundedReceiver<String>, flags: StreamFlags) -> String {
    if !flags.contains(StreamFlags::KEEP_IN_STRING) {
        return String::new();
    }
    let mut output = String::new();
    while let Ok(line) = rx.try_recv() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&line);
    }
    output
}

/// Waits for reader tasks to complete.
async fn await_readers(stdout_handle: Option<JoinHandle<()>>, stderr_handle: Option<JoinHandle<()>>) {
    if let Some(handle) = stdout_handle {
        let _ = handle.await;
    }
    if let Some(handle) = stderr_handle {
        let _ = handle.await;
    }
}

impl ProcessBuilder {
    /// Runs the child process, handling I/O streaming and waiting for completion.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
    ) -> Result<ProcessOutput, ProcessError> {
        let (stdout_tx, mut stdout_rx) = mpsc::unbounded_channel::<String>();
        let (stderr_tx, mut stderr_rx) = mpsc::unbounded_channel::<String>();

        let stdout_handle = spawn_reader(
            child.stdout.take(),
            self.stdout_stream(),
            name,
            "stdout",
            stdout_tx,
        );
        let stderr_handle = spawn_reader(
            child.stderr.take(),
            self.stderr_stream(),
            name,
            "stderr",
            stderr_tx,
        );

        let exit_status = child.wait().await.map_err(|e| ProcessError::OutputError {
            command: name.to_string(),
            message: format!("failed waiting for exit: {e}"),
        })?;

        await_readers(stdout_handle, stderr_handle).await;

        Ok(ProcessOutput::new(
            exit_status.code().unwrap_or(-1),
            collect_output(&mut stdout_rx, self.stdout_stream()),
            collect_output(&mut stderr_rx, self.stderr_stream()),
        ))
    }
}

/// Reads lines from a stream into the channel.
async fn read_stream<R>(
    reader: R,
    process_name: &str,
    stream_name: &str,
    tx: mpsc::UnboundedSender<String>,
) where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        trace!(process = %process_name, stream = %stream_name, line = %line, "output");
        let _ = tx.send(line);
    }
}
