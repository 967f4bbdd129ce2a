//! Call History Module
//!
//! Counts calls to a named operation and records their inputs and outputs
//! in two parallel backend lists, then rebuilds them as a replay transcript.

use std::fmt;
use std::future::Future;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::backend::SharedBackend;
use crate::error::{CacheError, Result};

/// Backend list holding the inputs of `operation`.
pub fn inputs_key(operation: &str) -> String {
    format!("{}:inputs", operation)
}

/// Backend list holding the outputs of `operation`.
pub fn outputs_key(operation: &str) -> String {
    format!("{}:outputs", operation)
}

// == Call Recorder ==
/// Wraps operations with call counting and input/output history.
///
/// Recording holds an async mutex so that one call's input and output land
/// at the same index of their lists even with concurrent callers. Multiple
/// inputs of one call are joined into a single entry.
pub struct CallRecorder {
    backend: SharedBackend,
    append_lock: Mutex<()>,
}

impl CallRecorder {
    // == Constructor ==
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,
            append_lock: Mutex::new(()),
        }
    }

    // == Record ==
    /// Runs `call` as an invocation of `operation`.
    ///
    /// Only successful calls are recorded: once `call` returns, its input is
    /// appended, the operation counter incremented and its output appended,
    /// all under the append lock. A failed call leaves no trace, so the
    /// counter and both lists always have the same length.
    pub async fn record<T, F, Fut>(&self, operation: &str, inputs: &[String], call: F) -> Result<T>
    where
        T: fmt::Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let output = call().await?;

        let _guard = self.append_lock.lock().await;
        self.backend
            .rpush(&inputs_key(operation), inputs.join(", ").into_bytes())
            .await?;
        let calls = self.backend.incr(operation).await?;
        self.backend
            .rpush(&outputs_key(operation), output.to_string().into_bytes())
            .await?;

        debug!("{} call #{} recorded", operation, calls);
        Ok(output)
    }

    /// Whether `operation` has recorded history.
    ///
    /// Every recorded call appends an output, so a counter is only trusted
    /// when the outputs list holds something. Names that collide with
    /// stored values or history lists report no activity.
    async fn has_history(&self, operation: &str) -> Result<bool> {
        let first = tolerate_wrong_type(
            self.backend.lrange(&outputs_key(operation), 0, 0).await,
            Vec::new(),
        )?;
        Ok(!first.is_empty())
    }

    // == Call Count ==
    /// Number of recorded calls to `operation`, 0 if it was never called.
    pub async fn call_count(&self, operation: &str) -> Result<u64> {
        if !self.has_history(operation).await? {
            return Ok(0);
        }

        let count = tolerate_wrong_type(self.backend.get(operation).await, None)?
            .and_then(|raw| String::from_utf8(raw).ok())
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or(0);
        Ok(count)
    }

    // == Replay ==
    /// Reads the counter and both history lists for `operation`.
    pub async fn replay(&self, operation: &str) -> Result<Replay> {
        let calls = self.call_count(operation).await?;
        if calls == 0 {
            return Ok(Replay {
                operation: operation.to_string(),
                calls,
                entries: Vec::new(),
            });
        }

        let inputs = tolerate_wrong_type(
            self.backend.lrange(&inputs_key(operation), 0, -1).await,
            Vec::new(),
        )?;
        let outputs = self.backend.lrange(&outputs_key(operation), 0, -1).await?;

        let entries = inputs
            .into_iter()
            .zip(outputs)
            .map(|(input, output)| CallEntry {
                input: String::from_utf8_lossy(&input).into_owned(),
                output: String::from_utf8_lossy(&output).into_owned(),
            })
            .collect();

        Ok(Replay {
            operation: operation.to_string(),
            calls,
            entries,
        })
    }
}

/// Treats a wrong-type reply as `fallback`; connection errors still fail.
fn tolerate_wrong_type<T>(result: Result<T>, fallback: T) -> Result<T> {
    match result {
        Err(CacheError::Backend(_)) => Ok(fallback),
        other => other,
    }
}

// == Replay Report ==
/// One recorded call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallEntry {
    pub input: String,
    pub output: String,
}

/// The recorded history of an operation, in call order.
///
/// `Display` renders the transcript:
///
/// ```text
/// Cache.store was called 2 times:
/// Cache.store(*(foo,)) -> 9d1c...
/// Cache.store(*(123,)) -> 4f2a...
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Replay {
    pub operation: String,
    pub calls: u64,
    pub entries: Vec<CallEntry>,
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.operation, self.calls)?;
        for entry in &self.entries {
            write!(
                f,
                "\n{}(*({},)) -> {}",
                self.operation, entry.input, entry.output
            )?;
        }
        Ok(())
    }
}
