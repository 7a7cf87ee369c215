//! Concurrent fragment loading.
//!
//! Each unique fragment is decoded and resampled on tokio's blocking pool.
//! The join over all loads is bounded by a deadline; loads still running when
//! it passes are aborted and reported as timed out.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::buffer::AudioBuffer;
use crate::error::AudioError;
use crate::fragments::{FragmentId, FragmentSource};
use crate::resample::load_and_resample;

/// Outcome of [`load_all`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Loaded fragments, resampled to the target rate.
    pub buffers: HashMap<FragmentId, AudioBuffer>,
    /// Fragments that failed to open or decode.
    pub missing: Vec<FragmentId>,
    /// Fragments abandoned at the deadline.
    pub timed_out: Vec<FragmentId>,
    timeout_ms: u64,
}

impl LoadReport {
    pub fn get(&self, id: &FragmentId) -> Option<&AudioBuffer> {
        self.buffers.get(id)
    }

    /// The timeout as an error, when any load was abandoned.
    pub fn timeout_error(&self) -> Option<AudioError> {
        if self.timed_out.is_empty() {
            return None;
        }
        Some(AudioError::LoadTimeout {
            pending: self.timed_out.len(),
            timeout_ms: self.timeout_ms,
        })
    }
}

/// Loads every distinct fragment in `ids` concurrently.
///
/// Failures never abort the batch: a fragment that cannot be opened lands in
/// [`LoadReport::missing`], one still loading at the deadline in
/// [`LoadReport::timed_out`].
pub async fn load_all<I>(
    source: Arc<dyn FragmentSource>,
    ids: I,
    target_rate: u32,
    timeout: Duration,
) -> LoadReport
where
    I: IntoIterator<Item = FragmentId>,
{
    let mut pending: BTreeSet<FragmentId> = ids.into_iter().collect();
    let mut report = LoadReport {
        timeout_ms: timeout.as_millis() as u64,
        ..LoadReport::default()
    };

    let mut tasks = JoinSet::new();
    for id in pending.iter().cloned() {
        let source = Arc::clone(&source);
        tasks.spawn_blocking(move || {
            let result = load_and_resample(source.as_ref(), &id, target_rate);
            (id, result)
        });
    }
    tracing::debug!(fragments = pending.len(), target_rate, "loading fragments");

    let deadline = Instant::now() + timeout;
    loop {
        match tokio::time::timeout_at(deadline, tasks.join_next()).await {
            Ok(Some(Ok((id, result)))) => {
                pending.remove(&id);
                match result {
                    Ok(buffer) => {
                        report.buffers.insert(id, buffer);
                    }
                    Err(e) => {
                        tracing::warn!(fragment = %id, error = %e, "skipping fragment");
                        report.missing.push(id);
                    }
                }
            }
            Ok(Some(Err(e))) => {
                tracing::warn!(error = %e, "fragment load task failed");
            }
            Ok(None) => break,
            Err(_) => {
                tasks.abort_all();
                report.timed_out = std::mem::take(&mut pending).into_iter().collect();
                tracing::warn!(
                    pending = report.timed_out.len(),
                    timeout_ms = report.timeout_ms,
                    "fragment loads timed out"
                );
                break;
            }
        }
    }

    // Tasks that panicked never reported their id.
    report.missing.extend(pending);
    report.missing.sort();
    report
}
