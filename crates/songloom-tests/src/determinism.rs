//! Byte-level determinism checks.

use std::fmt;

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// BLAKE3 hash of the first run.
    pub hash: String,
    /// First differing byte offset and run, if any.
    pub first_diff: Option<(usize, usize)>,
}

impl fmt::Display for DeterminismResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_diff {
            None => write!(f, "{} identical runs ({})", self.runs, &self.hash[..16]),
            Some((offset, run)) => write!(
                f,
                "run {} differs from run 0 at byte {} ({} runs)",
                run, offset, self.runs
            ),
        }
    }
}

/// BLAKE3 hex digest.
pub fn compute_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Runs `generate_fn` `runs` times and compares the outputs byte by byte.
pub fn verify_determinism<F, O>(generate_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> O,
    O: AsRef<[u8]>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify determinism");

    let reference = generate_fn();
    let reference = reference.as_ref();
    let hash = compute_hash(reference);

    for run in 1..runs {
        let output = generate_fn();
        let output = output.as_ref();
        if output != reference {
            let offset = reference
                .iter()
                .zip(output)
                .position(|(a, b)| a != b)
                .unwrap_or(reference.len().min(output.len()));
            return DeterminismResult {
                is_deterministic: false,
                runs,
                hash,
                first_diff: Some((offset, run)),
            };
        }
    }

    DeterminismResult {
        is_deterministic: true,
        runs,
        hash,
        first_diff: None,
    }
}
