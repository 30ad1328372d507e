pub mod analyze;
pub mod generate;
pub mod transform;

use std::path::Path;

use randlab_core::{EntropySource, OsEntropy, SeededEntropy, ThreadEntropy};

use crate::error::{CliError, Result};

/// Build the entropy source for `--entropy`; a seed always wins.
pub fn make_entropy(kind: &str, seed: Option<u64>) -> Result<Box<dyn EntropySource>> {
    if let Some(seed) = seed {
        log::debug!("using seeded entropy (seed={seed}) instead of '{kind}'");
        return Ok(Box::new(SeededEntropy::new(seed)));
    }
    match kind {
        "thread" => Ok(Box::new(ThreadEntropy::new())),
        "os" => Ok(Box::new(OsEntropy)),
        other => Err(CliError::Usage(format!(
            "unknown entropy source '{other}' (expected thread or os)"
        ))),
    }
}

/// Read an integer sequence file and normalize it into `[0, 1)`.
pub fn load_normalized(path: &str) -> Result<Vec<f64>> {
    let raw: Vec<u64> = randlab_core::read_sequence_file(Path::new(path))?;
    Ok(randlab_core::normalize(&raw)?)
}

pub fn write_file(path: &str, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_string(),
        source,
    })
}
