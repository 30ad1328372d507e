//! Reading and writing sequences as decimal text.
//!
//! Files are written one value per line. Reading is more lenient: tokens may
//! be separated by any mix of whitespace and commas, so comma-separated dumps
//! and space-separated tables load the same way.

use std::fmt::Display;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::error::SequenceError;

/// Write `values` one per line.
pub fn write_sequence<W: Write, T: Display>(
    mut writer: W,
    values: &[T],
) -> Result<(), SequenceError> {
    for v in values {
        writeln!(writer, "{v}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse whitespace- or comma-delimited numeric tokens.
pub fn parse_sequence<T: FromStr>(text: &str) -> Result<Vec<T>, SequenceError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(index, token)| {
            token.parse::<T>().map_err(|_| SequenceError::InvalidToken {
                index,
                token: token.to_string(),
            })
        })
        .collect()
}

pub fn read_sequence_file<T: FromStr>(path: &Path) -> Result<Vec<T>, SequenceError> {
    let text = std::fs::read_to_string(path)?;
    let values = parse_sequence(&text)?;
    log::debug!("read {} values from {}", values.len(), path.display());
    Ok(values)
}

pub fn write_sequence_file<T: Display>(path: &Path, values: &[T]) -> Result<(), SequenceError> {
    let file = std::fs::File::create(path)?;
    write_sequence(std::io::BufWriter::new(file), values)?;
    log::debug!("wrote {} values to {}", values.len(), path.display());
    Ok(())
}
