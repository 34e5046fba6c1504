//! Payout File Module
//!
//! Reading of the payout list (`destination,amount,reference` per line) and
//! opening of the envelope output.

use crate::error::{PayoutError, Result};
use crate::types::{PayoutRecord, Reference};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

/// Parse payout records from `reader`
///
/// Lines are trimmed and blank lines ignored. A line that does not have
/// exactly three fields, or whose reference is not 32 bytes of hex, fails
/// the whole batch.
pub fn parse_records<R: BufRead>(reader: R) -> Result<Vec<PayoutRecord>> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let [destination, amount, reference] = parts[..] else {
            return Err(PayoutError::MalformedRecord {
                line: number,
                content: trimmed.to_string(),
            });
        };

        let reference =
            Reference::from_hex(reference).map_err(|_| PayoutError::InvalidReference {
                line: number,
                reference: reference.to_string(),
            })?;

        records.push(PayoutRecord {
            destination: destination.to_string(),
            amount: amount.to_string(),
            reference,
        });
    }

    Ok(records)
}

/// Read all records from the file at `path`
pub fn read_records(path: &str) -> Result<Vec<PayoutRecord>> {
    let file = File::open(path)?;
    parse_records(BufReader::new(file))
}

/// Open the envelope output; `-` writes to stdout
pub fn open_output(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        return Ok(Box::new(io::stdout().lock()));
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}
