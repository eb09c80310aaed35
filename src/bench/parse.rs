//! Line-oriented instance input.
//!
//! One instance per line, whitespace separated:
//!
//! ```text
//! id n capacity w0 p0 w1 p1 ... w(n-1) p(n-1)
//! ```

use std::io::BufRead;

use crate::problem::{Instance, Item, KnapsackError};

fn field(token: Option<&str>, name: &str) -> Result<u64, KnapsackError> {
    let token = token.ok_or_else(|| KnapsackError::InvalidInstance(format!("missing {name}")))?;
    if token.starts_with('-') {
        return Err(KnapsackError::InvalidInstance(format!(
            "negative {name}: {token}"
        )));
    }
    token
        .parse::<u64>()
        .map_err(|e| KnapsackError::InvalidInstance(format!("bad {name} {token:?}: {e}")))
}

/// Parses a single instance record.
///
/// # Errors
/// [`KnapsackError::InvalidInstance`] for missing, negative or non-integer
/// fields, a weight without a price, or an item count that does not match
/// the number of pairs.
pub fn parse_instance(line: &str) -> Result<Instance, KnapsackError> {
    let mut tokens = line.split_whitespace();
    let id = field(tokens.next(), "id")?;
    let declared = field(tokens.next(), "item count")?;
    let capacity = field(tokens.next(), "capacity")?;

    let rest: Vec<&str> = tokens.collect();
    if rest.len() % 2 != 0 {
        return Err(KnapsackError::InvalidInstance(
            "weight without matching price".into(),
        ));
    }
    let items = rest
        .chunks(2)
        .map(|pair| {
            Ok(Item::new(
                field(Some(pair[0]), "weight")?,
                field(Some(pair[1]), "price")?,
            ))
        })
        .collect::<Result<Vec<_>, KnapsackError>>()?;

    if items.len() as u64 != declared {
        return Err(KnapsackError::InvalidInstance(format!(
            "declared {declared} items, found {}",
            items.len()
        )));
    }

    Ok(Instance::new(items, capacity)?.with_id(id))
}

/// Reads every instance from `reader`.
///
/// Blank lines are ignored. Malformed records are logged and skipped so one
/// bad line does not abort a whole benchmark run; only I/O failures are
/// returned as errors.
pub fn read_instances<R: BufRead>(reader: R) -> Result<Vec<Instance>, KnapsackError> {
    let mut instances = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_instance(&line) {
            Ok(inst) => instances.push(inst),
            Err(e) => log::warn!("skipping line {}: {}", lineno + 1, e),
        }
    }
    Ok(instances)
}
