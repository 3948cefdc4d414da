//! Operation parsing
//!
//! One raw line of the operations file parses into exactly one [`Operation`]
//! variant or a typed [`OpError`]. Parsing happens once per line; execution
//! then matches exhaustively, so unknown keywords and wrong argument counts
//! are ordinary error values rather than conditions discovered mid-handler.

use thiserror::Error;

/// Errors raised while parsing or executing a single operation line.
///
/// Every variant is recoverable at the per-line granularity: the run loop
/// reports it and continues with the next line.
#[derive(Error, Debug)]
pub enum OpError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Malformed {op} operation.")]
    Malformed { op: &'static str },

    #[error("Invalid numeric threshold: '{0}'")]
    InvalidThreshold(String),

    #[error("Field '{field}' not found for county '{county}'")]
    FieldNotFound { field: String, county: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed operation, ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Display,
    FilterState(String),
    FilterGt { field: String, threshold: f64 },
    FilterLt { field: String, threshold: f64 },
    PopulationTotal,
    PopulationSubtotal(String),
    Percent(String),
}

impl Operation {
    /// Parse one operation line. First match wins, case-sensitive.
    pub fn parse(line: &str) -> Result<Operation, OpError> {
        match line {
            "display" => Ok(Operation::Display),
            "population-total" => Ok(Operation::PopulationTotal),
            _ => {
                if line.starts_with("filter-state:") {
                    let parts: Vec<&str> = line.split(':').collect();
                    if parts.len() != 2 {
                        return Err(OpError::Malformed { op: "filter-state" });
                    }
                    Ok(Operation::FilterState(parts[1].to_string()))
                } else if line.starts_with("filter-gt:") {
                    let (field, threshold) = parse_comparison(line, "filter-gt")?;
                    Ok(Operation::FilterGt { field, threshold })
                } else if line.starts_with("filter-lt:") {
                    let (field, threshold) = parse_comparison(line, "filter-lt")?;
                    Ok(Operation::FilterLt { field, threshold })
                } else if let Some(field) = line.strip_prefix("population:") {
                    Ok(Operation::PopulationSubtotal(field.to_string()))
                } else if let Some(field) = line.strip_prefix("percent:") {
                    Ok(Operation::Percent(field.to_string()))
                } else {
                    Err(OpError::UnknownOperation(line.to_string()))
                }
            }
        }
    }
}

/// Split a `<op>:<field>:<value>` line into its field and numeric threshold.
fn parse_comparison(line: &str, op: &'static str) -> Result<(String, f64), OpError> {
    let parts: Vec<&str> = line.split(':').collect();
    if parts.len() != 3 {
        return Err(OpError::Malformed { op });
    }
    let threshold = parts[2]
        .parse::<f64>()
        .map_err(|_| OpError::InvalidThreshold(parts[2].to_string()))?;
    Ok((parts[1].to_string(), threshold))
}
