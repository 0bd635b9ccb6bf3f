//! Human readable sequential codes (`P-001`, `R-014`, ...)

use crate::error::{Result, StoreError};

pub const PROPERTY_PREFIX: &str = "P";
pub const RENTING_PREFIX: &str = "R";

/// Next code after the highest numeric suffix among `existing`.
///
/// Gaps are never filled and codes without a numeric suffix are ignored.
/// Fails once the highest suffix is `u64::MAX`, as no unused code is left.
pub fn next_code<'a, I>(prefix: &str, existing: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(|code| code.split('-').nth(1))
        .filter_map(|suffix| suffix.trim().parse::<u64>().ok())
        .max()
        .unwrap_or(0);

    let next = max.checked_add(1).ok_or_else(|| {
        StoreError::Validation(format!("no {}-NNN codes left after {}-{}", prefix, prefix, max))
    })?;

    Ok(format!("{}-{:03}", prefix, next))
}
