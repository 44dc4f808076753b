//! Parametric operations.

use super::{RuntimeError, Stack};

/// drop
/// 1. Pop a value and discard it.
pub fn drop(stack: &mut Stack) -> Result<(), RuntimeError> {
    stack.pop_value()?;
    Ok(())
}
