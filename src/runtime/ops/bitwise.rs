//! Bitwise operations.

use super::{RuntimeError, Stack};

/// i32.and
/// 1. Pop c2
/// 2. Pop c1
/// 3. Push the bitwise conjunction of c1 and c2
pub fn i32_and(stack: &mut Stack) -> Result<(), RuntimeError> {
    let c2 = stack.pop_value()?;
    let c1 = stack.pop_value()?;
    stack.push_value(c1 & c2);
    Ok(())
}

/// i32.or
/// 1. Pop c2
/// 2. Pop c1
/// 3. Push the bitwise disjunction of c1 and c2
pub fn i32_or(stack: &mut Stack) -> Result<(), RuntimeError> {
    let c2 = stack.pop_value()?;
    let c1 = stack.pop_value()?;
    stack.push_value(c1 | c2);
    Ok(())
}
