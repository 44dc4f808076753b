//! Numeric operations.
//!
//! All arithmetic is on `i32` with two's-complement wrapping.

use super::{RuntimeError, Stack};

/// i32.const c
/// 1. Push c to the stack.
pub fn i32_const(stack: &mut Stack, value: i32) -> Result<(), RuntimeError> {
    stack.push_value(value);
    Ok(())
}

/// i32.add
/// 1. Pop c2
/// 2. Pop c1
/// 3. Push c1 + c2 modulo 2^32
pub fn i32_add(stack: &mut Stack) -> Result<(), RuntimeError> {
    let c2 = stack.pop_value()?;
    let c1 = stack.pop_value()?;
    stack.push_value(c1.wrapping_add(c2));
    Ok(())
}

/// i32.sub
/// 1. Pop c2
/// 2. Pop c1
/// 3. Push c1 - c2 modulo 2^32
pub fn i32_sub(stack: &mut Stack) -> Result<(), RuntimeError> {
    let c2 = stack.pop_value()?;
    let c1 = stack.pop_value()?;
    stack.push_value(c1.wrapping_sub(c2));
    Ok(())
}
