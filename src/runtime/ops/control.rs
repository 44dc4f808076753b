//! Branch and return operations.
//!
//! Branch targets are label depths counted outward from the innermost
//! enclosing block or loop. Unwinding happens at the branch site; the
//! enclosing structured instructions then only have to count the returned
//! [`BlockEnd::Branch`] depth down to zero.

use super::{BlockEnd, RuntimeError, Stack};
use crate::runtime::stack::Entry;

/// Unwind the stack for a branch to label depth `depth`.
///
/// Steps:
/// 1. If the activation at `base` has no more than `depth` labels above it,
///    the target is the function itself: perform a return.
/// 2. Take the values of the innermost scope (they travel with the branch).
/// 3. Repeat `depth + 1` times: discard the values down to the nearest
///    marker and pop that label.
/// 4. If the last label popped belongs to a loop, push it back so the loop
///    can run again; the travelling values are dropped.
/// 5. Otherwise push the travelling values, which become the block's result.
/// 6. Return `Branch(depth)` so enclosing instructions can unwind to the target.
fn perform_branch(
    stack: &mut Stack,
    base: usize,
    depth: u32,
    return_arity: usize,
) -> Result<BlockEnd, RuntimeError> {
    if depth as usize >= stack.labels_above(base) {
        return return_op(stack, base, return_arity);
    }

    let carried = stack.drain_scope();
    let mut target = None;
    for _ in 0..=depth {
        stack.drain_scope();
        target = Some(stack.pop_label()?);
    }
    let target = target.ok_or(RuntimeError::InvalidLabel(depth))?;

    tracing::trace!(depth, kind = ?target.kind, carried = carried.len(), "branch");
    if target.is_loop() {
        stack.push(Entry::Label(target));
    } else {
        stack.push_values(carried);
    }
    Ok(BlockEnd::Branch(depth))
}

/// br l
/// 1. Unwind to label l (see [`perform_branch`]).
pub fn br(stack: &mut Stack, base: usize, depth: u32, return_arity: usize) -> Result<BlockEnd, RuntimeError> {
    perform_branch(stack, base, depth, return_arity)
}

/// br_if l
/// 1. Pop the condition c.
/// 2. If c is non-zero, execute `br l`.
/// 3. Else, do nothing.
pub fn br_if(stack: &mut Stack, base: usize, depth: u32, return_arity: usize) -> Result<BlockEnd, RuntimeError> {
    let condition = stack.pop_value()?;
    if condition != 0 {
        perform_branch(stack, base, depth, return_arity)
    } else {
        Ok(BlockEnd::Normal)
    }
}

/// return
/// 1. Pop `return_arity` values from the current scope.
/// 2. Discard every value and label above the activation at `base`.
/// 3. Push the popped values back.
/// 4. Return `BlockEnd::Return`, which every enclosing block and loop passes on.
pub fn return_op(stack: &mut Stack, base: usize, return_arity: usize) -> Result<BlockEnd, RuntimeError> {
    let results = stack.pop_values(return_arity)?;
    stack.truncate_to_frame(base);
    stack.push_values(results);
    Ok(BlockEnd::Return)
}
