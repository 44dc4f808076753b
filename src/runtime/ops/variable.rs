//! Local variable operations.
//!
//! Locals live in the activation marker at `base`, the stack position of
//! the running call.

use super::{RuntimeError, Stack};

/// local.get x
/// 1. Let F be the activation at `base`.
/// 2. Push F.locals[x].
pub fn local_get(stack: &mut Stack, base: usize, idx: u32) -> Result<(), RuntimeError> {
    let value = stack
        .frame(base)?
        .local(idx)
        .ok_or(RuntimeError::LocalIndexOutOfBounds(idx))?;
    stack.push_value(value);
    Ok(())
}

/// local.set x
/// 1. Pop val.
/// 2. Replace F.locals[x] with val.
pub fn local_set(stack: &mut Stack, base: usize, idx: u32) -> Result<(), RuntimeError> {
    let value = stack.pop_value()?;
    if !stack.frame_mut(base)?.set_local(idx, value) {
        return Err(RuntimeError::LocalIndexOutOfBounds(idx));
    }
    Ok(())
}

/// local.tee x
/// 1. Pop val.
/// 2. Push val.
/// 3. Replace F.locals[x] with val.
pub fn local_tee(stack: &mut Stack, base: usize, idx: u32) -> Result<(), RuntimeError> {
    let value = stack.pop_value()?;
    stack.push_value(value);
    if !stack.frame_mut(base)?.set_local(idx, value) {
        return Err(RuntimeError::LocalIndexOutOfBounds(idx));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::runtime::test_utils::test::InterpreterTest;

    #[test]
    fn arguments_bind_in_reverse_push_order() {
        // 4 is pushed last, so it lands in local 0
        InterpreterTest::new("local.get 0 local.get 1 i32.sub")
            .args(&[10, 4])
            .returns(1)
            .expect_stack(&[-6]);
    }

    #[test]
    fn declared_locals_start_at_zero() {
        InterpreterTest::new("local.get 1")
            .args(&[9])
            .locals(1)
            .returns(1)
            .expect_stack(&[0]);
    }

    #[test]
    fn local_set_then_get() {
        InterpreterTest::new("i32.const 5 local.set 0 local.get 0")
            .locals(1)
            .returns(1)
            .expect_stack(&[5]);
    }

    #[test]
    fn local_tee_keeps_value() {
        InterpreterTest::new("i32.const 8 local.tee 0 local.get 0 i32.add")
            .locals(1)
            .returns(1)
            .expect_stack(&[16]);
    }

    #[test]
    fn local_out_of_bounds() {
        InterpreterTest::new("local.get 3")
            .locals(1)
            .expect_error("Local variable index out of bounds: 3");
    }

    #[test]
    fn local_set_underflow() {
        InterpreterTest::new("local.set 0")
            .locals(1)
            .expect_error("Stack underflow");
    }
}
