//! Integer tests and comparisons. Results are 1 for true and 0 for false.

use super::{RuntimeError, Stack};

fn compare(stack: &mut Stack, op: impl Fn(i32, i32) -> bool) -> Result<(), RuntimeError> {
    let c2 = stack.pop_value()?;
    let c1 = stack.pop_value()?;
    stack.push_value(i32::from(op(c1, c2)));
    Ok(())
}

/// i32.eqz
/// 1. Pop c
/// 2. Push 1 if c is zero, else 0
pub fn i32_eqz(stack: &mut Stack) -> Result<(), RuntimeError> {
    let c = stack.pop_value()?;
    stack.push_value(i32::from(c == 0));
    Ok(())
}

/// i32.eq
pub fn i32_eq(stack: &mut Stack) -> Result<(), RuntimeError> {
    compare(stack, |c1, c2| c1 == c2)
}

/// i32.lt_s
/// 1. Pop c2
/// 2. Pop c1
/// 3. Push 1 if c1 < c2 as signed integers, else 0
pub fn i32_lt_s(stack: &mut Stack) -> Result<(), RuntimeError> {
    compare(stack, |c1, c2| c1 < c2)
}

/// i32.gt_u
/// 1. Pop c2
/// 2. Pop c1
/// 3. Push 1 if c1 > c2 as unsigned integers, else 0
pub fn i32_gt_u(stack: &mut Stack) -> Result<(), RuntimeError> {
    compare(stack, |c1, c2| (c1 as u32) > (c2 as u32))
}

/// i32.ge_s
/// 1. Pop c2
/// 2. Pop c1
/// 3. Push 1 if c1 >= c2 as signed integers, else 0
pub fn i32_ge_s(stack: &mut Stack) -> Result<(), RuntimeError> {
    compare(stack, |c1, c2| c1 >= c2)
}

#[cfg(test)]
mod tests {
    use crate::runtime::test_utils::test::InterpreterTest;
    use rstest::rstest;

    #[rstest]
    #[case("i32.const 0 i32.eqz", 1)]
    #[case("i32.const 5 i32.eqz", 0)]
    #[case("i32.const 4 i32.const 4 i32.eq", 1)]
    #[case("i32.const 4 i32.const -4 i32.eq", 0)]
    #[case("i32.const -1 i32.const 0 i32.lt_s", 1)]
    #[case("i32.const 0 i32.const -1 i32.lt_s", 0)]
    #[case("i32.const -1 i32.const 0 i32.gt_u", 1)]
    #[case("i32.const 1 i32.const 2 i32.gt_u", 0)]
    #[case("i32.const 3 i32.const 3 i32.ge_s", 1)]
    #[case("i32.const -3 i32.const 3 i32.ge_s", 0)]
    fn comparisons(#[case] body: &str, #[case] expected: i32) {
        InterpreterTest::new(body).returns(1).expect_stack(&[expected]);
    }

    #[test]
    fn comparison_needs_two_operands() {
        InterpreterTest::new("i32.const 1 i32.ge_s").expect_error("Stack underflow");
    }
}
