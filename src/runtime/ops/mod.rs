//! Instruction implementations, grouped by category.
//!
//! Every operation works on the mixed [`Stack`] and only ever pops values from
//! the current scope.

pub mod bitwise;
pub mod comparison;
pub mod control;
pub mod numeric;
pub mod parametric;
pub mod variable;

pub(crate) use crate::runtime::control::BlockEnd;
pub(crate) use crate::runtime::stack::Stack;
pub(crate) use crate::runtime::RuntimeError;
