//! Labels and block outcomes for structured control flow.

pub use crate::wat::ast::BlockKind;

/// A label marker on the mixed stack, one per active block or loop.
///
/// Branching to a block continues after it. Branching to a loop continues
/// at `resume`, the index of the first instruction of the loop body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    pub kind: BlockKind,
    pub resume: usize,
}

impl Label {
    pub fn block() -> Self {
        Label {
            kind: BlockKind::Block,
            resume: 0,
        }
    }

    pub fn for_loop() -> Self {
        Label {
            kind: BlockKind::Loop,
            resume: 0,
        }
    }

    pub fn is_loop(&self) -> bool {
        self.kind == BlockKind::Loop
    }
}

/// How execution of an instruction sequence ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEnd {
    /// Fell through to the next instruction.
    Normal,
    /// A branch is unwinding; the payload is the number of enclosing
    /// structured instructions still to exit before reaching its target.
    Branch(u32),
    /// The function is returning; results are already in place above the activation.
    Return,
}
