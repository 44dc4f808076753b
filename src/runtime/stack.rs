//! The mixed operand/control stack.
//!
//! A single stack holds three kinds of entry:
//!
//! ```text
//!   top ->  Value(7)
//!           Label(Block)        <- scope of the innermost block
//!           Value(3)
//!           Activation(frame)   <- locals of the running call
//!           Value(...)          <- caller's operands
//! ```
//!
//! Value pops never cross a marker: popping from a scope with no values is a
//! [`RuntimeError::StackUnderflow`].

use super::control::Label;
use super::RuntimeError;
use crate::wat::ast::Frame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Value(i32),
    Activation(Frame),
    Label(Label),
}

#[derive(Debug, Default)]
pub struct Stack {
    entries: Vec<Entry>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn push_value(&mut self, value: i32) {
        self.entries.push(Entry::Value(value));
    }

    pub fn push_values(&mut self, values: impl IntoIterator<Item = i32>) {
        self.entries.extend(values.into_iter().map(Entry::Value));
    }

    /// Pop a value from the current scope.
    pub fn pop_value(&mut self) -> Result<i32, RuntimeError> {
        match self.entries.last() {
            Some(Entry::Value(v)) => {
                let v = *v;
                self.entries.pop();
                Ok(v)
            }
            _ => Err(RuntimeError::StackUnderflow),
        }
    }

    /// Number of values above the nearest marker.
    pub fn scope_len(&self) -> usize {
        self.entries
            .iter()
            .rev()
            .take_while(|e| matches!(e, Entry::Value(_)))
            .count()
    }

    /// Pop `n` values from the current scope, returned in push order.
    ///
    /// Fails without modifying the stack if the scope holds fewer than `n`.
    pub fn pop_values(&mut self, n: usize) -> Result<Vec<i32>, RuntimeError> {
        let found = self.scope_len();
        if found < n {
            return Err(RuntimeError::ArityMismatch { expected: n, found });
        }
        let values = self.entries.split_off(self.entries.len() - n);
        Ok(values
            .into_iter()
            .map(|e| match e {
                Entry::Value(v) => v,
                _ => 0,
            })
            .collect())
    }

    /// Pop every value above the nearest marker, returned in push order.
    pub fn drain_scope(&mut self) -> Vec<i32> {
        let n = self.scope_len();
        self.pop_values(n).unwrap_or_default()
    }

    pub fn pop_label(&mut self) -> Result<Label, RuntimeError> {
        match self.entries.pop() {
            Some(Entry::Label(label)) => Ok(label),
            _ => Err(RuntimeError::CorruptStack("expected a label marker")),
        }
    }

    /// The innermost label, if the top scope belongs to one.
    pub fn top_label(&self) -> Option<&Label> {
        match self.entries.iter().rev().find(|e| !matches!(e, Entry::Value(_))) {
            Some(Entry::Label(label)) => Some(label),
            _ => None,
        }
    }

    pub fn pop_activation(&mut self) -> Result<Frame, RuntimeError> {
        match self.entries.pop() {
            Some(Entry::Activation(frame)) => Ok(frame),
            _ => Err(RuntimeError::CorruptStack("expected an activation marker")),
        }
    }

    /// The activation at `base`.
    pub fn frame(&self, base: usize) -> Result<&Frame, RuntimeError> {
        match self.entries.get(base) {
            Some(Entry::Activation(frame)) => Ok(frame),
            _ => Err(RuntimeError::CorruptStack("no activation at frame base")),
        }
    }

    pub fn frame_mut(&mut self, base: usize) -> Result<&mut Frame, RuntimeError> {
        match self.entries.get_mut(base) {
            Some(Entry::Activation(frame)) => Ok(frame),
            _ => Err(RuntimeError::CorruptStack("no activation at frame base")),
        }
    }

    /// Number of labels between the activation at `base` and the top.
    pub fn labels_above(&self, base: usize) -> usize {
        self.entries
            .iter()
            .skip(base + 1)
            .filter(|e| matches!(e, Entry::Label(_)))
            .count()
    }

    /// Discard every entry above the activation at `base`.
    pub fn truncate_to_frame(&mut self, base: usize) {
        self.entries.truncate(base + 1);
    }

    /// Remove and return all values, leaving the stack empty.
    ///
    /// Markers still on the stack are discarded.
    pub fn drain_values(&mut self) -> Vec<i32> {
        self.entries
            .drain(..)
            .filter_map(|e| match e {
                Entry::Value(v) => Some(v),
                _ => None,
            })
            .collect()
    }
}
