//! Parsed module representation.
//!
//! All identifiers are resolved during parsing: the tree holds only indices
//! and label depths, never names. Names survive only in [`Module::env`] for
//! diagnostics.

use super::env::{IdentifierEnvironment, IndexSpace};
use super::token::{Keyword, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValType {
    I32,
    I64,
    F32,
    F64,
}

impl ValType {
    pub fn from_keyword(kw: Keyword) -> Option<ValType> {
        match kw {
            Keyword::I32 => Some(ValType::I32),
            Keyword::I64 => Some(ValType::I64),
            Keyword::F32 => Some(ValType::F32),
            Keyword::F64 => Some(ValType::F64),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FuncType {
    pub params: Vec<ValType>,
    pub results: Vec<ValType>,
}

/// A parameter or declared local. Every slot holds an `i32` at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Local {
    pub ty: ValType,
    pub name: Option<String>,
    pub value: i32,
}

impl Local {
    pub fn new(ty: ValType, name: Option<String>) -> Self {
        Self { ty, name, value: 0 }
    }
}

/// Frame template for a function: parameters followed by declared locals.
///
/// The interpreter clones the template for every call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub locals: Vec<Local>,
    pub arg_arity: usize,
    pub results: Vec<ValType>,
}

impl Frame {
    pub fn arg_arity(&self) -> usize {
        self.arg_arity
    }

    pub fn return_arity(&self) -> usize {
        self.results.len()
    }

    pub fn local(&self, idx: u32) -> Option<i32> {
        self.locals.get(idx as usize).map(|l| l.value)
    }

    /// Store into a local slot. Returns false if the index is out of range.
    pub fn set_local(&mut self, idx: u32, value: i32) -> bool {
        match self.locals.get_mut(idx as usize) {
            Some(local) => {
                local.value = value;
                true
            }
            None => false,
        }
    }

    /// Index of the first parameter or local named `name`.
    pub fn local_index(&self, name: &str) -> Option<u32> {
        self.locals
            .iter()
            .position(|l| l.name.as_deref() == Some(name))
            .map(|idx| idx as u32)
    }

    pub fn signature(&self) -> FuncType {
        FuncType {
            params: self.locals[..self.arg_arity].iter().map(|l| l.ty).collect(),
            results: self.results.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// A resolved index: function, local, global, or label depth.
    Index(u32),
    Literal(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Block,
    Loop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Plain {
        opcode: Keyword,
        operand: Option<Operand>,
        span: Span,
    },
    Structured {
        kind: BlockKind,
        label: Option<String>,
        body: Vec<Instruction>,
        span: Span,
    },
}

impl Instruction {
    pub fn plain(opcode: Keyword, operand: Option<Operand>, span: Span) -> Self {
        Instruction::Plain { opcode, operand, span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Func {
    pub index: u32,
    pub type_index: u32,
    pub frame: Frame,
    pub body: Vec<Instruction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min: u32,
    pub max: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportDesc {
    Func { index: u32, type_index: u32, frame: Frame },
    Memory { index: u32, limits: Limits },
    Table { index: u32 },
    Global { index: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub module: String,
    pub name: String,
    pub desc: ImportDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportDesc {
    Func(u32),
    Table(u32),
    Memory(u32),
    Global(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub name: String,
    pub desc: ExportDesc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub index: u32,
    pub ty: FuncType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Func(Func),
    Import(Import),
    Export(Export),
    Type(TypeDef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: Option<String>,
    pub fields: Vec<Field>,
    pub env: IdentifierEnvironment,
}

impl Module {
    pub fn funcs(&self) -> impl Iterator<Item = &Func> {
        self.fields.iter().filter_map(|f| match f {
            Field::Func(func) => Some(func),
            _ => None,
        })
    }

    pub fn imports(&self) -> impl Iterator<Item = &Import> {
        self.fields.iter().filter_map(|f| match f {
            Field::Import(import) => Some(import),
            _ => None,
        })
    }

    pub fn exports(&self) -> impl Iterator<Item = &Export> {
        self.fields.iter().filter_map(|f| match f {
            Field::Export(export) => Some(export),
            _ => None,
        })
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.fields.iter().filter_map(|f| match f {
            Field::Type(ty) => Some(ty),
            _ => None,
        })
    }

    /// Name of a function for diagnostics, falling back to its index.
    pub fn func_name(&self, index: u32) -> String {
        match self.env.name(IndexSpace::Func, index) {
            Some(name) => format!("${}", name),
            None => index.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame {
            locals: vec![
                Local::new(ValType::I32, Some("a".into())),
                Local::new(ValType::I32, None),
                Local::new(ValType::I32, Some("tmp".into())),
            ],
            arg_arity: 2,
            results: vec![ValType::I32],
        }
    }

    #[test]
    fn frame_arities() {
        let f = frame();
        assert_eq!(f.arg_arity(), 2);
        assert_eq!(f.return_arity(), 1);
        assert_eq!(
            f.signature(),
            FuncType {
                params: vec![ValType::I32, ValType::I32],
                results: vec![ValType::I32],
            }
        );
    }

    #[test]
    fn locals_start_at_zero_and_are_settable() {
        let mut f = frame();
        assert_eq!(f.local(2), Some(0));
        assert!(f.set_local(2, -5));
        assert_eq!(f.local(2), Some(-5));
        assert!(!f.set_local(3, 1));
        assert_eq!(f.local(3), None);
    }

    #[test]
    fn local_lookup_by_name() {
        let f = frame();
        assert_eq!(f.local_index("a"), Some(0));
        assert_eq!(f.local_index("tmp"), Some(2));
        assert_eq!(f.local_index("b"), None);
    }
}
