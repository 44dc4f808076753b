//! Tree-walking interpreter.
//!
//! # Call protocol
//!
//! 1. Check the call depth against [`Config::max_call_depth`].
//! 2. Clone the callee's frame template and pop `arg_arity` values into its
//!    first locals. The most recently pushed value lands in local 0.
//! 3. Push the frame as an activation marker and run the body.
//! 4. Pop `return_arity` results, discard anything else above the marker,
//!    pop the marker and push the results back for the caller.

use super::config::Config;
use super::control::{BlockEnd, BlockKind, Label};
use super::ops;
use super::stack::{Entry, Stack};
use super::RuntimeError;
use crate::wat::ast::{ExportDesc, Frame, Func, Import, ImportDesc, Instruction, Module, Operand};
use crate::recursion::ensure_sufficient_stack;
use crate::wat::Keyword;
use std::collections::HashMap;

/// A callable function: defined in the module or imported into it.
#[derive(Debug, Clone, Copy)]
enum Callee<'m> {
    Defined(&'m Func),
    Imported(&'m Import, &'m Frame),
}

impl<'m> Callee<'m> {
    fn frame(&self) -> &'m Frame {
        match *self {
            Callee::Defined(func) => &func.frame,
            Callee::Imported(_, frame) => frame,
        }
    }
}

pub struct Interpreter<'m> {
    module: &'m Module,
    config: Config,
    stack: Stack,
    funcs: HashMap<u32, Callee<'m>>,
    exports: HashMap<&'m str, ExportDesc>,
    depth: usize,
}

impl<'m> Interpreter<'m> {
    /// Prepare `module` for execution with the default [`Config`].
    pub fn instantiate(module: &'m Module) -> Self {
        Self::with_config(module, Config::default())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(module = module.id.as_deref().unwrap_or("")))]
    pub fn with_config(module: &'m Module, config: Config) -> Self {
        let mut funcs = HashMap::new();
        for func in module.funcs() {
            funcs.insert(func.index, Callee::Defined(func));
        }
        for import in module.imports() {
            if let ImportDesc::Func { index, frame, .. } = &import.desc {
                funcs.insert(*index, Callee::Imported(import, frame));
            }
        }

        let mut exports = HashMap::new();
        for export in module.exports() {
            exports.entry(export.name.as_str()).or_insert(export.desc);
        }

        tracing::debug!(funcs = funcs.len(), exports = exports.len(), "instantiated module");
        Interpreter {
            module,
            config,
            stack: Stack::new(),
            funcs,
            exports,
            depth: 0,
        }
    }

    pub fn module(&self) -> &'m Module {
        self.module
    }

    /// Call an exported function by name.
    ///
    /// A missing export yields an empty result rather than an error; use
    /// [`invoke_export`](Self::invoke_export) to tell the two apart.
    pub fn call_extern(&mut self, name: &str, args: &[i32]) -> Result<Vec<i32>, RuntimeError> {
        match self.invoke_export(name, args) {
            Err(RuntimeError::UnknownExport(_)) => {
                tracing::warn!(export = name, "no such export, returning no values");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Call an exported function by name, failing if it does not exist.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn invoke_export(&mut self, name: &str, args: &[i32]) -> Result<Vec<i32>, RuntimeError> {
        let index = match self.exports.get(name) {
            Some(ExportDesc::Func(index)) => *index,
            Some(_) => return Err(RuntimeError::ExportNotFunction(name.to_string())),
            None => return Err(RuntimeError::UnknownExport(name.to_string())),
        };
        self.invoke(index, args)
    }

    /// Call a function by index with `args`, returning every value left on
    /// the stack afterwards.
    pub fn invoke(&mut self, index: u32, args: &[i32]) -> Result<Vec<i32>, RuntimeError> {
        let callee = self.callee(index)?;
        let expected = callee.frame().arg_arity();
        if args.len() != expected {
            return Err(RuntimeError::ArityMismatch {
                expected,
                found: args.len(),
            });
        }

        self.stack.clear();
        self.depth = 0;
        self.stack.push_values(args.iter().copied());
        let outcome = self.call(index);
        let values = self.stack.drain_values();
        outcome.map(|()| values)
    }

    fn callee(&self, index: u32) -> Result<Callee<'m>, RuntimeError> {
        self.funcs
            .get(&index)
            .copied()
            .ok_or(RuntimeError::UnknownFunction(index))
    }

    /// Run one call following the call protocol.
    fn call(&mut self, index: u32) -> Result<(), RuntimeError> {
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::CallStackOverflow(self.config.max_call_depth));
        }
        let func = match self.callee(index)? {
            Callee::Defined(func) => func,
            Callee::Imported(import, _) => {
                return Err(RuntimeError::UnlinkedImport {
                    module: import.module.clone(),
                    name: import.name.clone(),
                })
            }
        };

        let mut frame = func.frame.clone();
        let arity = frame.arg_arity();
        let args = self.stack.pop_values(arity)?;
        for (local, value) in frame.locals.iter_mut().zip(args.into_iter().rev()) {
            local.value = value;
        }
        let return_arity = frame.return_arity();

        tracing::trace!(func = %self.module.func_name(index), depth = self.depth, "call");
        let base = self.stack.len();
        self.stack.push(Entry::Activation(frame));
        self.depth += 1;
        let outcome = ensure_sufficient_stack(|| self.execute_sequence(&func.body, base));
        self.depth -= 1;

        match outcome? {
            BlockEnd::Normal | BlockEnd::Return => {}
            BlockEnd::Branch(depth) => return Err(RuntimeError::InvalidLabel(depth)),
        }

        let results = self.stack.pop_values(return_arity)?;
        self.stack.truncate_to_frame(base);
        self.stack.pop_activation()?;
        self.stack.push_values(results);
        Ok(())
    }

    fn execute_sequence(&mut self, body: &'m [Instruction], base: usize) -> Result<BlockEnd, RuntimeError> {
        for instruction in body {
            match self.execute_instruction(instruction, base)? {
                BlockEnd::Normal => continue,
                other => return Ok(other),
            }
        }
        Ok(BlockEnd::Normal)
    }

    /// Run a block or loop body under a fresh label.
    fn execute_structured(
        &mut self,
        kind: BlockKind,
        body: &'m [Instruction],
        base: usize,
    ) -> Result<BlockEnd, RuntimeError> {
        let label = match kind {
            BlockKind::Block => Label::block(),
            BlockKind::Loop => Label::for_loop(),
        };
        self.stack.push(Entry::Label(label));

        let mut pc = 0;
        while pc < body.len() {
            match self.execute_instruction(&body[pc], base)? {
                BlockEnd::Normal => pc += 1,
                // The branch site already unwound the stack to this label.
                BlockEnd::Branch(0) => match kind {
                    BlockKind::Loop => {
                        pc = self
                            .stack
                            .top_label()
                            .map(|l| l.resume)
                            .ok_or(RuntimeError::CorruptStack("loop label missing after branch"))?;
                    }
                    BlockKind::Block => return Ok(BlockEnd::Normal),
                },
                BlockEnd::Branch(depth) => return Ok(BlockEnd::Branch(depth - 1)),
                BlockEnd::Return => return Ok(BlockEnd::Return),
            }
        }

        let values = self.stack.drain_scope();
        self.stack.pop_label()?;
        self.stack.push_values(values);
        Ok(BlockEnd::Normal)
    }

    fn execute_instruction(&mut self, instruction: &'m Instruction, base: usize) -> Result<BlockEnd, RuntimeError> {
        let (opcode, operand) = match instruction {
            Instruction::Structured { kind, body, .. } => {
                return ensure_sufficient_stack(|| self.execute_structured(*kind, body, base))
            }
            Instruction::Plain { opcode, operand, .. } => (*opcode, *operand),
        };

        let index = || match operand {
            Some(Operand::Index(idx)) => Ok(idx),
            _ => Err(RuntimeError::MissingOperand(opcode.to_string())),
        };

        match opcode {
            Keyword::LocalGet => ops::variable::local_get(&mut self.stack, base, index()?)?,
            Keyword::LocalSet => ops::variable::local_set(&mut self.stack, base, index()?)?,
            Keyword::LocalTee => ops::variable::local_tee(&mut self.stack, base, index()?)?,
            Keyword::Call => self.call(index()?)?,
            Keyword::I32Const => {
                let value = match operand {
                    Some(Operand::Literal(value)) => value as i32,
                    _ => return Err(RuntimeError::MissingOperand(opcode.to_string())),
                };
                ops::numeric::i32_const(&mut self.stack, value)?
            }
            Keyword::I32Add => ops::numeric::i32_add(&mut self.stack)?,
            Keyword::I32Sub => ops::numeric::i32_sub(&mut self.stack)?,
            Keyword::I32Eqz => ops::comparison::i32_eqz(&mut self.stack)?,
            Keyword::I32Eq => ops::comparison::i32_eq(&mut self.stack)?,
            Keyword::I32LtS => ops::comparison::i32_lt_s(&mut self.stack)?,
            Keyword::I32GtU => ops::comparison::i32_gt_u(&mut self.stack)?,
            Keyword::I32GeS => ops::comparison::i32_ge_s(&mut self.stack)?,
            Keyword::I32And => ops::bitwise::i32_and(&mut self.stack)?,
            Keyword::I32Or => ops::bitwise::i32_or(&mut self.stack)?,
            Keyword::Drop => ops::parametric::drop(&mut self.stack)?,
            Keyword::Nop => {}
            Keyword::Br => {
                let arity = self.stack.frame(base)?.return_arity();
                return ops::control::br(&mut self.stack, base, index()?, arity);
            }
            Keyword::BrIf => {
                let arity = self.stack.frame(base)?.return_arity();
                return ops::control::br_if(&mut self.stack, base, index()?, arity);
            }
            Keyword::Return => {
                let arity = self.stack.frame(base)?.return_arity();
                return ops::control::return_op(&mut self.stack, base, arity);
            }
            other => return Err(RuntimeError::UnimplementedInstruction(other.to_string())),
        }
        Ok(BlockEnd::Normal)
    }
}
