//! Recursive-descent parser: tokens -> [`Module`].
//!
//! # Design
//!
//! 1. **Grammar correspondence**: each `parse_*` method implements one grammar
//!    production, shown in its doc comment.
//!
//! 2. **Two-token lookahead**: the parser only ever inspects the current and
//!    next token (plus fixed offsets during pre-declaration).
//!
//! 3. **Pre-declaration**: before fields are parsed, one pass over the module
//!    allocates every function, table, memory, global, elem and data index and
//!    parses every type definition, so references may point forward. The main
//!    pass then claims those indices in the same order.
//!
//! 4. **Resolved output**: names are resolved as they are parsed. The
//!    resulting tree contains indices and label depths only.

use super::ast::{
    BlockKind, Export, ExportDesc, Field, Frame, Func, FuncType, Import, ImportDesc, Instruction, Limits, Local,
    Module, Operand, TypeDef, ValType,
};
use super::env::{Identifier, IdentifierEnvironment, IndexSpace};
use super::error::ParseError;
use super::lexer::Lexer;
use super::token::{Keyword, Span, Token, TokenKind};
use crate::recursion::ensure_sufficient_stack;
use std::collections::HashMap;

/// Lex and parse a complete module.
///
/// ```
/// let module = watrun::wat::parse(r#"(module (func (export "f") (result i32) i32.const 7))"#).unwrap();
/// assert_eq!(module.funcs().count(), 1);
/// assert_eq!(module.exports().next().unwrap().name, "f");
/// ```
pub fn parse(source: &str) -> Result<Module, ParseError> {
    let tokens = Lexer::tokenise(source)?;
    Parser::new(tokens).parse_module()
}

/// The index space a skippable module field defines, if any.
fn definition_space(kw: Keyword) -> Option<IndexSpace> {
    match kw {
        Keyword::Table => Some(IndexSpace::Table),
        Keyword::Memory => Some(IndexSpace::Memory),
        Keyword::Global => Some(IndexSpace::Global),
        Keyword::Elem => Some(IndexSpace::Elem),
        Keyword::Data => Some(IndexSpace::Data),
        _ => None,
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    env: IdentifierEnvironment,
    /// Signatures indexed by type index, explicit and synthetic.
    types: Vec<FuncType>,
    /// Explicit type definitions, parsed during pre-declaration.
    type_defs: Vec<TypeDef>,
    next_type_def: usize,
    /// Indices handed out so far in the main pass, per space.
    claimed: HashMap<IndexSpace, u32>,
    /// Enclosing block/loop labels, innermost last.
    labels: Vec<Option<String>>,
}

// ============================================================================
// Token cursor
// ============================================================================

impl Parser {
    /// Create a parser over `tokens`. An `Eof` token is appended if missing.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().map_or(false, Token::is_eof) {
            let span = tokens.last().map_or(Span::ZERO, |t| {
                Span::new(t.span.end, t.span.end, t.span.line, t.span.column)
            });
            tokens.push(Token::new(TokenKind::Eof, "", span));
        }
        Self {
            tokens,
            pos: 0,
            env: IdentifierEnvironment::new(),
            types: Vec::new(),
            type_defs: Vec::new(),
            next_type_def: 0,
            claimed: HashMap::new(),
            labels: Vec::new(),
        }
    }

    /// Token `n` places ahead of the current one, clamped to `Eof`.
    fn nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    fn current(&self) -> &Token {
        self.nth(0)
    }

    fn peek(&self) -> &Token {
        self.nth(1)
    }

    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    fn error_here(&self, expected: &str) -> ParseError {
        let token = self.current();
        ParseError::expected(expected, &token.kind, token.span)
    }

    fn expect_lparen(&mut self) -> Result<Span, ParseError> {
        if self.current().kind != TokenKind::LeftParen {
            return Err(self.error_here("'('"));
        }
        Ok(self.bump().span)
    }

    fn expect_rparen(&mut self) -> Result<(), ParseError> {
        if self.current().kind != TokenKind::RightParen {
            return Err(self.error_here("')'"));
        }
        self.bump();
        Ok(())
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<Span, ParseError> {
        if !self.current().is_keyword(kw) {
            return Err(self.error_here(&format!("'{}'", kw)));
        }
        Ok(self.bump().span)
    }

    fn expect_string(&mut self) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::String(s) => {
                let s = s.clone();
                self.bump();
                Ok(s)
            }
            _ => Err(self.error_here("string")),
        }
    }

    fn expect_u32(&mut self, what: &str) -> Result<u32, ParseError> {
        match self.current().kind {
            TokenKind::Integer(n) => {
                let span = self.current().span;
                let value = u32::try_from(n).map_err(|_| ParseError::expected(what, format!("integer {}", n), span))?;
                self.bump();
                Ok(value)
            }
            _ => Err(self.error_here(what)),
        }
    }

    fn eat_id(&mut self) -> Option<String> {
        match &self.current().kind {
            TokenKind::Id(name) => {
                let name = name.clone();
                self.bump();
                Some(name)
            }
            _ => None,
        }
    }

    /// Whether the next two tokens are `(` and `kw`.
    fn at_group(&self, kw: Keyword) -> bool {
        self.current().kind == TokenKind::LeftParen && self.peek().is_keyword(kw)
    }

    fn at_valtype(&self) -> bool {
        self.current().keyword().map_or(false, Keyword::is_valtype)
    }

    fn expect_valtype(&mut self) -> Result<ValType, ParseError> {
        match self.current().keyword().and_then(ValType::from_keyword) {
            Some(ty) => {
                self.bump();
                Ok(ty)
            }
            None => Err(self.error_here("value type")),
        }
    }

    /// Skip a balanced parenthesised group starting at the current `(`.
    fn skip_group(&mut self) -> Result<(), ParseError> {
        self.expect_lparen()?;
        self.skip_to_close()
    }

    /// Skip tokens up to and including the `)` closing the current group.
    fn skip_to_close(&mut self) -> Result<(), ParseError> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.current().kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                TokenKind::Eof => return Err(self.error_here("')'")),
                _ => {}
            }
            self.bump();
        }
        Ok(())
    }

    /// `id | u32`
    fn parse_ident(&mut self, what: &str) -> Result<(Identifier, Span), ParseError> {
        let span = self.current().span;
        match self.current().kind.clone() {
            TokenKind::Id(name) => {
                self.bump();
                Ok((Identifier::Name(name), span))
            }
            TokenKind::Integer(_) => Ok((Identifier::Index(self.expect_u32(what)?), span)),
            _ => Err(self.error_here(what)),
        }
    }

    fn resolve(&self, space: IndexSpace, ident: &Identifier, span: Span) -> Result<u32, ParseError> {
        self.env
            .resolve(space, ident)
            .ok_or_else(|| ParseError::unresolved(space.name(), ident.clone(), span))
    }

    /// Hand out the next pre-declared index in `space`.
    fn claim(&mut self, space: IndexSpace) -> u32 {
        let next = self.claimed.entry(space).or_insert(0);
        let idx = *next;
        *next += 1;
        idx
    }

    fn resolve_label(&self, name: &str, span: Span) -> Result<u32, ParseError> {
        self.labels
            .iter()
            .rev()
            .position(|label| label.as_deref() == Some(name))
            .map(|depth| depth as u32)
            .ok_or_else(|| ParseError::undefined("label", name, span))
    }
}

// ============================================================================
// Module
// ============================================================================

impl Parser {
    /// `( module id? field* ) EOF`
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_module(mut self) -> Result<Module, ParseError> {
        self.expect_lparen()?;
        self.expect_keyword(Keyword::Module)?;
        let id = self.eat_id();

        self.predeclare()?;

        let mut fields = Vec::new();
        while self.current().kind == TokenKind::LeftParen {
            self.parse_field(&mut fields)?;
        }
        self.expect_rparen()?;
        if !self.current().is_eof() {
            return Err(self.error_here("end of input"));
        }

        tracing::debug!(
            fields = fields.len(),
            funcs = self.env.len(IndexSpace::Func),
            types = self.env.len(IndexSpace::Type),
            "parsed module"
        );
        Ok(Module {
            id,
            fields,
            env: self.env,
        })
    }

    /// Allocate indices for every definition ahead of the main pass.
    fn predeclare(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        while self.current().kind == TokenKind::LeftParen {
            let head = self.peek().keyword();
            match head {
                Some(Keyword::Type) => {
                    let def = self.parse_type_field()?;
                    self.type_defs.push(def);
                    continue;
                }
                Some(Keyword::Func) => {
                    let name = self.id_at(2);
                    self.env.allocate(IndexSpace::Func, name.as_deref());
                }
                Some(Keyword::Import) => {
                    // ( import "m" "n" ( kind id? ...
                    let space = self.nth(5).keyword().and_then(|kw| match kw {
                        Keyword::Func => Some(IndexSpace::Func),
                        other => definition_space(other),
                    });
                    if let Some(space) = space {
                        let name = self.id_at(6);
                        self.env.allocate(space, name.as_deref());
                    }
                }
                Some(kw) => {
                    if let Some(space) = definition_space(kw) {
                        let name = self.id_at(2);
                        self.env.allocate(space, name.as_deref());
                    }
                }
                None => {}
            }
            self.skip_group()?;
        }
        self.pos = start;
        Ok(())
    }

    fn id_at(&self, n: usize) -> Option<String> {
        match &self.nth(n).kind {
            TokenKind::Id(name) => Some(name.clone()),
            _ => None,
        }
    }

    fn parse_field(&mut self, fields: &mut Vec<Field>) -> Result<(), ParseError> {
        let head = self.peek().clone();
        match head.kind {
            TokenKind::Keyword(Keyword::Func) => self.parse_func(fields),
            TokenKind::Keyword(Keyword::Export) => {
                let export = self.parse_export()?;
                fields.push(Field::Export(export));
                Ok(())
            }
            TokenKind::Keyword(Keyword::Import) => {
                let import = self.parse_import()?;
                fields.push(Field::Import(import));
                Ok(())
            }
            TokenKind::Keyword(Keyword::Type) => {
                let def = self
                    .type_defs
                    .get(self.next_type_def)
                    .cloned()
                    .ok_or_else(|| self.error_here("pre-declared type definition"))?;
                self.next_type_def += 1;
                self.skip_group()?;
                fields.push(Field::Type(def));
                Ok(())
            }
            TokenKind::Keyword(kw) if definition_space(kw).is_some() => {
                if let Some(space) = definition_space(kw) {
                    let index = self.claim(space);
                    tracing::debug!(field = %kw, index, "skipping module field");
                }
                self.skip_group()
            }
            _ => {
                tracing::warn!(field = %head.text, span = %head.span, "skipping unrecognised module field");
                self.skip_group()
            }
        }
    }

    /// `( type id? ( func param* result* ) )`
    ///
    /// Allocates the type index; only called during pre-declaration.
    fn parse_type_field(&mut self) -> Result<TypeDef, ParseError> {
        self.expect_lparen()?;
        self.expect_keyword(Keyword::Type)?;
        let name = self.eat_id();
        self.expect_lparen()?;
        self.expect_keyword(Keyword::Func)?;
        let params = self.parse_bindings(Keyword::Param)?;
        let results = self.parse_results()?;
        self.expect_rparen()?;
        self.expect_rparen()?;

        let ty = FuncType {
            params: params.iter().map(|l| l.ty).collect(),
            results,
        };
        let index = self.env.allocate(IndexSpace::Type, name.as_deref());
        self.types.push(ty.clone());
        Ok(TypeDef { index, ty })
    }

    /// `( export "name" ( func|table|memory|global idx ) )`
    fn parse_export(&mut self) -> Result<Export, ParseError> {
        self.expect_lparen()?;
        self.expect_keyword(Keyword::Export)?;
        let name = self.expect_string()?;
        self.expect_lparen()?;

        let kind = self.current().keyword();
        let space = match kind {
            Some(Keyword::Func) => IndexSpace::Func,
            Some(Keyword::Table) => IndexSpace::Table,
            Some(Keyword::Memory) => IndexSpace::Memory,
            Some(Keyword::Global) => IndexSpace::Global,
            _ => return Err(self.error_here("export descriptor")),
        };
        self.bump();
        let (ident, span) = self.parse_ident("index")?;
        let index = self.resolve(space, &ident, span)?;
        self.expect_rparen()?;
        self.expect_rparen()?;

        let desc = match space {
            IndexSpace::Table => ExportDesc::Table(index),
            IndexSpace::Memory => ExportDesc::Memory(index),
            IndexSpace::Global => ExportDesc::Global(index),
            _ => ExportDesc::Func(index),
        };
        Ok(Export { name, desc })
    }

    /// `( import "module" "name" importdesc )`
    ///
    /// ```text
    /// importdesc ::= ( func id? typeuse )
    ///              | ( memory id? min max? )
    ///              | ( table id? ... )
    ///              | ( global id? ... )
    /// ```
    fn parse_import(&mut self) -> Result<Import, ParseError> {
        self.expect_lparen()?;
        self.expect_keyword(Keyword::Import)?;
        let module = self.expect_string()?;
        let name = self.expect_string()?;
        self.expect_lparen()?;

        let desc = match self.current().keyword() {
            Some(Keyword::Func) => {
                self.bump();
                let index = self.claim(IndexSpace::Func);
                self.eat_id();
                let (type_index, frame) = self.parse_typeuse()?;
                self.expect_rparen()?;
                ImportDesc::Func {
                    index,
                    type_index,
                    frame,
                }
            }
            Some(Keyword::Memory) => {
                self.bump();
                let index = self.claim(IndexSpace::Memory);
                self.eat_id();
                let min = self.expect_u32("memory limit")?;
                let max = match self.current().kind {
                    TokenKind::Integer(_) => Some(self.expect_u32("memory limit")?),
                    _ => None,
                };
                self.expect_rparen()?;
                ImportDesc::Memory {
                    index,
                    limits: Limits { min, max },
                }
            }
            Some(Keyword::Table) => {
                self.bump();
                let index = self.claim(IndexSpace::Table);
                self.skip_to_close()?;
                ImportDesc::Table { index }
            }
            Some(Keyword::Global) => {
                self.bump();
                let index = self.claim(IndexSpace::Global);
                self.skip_to_close()?;
                ImportDesc::Global { index }
            }
            _ => return Err(self.error_here("import descriptor")),
        };
        self.expect_rparen()?;
        Ok(Import { module, name, desc })
    }
}

// ============================================================================
// Functions
// ============================================================================

impl Parser {
    /// `( func id? ( export "name" )* ( import "m" "n" )? typeuse local* instr* )`
    ///
    /// Inline exports become separate export fields. An inline import turns
    /// the function into an import field and forbids locals and a body.
    fn parse_func(&mut self, fields: &mut Vec<Field>) -> Result<(), ParseError> {
        self.expect_lparen()?;
        self.expect_keyword(Keyword::Func)?;
        let index = self.claim(IndexSpace::Func);
        self.eat_id();

        let mut exports = Vec::new();
        while self.at_group(Keyword::Export) {
            self.bump();
            self.bump();
            let name = self.expect_string()?;
            self.expect_rparen()?;
            exports.push(Field::Export(Export {
                name,
                desc: ExportDesc::Func(index),
            }));
        }

        let inline_import = if self.at_group(Keyword::Import) {
            self.bump();
            self.bump();
            let module = self.expect_string()?;
            let name = self.expect_string()?;
            self.expect_rparen()?;
            Some((module, name))
        } else {
            None
        };

        let (type_index, mut frame) = self.parse_typeuse()?;

        if let Some((module, name)) = inline_import {
            self.expect_rparen()?;
            fields.push(Field::Import(Import {
                module,
                name,
                desc: ImportDesc::Func {
                    index,
                    type_index,
                    frame,
                },
            }));
        } else {
            frame.locals.extend(self.parse_bindings(Keyword::Local)?);
            self.labels.clear();
            let body = self.parse_instrs(&frame)?;
            self.expect_rparen()?;
            fields.push(Field::Func(Func {
                index,
                type_index,
                frame,
                body,
            }));
        }
        fields.extend(exports);
        Ok(())
    }

    /// `( type idx )? param* result*`
    ///
    /// With an explicit type and no inline params or results, the signature
    /// comes from the referenced type. Without an explicit type a fresh type
    /// index is allocated for the inline signature.
    fn parse_typeuse(&mut self) -> Result<(u32, Frame), ParseError> {
        let explicit = if self.at_group(Keyword::Type) {
            self.bump();
            self.bump();
            let (ident, span) = self.parse_ident("type index")?;
            let index = self.resolve(IndexSpace::Type, &ident, span)?;
            if index as usize >= self.types.len() {
                return Err(ParseError::unresolved("type", Identifier::Index(index), span));
            }
            self.expect_rparen()?;
            Some(index)
        } else {
            None
        };

        let params = self.parse_bindings(Keyword::Param)?;
        let results = self.parse_results()?;

        match explicit {
            Some(index) if params.is_empty() && results.is_empty() => {
                let ty = &self.types[index as usize];
                let frame = Frame {
                    locals: ty.params.iter().map(|ty| Local::new(*ty, None)).collect(),
                    arg_arity: ty.params.len(),
                    results: ty.results.clone(),
                };
                Ok((index, frame))
            }
            Some(index) => Ok((index, Self::frame(params, results))),
            None => {
                let frame = Self::frame(params, results);
                let index = self.env.allocate(IndexSpace::Type, None);
                self.types.push(frame.signature());
                Ok((index, frame))
            }
        }
    }

    fn frame(params: Vec<Local>, results: Vec<ValType>) -> Frame {
        Frame {
            arg_arity: params.len(),
            locals: params,
            results,
        }
    }

    /// `( param valtype valtype+ )` or `( param id? valtype? )`, repeated.
    /// The same grammar serves `local`.
    ///
    /// A group is treated as abbreviated when its first two tokens are both
    /// value types; anything else is parsed as the single-binding form.
    fn parse_bindings(&mut self, kw: Keyword) -> Result<Vec<Local>, ParseError> {
        let mut bindings = Vec::new();
        while self.at_group(kw) {
            self.bump();
            self.bump();
            let abbreviated = self.at_valtype() && self.peek().keyword().map_or(false, Keyword::is_valtype);
            if abbreviated {
                while self.at_valtype() {
                    let ty = self.expect_valtype()?;
                    bindings.push(Local::new(ty, None));
                }
            } else {
                let name = self.eat_id();
                if name.is_some() || self.at_valtype() {
                    let ty = self.expect_valtype()?;
                    bindings.push(Local::new(ty, name));
                }
            }
            self.expect_rparen()?;
        }
        Ok(bindings)
    }

    /// `( result valtype* )*`
    fn parse_results(&mut self) -> Result<Vec<ValType>, ParseError> {
        let mut results = Vec::new();
        while self.at_group(Keyword::Result) {
            self.bump();
            self.bump();
            while self.at_valtype() {
                results.push(self.expect_valtype()?);
            }
            self.expect_rparen()?;
        }
        Ok(results)
    }
}

// ============================================================================
// Instructions
// ============================================================================

impl Parser {
    /// `instr*`, stopping before `)`, `end` or end of input.
    fn parse_instrs(&mut self, frame: &Frame) -> Result<Vec<Instruction>, ParseError> {
        let mut body = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::RightParen | TokenKind::Eof | TokenKind::Keyword(Keyword::End) => break,
                TokenKind::LeftParen => ensure_sufficient_stack(|| self.parse_folded(frame, &mut body))?,
                TokenKind::Keyword(Keyword::Block) | TokenKind::Keyword(Keyword::Loop) => {
                    body.push(ensure_sufficient_stack(|| self.parse_flat_block(frame))?)
                }
                _ => body.push(self.parse_plain(frame)?),
            }
        }
        Ok(body)
    }

    fn block_kind(&self) -> Option<BlockKind> {
        match self.current().keyword() {
            Some(Keyword::Block) => Some(BlockKind::Block),
            Some(Keyword::Loop) => Some(BlockKind::Loop),
            _ => None,
        }
    }

    /// `( block|loop id? (result t*)? instr* end id? )`, without the parentheses.
    ///
    /// A result annotation is accepted but not checked; branches carry
    /// whatever the innermost scope holds.
    fn parse_flat_block(&mut self, frame: &Frame) -> Result<Instruction, ParseError> {
        let kind = self.block_kind().ok_or_else(|| self.error_here("'block' or 'loop'"))?;
        let span = self.bump().span;
        let label = self.eat_id();
        self.parse_results()?;

        self.labels.push(label.clone());
        let body = self.parse_instrs(frame)?;
        self.labels.pop();

        self.expect_keyword(Keyword::End)?;
        let close_span = self.current().span;
        if let Some(trailing) = self.eat_id() {
            if label.as_deref() != Some(trailing.as_str()) {
                let expected = match &label {
                    Some(name) => format!("label ${}", name),
                    None => "no label".to_string(),
                };
                return Err(ParseError::expected(expected, format!("${}", trailing), close_span));
            }
        }

        Ok(Instruction::Structured {
            kind,
            label,
            body,
            span,
        })
    }

    /// Folded forms:
    ///
    /// ```text
    /// ( block|loop id? instr* )
    /// ( plaininstr folded* )
    /// ```
    ///
    /// Operands of a folded plain instruction are emitted before it.
    fn parse_folded(&mut self, frame: &Frame, out: &mut Vec<Instruction>) -> Result<(), ParseError> {
        self.expect_lparen()?;

        if let Some(kind) = self.block_kind() {
            let span = self.bump().span;
            let label = self.eat_id();
            self.parse_results()?;
            self.labels.push(label.clone());
            let body = self.parse_instrs(frame)?;
            self.labels.pop();
            self.expect_rparen()?;
            out.push(Instruction::Structured {
                kind,
                label,
                body,
                span,
            });
            return Ok(());
        }

        let instr = self.parse_plain(frame)?;
        while self.current().kind == TokenKind::LeftParen {
            ensure_sufficient_stack(|| self.parse_folded(frame, out))?;
        }
        self.expect_rparen()?;
        out.push(instr);
        Ok(())
    }

    /// A plain instruction keyword and its immediate operand, if it takes one.
    fn parse_plain(&mut self, frame: &Frame) -> Result<Instruction, ParseError> {
        let token = self.current().clone();
        let opcode = match &token.kind {
            TokenKind::Keyword(kw) if kw.is_instruction() && self.block_kind().is_none() => *kw,
            TokenKind::Reserved(word) => {
                return Err(ParseError::UnknownInstruction {
                    name: word.clone(),
                    span: token.span,
                })
            }
            _ => return Err(self.error_here("instruction")),
        };
        self.bump();

        let operand = match opcode {
            Keyword::Call => {
                let (ident, span) = self.parse_ident("function index")?;
                Some(Operand::Index(self.resolve(IndexSpace::Func, &ident, span)?))
            }
            Keyword::LocalGet | Keyword::LocalSet | Keyword::LocalTee => {
                let (ident, span) = self.parse_ident("local index")?;
                let idx = match ident {
                    Identifier::Index(idx) => idx,
                    Identifier::Name(name) => frame
                        .local_index(&name)
                        .ok_or_else(|| ParseError::undefined("local", &name, span))?,
                };
                Some(Operand::Index(idx))
            }
            Keyword::GlobalGet | Keyword::GlobalSet => {
                let (ident, span) = self.parse_ident("global index")?;
                Some(Operand::Index(self.resolve(IndexSpace::Global, &ident, span)?))
            }
            Keyword::Br | Keyword::BrIf => {
                let (ident, span) = self.parse_ident("label")?;
                let depth = match ident {
                    Identifier::Index(depth) => depth,
                    Identifier::Name(name) => self.resolve_label(&name, span)?,
                };
                Some(Operand::Index(depth))
            }
            Keyword::CallIndirect => {
                let mut operand = None;
                if self.at_group(Keyword::Type) {
                    self.bump();
                    self.bump();
                    let (ident, span) = self.parse_ident("type index")?;
                    operand = Some(Operand::Index(self.resolve(IndexSpace::Type, &ident, span)?));
                    self.expect_rparen()?;
                }
                while self.at_group(Keyword::Param) || self.at_group(Keyword::Result) {
                    self.skip_group()?;
                }
                operand
            }
            Keyword::I32Const => {
                let (value, span) = self.expect_integer()?;
                if value < i64::from(i32::MIN) || value > i64::from(u32::MAX) {
                    return Err(ParseError::ConstOutOfRange { value, span });
                }
                // Values above i32::MAX are unsigned spellings of negative i32s.
                Some(Operand::Literal(i64::from(value as i32)))
            }
            Keyword::I64Const | Keyword::F32Const | Keyword::F64Const => {
                let (value, _) = self.expect_integer()?;
                Some(Operand::Literal(value))
            }
            _ => None,
        };

        Ok(Instruction::plain(opcode, operand, token.span))
    }

    fn expect_integer(&mut self) -> Result<(i64, Span), ParseError> {
        match self.current().kind {
            TokenKind::Integer(value) => {
                let span = self.bump().span;
                Ok((value, span))
            }
            _ => Err(self.error_here("integer")),
        }
    }
}
