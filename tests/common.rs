//! Common test utilities shared between integration tests

#![allow(dead_code)]

use watrun::runtime::Interpreter;
use watrun::wat::{self, ast::Module};

/// Parse `source`, panicking with the source text on failure.
pub fn module(source: &str) -> Module {
    wat::parse(source).unwrap_or_else(|e| panic!("module should parse: {}\n{}", e, source))
}

/// Parse, instantiate and invoke `export` once.
pub fn invoke(source: &str, export: &str, args: &[i32]) -> Vec<i32> {
    let module = module(source);
    let mut interp = Interpreter::instantiate(&module);
    interp
        .invoke_export(export, args)
        .unwrap_or_else(|e| panic!("{} should run: {}", export, e))
}

/// Wrap a function body in a module exporting it as `f` with `params`
/// i32 params and one i32 result.
pub fn single_func(params: usize, body: &str) -> String {
    let params = if params == 0 {
        String::new()
    } else {
        format!("(param{})", " i32".repeat(params))
    };
    format!("(module (func (export \"f\") {} (result i32)\n{}\n))", params, body)
}

pub const FIB_RECURSIVE: &str = r#"
(module
  (func $fib (export "fib") (param $n i32) (result i32)
    block $recurse
      local.get $n
      i32.const 2
      i32.ge_s
      br_if $recurse
      local.get $n
      return
    end
    local.get $n
    i32.const 1
    i32.sub
    call $fib
    local.get $n
    i32.const 2
    i32.sub
    call $fib
    i32.add))
"#;
