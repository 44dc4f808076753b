//! A lexer, parser and tree-walking interpreter for a subset of the
//! WebAssembly text format.
//!
//! watrun runs S-expression source directly, with no binary encoding step:
//! source text is lexed into tokens, parsed into a module tree with every
//! identifier resolved to an index, and executed over a single stack that
//! mixes operand values with call and block markers.
//!
//! # Modules
//!
//! - [`wat`] -- Lexer, identifier environment and parser.
//! - [`runtime`] -- Interpreter, mixed stack and instruction implementations.
//!
//! # Example
//!
//! ```
//! use watrun::wat;
//! use watrun::runtime::Interpreter;
//!
//! let module = wat::parse(r#"
//!     (module
//!         (func (export "add") (param i32 i32) (result i32)
//!             local.get 0
//!             local.get 1
//!             i32.add))
//! "#).unwrap();
//!
//! let mut interp = Interpreter::instantiate(&module);
//! assert_eq!(interp.call_extern("add", &[2, 3]).unwrap(), vec![5]);
//! ```
//!
//! # Supported instructions
//!
//! `local.get`, `local.set`, `local.tee`, `call`, `i32.const`, `i32.add`,
//! `i32.sub`, `i32.eqz`, `i32.eq`, `i32.lt_s`, `i32.gt_u`, `i32.ge_s`,
//! `i32.and`, `i32.or`, `drop`, `nop`, `block`, `loop`, `br`, `br_if` and
//! `return`. Every value is an `i32`. Other instructions parse but fail at
//! run time.

mod recursion;
pub mod runtime;
pub mod wat;

use std::sync::Once;

use runtime::{Config, Interpreter, RuntimeError};
use wat::ParseError;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
/// Enable with `RUST_LOG=watrun=debug` or `RUST_LOG=watrun=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// Any failure from [`run`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Parse `source` and call its export `name` once with `args`.
///
/// A missing export is an error here, unlike [`Interpreter::call_extern`].
///
/// ```
/// let results = watrun::run(
///     r#"(module (func (export "seven") (result i32) i32.const 7))"#,
///     "seven",
///     &[],
/// ).unwrap();
/// assert_eq!(results, vec![7]);
/// ```
pub fn run(source: &str, name: &str, args: &[i32]) -> Result<Vec<i32>, Error> {
    run_with_config(source, name, args, Config::default())
}

pub fn run_with_config(source: &str, name: &str, args: &[i32], config: Config) -> Result<Vec<i32>, Error> {
    let module = wat::parse(source)?;
    let mut interp = Interpreter::with_config(&module, config);
    Ok(interp.invoke_export(name, args)?)
}
