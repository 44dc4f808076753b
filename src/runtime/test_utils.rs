//! Test utilities for runtime testing
//!
//! Lets operation tests state a function body as source text and check the
//! values it leaves behind, without writing out the whole module.

#[cfg(test)]
pub mod test {
    use crate::runtime::{Interpreter, RuntimeError};
    use crate::wat::parse;

    /// Fluent builder for a single exported function named `test`.
    pub struct InterpreterTest {
        body: String,
        args: Vec<i32>,
        locals: usize,
        results: usize,
    }

    impl InterpreterTest {
        pub fn new(body: &str) -> Self {
            InterpreterTest {
                body: body.to_string(),
                args: Vec::new(),
                locals: 0,
                results: 0,
            }
        }

        /// Arguments to call with; the function gets one i32 param per argument.
        pub fn args(mut self, args: &[i32]) -> Self {
            self.args = args.to_vec();
            self
        }

        /// Number of extra i32 locals after the params.
        pub fn locals(mut self, n: usize) -> Self {
            self.locals = n;
            self
        }

        /// Number of i32 results.
        pub fn returns(mut self, n: usize) -> Self {
            self.results = n;
            self
        }

        fn source(&self) -> String {
            let group = |kw: &str, n: usize| {
                if n == 0 {
                    String::new()
                } else {
                    format!("({}{})", kw, " i32".repeat(n))
                }
            };
            format!(
                "(module (func (export \"test\") {} {} {}\n{}\n))",
                group("param", self.args.len()),
                group("result", self.results),
                group("local", self.locals),
                self.body
            )
        }

        fn run(&self) -> Result<Vec<i32>, RuntimeError> {
            let source = self.source();
            let module = parse(&source).unwrap_or_else(|e| panic!("test module should parse: {}\n{}", e, source));
            let mut interp = Interpreter::instantiate(&module);
            interp.invoke_export("test", &self.args)
        }

        pub fn expect_stack(self, expected: &[i32]) {
            let results = self.run().expect("Execution should succeed");
            assert_eq!(results, expected);
        }

        pub fn expect_error(self, error_contains: &str) {
            match self.run() {
                Err(e) => {
                    let error_string = e.to_string();
                    assert!(
                        error_string.contains(error_contains),
                        "Expected error containing '{}', got: '{}'",
                        error_contains,
                        error_string
                    );
                }
                Ok(values) => panic!(
                    "Expected error containing '{}', but execution succeeded with {:?}",
                    error_contains, values
                ),
            }
        }
    }
}
