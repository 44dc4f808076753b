#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde::Deserialize;
    use std::fs;
    use std::path::PathBuf;
    use watrun::runtime::Interpreter;
    use watrun::wat;

    /// One module plus the calls to make against it, or the parse error it
    /// should produce.
    #[derive(Deserialize, Debug)]
    struct Fixture {
        #[allow(unused)]
        description: String,
        source: String,
        #[serde(default)]
        parse_error: Option<String>,
        #[serde(default)]
        invocations: Vec<Invocation>,
    }

    #[derive(Deserialize, Debug)]
    struct Invocation {
        export: String,
        args: Vec<i32>,
        #[serde(default)]
        expected: Option<Vec<i32>>,
        #[serde(default)]
        error: Option<String>,
    }

    fn load(path: &PathBuf) -> Fixture {
        let json = fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
        serde_json::from_str(&json).unwrap_or_else(|e| panic!("Failed to decode {}: {}", path.display(), e))
    }

    #[rstest]
    fn fixture(#[files("tests/fixtures/*.json")] path: PathBuf) {
        let fixture = load(&path);
        let name = path.file_stem().unwrap().to_string_lossy().into_owned();

        let parsed = wat::parse(&fixture.source);
        if let Some(expected) = &fixture.parse_error {
            let err = parsed.expect_err(&format!("{}: expected a parse error", name));
            let message = err.to_string();
            assert!(
                message.contains(expected.as_str()),
                "{}: expected parse error containing '{}', got '{}'",
                name,
                expected,
                message
            );
            return;
        }

        let module = parsed.unwrap_or_else(|e| panic!("{}: failed to parse: {}", name, e));
        let mut interp = Interpreter::instantiate(&module);
        assert!(!fixture.invocations.is_empty(), "{}: nothing to run", name);

        for call in &fixture.invocations {
            let outcome = interp.invoke_export(&call.export, &call.args);
            match (&call.expected, &call.error, outcome) {
                (Some(expected), None, Ok(values)) => {
                    assert_eq!(&values, expected, "{}: {}{:?}", name, call.export, call.args)
                }
                (None, Some(expected), Err(e)) => assert!(
                    e.to_string().contains(expected.as_str()),
                    "{}: {}{:?} expected error containing '{}', got '{}'",
                    name,
                    call.export,
                    call.args,
                    expected,
                    e
                ),
                (expected, error, outcome) => panic!(
                    "{}: {}{:?} expected {:?} / error {:?}, got {:?}",
                    name, call.export, call.args, expected, error, outcome
                ),
            }
        }
    }
}
