mod common;

#[cfg(test)]
mod tests {
    use crate::common::{invoke, module, single_func, FIB_RECURSIVE};
    use rstest::rstest;
    use watrun::runtime::{Config, Interpreter, RuntimeError};
    use watrun::wat::{Identifier, IndexSpace};

    const ADD: &str = r#"(module (func (export "f") (param i32 i32) (result i32) local.get 0 local.get 1 i32.add))"#;

    #[rstest]
    #[case(2, 3, 5)]
    #[case(0, 0, 0)]
    #[case(-7, 3, -4)]
    #[case(i32::MAX, 1, i32::MIN)]
    fn add(#[case] a: i32, #[case] b: i32, #[case] expected: i32) {
        assert_eq!(invoke(ADD, "f", &[a, b]), vec![expected]);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(2, 1)]
    #[case(7, 13)]
    #[case(10, 55)]
    fn fib_recursive(#[case] n: i32, #[case] expected: i32) {
        assert_eq!(invoke(FIB_RECURSIVE, "fib", &[n]), vec![expected]);
    }

    #[rstest]
    #[case(1)]
    #[case(5)]
    #[case(100)]
    fn loop_accumulates_until_counter_reaches_zero(#[case] n: i32) {
        // Sum n + (n-1) + ... + 1
        let source = single_func(
            1,
            "(local $acc i32)
             loop $again
                local.get $acc local.get 0 i32.add local.set $acc
                local.get 0 i32.const 1 i32.sub local.tee 0
                br_if 0
             end
             local.get $acc",
        );
        assert_eq!(invoke(&source, "f", &[n]), vec![n * (n + 1) / 2]);
    }

    #[test]
    fn br_0_keeps_values_in_order() {
        let source = r#"(module (func (export "f") (result i32 i32)
            block
                i32.const 1
                i32.const 2
                br 0
                i32.const 3
            end))"#;
        assert_eq!(invoke(source, "f", &[]), vec![1, 2]);
    }

    #[test]
    fn br_1_from_loop_exits_both() {
        let source = single_func(
            0,
            "block
                loop
                    i32.const 9
                    br 1
                end
                i32.const 99
             end",
        );
        assert_eq!(invoke(&source, "f", &[]), vec![9]);
    }

    #[test]
    fn repeated_calls_are_isolated() {
        let source = single_func(
            1,
            "(local $seen i32)
             local.get $seen
             local.get 0
             i32.add
             local.tee $seen",
        );
        let module = module(&source);

        let mut first = Interpreter::instantiate(&module);
        let mut second = Interpreter::instantiate(&module);
        let a = first.call_extern("f", &[4]).unwrap();
        let b = first.call_extern("f", &[4]).unwrap();
        let c = second.call_extern("f", &[4]).unwrap();
        assert_eq!(a, vec![4]);
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn missing_export_yields_empty_results() {
        let module = module(ADD);
        let mut interp = Interpreter::instantiate(&module);
        assert_eq!(interp.call_extern("nope", &[1, 2]).unwrap(), Vec::<i32>::new());
        assert_eq!(
            interp.invoke_export("nope", &[1, 2]),
            Err(RuntimeError::UnknownExport("nope".to_string()))
        );
    }

    #[test]
    fn forward_call() {
        let source = r#"(module
            (func (export "f") (result i32) call $later i32.const 1 i32.add)
            (func $later (result i32) i32.const 41))"#;
        assert_eq!(invoke(source, "f", &[]), vec![42]);
    }

    #[test]
    fn named_and_numeric_references_agree() {
        let named = r#"(module
            (func $first (result i32) i32.const 1)
            (func $sub (export "f") (param $a i32) (param $b i32) (result i32)
                (local $tmp i32)
                local.get $a
                local.get $b
                i32.sub
                local.set $tmp
                block $out
                    local.get $tmp
                    br $out
                end))"#;
        let numeric = r#"(module
            (func (result i32) i32.const 1)
            (func (export "f") (param i32 i32) (result i32)
                (local i32)
                local.get 0
                local.get 1
                i32.sub
                local.set 2
                block
                    local.get 2
                    br 0
                end))"#;
        assert_eq!(invoke(named, "f", &[10, 3]), invoke(numeric, "f", &[10, 3]));

        let module = module(named);
        let env = &module.env;
        assert_eq!(
            env.resolve(IndexSpace::Func, &Identifier::from("sub")),
            env.resolve(IndexSpace::Func, &Identifier::from(1))
        );
    }

    #[test]
    fn folded_and_flat_agree() {
        let folded = single_func(2, "(i32.sub (i32.add (local.get 0) (local.get 1)) (i32.const 1))");
        let flat = single_func(2, "local.get 0 local.get 1 i32.add i32.const 1 i32.sub");
        for args in [[1, 2], [-5, 5], [100, -1]] {
            assert_eq!(invoke(&folded, "f", &args), invoke(&flat, "f", &args));
        }
    }

    #[test]
    fn type_use_sets_arity() {
        let source = r#"(module
            (type $binop (func (param i32 i32) (result i32)))
            (func (export "f") (type $binop) local.get 0 local.get 1 i32.or))"#;
        assert_eq!(invoke(source, "f", &[0b1010, 0b0101]), vec![0b1111]);
    }

    #[test]
    fn recursion_past_limit_overflows() {
        let source = r#"(module (func $forever (export "f") (result i32) call $forever))"#;
        let module = module(source);
        let mut interp = Interpreter::with_config(&module, Config::default().with_max_call_depth(50));
        assert_eq!(interp.invoke_export("f", &[]), Err(RuntimeError::CallStackOverflow(50)));
    }

    #[rstest]
    #[case(&[10, 3], -7)]
    #[case(&[3, 10], 7)]
    #[case(&[0, 1], 1)]
    fn last_argument_binds_to_local_zero(#[case] args: &[i32], #[case] expected: i32) {
        let source = single_func(2, "local.get 0 local.get 1 i32.sub");
        assert_eq!(invoke(&source, "f", args), vec![expected]);
    }

    #[test]
    fn deep_recursion_at_default_limit() {
        // Each level nests blocks inside the call to deepen native recursion.
        let source = r#"(module
            (func $count (export "count") (param $n i32) (result i32)
                (block $base
                    (block
                        (block
                            (br_if $base (i32.eqz (local.get $n)))
                            (return (i32.add
                                (call $count (i32.sub (local.get $n) (i32.const 1)))
                                (i32.const 1))))))
                (i32.const 0)))"#;
        let module = module(source);
        let mut interp = Interpreter::instantiate(&module);
        let limit = Config::default().max_call_depth as i32;
        assert_eq!(interp.invoke_export("count", &[limit - 1]), Ok(vec![limit - 1]));
        assert_eq!(
            interp.invoke_export("count", &[5000]),
            Err(RuntimeError::CallStackOverflow(limit as usize))
        );
    }

    #[test]
    fn argument_count_mismatch() {
        let module = module(ADD);
        let mut interp = Interpreter::instantiate(&module);
        assert_eq!(
            interp.invoke_export("f", &[1]),
            Err(RuntimeError::ArityMismatch { expected: 2, found: 1 })
        );
    }

    #[test]
    fn run_facade_reports_both_stages() {
        assert_eq!(watrun::run(ADD, "f", &[20, 22]).unwrap(), vec![42]);
        assert!(matches!(watrun::run("(module", "f", &[]), Err(watrun::Error::Parse(_))));
        assert!(matches!(
            watrun::run(ADD, "g", &[]),
            Err(watrun::Error::Runtime(RuntimeError::UnknownExport(_)))
        ));
    }
}
