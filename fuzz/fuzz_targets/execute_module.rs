#![no_main]

use libfuzzer_sys::fuzz_target;

use watrun::runtime::{Config, Interpreter};
use watrun::wat::ast::ExportDesc;
use watrun::wat::parse;

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);
    // TODO: add an instruction budget to Config so modules with loops can run here
    if source.contains("loop") {
        return;
    }
    let module = match parse(&source) {
        Ok(m) => m,
        Err(_) => return,
    };

    // Keep runaway recursion cheap
    let config = Config::default().with_max_call_depth(64);
    let mut interp = Interpreter::with_config(&module, config);

    for export in module.exports() {
        if let ExportDesc::Func(_) = export.desc {
            // Wrong arity is fine; it exercises the error path
            let _ = interp.invoke_export(&export.name, &[]);
            let _ = interp.invoke_export(&export.name, &[1, -1]);
        }
    }
});
