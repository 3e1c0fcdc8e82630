#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    // Parse errors are expected; panics are not.
    if let Ok(module) = coro_parser::parse_module(source) {
        let printed = coro_ast::print::print_module(&module);
        assert!(coro_parser::parse_module(&printed).is_ok(), "printed module must reparse");
    }
});
