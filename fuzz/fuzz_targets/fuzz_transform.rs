#![no_main]

use coroc::transform::{TransformOptions, transform_module};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut module) = coro_parser::parse_module(source) else {
        return;
    };
    let options = TransformOptions::default();
    if transform_module(&mut module, &options).is_err() {
        return;
    }
    // Lowered output must reparse and lower to itself.
    let printed = coro_ast::print::print_module(&module);
    let mut again = coro_parser::parse_module(&printed).expect("generated module reparses");
    transform_module(&mut again, &options).expect("generated module lowers again");
    assert_eq!(coro_ast::print::print_module(&again), printed);
});
