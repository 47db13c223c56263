mod common;
mod compile_tests;
mod module_set_tests;
mod parameter_tests;
