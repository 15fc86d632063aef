//! Cross-stage test suites for the compilation pipeline.

mod codegen_tests;
mod error_tests;
