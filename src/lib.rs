// Library target shared by the binary, the integration tests and the
// criterion benchmarks. Terminal code (app, event, ui) lives in the binary.

pub mod config;
pub mod engine;
pub mod generator;
pub mod session;
pub mod speech;
