//! Extract code blocks, dependencies, and input examples from a document and run
//! each block with its language's toolchain.

pub mod config;
pub mod error;
pub mod execution;
pub mod install;
pub mod language;
pub mod memory;
pub mod parser;
pub mod pipeline;
pub mod printer;
pub mod process;
pub mod report;
pub mod utils;

pub use error::{Error, Result};
