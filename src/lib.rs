//! Generates C/C++ lookup tables (instruction descriptors, operand-kind tables, extension
//! enumerations, enum/string mappings) from SPIR-V style JSON grammar documents.

pub mod driver;
pub mod loader;
pub mod tables;

pub use driver::{Designators, GenerationRequest};
pub use tables::{GeneratorConfig, GrammarError, GrammarResult};
