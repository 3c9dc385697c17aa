//! Grammar-to-table transformation engine.
//!
//! A loaded [`Grammar`] flows through a fixed pipeline: [`merge`] reconciles aliased
//! enumerants in place, then the [`instruction`] and [`operand_kind`] builders resolve operand
//! types through [`operand`] and requirement lists through [`pool`], and [`extension`] derives
//! the extension universe. Every stage either produces a complete table or fails the pass.

pub mod builder;
pub mod config;
pub mod digest;
pub mod error;
pub mod extension;
pub mod instruction;
pub mod merge;
pub mod model;
pub mod operand;
pub mod operand_kind;
pub mod pool;
pub mod version;


pub use builder::GrammarBuilder;
pub use config::{GeneratorConfig, RenameRule};
pub use digest::GrammarDigest;
pub use error::{GrammarError, GrammarResult};
pub use extension::{CapabilityNames, ExtensionRegistry, render_string_mappings};
pub use instruction::{ExtInstTable, InstructionTable, InstructionTableBuilder};
pub use merge::merge_aliased_extensions;
pub use model::{Grammar, Instruction, OperandKind, Quantifier};
pub use operand::OperandKindCanonicalizer;
pub use operand_kind::{OperandKindTable, OperandKindTableBuilder};
pub use pool::{ArrayRef, NamePool, PoolKind};
pub use version::{GrammarVersion, VersionWord};
