//! Generation pass: load the requested grammars, build every table, then write the results.
//!
//! Rendering happens entirely in memory. Output files are only created once every requested
//! artifact rendered successfully, so a failing pass leaves no partial output behind.

pub mod artifact;
pub mod request;

pub use artifact::{RenderedArtifact, write_artifacts};
pub use request::{Artifacts, CoreGrammars, Designators, ExtInstJob, GenerationRequest, vendor_set_name};

use crate::loader::GrammarLoader;
use crate::tables::config::GeneratorConfig;
use crate::tables::error::GrammarResult;
use crate::tables::extension::{CapabilityNames, ExtensionRegistry, render_string_mappings};
use crate::tables::instruction::InstructionTableBuilder;
use crate::tables::merge::merge_aliased_extensions;
use crate::tables::model::Grammar;
use crate::tables::operand_kind::OperandKindTableBuilder;

/// Renders every artifact `request` asks for without touching the output paths.
pub fn render(request: &GenerationRequest, config: &GeneratorConfig) -> GrammarResult<Vec<RenderedArtifact>> {
    let mut rendered = Vec::new();
    if let Some(core) = request.core() {
        render_core_universe(core, request, config, &mut rendered)?;
    }
    for job in request.ext_inst_jobs() {
        rendered.push(render_ext_inst(job, config)?);
    }
    Ok(rendered)
}

/// Renders, then writes. Returns the artifacts that were written.
pub fn run(request: &GenerationRequest, config: &GeneratorConfig) -> GrammarResult<Vec<RenderedArtifact>> {
    let rendered = render(request, config)?;
    write_artifacts(&rendered)?;
    Ok(rendered)
}

fn render_core_universe(
    core: &CoreGrammars,
    request: &GenerationRequest,
    config: &GeneratorConfig,
    out: &mut Vec<RenderedArtifact>,
) -> GrammarResult<()> {
    let mut loader = GrammarLoader::new();
    let core_grammar = loader.load(&core.core, None)?;
    let core_digest = loader.digest();
    let debuginfo = loader.load(&core.debuginfo, None)?;
    let cldebuginfo100 = loader.load(&core.cldebuginfo100, Some(config.debug_info_kind_prefix()))?;
    let digest = loader.digest();

    // The opcode table only covers core instructions; extended sets get their own tables.
    if let Some(path) = request.core_output(Artifacts::CORE_INSTS) {
        let table = InstructionTableBuilder::new(config).build(&core_grammar.instructions)?;
        out.push(RenderedArtifact::new(
            Artifacts::CORE_INSTS,
            path,
            &core_digest,
            &table.render(config),
        ));
    }

    let mut universe = Grammar::merged([core_grammar, debuginfo, cldebuginfo100]);
    let registry = ExtensionRegistry::build(&universe, config)?;
    let merged = merge_aliased_extensions(&mut universe.operand_kinds);
    tracing::debug!(enumerants = merged, "reconciled aliased enumerants");

    if let Some(path) = request.core_output(Artifacts::OPERAND_KINDS) {
        let table = OperandKindTableBuilder::new(config).build(&universe.operand_kinds)?;
        out.push(RenderedArtifact::new(
            Artifacts::OPERAND_KINDS,
            path,
            &digest,
            &table.render(config),
        ));
    }
    if let Some(path) = request.core_output(Artifacts::EXTENSION_ENUM) {
        out.push(RenderedArtifact::new(
            Artifacts::EXTENSION_ENUM,
            path,
            &digest,
            &registry.render_enum(),
        ));
    }
    if let Some(path) = request.core_output(Artifacts::ENUM_STRING_MAPPING) {
        let capabilities = CapabilityNames::collect(&universe, config);
        out.push(RenderedArtifact::new(
            Artifacts::ENUM_STRING_MAPPING,
            path,
            &digest,
            &render_string_mappings(&registry, &capabilities, config),
        ));
    }
    Ok(())
}

fn render_ext_inst(job: &ExtInstJob, config: &GeneratorConfig) -> GrammarResult<RenderedArtifact> {
    let mut loader = GrammarLoader::new();
    let grammar = loader.load(&job.grammar, job.kind_prefix.as_deref())?;
    let table = InstructionTableBuilder::new(config).build_extended(&job.set_name, &grammar.instructions)?;
    Ok(RenderedArtifact::new(
        job.artifact,
        &job.output,
        &loader.digest(),
        &table.render(config),
    ))
}
