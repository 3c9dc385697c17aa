//! Command-line designators and the validated generation request built from them.

use std::path::{Path, PathBuf};

use bitflags::bitflags;
use clap::Parser;

use crate::tables::error::{GrammarError, GrammarResult};

/// Raw input/output designators, exactly as given on the command line.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "gramtab", about = "Generate C/C++ lookup tables from SPIR-V JSON grammars")]
pub struct Designators {
    /// Core SPIR-V grammar
    #[arg(long)]
    pub spirv_core_grammar: Option<PathBuf>,
    /// DebugInfo extended instruction set grammar
    #[arg(long)]
    pub extinst_debuginfo_grammar: Option<PathBuf>,
    /// OpenCL.DebugInfo.100 extended instruction set grammar
    #[arg(long)]
    pub extinst_cldebuginfo100_grammar: Option<PathBuf>,
    /// GLSL.std.450 extended instruction set grammar
    #[arg(long)]
    pub extinst_glsl_grammar: Option<PathBuf>,
    /// OpenCL.std extended instruction set grammar
    #[arg(long)]
    pub extinst_opencl_grammar: Option<PathBuf>,
    /// Vendor extended instruction set grammar (extinst.<name>.grammar.json)
    #[arg(long)]
    pub extinst_vendor_grammar: Option<PathBuf>,
    #[arg(long)]
    pub core_insts_output: Option<PathBuf>,
    #[arg(long)]
    pub operand_kinds_output: Option<PathBuf>,
    #[arg(long)]
    pub extension_enum_output: Option<PathBuf>,
    #[arg(long)]
    pub enum_string_mapping_output: Option<PathBuf>,
    #[arg(long)]
    pub glsl_insts_output: Option<PathBuf>,
    #[arg(long)]
    pub opencl_insts_output: Option<PathBuf>,
    #[arg(long)]
    pub vendor_insts_output: Option<PathBuf>,
    /// Prefix applied to every operand kind the vendor grammar declares
    #[arg(long)]
    pub vendor_operand_kind_prefix: Option<String>,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Artifacts: u8 {
        const CORE_INSTS = 0b000_0001;
        const OPERAND_KINDS = 0b000_0010;
        const EXTENSION_ENUM = 0b000_0100;
        const ENUM_STRING_MAPPING = 0b000_1000;
        const GLSL_INSTS = 0b001_0000;
        const OPENCL_INSTS = 0b010_0000;
        const VENDOR_INSTS = 0b100_0000;
        /// Artifacts rendered from the merged core, DebugInfo and OpenCL.DebugInfo.100 grammars.
        const CORE_UNIVERSE = Self::CORE_INSTS.bits()
            | Self::OPERAND_KINDS.bits()
            | Self::EXTENSION_ENUM.bits()
            | Self::ENUM_STRING_MAPPING.bits();
    }
}

/// The three grammars whose union every core-universe artifact is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreGrammars {
    pub core: PathBuf,
    pub debuginfo: PathBuf,
    pub cldebuginfo100: PathBuf,
}

/// One extended instruction set table to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtInstJob {
    pub artifact: Artifacts,
    pub set_name: String,
    pub grammar: PathBuf,
    pub output: PathBuf,
    pub kind_prefix: Option<String>,
}

/// A request whose designators are known to pair up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    artifacts: Artifacts,
    core: Option<CoreGrammars>,
    core_outputs: Vec<(Artifacts, PathBuf)>,
    ext_inst: Vec<ExtInstJob>,
}

impl GenerationRequest {
    /// Checks the designator pairing rules. No file is touched.
    pub fn from_designators(designators: &Designators) -> GrammarResult<Self> {
        let d = designators;
        if d.core_insts_output.is_some() != d.operand_kinds_output.is_some() {
            return Err(GrammarError::configuration(
                "--core-insts-output and --operand-kinds-output must be given together",
            ));
        }

        let core_outputs: Vec<(Artifacts, PathBuf)> = [
            (Artifacts::CORE_INSTS, &d.core_insts_output),
            (Artifacts::OPERAND_KINDS, &d.operand_kinds_output),
            (Artifacts::EXTENSION_ENUM, &d.extension_enum_output),
            (Artifacts::ENUM_STRING_MAPPING, &d.enum_string_mapping_output),
        ]
        .into_iter()
        .filter_map(|(artifact, path)| path.clone().map(|path| (artifact, path)))
        .collect();

        let core_inputs = [
            &d.spirv_core_grammar,
            &d.extinst_debuginfo_grammar,
            &d.extinst_cldebuginfo100_grammar,
        ];
        let core = match (
            &d.spirv_core_grammar,
            &d.extinst_debuginfo_grammar,
            &d.extinst_cldebuginfo100_grammar,
        ) {
            (Some(core), Some(debuginfo), Some(cldebuginfo100)) if !core_outputs.is_empty() => {
                Some(CoreGrammars {
                    core: core.clone(),
                    debuginfo: debuginfo.clone(),
                    cldebuginfo100: cldebuginfo100.clone(),
                })
            }
            _ if !core_outputs.is_empty() => {
                return Err(GrammarError::configuration(
                    "core outputs need --spirv-core-grammar, --extinst-debuginfo-grammar \
                     and --extinst-cldebuginfo100-grammar",
                ));
            }
            _ if core_inputs.iter().any(|input| input.is_some()) => {
                return Err(GrammarError::configuration(
                    "core grammars were given without any core output",
                ));
            }
            _ => None,
        };

        if d.vendor_operand_kind_prefix.is_some() && d.extinst_vendor_grammar.is_none() {
            return Err(GrammarError::configuration(
                "--vendor-operand-kind-prefix requires --extinst-vendor-grammar",
            ));
        }

        let mut ext_inst = Vec::new();
        let pairs = [
            (
                Artifacts::GLSL_INSTS,
                "glsl",
                &d.extinst_glsl_grammar,
                &d.glsl_insts_output,
            ),
            (
                Artifacts::OPENCL_INSTS,
                "opencl",
                &d.extinst_opencl_grammar,
                &d.opencl_insts_output,
            ),
            (
                Artifacts::VENDOR_INSTS,
                "vendor",
                &d.extinst_vendor_grammar,
                &d.vendor_insts_output,
            ),
        ];
        for (artifact, label, grammar, output) in pairs {
            match (grammar, output) {
                (Some(grammar), Some(output)) => {
                    let vendor = artifact == Artifacts::VENDOR_INSTS;
                    ext_inst.push(ExtInstJob {
                        artifact,
                        set_name: if vendor {
                            vendor_set_name(grammar)
                        } else {
                            label.to_string()
                        },
                        grammar: grammar.clone(),
                        output: output.clone(),
                        kind_prefix: if vendor {
                            d.vendor_operand_kind_prefix.clone()
                        } else {
                            None
                        },
                    });
                }
                (None, None) => {}
                _ => {
                    return Err(GrammarError::configuration(format!(
                        "--extinst-{label}-grammar and --{label}-insts-output must be given together"
                    )));
                }
            }
        }

        let artifacts = core_outputs
            .iter()
            .map(|(artifact, _)| *artifact)
            .chain(ext_inst.iter().map(|job| job.artifact))
            .fold(Artifacts::empty(), |acc, artifact| acc | artifact);
        if artifacts.is_empty() {
            return Err(GrammarError::configuration("no output requested"));
        }

        Ok(Self {
            artifacts,
            core,
            core_outputs,
            ext_inst,
        })
    }

    pub fn artifacts(&self) -> Artifacts {
        self.artifacts
    }

    pub fn core(&self) -> Option<&CoreGrammars> {
        self.core.as_ref()
    }

    /// Output path of a core-universe artifact, if it was requested.
    pub fn core_output(&self, artifact: Artifacts) -> Option<&Path> {
        self.core_outputs
            .iter()
            .find(|(candidate, _)| *candidate == artifact)
            .map(|(_, path)| path.as_path())
    }

    pub fn ext_inst_jobs(&self) -> &[ExtInstJob] {
        &self.ext_inst
    }
}

/// Derives the set name from `extinst.<name>.grammar.json`, with `-` mapped to `_`.
/// Falls back to the file stem for other file names.
pub fn vendor_set_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let core = match file_name
        .strip_prefix("extinst.")
        .and_then(|rest| rest.strip_suffix(".grammar.json"))
    {
        Some(name) => name.to_string(),
        None => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    core.replace('-', "_")
}
