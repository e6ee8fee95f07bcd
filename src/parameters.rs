// Standard Library Imports
use std::collections::hash_map::Entry;

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use elemental::Count;
use knuffel::{Decode, span::Span};
use miette::{Diagnostic, Result};
use serde::Serialize;
use thiserror::Error;

// Local Crate Imports
use crate::{ChainSlot, ChainType, TerminalOptions, kdl::ValidationErrorKind};

// Public API ==========================================================================================================

/// Everything needed to describe one antibody: the sequence and modifications of each of its four chains, how many
/// disulfide bonds it contains, and whether its light chains are glycosylated
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct Parameters {
    /// Indexed in [`ChainSlot::ALL`] order
    pub chains: [ChainParameters; ChainSlot::COUNT],
    pub disulfides: Disulfides,
    pub light_chain_glycosylation: bool,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize)]
pub struct ChainParameters {
    pub sequence: String,
    /// A free-form formula, prefixed with `-` when atoms are lost
    pub chemical_modification: String,
    /// Ignored for light chains
    pub terminal_options: TerminalOptions,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Serialize)]
pub struct Disulfides {
    /// Every disulfide bond of the intact antibody
    pub total: Count,
    /// Bonds within a single heavy chain, kept when it is partially reduced
    pub heavy_chain: Count,
    /// Bonds within a single light chain, kept when it is partially reduced
    pub light_chain: Count,
}

impl Parameters {
    /// A symmetric antibody, built from two copies of `heavy` and two copies of `light`
    #[must_use]
    pub fn symmetric(heavy: ChainParameters, light: ChainParameters, disulfides: Disulfides) -> Self {
        Self {
            chains: [heavy.clone(), heavy, light.clone(), light],
            disulfides,
            light_chain_glycosylation: false,
        }
    }

    /// Reads parameters from KDL. `HC-2` and `LC-2` may be left out, in which case they copy `HC-1` and `LC-1`
    pub fn from_kdl(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Self> {
        let parsed: ParametersKdl = knuffel::parse(file_name.as_ref(), kdl_text.as_ref())?;
        let parameters = parsed
            .validate()
            .map_err(|e| e.finalize("parameters", file_name, kdl_text))?;

        log::debug!(
            "loaded parameters for {} disulfides, with light-chain glycosylation {}",
            parameters.disulfides.total,
            if parameters.light_chain_glycosylation { "enabled" } else { "disabled" }
        );
        Ok(parameters)
    }

    #[must_use]
    pub const fn chain(&self, slot: ChainSlot) -> &ChainParameters {
        &self.chains[slot.index()]
    }

    /// The disulfide bonds within a single chain of `chain_type`
    #[must_use]
    pub const fn intrachain_disulfides(&self, chain_type: ChainType) -> Count {
        match chain_type {
            ChainType::Heavy => self.disulfides.heavy_chain,
            ChainType::Light => self.disulfides.light_chain,
        }
    }
}

impl ChainParameters {
    #[must_use]
    pub fn new(sequence: impl Into<String>) -> Self {
        Self {
            sequence: sequence.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_modification(mut self, formula: impl Into<String>) -> Self {
        self.chemical_modification = formula.into();
        self
    }

    #[must_use]
    pub const fn with_terminal_options(mut self, terminal_options: TerminalOptions) -> Self {
        self.terminal_options = terminal_options;
        self
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct ParametersKdl {
    #[knuffel(children(name = "chain"))]
    chains: Vec<ChainKdl>,
    #[knuffel(child)]
    disulfides: DisulfidesKdl,
    #[knuffel(child, default)]
    glycosylation: GlycosylationKdl,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct ChainKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(argument, str)]
    slot: ChainSlot,
    #[knuffel(child, unwrap(argument))]
    sequence: String,
    #[knuffel(child, unwrap(argument), default)]
    modification: String,
    #[knuffel(child)]
    cyclization: bool,
    #[knuffel(child)]
    clipping: bool,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct DisulfidesKdl {
    #[knuffel(property(name = "total"))]
    total: u32,
    #[knuffel(property(name = "heavy"), default)]
    heavy: u32,
    #[knuffel(property(name = "light"), default)]
    light: u32,
}

#[derive(Debug, Default, Decode)]
#[knuffel(span_type=Span)]
struct GlycosylationKdl {
    #[knuffel(property(name = "light"), default)]
    light: bool,
}

// Parameter Validation ================================================================================================

impl ParametersKdl {
    fn validate(self) -> Result<Parameters, ParametersErrorKind> {
        let mut chains: HashMap<ChainSlot, (Span, ChainParameters)> = HashMap::new();
        for ChainKdl {
            span,
            slot,
            sequence,
            modification,
            cyclization,
            clipping,
        } in self.chains
        {
            if slot.chain_type() == ChainType::Light && (cyclization || clipping) {
                return Err(ParametersErrorKind::LightChainTerminalOptions(span, slot));
            }

            let chain = ChainParameters {
                sequence,
                chemical_modification: modification,
                terminal_options: TerminalOptions {
                    cyclization,
                    lysine_clipping: clipping,
                },
            };
            match chains.entry(slot) {
                Entry::Occupied(e) => {
                    let (slot, (first_defined_at, _)) = e.remove_entry();
                    return Err(ParametersErrorKind::DuplicateChain(first_defined_at, span, slot));
                }
                Entry::Vacant(e) => e.insert((span, chain)),
            };
        }

        let mut chain = |slot: ChainSlot| chains.remove(&slot).map(|(_, chain)| chain);
        let heavy_one = chain(ChainSlot::HeavyOne).ok_or(ParametersErrorKind::MissingChain(ChainSlot::HeavyOne))?;
        let heavy_two = chain(ChainSlot::HeavyTwo).unwrap_or_else(|| heavy_one.clone());
        let light_one = chain(ChainSlot::LightOne).ok_or(ParametersErrorKind::MissingChain(ChainSlot::LightOne))?;
        let light_two = chain(ChainSlot::LightTwo).unwrap_or_else(|| light_one.clone());

        let DisulfidesKdl {
            total,
            heavy,
            light,
        } = self.disulfides;
        Ok(Parameters {
            chains: [heavy_one, heavy_two, light_one, light_two],
            disulfides: Disulfides {
                total: Count::from(total),
                heavy_chain: Count::from(heavy),
                light_chain: Count::from(light),
            },
            light_chain_glycosylation: self.glycosylation.light,
        })
    }
}

// Validation Error Types and Trait Implementations  ===================================================================

#[derive(Clone, Debug, Diagnostic, Error)]
enum ParametersErrorKind {
    #[error("the chain {2} has already been defined")]
    #[diagnostic(help("each of HC-1, HC-2, LC-1, and LC-2 may only be defined once"))]
    DuplicateChain(Span, Span, ChainSlot),

    #[error("the chain {0} was never defined")]
    #[diagnostic(help("HC-2 and LC-2 default to copies of HC-1 and LC-1, but those must always be defined"))]
    MissingChain(ChainSlot),

    #[error("the light chain {1} cannot be cyclised or clipped")]
    #[diagnostic(help("N-terminal cyclization and C-terminal lysine clipping only apply to heavy chains"))]
    LightChainTerminalOptions(Span, ChainSlot),
}

impl ValidationErrorKind for ParametersErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::DuplicateChain(s1, s2, _) => {
                vec![(s1, "first defined here"), (s2, "then again here")]
            }
            Self::MissingChain(_) => Vec::new(),
            Self::LightChainTerminalOptions(s, _) => vec![(s, "light chain")],
        }
    }
}

// Module Tests ========================================================================================================
