// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// External Crate Imports
use elemental::{Count, Element, ElementalComposition};
use serde::{Serialize, Serializer};

// Local Crate Imports
use crate::{
    Chain, ChainSlot, ChainType, Cyclization, ReducedChain, Reduction, ResidueDatabase, TerminalNote,
    TerminalOptions,
};

/// Lost when an N-terminal glutamine cyclises to pyroglutamate
const AMMONIA: ElementalComposition = ElementalComposition::new(0, 3, 1, 0, 0);

/// Lost for every disulfide bond formed
const DISULFIDE: ElementalComposition = ElementalComposition::of(Element::Hydrogen, 2);

impl ReducedChain {
    /// Applies the requested terminal modifications to `chain` (heavy chains only), giving its fully reduced
    /// composition. The partially reduced composition additionally keeps `intrachain_disulfides` bonds intact
    #[must_use]
    pub fn new(
        residues: &ResidueDatabase,
        chain: &Chain,
        options: TerminalOptions,
        intrachain_disulfides: Count,
    ) -> Self {
        let mut full = chain.composition();

        let note = (chain.chain_type() == ChainType::Heavy).then(|| {
            let cyclization = match chain.first_residue() {
                Some('Q') if options.cyclization => Cyclization::PyroQ,
                Some('E') if options.cyclization => Cyclization::PyroE,
                _ => Cyclization::Unmodified,
            };
            full -= cyclization.loss();

            let clipped_lysine = chain
                .last_residue()
                .filter(|&c| options.lysine_clipping && c == 'K')
                .and_then(|c| residues.amino_acid(c));
            if let Some(lysine) = clipped_lysine {
                full -= lysine.composition;
            }

            TerminalNote {
                cyclization,
                lysine_clipped: clipped_lysine.is_some(),
            }
        });

        let partial = full - DISULFIDE * intrachain_disulfides;
        log::trace!("reduced {}: partially {partial}, fully {full}", chain.slot());

        Self {
            slot: chain.slot(),
            partial,
            full,
            note,
        }
    }

    #[must_use]
    pub const fn slot(&self) -> ChainSlot {
        self.slot
    }

    #[must_use]
    pub const fn partial(&self) -> ElementalComposition {
        self.partial
    }

    #[must_use]
    pub const fn full(&self) -> ElementalComposition {
        self.full
    }

    #[must_use]
    pub const fn composition(&self, reduction: Reduction) -> ElementalComposition {
        match reduction {
            Reduction::Partial => self.partial,
            Reduction::Full => self.full,
        }
    }

    /// `None` for light chains, which never carry terminal modifications
    #[must_use]
    pub const fn note(&self) -> Option<TerminalNote> {
        self.note
    }
}

impl Cyclization {
    const fn loss(self) -> ElementalComposition {
        match self {
            Self::PyroQ => AMMONIA,
            Self::PyroE => ElementalComposition::WATER,
            Self::Unmodified => ElementalComposition::new(0, 0, 0, 0, 0),
        }
    }
}

impl TerminalNote {
    #[must_use]
    pub const fn cyclization(&self) -> Cyclization {
        self.cyclization
    }

    #[must_use]
    pub const fn lysine_clipped(&self) -> bool {
        self.lysine_clipped
    }
}

impl Display for TerminalNote {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let clipped = if self.lysine_clipped { "Yes" } else { "No" };
        write!(
            f,
            "N-Terminal Cyclization: {} | C-Terminal Lysine Clipping: {clipped}",
            self.cyclization
        )
    }
}

impl Serialize for TerminalNote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
