//! Enumerating the half-bodies and intact antibodies that can be built from a set of reduced chains, and every
//! glycoform of each

// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// External Crate Imports
use elemental::{Count, Element, ElementalComposition};
use itertools::Itertools;
use serde::{Serialize, Serializer};

// Local Crate Imports
use crate::{
    Assembly, Chain, ChainSlot, ChainType, Glycoform, Label, ReducedChain, glycan::ComposedGlycan,
};

/// Lost for every disulfide bond formed
const DISULFIDE: ElementalComposition = ElementalComposition::of(Element::Hydrogen, 2);

// Public API ==========================================================================================================

/// The slots of `chain_type` with distinct sequences: the first chain is always included, and the second only when
/// its sequence differs from the first
#[must_use]
pub fn unique_slots(chains: &[Chain], chain_type: ChainType) -> Vec<ChainSlot> {
    chains
        .iter()
        .filter(|c| c.chain_type() == chain_type)
        .unique_by(|c| c.sequence())
        .map(Chain::slot)
        .collect()
}

/// Whether the antibody has more than one distinct heavy or light chain
#[must_use]
pub fn is_heterodimer(heavy: &[ChainSlot], light: &[ChainSlot]) -> bool {
    heavy.len() != 1 || light.len() != 1
}

/// Pairs every heavy chain with every light chain (heavy-major), breaking all intra-chain disulfides and forming
/// half of `total_disulfides` (rounded down)
#[must_use]
pub fn half_bodies(
    reduced: &[ReducedChain; ChainSlot::COUNT],
    heavy: &[ChainSlot],
    light: &[ChainSlot],
    total_disulfides: Count,
) -> Vec<Glycoform> {
    let bonds = DISULFIDE * (total_disulfides / 2);
    let half_bodies: Vec<_> = heavy
        .iter()
        .cartesian_product(light)
        .map(|(&heavy, &light)| {
            let composition = full(reduced, heavy) + full(reduced, light) - bonds;
            Glycoform::new(Assembly::HalfBody { heavy, light }, composition)
        })
        .collect();
    log::trace!("enumerated {} half-bodies", half_bodies.len());
    half_bodies
}

/// Every unordered pair of heavy chains with every unordered pair of light chains (heavy-major), with all
/// `total_disulfides` formed
#[must_use]
pub fn intact(
    reduced: &[ReducedChain; ChainSlot::COUNT],
    heavy: &[ChainSlot],
    light: &[ChainSlot],
    total_disulfides: Count,
) -> Vec<Glycoform> {
    let bonds = DISULFIDE * total_disulfides;
    let pairs = |slots: &[ChainSlot]| -> Vec<[ChainSlot; 2]> {
        slots
            .iter()
            .copied()
            .combinations_with_replacement(2)
            .filter_map(|pair| pair.try_into().ok())
            .collect()
    };

    let antibodies: Vec<_> = pairs(heavy)
        .into_iter()
        .cartesian_product(pairs(light))
        .map(|(heavy, light)| {
            let composition: ElementalComposition =
                heavy.iter().chain(&light).map(|&slot| full(reduced, slot)).sum();
            Glycoform::new(Assembly::Intact { heavy, light }, composition - bonds)
        })
        .collect();
    log::trace!("enumerated {} intact antibodies", antibodies.len());
    antibodies
}

/// Attaches a glycan to every glycosylation site of each of the `bare` assemblies, in every combination (with
/// replacement) of `glycans`. With N glycans, an assembly with k sites yields C(N + k - 1, k) glycoforms, in library
/// order
#[must_use]
pub fn glycoforms(
    bare: &[Glycoform],
    glycans: &[ComposedGlycan],
    light_chain_glycosylation: bool,
) -> Vec<Glycoform> {
    let glycoforms: Vec<_> = bare
        .iter()
        .flat_map(|glycoform| {
            let sites = glycoform
                .label
                .assembly
                .glycosylation_sites(light_chain_glycosylation);
            attach(glycoform, glycans, sites)
        })
        .collect();
    log::trace!(
        "enumerated {} glycoforms of {} assemblies",
        glycoforms.len(),
        bare.len()
    );
    glycoforms
}

/// A single glycan attached to the partially reduced form of each chain in `slots`, labelled like every other
/// glycoform: the chain, then `|+ ` and the glycan name (e.g. `HC-1|+ G0F`)
#[must_use]
pub fn reduced_glycoforms(
    reduced: &[ReducedChain; ChainSlot::COUNT],
    slots: &[ChainSlot],
    glycans: &[ComposedGlycan],
) -> Vec<Glycoform> {
    slots
        .iter()
        .flat_map(|&slot| {
            let bare = Glycoform::new(Assembly::Chain(slot), reduced[slot.index()].partial());
            attach(&bare, glycans, 1).collect::<Vec<_>>()
        })
        .collect()
}

fn attach<'a>(
    glycoform: &'a Glycoform,
    glycans: &'a [ComposedGlycan<'a>],
    sites: usize,
) -> impl Iterator<Item = Glycoform> + 'a {
    glycans
        .iter()
        .combinations_with_replacement(sites)
        .map(move |chosen| glycoform.with_glycans(&chosen))
}

fn full(reduced: &[ReducedChain; ChainSlot::COUNT], slot: ChainSlot) -> ElementalComposition {
    reduced[slot.index()].full()
}

// Assemblies ==========================================================================================================

impl Assembly {
    /// The chains making up this assembly, in label order
    #[must_use]
    pub fn slots(&self) -> Vec<ChainSlot> {
        match *self {
            Self::Chain(slot) => vec![slot],
            Self::HalfBody { heavy, light } => vec![heavy, light],
            Self::Intact { heavy, light } => heavy.into_iter().chain(light).collect(),
        }
    }

    /// Every heavy chain carries one glycosylation site, as does every light chain when they are glycosylated
    #[must_use]
    pub fn glycosylation_sites(&self, light_chain_glycosylation: bool) -> usize {
        self.slots()
            .into_iter()
            .filter(|s| light_chain_glycosylation || s.chain_type() == ChainType::Heavy)
            .count()
    }
}

impl Display for Assembly {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chain(slot) => write!(f, "{slot}"),
            Self::HalfBody { heavy, light } => write!(f, "{heavy}:{light}"),
            Self::Intact {
                heavy: [h1, h2],
                light: [l1, l2],
            } => write!(f, "{h1}/{h2}:{l1}/{l2}"),
        }
    }
}

// Labels and Glycoforms ===============================================================================================

impl Label {
    #[must_use]
    pub const fn assembly(&self) -> &Assembly {
        &self.assembly
    }

    #[must_use]
    pub fn glycans(&self) -> &[String] {
        &self.glycans
    }

    #[must_use]
    pub fn slots(&self) -> Vec<ChainSlot> {
        self.assembly.slots()
    }
}

impl From<Assembly> for Label {
    fn from(assembly: Assembly) -> Self {
        Self {
            assembly,
            glycans: Vec::new(),
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.assembly)?;
        if !self.glycans.is_empty() {
            write!(f, "|+ {}", self.glycans.iter().join(" + "))?;
        }
        Ok(())
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Glycoform {
    pub(crate) fn new(assembly: Assembly, composition: ElementalComposition) -> Self {
        Self {
            label: assembly.into(),
            composition,
        }
    }

    fn with_glycans(&self, glycans: &[&ComposedGlycan]) -> Self {
        let mut label = self.label.clone();
        label
            .glycans
            .extend(glycans.iter().map(|g| g.glycan.name().to_owned()));
        let glycan_composition: ElementalComposition = glycans.iter().map(|g| g.composition).sum();
        let composition = self.composition + glycan_composition;
        Self { label, composition }
    }

    #[must_use]
    pub const fn label(&self) -> &Label {
        &self.label
    }

    #[must_use]
    pub const fn composition(&self) -> ElementalComposition {
        self.composition
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use insta::assert_snapshot;
    use once_cell::sync::Lazy;

    use super::*;
    use crate::{Glycan, GlycanDatabase, GlycanLibrary, ResidueDatabase, TerminalOptions};

    static RESIDUES: Lazy<ResidueDatabase> = Lazy::new(ResidueDatabase::default);
    static GLYCANS: Lazy<GlycanDatabase> = Lazy::new(GlycanDatabase::default);

    const HEAVY: &str = "QVCK";
    const LIGHT: &str = "DICK";

    fn build(sequences: [&str; ChainSlot::COUNT]) -> ([Chain; ChainSlot::COUNT], [ReducedChain; ChainSlot::COUNT]) {
        let chains = ChainSlot::ALL.map(|slot| Chain::new(&RESIDUES, slot, sequences[slot.index()]).unwrap());
        let reduced = chains
            .each_ref()
            .map(|chain| ReducedChain::new(&RESIDUES, chain, TerminalOptions::default(), 1));
        (chains, reduced)
    }

    fn labels(glycoforms: &[Glycoform]) -> Vec<String> {
        glycoforms.iter().map(|g| g.label().to_string()).collect()
    }

    fn binomial(n: usize, k: usize) -> usize {
        (1..=k).fold(1, |acc, i| acc * (n + 1 - i) / i)
    }

    #[test]
    fn unique_chain_slots() {
        let (chains, _) = build([HEAVY, HEAVY, LIGHT, LIGHT]);
        assert_eq!(unique_slots(&chains, ChainType::Heavy), [ChainSlot::HeavyOne]);
        assert_eq!(unique_slots(&chains, ChainType::Light), [ChainSlot::LightOne]);

        let (chains, _) = build([HEAVY, "qvck ", LIGHT, "DICKK"]);
        assert_eq!(unique_slots(&chains, ChainType::Heavy), [ChainSlot::HeavyOne]);
        assert_eq!(
            unique_slots(&chains, ChainType::Light),
            [ChainSlot::LightOne, ChainSlot::LightTwo]
        );
    }

    #[test]
    fn symmetric_homodimer() {
        let (chains, reduced) = build([HEAVY, HEAVY, LIGHT, LIGHT]);
        let heavy = unique_slots(&chains, ChainType::Heavy);
        let light = unique_slots(&chains, ChainType::Light);
        assert!(!is_heterodimer(&heavy, &light));

        let antibodies = intact(&reduced, &heavy, &light, 16);
        assert_eq!(labels(&antibodies), ["HC-1/HC-1:LC-1/LC-1"]);
    }

    #[test]
    fn heterodimer_enumeration() {
        let (chains, reduced) = build([HEAVY, "EVCK", LIGHT, "DIC"]);
        let heavy = unique_slots(&chains, ChainType::Heavy);
        let light = unique_slots(&chains, ChainType::Light);
        assert!(is_heterodimer(&heavy, &light));

        let halves = half_bodies(&reduced, &heavy, &light, 16);
        assert_eq!(
            labels(&halves),
            ["HC-1:LC-1", "HC-1:LC-2", "HC-2:LC-1", "HC-2:LC-2"]
        );

        let antibodies = intact(&reduced, &heavy, &light, 16);
        assert_eq!(
            labels(&antibodies),
            [
                "HC-1/HC-1:LC-1/LC-1",
                "HC-1/HC-1:LC-1/LC-2",
                "HC-1/HC-1:LC-2/LC-2",
                "HC-1/HC-2:LC-1/LC-1",
                "HC-1/HC-2:LC-1/LC-2",
                "HC-1/HC-2:LC-2/LC-2",
                "HC-2/HC-2:LC-1/LC-1",
                "HC-2/HC-2:LC-1/LC-2",
                "HC-2/HC-2:LC-2/LC-2",
            ]
        );

        assert_eq!(halves, half_bodies(&reduced, &heavy, &light, 16));
    }

    #[test]
    fn disulfide_hydrogen_accounting() {
        let (_, reduced) = build([HEAVY, HEAVY, LIGHT, LIGHT]);
        let (hc, lc) = (reduced[0].full(), reduced[2].full());
        let hydrogen = |count| ElementalComposition::of(Element::Hydrogen, count);

        let (heavy, light) = ([ChainSlot::HeavyOne], [ChainSlot::LightOne]);

        let halves = half_bodies(&reduced, &heavy, &light, 16);
        assert_eq!(halves.len(), 1);
        assert_eq!(halves[0].composition(), hc + lc - hydrogen(16));

        let antibodies = intact(&reduced, &heavy, &light, 16);
        assert_eq!(antibodies.len(), 1);
        assert_eq!(antibodies[0].composition(), hc * 2 + lc * 2 - hydrogen(32));

        let odd = half_bodies(&reduced, &heavy, &light, 7);
        assert_eq!(odd[0].composition(), hc + lc - hydrogen(6));
    }

    #[test]
    fn glycoform_counts() {
        let (_, reduced) = build([HEAVY, "EVCK", LIGHT, "DIC"]);
        let library = GLYCANS.library(ChainType::Heavy);
        let glycans = library.compose(&RESIDUES);
        let n = glycans.len();
        let (heavy, light) = (
            [ChainSlot::HeavyOne, ChainSlot::HeavyTwo],
            [ChainSlot::LightOne, ChainSlot::LightTwo],
        );
        let halves = half_bodies(&reduced, &heavy, &light, 16);
        let antibodies = intact(&reduced, &heavy, &light, 16);

        for (bare, sites) in [(&halves, [1, 2]), (&antibodies, [2, 4])] {
            for (light_chain_glycosylation, k) in [false, true].into_iter().zip(sites) {
                let glycoforms = glycoforms(bare, &glycans, light_chain_glycosylation);
                assert_eq!(glycoforms.len(), bare.len() * binomial(n + k - 1, k));
            }
        }

        let pairs = glycoforms(&antibodies[..1], &glycans, false);
        assert_eq!(pairs.len(), n * (n + 1) / 2);
        let unique: HashSet<_> = pairs
            .iter()
            .map(|g| {
                let mut glycans = g.label().glycans().to_vec();
                glycans.sort();
                glycans
            })
            .collect();
        assert_eq!(unique.len(), pairs.len());
    }

    #[test]
    fn glycoform_labels_and_compositions() {
        let (_, reduced) = build([HEAVY, HEAVY, LIGHT, LIGHT]);
        let library = GlycanLibrary::new(vec![
            Glycan::new("G0F", [4, 3, 1, 0, 0]),
            Glycan::new("G1F", [4, 4, 1, 0, 0]),
        ]);
        let glycans = library.compose(&RESIDUES);
        let antibodies = intact(&reduced, &[ChainSlot::HeavyOne], &[ChainSlot::LightOne], 16);

        let glycoforms = glycoforms(&antibodies, &glycans, false);
        assert_eq!(
            labels(&glycoforms),
            [
                "HC-1/HC-1:LC-1/LC-1|+ G0F + G0F",
                "HC-1/HC-1:LC-1/LC-1|+ G0F + G1F",
                "HC-1/HC-1:LC-1/LC-1|+ G1F + G1F",
            ]
        );
        assert_eq!(
            glycoforms[1].composition(),
            antibodies[0].composition() + glycans[0].composition + glycans[1].composition
        );
        assert_eq!(glycoforms[1].label().assembly(), antibodies[0].label().assembly());
    }

    #[test]
    fn distinct_heavy_and_light_libraries() {
        let (_, reduced) = build([HEAVY, HEAVY, LIGHT, LIGHT]);
        let heavy_library = GlycanLibrary::new(vec![
            Glycan::new("G0", [4, 3, 0, 0, 0]),
            Glycan::new("G0F", [4, 3, 1, 0, 0]),
        ]);
        let light_library = GlycanLibrary::new(vec![
            Glycan::new("G0F", [4, 3, 1, 0, 0]),
            Glycan::new("G2FS1", [4, 5, 1, 1, 0]),
        ]);
        let merged_library = heavy_library.merge(&light_library);
        let heavy_glycans = heavy_library.compose(&RESIDUES);
        let light_glycans = light_library.compose(&RESIDUES);
        let merged_glycans = merged_library.compose(&RESIDUES);
        let (heavy, light) = ([ChainSlot::HeavyOne], [ChainSlot::LightOne]);

        let halves = half_bodies(&reduced, &heavy, &light, 16);
        assert_eq!(
            labels(&glycoforms(&halves, &heavy_glycans, true)),
            [
                "HC-1:LC-1|+ G0 + G0",
                "HC-1:LC-1|+ G0 + G0F",
                "HC-1:LC-1|+ G0F + G0F",
            ]
        );

        let antibodies = intact(&reduced, &heavy, &light, 16);
        assert_eq!(
            labels(&glycoforms(&antibodies, &merged_glycans, false)),
            [
                "HC-1/HC-1:LC-1/LC-1|+ G0 + G0",
                "HC-1/HC-1:LC-1/LC-1|+ G0 + G0F",
                "HC-1/HC-1:LC-1/LC-1|+ G0 + G2FS1",
                "HC-1/HC-1:LC-1/LC-1|+ G0F + G0F",
                "HC-1/HC-1:LC-1/LC-1|+ G0F + G2FS1",
                "HC-1/HC-1:LC-1/LC-1|+ G2FS1 + G2FS1",
            ]
        );

        let all_sites = labels(&glycoforms(&antibodies, &merged_glycans, true));
        assert_eq!(all_sites.len(), binomial(3 + 4 - 1, 4));
        assert_eq!(all_sites[0], "HC-1/HC-1:LC-1/LC-1|+ G0 + G0 + G0 + G0");
        assert_eq!(all_sites[14], "HC-1/HC-1:LC-1/LC-1|+ G2FS1 + G2FS1 + G2FS1 + G2FS1");

        assert_eq!(
            labels(&reduced_glycoforms(&reduced, &light, &light_glycans)),
            ["LC-1|+ G0F", "LC-1|+ G2FS1"]
        );
    }

    #[test]
    fn reduced_chain_glycoforms() {
        let (_, reduced) = build([HEAVY, HEAVY, LIGHT, LIGHT]);
        let library = GlycanLibrary::new(vec![Glycan::new("G0F", [4, 3, 1, 0, 0])]);
        let glycans = library.compose(&RESIDUES);

        let glycoforms = reduced_glycoforms(&reduced, &[ChainSlot::HeavyOne], &glycans);
        assert_eq!(labels(&glycoforms), ["HC-1|+ G0F"]);
        assert_eq!(
            glycoforms[0].composition(),
            reduced[0].partial() + glycans[0].composition
        );
    }

    #[test]
    fn no_glycans_or_sites() {
        let (_, reduced) = build([HEAVY, HEAVY, LIGHT, LIGHT]);
        let antibodies = intact(&reduced, &[ChainSlot::HeavyOne], &[ChainSlot::LightOne], 16);
        assert!(glycoforms(&antibodies, &[], true).is_empty());
        assert!(intact(&reduced, &[], &[ChainSlot::LightOne], 16).is_empty());
    }

    #[test]
    fn glycosylation_sites() {
        let chain = Assembly::Chain(ChainSlot::LightOne);
        let half = Assembly::HalfBody {
            heavy: ChainSlot::HeavyOne,
            light: ChainSlot::LightTwo,
        };
        let whole = Assembly::Intact {
            heavy: [ChainSlot::HeavyOne, ChainSlot::HeavyTwo],
            light: [ChainSlot::LightOne, ChainSlot::LightOne],
        };
        assert_eq!(chain.glycosylation_sites(false), 0);
        assert_eq!(chain.glycosylation_sites(true), 1);
        assert_eq!(half.glycosylation_sites(false), 1);
        assert_eq!(half.glycosylation_sites(true), 2);
        assert_eq!(whole.glycosylation_sites(false), 2);
        assert_eq!(whole.glycosylation_sites(true), 4);

        assert_snapshot!(Label::from(chain), @"LC-1");
        assert_snapshot!(half, @"HC-1:LC-2");
        assert_snapshot!(whole, @"HC-1/HC-2:LC-1/LC-1");
        assert_eq!(
            whole.slots(),
            [ChainSlot::HeavyOne, ChainSlot::HeavyTwo, ChainSlot::LightOne, ChainSlot::LightOne]
        );
    }
}
