//! Every table of masses that can be calculated for a single antibody

// External Crate Imports
use elemental::{
    AtomicDatabase, AverageMass, Element, ElementalComposition, Massive, MonoisotopicMass,
};
use serde::Serialize;

// Local Crate Imports
use crate::{
    Assembly, Chain, ChainSlot, ChainType, ChemicalModification, Glycoform, GlycanDatabase, Label,
    Parameters, ReducedChain, Reduction, ResidueDatabase, Result, assembly,
};

// Public API ==========================================================================================================

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct Report {
    pub element_masses: Vec<ElementMass>,
    pub glycan_masses: Vec<GlycanMass>,
    /// One per chain, in [`ChainSlot::ALL`] order
    pub chemical_modifications: Vec<ModificationMass>,
    /// Every chain, partially and then fully reduced
    pub reduced: Vec<MassRecord>,
    pub reduced_glycoforms: Vec<MassRecord>,
    pub intact: Vec<MassRecord>,
    pub intact_glycoforms: Vec<MassRecord>,
    /// Only populated for heterodimers
    pub half_body: Vec<MassRecord>,
    pub half_body_glycoforms: Vec<MassRecord>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub struct ElementMass {
    pub element: Element,
    pub average_mass: AverageMass,
    pub monoisotopic_mass: MonoisotopicMass,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct GlycanMass {
    pub chain_type: ChainType,
    pub name: String,
    pub composition: ElementalComposition,
    pub average_mass: AverageMass,
    pub monoisotopic_mass: MonoisotopicMass,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct ModificationMass {
    pub slot: ChainSlot,
    pub formula: String,
    pub average_mass: AverageMass,
    pub monoisotopic_mass: MonoisotopicMass,
}

/// A chain or assembly, weighed along with the chemical modifications of its chains
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct MassRecord {
    pub label: Label,
    pub reduction: Option<Reduction>,
    pub composition: ElementalComposition,
    pub average_mass: AverageMass,
    pub monoisotopic_mass: MonoisotopicMass,
    /// The modification formula of each chain in the label, joined with `"; "`
    pub chemical_modification: String,
    pub note: String,
}

impl Report {
    pub fn new(
        atomic_db: &AtomicDatabase,
        residue_db: &ResidueDatabase,
        glycan_db: &GlycanDatabase,
        parameters: &Parameters,
    ) -> Result<Self> {
        let chains = collect_slots(
            ChainSlot::ALL.map(|slot| Chain::new(residue_db, slot, &parameters.chain(slot).sequence)),
        )?;
        let reduced = chains.each_ref().map(|chain| {
            let intrachain_disulfides = parameters.intrachain_disulfides(chain.chain_type());
            let options = parameters.chain(chain.slot()).terminal_options;
            ReducedChain::new(residue_db, chain, options, intrachain_disulfides)
        });
        let weigher = Weigher::new(atomic_db, parameters)?;

        let heavy = assembly::unique_slots(&chains, ChainType::Heavy);
        let light = assembly::unique_slots(&chains, ChainType::Light);
        let light_chain_glycosylation = parameters.light_chain_glycosylation;
        let total_disulfides = parameters.disulfides.total;

        // Intact glycoforms draw from every glycan, half-bodies only from the heavy-chain library
        let heavy_library = glycan_db.library(ChainType::Heavy);
        let light_library = glycan_db.library(ChainType::Light);
        let merged_library = heavy_library.merge(light_library);
        let heavy_glycans = heavy_library.compose(residue_db);
        let light_glycans = light_library.compose(residue_db);
        let merged_glycans = merged_library.compose(residue_db);

        let element_masses: Vec<_> = Element::ALL
            .into_iter()
            .map(|element| -> Result<_> {
                let composition = ElementalComposition::of(element, 1);
                Ok(ElementMass {
                    element,
                    average_mass: composition.average_mass(atomic_db)?,
                    monoisotopic_mass: composition.monoisotopic_mass(atomic_db)?,
                })
            })
            .collect::<Result<_>>()?;

        let glycan_masses: Vec<_> = [
            (ChainType::Heavy, &heavy_glycans),
            (ChainType::Light, &light_glycans),
        ]
        .into_iter()
        .flat_map(|(chain_type, glycans)| glycans.iter().map(move |g| (chain_type, g)))
        .map(|(chain_type, glycan)| -> Result<_> {
            Ok(GlycanMass {
                chain_type,
                name: glycan.glycan.name().to_owned(),
                composition: glycan.composition,
                average_mass: glycan.composition.average_mass(atomic_db)?,
                monoisotopic_mass: glycan.composition.monoisotopic_mass(atomic_db)?,
            })
        })
        .collect::<Result<_>>()?;

        let reduced_records: Vec<_> = reduced
            .iter()
            .flat_map(|chain| {
                let note = chain.note().map(|n| n.to_string()).unwrap_or_default();
                [(Reduction::Partial, note), (Reduction::Full, String::new())].map(|(reduction, note)| {
                    let glycoform = Glycoform::new(Assembly::Chain(chain.slot()), chain.composition(reduction));
                    weigher.record(glycoform, Some(reduction), note)
                })
            })
            .collect::<Result<_>>()?;

        let mut reduced_glycoforms = assembly::reduced_glycoforms(&reduced, &heavy, &heavy_glycans);
        if light_chain_glycosylation {
            reduced_glycoforms.extend(assembly::reduced_glycoforms(&reduced, &light, &light_glycans));
        }

        let intact = assembly::intact(&reduced, &heavy, &light, total_disulfides);
        let intact_glycoforms =
            assembly::glycoforms(&intact, &merged_glycans, light_chain_glycosylation);

        let half_body = if assembly::is_heterodimer(&heavy, &light) {
            assembly::half_bodies(&reduced, &heavy, &light, total_disulfides)
        } else {
            Vec::new()
        };
        let half_body_glycoforms =
            assembly::glycoforms(&half_body, &heavy_glycans, light_chain_glycosylation);

        let report = Self {
            element_masses,
            glycan_masses,
            chemical_modifications: weigher.modification_masses(),
            reduced: reduced_records,
            reduced_glycoforms: weigher.records(reduced_glycoforms, Some(Reduction::Partial))?,
            intact: weigher.records(intact, None)?,
            intact_glycoforms: weigher.records(intact_glycoforms, None)?,
            half_body: weigher.records(half_body, None)?,
            half_body_glycoforms: weigher.records(half_body_glycoforms, None)?,
        };

        log::debug!(
            "built a report of {} reduced, {} intact, and {} half-body records (plus {}, {}, and {} glycoforms)",
            report.reduced.len(),
            report.intact.len(),
            report.half_body.len(),
            report.reduced_glycoforms.len(),
            report.intact_glycoforms.len(),
            report.half_body_glycoforms.len()
        );
        Ok(report)
    }
}

// Weighing ============================================================================================================

fn collect_slots<T>(results: [Result<T>; ChainSlot::COUNT]) -> Result<[T; ChainSlot::COUNT]> {
    let [heavy_one, heavy_two, light_one, light_two] = results;
    Ok([heavy_one?, heavy_two?, light_one?, light_two?])
}

struct Weigher<'a> {
    atomic_db: &'a AtomicDatabase,
    modifications: [ChemicalModification; ChainSlot::COUNT],
    deltas: [(AverageMass, MonoisotopicMass); ChainSlot::COUNT],
}

impl<'a> Weigher<'a> {
    fn new(atomic_db: &'a AtomicDatabase, parameters: &Parameters) -> Result<Self> {
        let modifications =
            ChainSlot::ALL.map(|slot| ChemicalModification::new(&parameters.chain(slot).chemical_modification));
        let deltas = collect_slots(modifications.each_ref().map(|modification| -> Result<_> {
            Ok((
                modification.average_mass(atomic_db)?,
                modification.monoisotopic_mass(atomic_db)?,
            ))
        }))?;
        Ok(Self {
            atomic_db,
            modifications,
            deltas,
        })
    }

    fn modification_masses(&self) -> Vec<ModificationMass> {
        ChainSlot::ALL
            .into_iter()
            .map(|slot| {
                let (average_mass, monoisotopic_mass) = self.deltas[slot.index()];
                ModificationMass {
                    slot,
                    formula: self.modifications[slot.index()].formula().to_owned(),
                    average_mass,
                    monoisotopic_mass,
                }
            })
            .collect()
    }

    fn record(&self, glycoform: Glycoform, reduction: Option<Reduction>, note: String) -> Result<MassRecord> {
        let slots = glycoform.label.slots();
        let chemical_modification =
            ChemicalModification::describe(slots.iter().map(|s| &self.modifications[s.index()]));
        let (average_delta, monoisotopic_delta) = slots
            .iter()
            .map(|s| self.deltas[s.index()])
            .fold(Default::default(), |(a, m): (AverageMass, MonoisotopicMass), (da, dm)| (a + da, m + dm));

        let composition = glycoform.composition;
        Ok(MassRecord {
            label: glycoform.label,
            reduction,
            composition,
            average_mass: composition.average_mass(self.atomic_db)? + average_delta,
            monoisotopic_mass: composition.monoisotopic_mass(self.atomic_db)? + monoisotopic_delta,
            chemical_modification,
            note,
        })
    }

    fn records(&self, glycoforms: Vec<Glycoform>, reduction: Option<Reduction>) -> Result<Vec<MassRecord>> {
        glycoforms
            .into_iter()
            .map(|glycoform| self.record(glycoform, reduction, String::new()))
            .collect()
    }
}

// Module Tests ========================================================================================================
