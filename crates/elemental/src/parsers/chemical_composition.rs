// External Crate Imports
use nom::{
    branch::alt,
    character::complete::anychar,
    combinator::{map, opt, recognize, value},
    multi::fold_many0,
    sequence::pair,
};

// Local Crate Imports
use super::{
    errors::CompositionError,
    primitives::{ParseResult, count, lowercase, uppercase},
};
use crate::{ChemicalComposition, Count};

// Public API ==========================================================================================================

/// Chemical Formula = { Atomic Offset | ? any other character ? } ;
///
/// Never fails: characters that don't start an atomic offset are skipped, so `"-H2O"`, `"H2 O"` and `"H2O"` all
/// parse to the same composition
pub fn chemical_formula(i: &str) -> ParseResult<ChemicalComposition> {
    let offset_or_junk = alt((map(atomic_offset, Some), value(None, anychar)));
    fold_many0(
        offset_or_junk,
        ChemicalComposition::default,
        |mut composition, offset| {
            if let Some((symbol, count)) = offset {
                composition.add_atoms(symbol, count);
            }
            composition
        },
    )(i)
}

/// Strict Chemical Formula = { Atomic Offset } ;
pub fn strict_chemical_formula(formula: &str) -> Result<ChemicalComposition, CompositionError> {
    let mut offsets = fold_many0(
        atomic_offset,
        ChemicalComposition::default,
        |mut composition, (symbol, count)| {
            composition.add_atoms(symbol, count);
            composition
        },
    );

    let (rest, composition) =
        offsets(formula).map_err(|_| CompositionError::unparsed(formula, formula))?;
    if rest.is_empty() {
        Ok(composition)
    } else {
        Err(CompositionError::unparsed(formula, rest))
    }
}

// Private Sub-Parsers =================================================================================================

/// Atomic Offset = Element , [ Count ] ;
fn atomic_offset(i: &str) -> ParseResult<(&str, Count)> {
    let optional_count = map(opt(count), |c| c.unwrap_or(1));
    pair(element_symbol, optional_count)(i)
}

/// Element = uppercase , [ lowercase ] ;
fn element_symbol(i: &str) -> ParseResult<&str> {
    recognize(pair(uppercase, opt(lowercase)))(i)
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::testing_tools::render_diagnostic;

    fn parse(formula: &str) -> ChemicalComposition {
        let (rest, composition) = chemical_formula(formula).unwrap();
        assert_eq!(rest, "");
        composition
    }

    #[test]
    fn test_element_symbol() {
        assert_eq!(element_symbol("Na2"), Ok(("2", "Na")));
        assert_eq!(element_symbol("CO"), Ok(("O", "C")));
        assert!(element_symbol("na").is_err());
    }

    #[test]
    fn test_atomic_offset() {
        assert_eq!(atomic_offset("H2O"), Ok(("O", ("H", 2))));
        assert_eq!(atomic_offset("O"), Ok(("", ("O", 1))));
        assert_eq!(atomic_offset("Ca12Cl"), Ok(("Cl", ("Ca", 12))));
        assert_eq!(atomic_offset("H0"), Ok(("", ("H", 0))));
        assert!(atomic_offset("2H").is_err());
    }

    #[test]
    fn repeated_symbols_accumulate() {
        let ethanol = parse("CH3CH2OH");
        assert_eq!(ethanol.count("C"), 2);
        assert_eq!(ethanol.count("H"), 6);
        assert_eq!(ethanol.count("O"), 1);
        assert_snapshot!(ethanol, @"C2H6O");
    }

    #[test]
    fn junk_is_skipped() {
        assert_eq!(parse("-H2O"), parse("H2O"));
        assert_eq!(parse("H2 O"), parse("H2O"));
        assert_eq!(parse("2H2O"), parse("H2O"));
        assert_eq!(parse("-C2H3NO; junk"), parse("C2H3NO"));
        assert!(parse("").is_empty());
        assert!(parse("xyz 42 - +").is_empty());
    }

    #[test]
    fn unknown_symbols_and_zero_counts_are_kept() {
        let composition = parse("Xx3H0");
        assert_eq!(composition.count("Xx"), 3);
        assert_eq!(composition.count("H"), 0);
        assert_eq!(composition.iter().count(), 2);
    }

    #[test]
    fn strict_formulae() {
        assert_eq!(strict_chemical_formula("C6H12O6").unwrap(), parse("C6H12O6"));
        assert!(strict_chemical_formula("").unwrap().is_empty());

        let error = strict_chemical_formula("C6H12 O6").unwrap_err();
        assert_eq!(
            error,
            CompositionError::Unparsed {
                formula: "C6H12 O6".to_owned(),
                span: (5, 3).into()
            }
        );
        let rendered = render_diagnostic(&error);
        assert!(rendered.contains(r#"failed to parse "C6H12 O6" as a chemical formula"#));
        assert!(rendered.contains("expected an element symbol here"));

        let error = strict_chemical_formula("c6").unwrap_err();
        assert_eq!(
            error,
            CompositionError::Unparsed {
                formula: "c6".to_owned(),
                span: (0, 2).into()
            }
        );
    }
}
