use crate::error::FormulaError;
use crate::stoichiometry::{molar_mass, MolarMass};
use std::collections::BTreeMap;





/// Number of atoms of each element in one formula unit, keyed by element symbol
pub type ElementCounts = BTreeMap<String, u64>;

/// Parses a chemical formula into element counts.
/// Groups in parentheses are multiplied by the number that follows them (1 if there is none),
/// hydrate separators (`.` and `·`), whitespace and stray `+` are skipped.
/// # Arguments
/// * `formula` - formula as written by the user (e.g. `Ba3(PO4)2`)
/// # Returns
/// * `Ok` - element counts (empty for an empty formula)
/// * `Err` - unexpected character, mismatched parentheses or a count that doesn't fit into 64 bits
/// # Example
/// ```
/// use chembalance::parse_formula;
///
/// let counts = parse_formula("Ba3(PO4)2").unwrap();
///
/// assert_eq!(counts["Ba"], 3);
/// assert_eq!(counts["P"], 2);
/// assert_eq!(counts["O"], 8);
/// assert_eq!(counts.len(), 3);
/// ```
pub fn parse_formula(formula: &str) -> Result<ElementCounts, FormulaError> {
    let letters: Vec<char> = formula.chars().collect();
    let too_large = || FormulaError::CountTooLarge { formula: formula.to_string() };

    // one map per open group, the first one is the whole formula
    let mut stack = vec![ElementCounts::new()];
    let mut i = 0;

    while i < letters.len() {
        match letters[i] {
            '(' => {
                stack.push(ElementCounts::new());
                i += 1;
            },
            ')' => {
                let (multiplier, next) = read_count(&letters, i + 1).ok_or_else(too_large)?;
                i = next;

                let [.., parent, group] = stack.as_mut_slice() else {
                    return Err(FormulaError::UnmatchedClose { formula: formula.to_string() });
                };
                for (symbol, quantity) in group.iter() {
                    let quantity = quantity.checked_mul(multiplier).ok_or_else(too_large)?;
                    add_count(parent, symbol, quantity).ok_or_else(too_large)?;
                }
                stack.pop();
            },
            first if first.is_ascii_uppercase() => {
                let mut symbol = first.to_string();
                i += 1;
                if let Some(&second) = letters.get(i).filter(|c| c.is_ascii_lowercase()) {
                    symbol.push(second);
                    i += 1;
                }

                let (quantity, next) = read_count(&letters, i).ok_or_else(too_large)?;
                i = next;

                if let Some(top) = stack.last_mut() {
                    add_count(top, &symbol, quantity).ok_or_else(too_large)?;
                }
            },
            '.' | '·' | '+' => i += 1,
            c if c.is_whitespace() => i += 1,
            c => return Err(FormulaError::UnexpectedChar { ch: c, formula: formula.to_string() }),
        }
    }

    if stack.len() != 1 { return Err(FormulaError::UnclosedGroup { formula: formula.to_string() }); }

    Ok(stack.pop().unwrap_or_default())
}

/// Reads the digits starting at `start`, returns the count (1 when there are no digits) and the index after it.
/// Returns `None` if the count doesn't fit into 64 bits.
fn read_count(letters: &[char], start: usize) -> Option<(u64, usize)> {
    let end = letters[start..].iter().position(|c| !c.is_ascii_digit()).map_or(letters.len(), |p| start + p);
    if end == start { return Some((1, start)); }

    let count = letters[start..end].iter().collect::<String>().parse::<u64>().ok()?;
    Some((count, end))
}

fn add_count(counts: &mut ElementCounts, symbol: &str, quantity: u64) -> Option<()> {
    let entry = counts.entry(symbol.to_string()).or_insert(0);
    *entry = entry.checked_add(quantity)?;
    Some(())
}

/// A struct that represents a chemical compound (e.g. H2O, Ba3(PO4)2, ...)
/// # Example
/// ```
/// use chembalance::Compound;
///
/// let compound = Compound::parse("Ca(OH)2").unwrap();
///
/// assert_eq!(compound.original_str(), "Ca(OH)2");
/// assert_eq!(compound.count("O"), 2);
/// assert_eq!(compound.count("N"), 0);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Compound {
    /// String from which the compound was parsed
    original_str: String,
    /// Elements and their quantities
    elements: ElementCounts,
}
impl Compound {
    /// Create new compound from a formula string
    /// # Arguments
    /// * `input` - formula string
    /// # Returns
    /// * `Ok` - compound
    /// * `Err` - error that occurred during parsing
    pub fn parse(input: &str) -> Result<Self, FormulaError> {
        Ok(Self {
            original_str: input.to_string(),
            elements: parse_formula(input)?,
        })
    }

    /// Returns the original string from which the compound was parsed
    pub fn original_str(&self) -> &str {
        &self.original_str
    }

    /// Returns the elements and their quantities in the compound
    /// For example, in the compound H2O the map will be {H: 2, O: 1}
    pub fn elements(&self) -> &ElementCounts {
        &self.elements
    }

    /// Returns how many atoms of `symbol` one formula unit holds
    pub fn count(&self, symbol: &str) -> u64 {
        self.elements.get(symbol).copied().unwrap_or(0)
    }

    /// Returns true if the formula contains at least one atom
    pub fn has_atoms(&self) -> bool {
        self.elements.values().any(|&q| q > 0)
    }

    /// Returns the molar mass of the compound
    /// # Example
    /// ```
    /// use chembalance::Compound;
    ///
    /// let water = Compound::parse("H2O").unwrap().molar_mass();
    ///
    /// assert!((water.grams_per_mole - 18.015).abs() < 0.01);
    /// assert!(water.missing.is_empty());
    /// ```
    pub fn molar_mass(&self) -> MolarMass {
        molar_mass(&self.elements)
    }
}





#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> ElementCounts {
        pairs.iter().map(|(s, q)| (s.to_string(), *q)).collect()
    }

    #[test]
    fn simple_formulas() {
        assert_eq!(parse_formula("CuSO4").unwrap(), counts(&[("Cu", 1), ("S", 1), ("O", 4)]));
        assert_eq!(parse_formula("H2O").unwrap(), counts(&[("H", 2), ("O", 1)]));
        assert_eq!(parse_formula("C6H12O6").unwrap(), counts(&[("C", 6), ("H", 12), ("O", 6)]));
    }

    #[test]
    fn repeated_element_adds_up() {
        assert_eq!(parse_formula("CH3COOH").unwrap(), counts(&[("C", 2), ("H", 4), ("O", 2)]));
    }

    #[test]
    fn groups() {
        assert_eq!(parse_formula("Ba3(PO4)2").unwrap(), counts(&[("Ba", 3), ("P", 2), ("O", 8)]));
        assert_eq!(parse_formula("Fe(OH)3").unwrap(), counts(&[("Fe", 1), ("O", 3), ("H", 3)]));
        assert_eq!(parse_formula("(NH4)2SO4").unwrap(), counts(&[("N", 2), ("H", 8), ("S", 1), ("O", 4)]));
    }

    #[test]
    fn nested_groups() {
        assert_eq!(parse_formula("Mg3(Fe(CN)6)2").unwrap(), counts(&[("Mg", 3), ("Fe", 2), ("C", 12), ("N", 12)]));
        assert_eq!(parse_formula("((CH3)3C)2O").unwrap(), counts(&[("C", 8), ("H", 18), ("O", 1)]));
    }

    #[test]
    fn group_without_multiplier() {
        assert_eq!(parse_formula("Na(Cl)").unwrap(), counts(&[("Na", 1), ("Cl", 1)]));
    }

    #[test]
    fn hydrate_separator_is_transparent() {
        let dotted = parse_formula("CuSO4·H2O").unwrap();
        assert_eq!(dotted, counts(&[("Cu", 1), ("S", 1), ("O", 5), ("H", 2)]));
        assert_eq!(parse_formula("CuSO4.H2O").unwrap(), dotted);
        assert_eq!(parse_formula("CuSO4H2O").unwrap(), dotted);
    }

    #[test]
    fn hydrate_count_is_not_a_multiplier() {
        assert_eq!(
            parse_formula("CuSO4·5H2O"),
            Err(FormulaError::UnexpectedChar { ch: '5', formula: "CuSO4·5H2O".to_string() })
        );
    }

    #[test]
    fn whitespace_and_plus_are_skipped() {
        assert_eq!(parse_formula(" H2 O ").unwrap(), counts(&[("H", 2), ("O", 1)]));
        assert_eq!(parse_formula("H2+O").unwrap(), counts(&[("H", 2), ("O", 1)]));
    }

    #[test]
    fn empty_formula() {
        assert!(parse_formula("").unwrap().is_empty());
        assert!(!Compound::parse("  ").unwrap().has_atoms());
    }

    #[test]
    fn unexpected_characters() {
        assert!(matches!(parse_formula("h2o"), Err(FormulaError::UnexpectedChar { ch: 'h', .. })));
        assert!(matches!(parse_formula("2H2O"), Err(FormulaError::UnexpectedChar { ch: '2', .. })));
        assert!(matches!(parse_formula("Fe[CN]6"), Err(FormulaError::UnexpectedChar { ch: '[', .. })));
    }

    #[test]
    fn mismatched_parentheses() {
        assert_eq!(parse_formula("Ba(PO4"), Err(FormulaError::UnclosedGroup { formula: "Ba(PO4".to_string() }));
        assert_eq!(parse_formula("BaPO4)2"), Err(FormulaError::UnmatchedClose { formula: "BaPO4)2".to_string() }));
        assert!(matches!(parse_formula("((H)"), Err(FormulaError::UnclosedGroup { .. })));
    }

    #[test]
    fn huge_counts() {
        assert!(matches!(parse_formula("H99999999999999999999"), Err(FormulaError::CountTooLarge { .. })));
        assert!(matches!(parse_formula("(H9999999999)9999999999"), Err(FormulaError::CountTooLarge { .. })));
    }

    #[test]
    fn compound_accessors() {
        let compound = Compound::parse("Al2(SO4)3").unwrap();
        assert_eq!(compound.original_str(), "Al2(SO4)3");
        assert_eq!(compound.count("Al"), 2);
        assert_eq!(compound.count("S"), 3);
        assert_eq!(compound.count("O"), 12);
        assert!(compound.has_atoms());
    }
}
