use crate::error::{BalanceError, EquationError};
use crate::formula::Compound;
use crate::fraction::minimal_integers;
use crate::matrix::StoichiometricMatrix;
use malachite::num::basic::traits::Zero;
use malachite::{Integer, Natural};
use regex::Regex;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::iter::zip;
use std::sync::LazyLock;





/// Arrow spellings accepted between reactants and products, longest first
pub const ARROWS: [&str; 4] = ["->", "=>", "→", "="];

/// Arrow used in balanced output, whatever arrow the input used
pub const OUTPUT_ARROW: &str = "→";

/// Longest equation (in characters) that will be parsed
pub const MAX_EQUATION_LEN: usize = 4096;

/// A lone minus between species, most likely a mistyped plus
static STRAY_MINUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+-\s+([A-Za-z(])").unwrap());

/// Optional written coefficient in front of a formula, ASCII digits followed by whitespace.
/// Anything else (`2H2O`, non-ASCII digits) stays in the formula and is rejected there.
static LEADING_COEFFICIENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9]+)\s+(.*)$").unwrap());

/// Side of the equation a species is written on
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Side {
    /// Left of the arrow
    Reactant,
    /// Right of the arrow
    Product,
}
impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Reactant => write!(f, "reactant"),
            Side::Product => write!(f, "product"),
        }
    }
}

/// One reactant or product as written in the equation
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Species {
    /// Formula without the written coefficient
    formula: String,
    /// Side of the arrow
    side: Side,
    /// Coefficient typed in front of the formula, never used for balancing
    written_coefficient: Option<u64>,
}
impl Species {
    fn from_chunk(chunk: &str, side: Side) -> Result<Self, EquationError> {
        let Some(caps) = LEADING_COEFFICIENT.captures(chunk) else {
            return Ok(Self { formula: chunk.to_string(), side, written_coefficient: None });
        };

        let coefficient = caps[1]
            .parse::<u64>()
            .map_err(|_| EquationError::CoefficientTooLarge { species: chunk.to_string() })?;

        Ok(Self {
            formula: caps[2].trim().to_string(),
            side,
            written_coefficient: Some(coefficient),
        })
    }

    /// Returns the formula of the species
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Returns the side of the equation the species is on
    pub fn side(&self) -> Side {
        self.side
    }

    /// Returns the coefficient the user typed in front of the formula (if any)
    pub fn written_coefficient(&self) -> Option<u64> {
        self.written_coefficient
    }
}

/// A struct that represents a chemical equation (e.g. Fe + O2 -> Fe2O3)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Equation {
    /// String from which the equation was parsed
    original_str: String,
    /// Arrow spelling used in the equation
    arrow_type: String,
    /// A vector of reactants
    reactants: Vec<Species>,
    /// A vector of products
    products: Vec<Species>,
    /// A vector of solutions for reactants (stoichiometric coefficients)
    solutions_reactants: Option<Vec<u64>>,
    /// A vector of solutions for products (stoichiometric coefficients)
    solutions_products: Option<Vec<u64>>,
}
impl Equation {
    /// Create new equation from a string
    /// The equation should contain exactly one arrow (`->`, `=>`, `=` or `→`), species are separated with `+`
    /// A coefficient in front of a species is allowed but ignored, balancing always computes new ones
    /// # Arguments
    /// * `input` - equation string
    /// # Returns
    /// * `Ok` - equation
    /// * `Err` - error that occurred during parsing
    /// # Example
    /// ```
    /// use chembalance::{Equation, Side};
    ///
    /// let equation = Equation::parse("2 H2 + O2 => H2O").unwrap();
    ///
    /// assert_eq!(equation.arrow_type(), "=>");
    /// assert_eq!(equation.reactants()[0].formula(), "H2");
    /// assert_eq!(equation.reactants()[0].written_coefficient(), Some(2));
    /// assert_eq!(equation.products()[0].side(), Side::Product);
    /// ```
    pub fn parse(input: &str) -> Result<Self, EquationError> {
        let length = input.chars().count();
        if length > MAX_EQUATION_LEN {
            return Err(EquationError::TooLong { length, max: MAX_EQUATION_LEN });
        }

        let sanitized = STRAY_MINUS.replace_all(input, " + $1");

        // find all arrows, scanning left to right so "=>" is not counted as "="
        let mut arrows = Vec::new();
        let mut pos = 0;
        while pos < sanitized.len() {
            let rest = &sanitized[pos..];
            match ARROWS.iter().find(|arrow| rest.starts_with(**arrow)) {
                Some(arrow) => {
                    arrows.push((pos, *arrow));
                    pos += arrow.len();
                },
                None => pos += rest.chars().next().map_or(1, char::len_utf8),
            }
        }
        let &[(arrow_pos, arrow_type)] = arrows.as_slice() else {
            return Err(EquationError::ArrowCount(arrows.len()));
        };

        let reactants = parse_side(&sanitized[..arrow_pos], Side::Reactant)?;
        let products = parse_side(&sanitized[arrow_pos + arrow_type.len()..], Side::Product)?;

        Ok(Self {
            original_str: input.to_string(),
            arrow_type: arrow_type.to_string(),
            reactants,
            products,
            solutions_reactants: None,
            solutions_products: None,
        })
    }

    /// Solves the equation
    /// # Returns
    /// * `Ok` - if the equation was solved successfully
    /// * `Err` - if the equation was not solved successfully
    /// # Example
    /// ```
    /// use chembalance::Equation;
    ///
    /// let mut equation = Equation::parse("Fe + O2 -> Fe2O3").unwrap();
    /// equation.solve().unwrap();
    ///
    /// assert_eq!(equation.coefficients().unwrap(), vec![4, 3, 2]);
    /// ```
    pub fn solve(&mut self) -> Result<(), BalanceError> {
        let compounds = self
            .species()
            .map(|species| Compound::parse(&species.formula))
            .collect::<Result<Vec<Compound>, _>>()?;

        let matrix = StoichiometricMatrix::new(&compounds, self.reactants.len())?;
        let solution = minimal_integers(&matrix.null_space_vector()?)?;

        if solution.iter().all(|x| *x == Integer::ZERO) { return Err(BalanceError::DegenerateSolution); }
        if solution.iter().any(|x| *x <= Integer::ZERO) { return Err(BalanceError::InvalidSolution); }

        let solutions = solution
            .iter()
            .map(|x| u64::try_from(x).map_err(|_| BalanceError::CoefficientOverflow))
            .collect::<Result<Vec<u64>, BalanceError>>()?;

        let (reactants_solutions, products_solutions) = solutions.split_at(self.reactants.len());
        let (reactant_compounds, product_compounds) = compounds.split_at(self.reactants.len());

        // check if solutions are correct
        if side_element_counts(reactant_compounds, reactants_solutions) != side_element_counts(product_compounds, products_solutions) {
            return Err(BalanceError::InvalidSolution);
        }

        self.solutions_reactants = Some(reactants_solutions.to_vec());
        self.solutions_products = Some(products_solutions.to_vec());

        Ok(())
    }

    /// Returns the original string from which the equation was parsed
    pub fn original_str(&self) -> &str {
        &self.original_str
    }

    /// Returns the arrow spelling used in the equation
    pub fn arrow_type(&self) -> &str {
        &self.arrow_type
    }

    /// Returns the vector of reactants
    pub fn reactants(&self) -> &Vec<Species> {
        &self.reactants
    }

    /// Returns the vector of products
    pub fn products(&self) -> &Vec<Species> {
        &self.products
    }

    /// Returns all species, reactants first
    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.reactants.iter().chain(self.products.iter())
    }

    /// Returns true once `solve` has succeeded
    pub fn is_solved(&self) -> bool {
        self.solutions_reactants.is_some() && self.solutions_products.is_some()
    }

    /// Returns the vector of solutions for reactants (stoichiometric coefficients)
    pub fn solution_reactants(&self) -> Option<&Vec<u64>> {
        self.solutions_reactants.as_ref()
    }

    /// Returns the vector of solutions for products (stoichiometric coefficients)
    pub fn solution_products(&self) -> Option<&Vec<u64>> {
        self.solutions_products.as_ref()
    }

    /// Returns all coefficients, reactants first
    pub fn coefficients(&self) -> Option<Vec<u64>> {
        let reactants = self.solutions_reactants.as_ref()?;
        let products = self.solutions_products.as_ref()?;
        Some(reactants.iter().chain(products.iter()).copied().collect())
    }

    /// Returns the solution of the equation as a string
    /// Coefficients equal to 1 are left out and the arrow is always `→`
    /// # Returns
    /// * `Option<String>` - solution of the equation as a string, `None` if the equation is not solved yet
    /// # Example
    /// ```
    /// use chembalance::Equation;
    ///
    /// let mut equation = Equation::parse("C3H8 + O2 -> CO2 + H2O").unwrap();
    /// assert_eq!(equation.solution_str(), None);
    ///
    /// equation.solve().unwrap();
    /// assert_eq!(equation.solution_str().unwrap(), "C3H8 + 5 O2 → 3 CO2 + 4 H2O");
    /// ```
    pub fn solution_str(&self) -> Option<String> {
        let sols_reacts = self.solutions_reactants.as_ref()?;
        let sols_prods = self.solutions_products.as_ref()?;

        Some(format!("{} {} {}", format_side(&self.reactants, sols_reacts), OUTPUT_ARROW, format_side(&self.products, sols_prods)))
    }
}

/// Splits an equation string into reactants and products
/// # Example
/// ```
/// use chembalance::parse_equation;
///
/// let equation = parse_equation("Na3PO4 + BaCl2 -> Ba3(PO4)2 + NaCl").unwrap();
///
/// let products: Vec<&str> = equation.products().iter().map(|s| s.formula()).collect();
/// assert_eq!(products, vec!["Ba3(PO4)2", "NaCl"]);
/// ```
pub fn parse_equation(equation: &str) -> Result<Equation, EquationError> {
    Equation::parse(equation)
}

fn parse_side(side_str: &str, side: Side) -> Result<Vec<Species>, EquationError> {
    let species = side_str
        .split('+')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| Species::from_chunk(chunk, side))
        .collect::<Result<Vec<Species>, EquationError>>()?;

    if species.is_empty() { return Err(EquationError::EmptySide(side)); }

    Ok(species)
}

fn side_element_counts<'a>(compounds: &'a [Compound], coefficients: &[u64]) -> HashMap<&'a String, Natural> {
    let mut element_counts = HashMap::new();
    for (compound, coeff) in zip(compounds, coefficients) {
        for (element, q) in compound.elements().iter().filter(|(_, q)| **q > 0) {
            *element_counts.entry(element).or_insert(Natural::ZERO) += Natural::from(*q) * Natural::from(*coeff);
        }
    }
    element_counts
}

fn format_side(species: &[Species], coefficients: &[u64]) -> String {
    let mut side_str = String::new();
    for (i, (species, quantity)) in zip(species, coefficients).enumerate() {
        if i != 0 { side_str.push_str(" + "); }
        if *quantity != 1 {
            side_str.push_str(&quantity.to_string());
            side_str.push(' ');
        }
        side_str.push_str(&species.formula);
    }
    side_str
}





#[cfg(test)]
mod tests {
    use super::*;

    fn formulas(species: &[Species]) -> Vec<&str> {
        species.iter().map(|s| s.formula()).collect()
    }

    #[test]
    fn arrow_types() {
        for arrow in ARROWS {
            let eq = Equation::parse(&format!("H2 + O2 {} H2O", arrow)).unwrap();

            assert_eq!(eq.arrow_type(), arrow);
            assert_eq!(formulas(eq.reactants()), vec!["H2", "O2"]);
            assert_eq!(formulas(eq.products()), vec!["H2O"]);
        }
    }

    #[test]
    fn arrow_without_spaces() {
        let eq = Equation::parse("H2+O2=>H2O").unwrap();

        assert_eq!(eq.arrow_type(), "=>");
        assert_eq!(formulas(eq.reactants()), vec!["H2", "O2"]);
    }

    #[test]
    fn wrong_arrow_count() {
        assert_eq!(Equation::parse("Fe + O2"), Err(EquationError::ArrowCount(0)));
        assert_eq!(Equation::parse("A -> B -> C"), Err(EquationError::ArrowCount(2)));
        assert_eq!(Equation::parse("A => B = C"), Err(EquationError::ArrowCount(2)));
    }

    #[test]
    fn empty_sides() {
        assert_eq!(Equation::parse("-> H2O"), Err(EquationError::EmptySide(Side::Reactant)));
        assert_eq!(Equation::parse("H2 + O2 -> + "), Err(EquationError::EmptySide(Side::Product)));
    }

    #[test]
    fn trailing_plus_is_ignored() {
        let eq = Equation::parse("H2 + O2 + -> H2O +").unwrap();

        assert_eq!(formulas(eq.reactants()), vec!["H2", "O2"]);
        assert_eq!(formulas(eq.products()), vec!["H2O"]);
    }

    #[test]
    fn written_coefficients() {
        let eq = Equation::parse("2 H2 + O2 -> 2  H2O").unwrap();

        assert_eq!(eq.reactants()[0].written_coefficient(), Some(2));
        assert_eq!(eq.reactants()[1].written_coefficient(), None);
        assert_eq!(eq.products()[0].written_coefficient(), Some(2));
        assert_eq!(formulas(eq.products()), vec!["H2O"]);
    }

    #[test]
    fn coefficient_needs_whitespace() {
        let eq = Equation::parse("2 H2 + O2 -> 2H2O").unwrap();

        assert_eq!(eq.products()[0].written_coefficient(), None);
        assert_eq!(formulas(eq.products()), vec!["2H2O"]);
    }

    #[test]
    fn non_ascii_digits_are_not_coefficients() {
        let eq = Equation::parse("\u{0662} H2 + O2 -> H2O").unwrap();

        assert_eq!(eq.reactants()[0].written_coefficient(), None);
        assert_eq!(formulas(eq.reactants()), vec!["\u{0662} H2", "O2"]);
    }

    #[test]
    fn huge_written_coefficient() {
        assert_eq!(
            Equation::parse("99999999999999999999999 H2 + O2 -> H2O"),
            Err(EquationError::CoefficientTooLarge { species: "99999999999999999999999 H2".to_string() })
        );
    }

    #[test]
    fn stray_minus_separates_species() {
        let eq = Equation::parse("Fe - O2 -> Fe2O3").unwrap();

        assert_eq!(formulas(eq.reactants()), vec!["Fe", "O2"]);
    }

    #[test]
    fn too_long() {
        let input = format!("{} -> H2O", "H".repeat(MAX_EQUATION_LEN));

        assert!(matches!(Equation::parse(&input), Err(EquationError::TooLong { .. })));
    }

    #[test]
    fn species_sides() {
        let eq = Equation::parse("Fe + O2 -> Fe2O3").unwrap();
        let sides: Vec<Side> = eq.species().map(|s| s.side()).collect();

        assert_eq!(sides, vec![Side::Reactant, Side::Reactant, Side::Product]);
    }

    #[test]
    fn unsolved_equation_has_no_solution() {
        let eq = Equation::parse("Fe + O2 -> Fe2O3").unwrap();

        assert!(!eq.is_solved());
        assert_eq!(eq.coefficients(), None);
        assert_eq!(eq.solution_str(), None);
    }

    #[test]
    fn solved_accessors() {
        let mut eq = Equation::parse("Al + O2 = Al2O3").unwrap();
        eq.solve().unwrap();

        assert!(eq.is_solved());
        assert_eq!(eq.solution_reactants().unwrap(), &vec![4, 3]);
        assert_eq!(eq.solution_products().unwrap(), &vec![2]);
        assert_eq!(eq.original_str(), "Al + O2 = Al2O3");
    }

    #[test]
    fn zero_coefficient_is_invalid() {
        let mut eq = Equation::parse("H2 + O2 -> H2O + H2O2").unwrap();

        assert_eq!(eq.solve(), Err(BalanceError::InvalidSolution));
        assert!(!eq.is_solved());
    }
}
