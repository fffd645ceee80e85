use crate::equation::Equation;
use crate::error::{BalanceError, StoichiometryError};
use crate::formula::{Compound, ElementCounts};
use mendeleev::ALL_ELEMENTS;





/// Molar mass of a formula
#[derive(Clone, Debug, PartialEq)]
pub struct MolarMass {
    /// Sum of atomic weights in g/mol
    pub grams_per_mole: f64,
    /// Symbols that are not in the periodic table (they add nothing to the mass)
    pub missing: Vec<String>,
}

/// Returns the standard atomic weight of an element in g/mol
/// # Example
/// ```
/// use chembalance::stoichiometry::atomic_weight;
///
/// assert!((atomic_weight("O").unwrap() - 15.999).abs() < 0.001);
/// assert_eq!(atomic_weight("Xx"), None);
/// ```
pub fn atomic_weight(symbol: &str) -> Option<f64> {
    ALL_ELEMENTS
        .iter()
        .find(|e| e.symbol() == symbol)
        .map(|e| f64::from(e.atomic_weight()))
}

/// Calculates the molar mass from element counts
/// # Arguments
/// * `elements` - element counts of one formula unit
/// # Returns
/// * `MolarMass` - mass in g/mol and the symbols that couldn't be found
/// # Example
/// ```
/// use chembalance::{molar_mass, parse_formula};
///
/// let glucose = molar_mass(&parse_formula("C6H12O6").unwrap());
/// assert!((glucose.grams_per_mole - 180.156).abs() < 0.01);
///
/// let unknown = molar_mass(&parse_formula("XqO").unwrap());
/// assert_eq!(unknown.missing, vec!["Xq".to_string()]);
/// ```
pub fn molar_mass(elements: &ElementCounts) -> MolarMass {
    let mut grams_per_mole = 0.0;
    let mut missing = Vec::new();
    for (symbol, &count) in elements {
        match atomic_weight(symbol) {
            Some(weight) => grams_per_mole += weight * count as f64,
            None => missing.push(symbol.clone()),
        }
    }

    MolarMass { grams_per_mole, missing }
}

/// Available amount of one reactant
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ReactantAmount {
    /// Amount in moles
    Moles(f64),
    /// Mass in grams, converted to moles through the molar mass of the reactant
    Grams(f64),
    /// Reactant is in excess and never limits the reaction
    Excess,
}
impl ReactantAmount {
    /// Converts the amount to moles, `Excess` becomes infinity
    /// # Arguments
    /// * `compound` - reactant the amount belongs to
    /// * `index` - position of the reactant, used in errors
    /// # Returns
    /// * `Ok` - moles
    /// * `Err` - amount is negative or not finite, or grams were given for a formula without a usable molar mass
    /// # Example
    /// ```
    /// use chembalance::{Compound, ReactantAmount};
    ///
    /// let water = Compound::parse("H2O").unwrap();
    ///
    /// assert!((ReactantAmount::Grams(36.03).to_moles(&water, 0).unwrap() - 2.0).abs() < 0.001);
    /// assert_eq!(ReactantAmount::Moles(0.5).to_moles(&water, 0).unwrap(), 0.5);
    /// assert_eq!(ReactantAmount::Excess.to_moles(&water, 0).unwrap(), f64::INFINITY);
    /// ```
    pub fn to_moles(&self, compound: &Compound, index: usize) -> Result<f64, StoichiometryError> {
        let value = match self {
            ReactantAmount::Excess => return Ok(f64::INFINITY),
            ReactantAmount::Moles(value) | ReactantAmount::Grams(value) => *value,
        };
        if !value.is_finite() || value < 0.0 { return Err(StoichiometryError::InvalidAmount { index }); }

        match self {
            ReactantAmount::Grams(_) => {
                let mass = compound.molar_mass();
                if !mass.missing.is_empty() || mass.grams_per_mole <= 0.0 {
                    return Err(StoichiometryError::UnknownMolarMass {
                        formula: compound.original_str().to_string(),
                        missing: mass.missing,
                    });
                }
                Ok(value / mass.grams_per_mole)
            },
            _ => Ok(value),
        }
    }
}

/// Theoretical amount of one product
#[derive(Clone, Debug, PartialEq)]
pub struct ProductYield {
    /// Product formula
    pub formula: String,
    /// Moles formed
    pub moles: f64,
    /// Grams formed
    pub grams: f64,
}

/// Outcome of relating reactant amounts through a balanced equation
#[derive(Clone, Debug, PartialEq)]
pub struct LimitingReagent {
    /// Index of the limiting reactant
    pub reactant: usize,
    /// Formula of the limiting reactant
    pub formula: String,
    /// Extent of reaction in moles (how many times the balanced reaction can run)
    pub extent: f64,
    /// Theoretical yield of every product
    pub products: Vec<ProductYield>,
    /// Moles of every reactant left over, infinite for reactants in excess
    pub leftovers: Vec<f64>,
}

/// Finds the limiting reactant of a solved equation and the theoretical yields
/// # Arguments
/// * `equation` - solved equation
/// * `moles` - available moles of every reactant, in order
/// # Returns
/// * `Ok` - limiting reactant, extent of reaction, yields and leftovers
/// * `Err` - equation isn't solved or amounts don't match the reactants
/// # Example
/// ```
/// use chembalance::{limiting_reagent, Equation};
///
/// let mut equation = Equation::parse("N2 + H2 -> NH3").unwrap();
/// equation.solve().unwrap();
///
/// let result = limiting_reagent(&equation, &[1.0, 1.0]).unwrap();
///
/// assert_eq!(result.formula, "H2");
/// assert!((result.products[0].moles - 2.0 / 3.0).abs() < 1e-12);
/// ```
pub fn limiting_reagent(equation: &Equation, moles: &[f64]) -> Result<LimitingReagent, StoichiometryError> {
    let amounts = moles.iter().map(|&m| ReactantAmount::Moles(m)).collect::<Vec<ReactantAmount>>();
    limiting_reagent_from(equation, &amounts)
}

/// Same as [`limiting_reagent`], but every reactant amount may be given in moles, in grams or as excess.
/// Reactants in excess are skipped when looking for the smallest extent.
/// # Example
/// ```
/// use chembalance::{limiting_reagent_from, Equation, ReactantAmount};
///
/// let mut equation = Equation::parse("CH4 + O2 -> CO2 + H2O").unwrap();
/// equation.solve().unwrap();
///
/// let result = limiting_reagent_from(&equation, &[ReactantAmount::Grams(16.043), ReactantAmount::Excess]).unwrap();
///
/// assert_eq!(result.formula, "CH4");
/// assert!((result.extent - 1.0).abs() < 1e-3);
/// assert_eq!(result.leftovers[1], f64::INFINITY);
/// ```
pub fn limiting_reagent_from(equation: &Equation, amounts: &[ReactantAmount]) -> Result<LimitingReagent, StoichiometryError> {
    let reactant_coeffs = equation.solution_reactants().ok_or(StoichiometryError::NotSolved)?;
    let product_coeffs = equation.solution_products().ok_or(StoichiometryError::NotSolved)?;

    if amounts.len() != reactant_coeffs.len() {
        return Err(StoichiometryError::AmountCount { expected: reactant_coeffs.len(), found: amounts.len() });
    }

    let moles = equation
        .reactants()
        .iter()
        .zip(amounts.iter())
        .enumerate()
        .map(|(index, (species, amount))| -> Result<f64, StoichiometryError> {
            let compound = Compound::parse(species.formula()).map_err(BalanceError::from)?;
            amount.to_moles(&compound, index)
        })
        .collect::<Result<Vec<f64>, StoichiometryError>>()?;

    // the first reactant with the smallest amount per coefficient wins ties, excess never wins
    let mut reactant = None;
    let mut extent = f64::INFINITY;
    for (i, (amount, &coeff)) in moles.iter().zip(reactant_coeffs.iter()).enumerate() {
        let runs = amount / coeff as f64;
        if runs < extent {
            extent = runs;
            reactant = Some(i);
        }
    }
    let reactant = reactant.ok_or(StoichiometryError::NoLimitingReagent)?;

    let products = equation
        .products()
        .iter()
        .zip(product_coeffs.iter())
        .map(|(species, &coeff)| -> Result<ProductYield, StoichiometryError> {
            let compound = Compound::parse(species.formula()).map_err(BalanceError::from)?;
            let formed = extent * coeff as f64;
            Ok(ProductYield {
                formula: species.formula().to_string(),
                moles: formed,
                grams: formed * compound.molar_mass().grams_per_mole,
            })
        })
        .collect::<Result<Vec<ProductYield>, StoichiometryError>>()?;

    let leftovers = moles
        .iter()
        .zip(reactant_coeffs.iter())
        .map(|(amount, &coeff)| (amount - extent * coeff as f64).max(0.0))
        .collect();

    Ok(LimitingReagent {
        reactant,
        formula: equation.reactants()[reactant].formula().to_string(),
        extent,
        products,
        leftovers,
    })
}

/// Percent yield of a product from the mass actually obtained
/// # Arguments
/// * `actual_grams` - mass obtained in grams
/// * `product` - theoretical yield of the same product
/// # Returns
/// * `Some` - `actual / theoretical * 100`
/// * `None` - actual mass is negative or not finite, or the theoretical mass is not positive
/// # Example
/// ```
/// use chembalance::{percent_yield, ProductYield};
///
/// let theoretical = ProductYield { formula: "NH3".to_string(), moles: 2.0, grams: 34.0 };
///
/// assert_eq!(percent_yield(17.0, &theoretical), Some(50.0));
/// assert_eq!(percent_yield(-1.0, &theoretical), None);
/// ```
pub fn percent_yield(actual_grams: f64, product: &ProductYield) -> Option<f64> {
    if !actual_grams.is_finite() || actual_grams < 0.0 { return None; }
    if !(product.grams.is_finite() && product.grams > 0.0) { return None; }

    Some(actual_grams / product.grams * 100.0)
}
