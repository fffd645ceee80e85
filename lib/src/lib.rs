pub mod equation;
pub mod error;
pub mod formula;
pub mod fraction;
pub mod matrix;
pub mod stoichiometry;

pub use equation::{parse_equation, Equation, Side, Species, ARROWS, MAX_EQUATION_LEN, OUTPUT_ARROW};
pub use error::{BalanceError, EquationError, FormulaError, StoichiometryError};
pub use formula::{parse_formula, Compound, ElementCounts};
pub use matrix::StoichiometricMatrix;
pub use stoichiometry::{
    limiting_reagent, limiting_reagent_from, molar_mass, percent_yield, LimitingReagent, MolarMass, ProductYield, ReactantAmount,
};





/// Balances a chemical equation
/// Coefficients already present in the input are ignored and computed again
/// # Arguments
/// * `equation` - unbalanced equation (e.g. `Fe + O2 -> Fe2O3`)
/// # Returns
/// * `Ok` - balanced equation with the smallest positive integer coefficients, coefficients of 1 are left out
/// * `Err` - error that occurred during parsing or solving
/// # Example
/// ```
/// use chembalance::balance;
///
/// assert_eq!(balance("Fe + O2 -> Fe2O3").unwrap(), "4 Fe + 3 O2 → 2 Fe2O3");
/// assert!(balance("Fe + O2").is_err());
/// ```
pub fn balance(equation: &str) -> Result<String, BalanceError> {
    let mut equation = Equation::parse(equation)?;
    equation.solve()?;

    equation.solution_str().ok_or(BalanceError::InvalidSolution)
}
