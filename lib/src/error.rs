use crate::equation::Side;
use std::error::Error;
use std::fmt::{Display, Formatter};





/// Errors that can occur while splitting an equation into species
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum EquationError {
    /// Input is longer than [`crate::MAX_EQUATION_LEN`] characters
    TooLong { length: usize, max: usize },
    /// There should be exactly one arrow in the equation, this many were found
    ArrowCount(usize),
    /// One side of the arrow holds no species
    EmptySide(Side),
    /// Written coefficient in front of a species does not fit into 64 bits
    CoefficientTooLarge { species: String },
}
impl Display for EquationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EquationError::TooLong { length, max } => write!(f, "Equation is too long ({} characters, at most {} allowed)", length, max),
            EquationError::ArrowCount(0) => write!(f, "Could not find a reaction arrow (use ->, =>, = or →)"),
            EquationError::ArrowCount(count) => write!(f, "There should be exactly one arrow in the equation, found {}", count),
            EquationError::EmptySide(side) => write!(f, "The {} side of the equation has no species", side),
            EquationError::CoefficientTooLarge { species } => write!(f, "Coefficient of '{}' is too large", species),
        }
    }
}
impl Error for EquationError {}

/// Errors that can occur while parsing a single chemical formula
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FormulaError {
    /// Character that is not an element, count, parenthesis or separator
    UnexpectedChar { ch: char, formula: String },
    /// `)` without a matching `(`
    UnmatchedClose { formula: String },
    /// Formula ended while a group was still open
    UnclosedGroup { formula: String },
    /// Formula contains no atoms at all
    NoElements { formula: String },
    /// Atom count does not fit into 64 bits
    CountTooLarge { formula: String },
}
impl Display for FormulaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormulaError::UnexpectedChar { ch, formula } => write!(f, "Unexpected token '{}' in formula '{}'", ch, formula),
            FormulaError::UnmatchedClose { formula } => write!(f, "Mismatched parentheses in formula '{}': ')' has no matching '('", formula),
            FormulaError::UnclosedGroup { formula } => write!(f, "Mismatched parentheses in formula '{}': '(' is never closed", formula),
            FormulaError::NoElements { formula } => write!(f, "Species '{}' contains no elements", formula),
            FormulaError::CountTooLarge { formula } => write!(f, "Atom count in formula '{}' is too large", formula),
        }
    }
}
impl Error for FormulaError {}

/// Errors that can occur while balancing an equation
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum BalanceError {
    /// Equation could not be split into reactants and products
    Equation(EquationError),
    /// One of the species has an invalid formula
    Formula(FormulaError),
    /// Fraction with a zero denominator was requested
    DivideByZero,
    /// Every species column got a pivot, so only the all-zero solution exists
    NoSolution,
    /// Solution vector reduced to all zeros
    DegenerateSolution,
    /// Solution was calculated, but is invalid (non-positive coefficient or atoms don't balance)
    InvalidSolution,
    /// Coefficient does not fit into 64 bits
    CoefficientOverflow,
}
impl Display for BalanceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceError::Equation(err) => write!(f, "{}", err),
            BalanceError::Formula(err) => write!(f, "{}", err),
            BalanceError::DivideByZero => write!(f, "Divide by zero"),
            BalanceError::NoSolution => write!(f, "Could not balance equation (no free variable, the system is overconstrained)"),
            BalanceError::DegenerateSolution => write!(f, "Could not balance equation (only the all-zero solution was found)"),
            BalanceError::InvalidSolution => write!(f, "Could not balance equation with positive coefficients"),
            BalanceError::CoefficientOverflow => write!(f, "Balanced coefficients are too large"),
        }
    }
}
impl Error for BalanceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BalanceError::Equation(err) => Some(err),
            BalanceError::Formula(err) => Some(err),
            _ => None,
        }
    }
}
impl From<EquationError> for BalanceError {
    fn from(err: EquationError) -> Self {
        BalanceError::Equation(err)
    }
}
impl From<FormulaError> for BalanceError {
    fn from(err: FormulaError) -> Self {
        BalanceError::Formula(err)
    }
}

/// Errors that can occur during yield calculations
#[derive(Clone, Debug, PartialEq)]
pub enum StoichiometryError {
    /// Equation could not be balanced
    Balance(BalanceError),
    /// Equation has to be solved before amounts can be related
    NotSolved,
    /// One amount is needed per reactant
    AmountCount { expected: usize, found: usize },
    /// Amount is negative or not finite
    InvalidAmount { index: usize },
    /// Mass of a reactant can't be converted to moles without a known molar mass
    UnknownMolarMass { formula: String, missing: Vec<String> },
    /// Every reactant is in excess, nothing limits the reaction
    NoLimitingReagent,
}
impl Display for StoichiometryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoichiometryError::Balance(err) => write!(f, "{}", err),
            StoichiometryError::NotSolved => write!(f, "Equation is not balanced yet"),
            StoichiometryError::AmountCount { expected, found } => write!(f, "Expected {} reactant amounts, got {}", expected, found),
            StoichiometryError::InvalidAmount { index } => write!(f, "Amount of reactant {} must be a non-negative number", index + 1),
            StoichiometryError::UnknownMolarMass { formula, missing } if missing.is_empty() => write!(f, "Molar mass of '{}' is zero, grams can't be converted to moles", formula),
            StoichiometryError::UnknownMolarMass { formula, missing } => write!(f, "Missing atomic weights for {} in '{}'", missing.join(", "), formula),
            StoichiometryError::NoLimitingReagent => write!(f, "Every reactant is in excess, at least one amount is needed"),
        }
    }
}
impl Error for StoichiometryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoichiometryError::Balance(err) => Some(err),
            _ => None,
        }
    }
}
impl From<BalanceError> for StoichiometryError {
    fn from(err: BalanceError) -> Self {
        StoichiometryError::Balance(err)
    }
}
