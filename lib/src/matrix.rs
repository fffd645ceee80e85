use crate::error::{BalanceError, FormulaError};
use crate::formula::Compound;
use crate::fraction::divide;
use malachite::num::basic::traits::{One, Zero};
use malachite::Rational;
use std::collections::BTreeSet;





/// Element-by-species matrix of a reaction, `A·x = 0` holds for balanced coefficients `x`.
/// Rows follow the sorted element symbols, columns follow reactants and then products.
/// Reactant entries are positive atom counts, product entries are negative.
/// # Example
/// ```
/// use chembalance::{Compound, StoichiometricMatrix};
/// use malachite::Rational;
///
/// let compounds = vec![
///     Compound::parse("H2").unwrap(),
///     Compound::parse("O2").unwrap(),
///     Compound::parse("H2O").unwrap(),
/// ];
/// let matrix = StoichiometricMatrix::new(&compounds, 2).unwrap();
///
/// assert_eq!(matrix.elements(), &["H".to_string(), "O".to_string()]);
/// assert_eq!(matrix.rows()[0], vec![Rational::from(2), Rational::from(0), Rational::from(-2)]);
/// assert_eq!(matrix.rows()[1], vec![Rational::from(0), Rational::from(2), Rational::from(-1)]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoichiometricMatrix {
    /// Element symbol of every row
    elements: Vec<String>,
    /// Signed atom counts
    cells: Vec<Vec<Rational>>,
    /// Number of leading columns that belong to reactants
    reactant_count: usize,
}
impl StoichiometricMatrix {
    /// Builds the matrix from parsed species
    /// # Arguments
    /// * `compounds` - reactants followed by products
    /// * `reactant_count` - how many of the compounds are reactants
    /// # Returns
    /// * `Ok` - matrix
    /// * `Err` - one of the compounds contains no atoms, its column would be all zeros
    pub fn new(compounds: &[Compound], reactant_count: usize) -> Result<Self, FormulaError> {
        if let Some(empty) = compounds.iter().find(|c| !c.has_atoms()) {
            return Err(FormulaError::NoElements { formula: empty.original_str().to_string() });
        }

        let elements: BTreeSet<&String> = compounds.iter().flat_map(|c| c.elements().keys()).collect();

        let cells = elements
            .iter()
            .map(|element| compounds
                .iter()
                .enumerate()
                .map(|(col, compound)| {
                    let count = Rational::from(compound.count(element));
                    if col < reactant_count { count } else { -count }
                })
                .collect()
            )
            .collect::<Vec<Vec<Rational>>>();

        Ok(Self {
            elements: elements.into_iter().cloned().collect(),
            cells,
            reactant_count,
        })
    }

    /// Returns the element symbol of every row
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Returns the rows of the matrix
    pub fn rows(&self) -> &[Vec<Rational>] {
        &self.cells
    }

    /// Returns the number of reactant columns
    pub fn reactant_count(&self) -> usize {
        self.reactant_count
    }

    /// Returns the number of species (columns)
    pub fn column_count(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Finds one non-trivial solution of `A·x = 0`.
    /// The last column without a pivot is set to 1, other free columns to 0,
    /// and every pivot unknown is solved from its row.
    /// # Returns
    /// * `Ok` - exact solution vector (not yet scaled to integers)
    /// * `Err` - `BalanceError::NoSolution` if every column has a pivot
    pub fn null_space_vector(&self) -> Result<Vec<Rational>, BalanceError> {
        let cols = self.column_count();
        let mut reduced = self.cells.clone();
        let pivot_cols = reduce_row_echelon(&mut reduced)?;

        let free = (0..cols).rev().find(|c| !pivot_cols.contains(c)).ok_or(BalanceError::NoSolution)?;

        let mut solution = vec![Rational::ZERO; cols];
        solution[free] = Rational::ONE;

        // pivot rows come first and in the same order as pivot_cols
        for (row, &pivot) in reduced.iter().zip(pivot_cols.iter()) {
            let mut sum = Rational::ZERO;
            for (col, cell) in row.iter().enumerate() {
                if col != pivot && *cell != Rational::ZERO {
                    sum += cell * &solution[col];
                }
            }
            solution[pivot] = -sum;
        }

        Ok(solution)
    }
}

/// Reduces a matrix to reduced row echelon form in place
/// The pivot of each row is the first non-zero entry in the leading column, searched from the current row downwards.
/// # Arguments
/// * `matrix` - matrix, every row must have the same length
/// # Returns
/// * `Ok` - columns that received a pivot, in row order
/// * `Err` - division by a zero pivot (can't happen for a well-formed matrix)
/// # Example
/// ```
/// use chembalance::matrix::reduce_row_echelon;
/// use malachite::Rational;
/// use std::str::FromStr;
///
/// let mut matrix = vec![
///     vec![Rational::from(0), Rational::from(2), Rational::from(-3)],
///     vec![Rational::from(1), Rational::from(0), Rational::from(-2)],
/// ];
///
/// let pivots = reduce_row_echelon(&mut matrix).unwrap();
///
/// assert_eq!(pivots, vec![0, 1]);
/// assert_eq!(matrix, vec![
///     vec![Rational::from(1), Rational::from(0), Rational::from(-2)],
///     vec![Rational::from(0), Rational::from(1), Rational::from_str("-3/2").unwrap()],
/// ]);
/// ```
pub fn reduce_row_echelon(matrix: &mut [Vec<Rational>]) -> Result<Vec<usize>, BalanceError> {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, Vec::len);

    let mut pivot_cols = Vec::new();
    let mut lead = 0;

    for r in 0..rows {
        let pivot_row = loop {
            if lead >= cols { return Ok(pivot_cols); }
            match (r..rows).find(|&i| matrix[i][lead] != Rational::ZERO) {
                Some(i) => break i,
                None => lead += 1,
            }
        };
        matrix.swap(r, pivot_row);

        // normalize the pivot row so the pivot becomes 1
        let pivot = matrix[r][lead].clone();
        for cell in matrix[r].iter_mut() {
            *cell = divide(cell, &pivot)?;
        }

        // eliminate the leading column from every other row (above and below)
        for i in 0..rows {
            if i == r || matrix[i][lead] == Rational::ZERO { continue; }
            let factor = matrix[i][lead].clone();
            for j in 0..cols {
                let sub_amount = &factor * &matrix[r][j];
                matrix[i][j] -= sub_amount;
            }
        }

        pivot_cols.push(lead);
        lead += 1;
    }

    Ok(pivot_cols)
}





#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn matrix_for(reactants: &[&str], products: &[&str]) -> StoichiometricMatrix {
        let compounds = reactants
            .iter()
            .chain(products.iter())
            .map(|f| Compound::parse(f).unwrap())
            .collect::<Vec<Compound>>();
        StoichiometricMatrix::new(&compounds, reactants.len()).unwrap()
    }

    fn row(values: &[&str]) -> Vec<Rational> {
        values.iter().map(|v| Rational::from_str(v).unwrap()).collect()
    }

    #[test]
    fn rows_are_sorted_elements() {
        let matrix = matrix_for(&["Na3PO4", "BaCl2"], &["Ba3(PO4)2", "NaCl"]);

        assert_eq!(matrix.elements(), &["Ba", "Cl", "Na", "O", "P"]);
        assert_eq!(matrix.rows()[0], row(&["0", "1", "-3", "0"]));
        assert_eq!(matrix.rows()[3], row(&["4", "0", "-8", "0"]));
        assert_eq!(matrix.reactant_count(), 2);
        assert_eq!(matrix.column_count(), 4);
    }

    #[test]
    fn empty_species_is_rejected() {
        let compounds = vec![Compound::parse("H2").unwrap(), Compound::parse("").unwrap()];

        assert_eq!(
            StoichiometricMatrix::new(&compounds, 1),
            Err(FormulaError::NoElements { formula: String::new() })
        );
    }

    #[test]
    fn rref_with_swap() {
        let mut matrix = vec![
            row(&["3", "0", "-1", "0"]),
            row(&["8", "0", "0", "-2"]),
            row(&["0", "2", "-2", "-1"]),
        ];

        let pivots = reduce_row_echelon(&mut matrix).unwrap();

        assert_eq!(pivots, vec![0, 1, 2]);
        assert_eq!(matrix, vec![
            row(&["1", "0", "0", "-1/4"]),
            row(&["0", "1", "0", "-5/4"]),
            row(&["0", "0", "1", "-3/4"]),
        ]);
    }

    #[test]
    fn rref_skips_empty_columns() {
        let mut matrix = vec![
            row(&["0", "1", "2"]),
            row(&["0", "2", "4"]),
        ];

        let pivots = reduce_row_echelon(&mut matrix).unwrap();

        assert_eq!(pivots, vec![1]);
        assert_eq!(matrix, vec![row(&["0", "1", "2"]), row(&["0", "0", "0"])]);
    }

    #[test]
    fn null_space_of_combustion() {
        let matrix = matrix_for(&["C3H8", "O2"], &["CO2", "H2O"]);

        assert_eq!(matrix.null_space_vector().unwrap(), row(&["1/4", "5/4", "3/4", "1"]));
    }

    #[test]
    fn last_free_column_is_chosen() {
        let matrix = matrix_for(&["H2", "O2"], &["H2O", "H2O2"]);

        assert_eq!(matrix.null_space_vector().unwrap(), row(&["1", "1", "0", "1"]));
    }

    #[test]
    fn full_rank_has_no_solution() {
        let matrix = matrix_for(&["H2"], &["O2"]);

        assert_eq!(matrix.null_space_vector(), Err(BalanceError::NoSolution));
    }
}
