use crate::cli::{BalanceArgs, FormulaArgs, YieldArgs};
use crate::error::{CliError, Result};
use chembalance::{limiting_reagent_from, percent_yield, BalanceError, Compound, Equation, ReactantAmount, StoichiometryError};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// Balances every equation given on the command line, or one per non-empty line of `input`.
/// Balanced equations go to `out`, failures are reported and counted.
pub fn balance(args: BalanceArgs, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    let equations = if args.equations.is_empty() {
        debug!("No equations given, reading from stdin.");
        read_equations(input)?
    } else {
        args.equations
    };
    if equations.is_empty() {
        return Err(CliError::Argument("no equations to balance".to_string()));
    }

    let total = equations.len();
    let mut failed = 0;
    for equation in &equations {
        match chembalance::balance(equation) {
            Ok(balanced) => {
                info!("Balanced '{}'", equation);
                writeln!(out, "{}", balanced)?;
            }
            Err(err) => {
                warn!("Failed to balance '{}': {}", equation, err);
                if total == 1 {
                    return Err(err.into());
                }
                writeln!(out, "error: {}: {}", equation, err)?;
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Unbalanced { failed, total });
    }
    Ok(())
}

fn read_equations(input: impl BufRead) -> Result<Vec<String>> {
    let mut equations = Vec::new();
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            equations.push(line.to_string());
        }
    }
    Ok(equations)
}

/// Prints the element counts of a formula, one `Symbol count` per line.
pub fn parse(args: FormulaArgs, out: &mut impl Write) -> Result<()> {
    let compound = Compound::parse(args.formula.trim())?;
    debug!("Parsed '{}' into {} elements", compound.original_str(), compound.elements().len());

    for (symbol, count) in compound.elements() {
        writeln!(out, "{} {}", symbol, count)?;
    }
    Ok(())
}

/// Prints the molar mass of a formula.
pub fn mass(args: FormulaArgs, out: &mut impl Write) -> Result<()> {
    let compound = Compound::parse(args.formula.trim())?;
    let mass = compound.molar_mass();

    writeln!(out, "{}: {:.3} g/mol", compound.original_str(), mass.grams_per_mole)?;
    if !mass.missing.is_empty() {
        warn!("No atomic weight for {}", mass.missing.join(", "));
        writeln!(out, "unknown elements: {}", mass.missing.join(", "))?;
    }
    Ok(())
}

/// Balances the equation and prints the limiting reagent, yields and leftovers.
/// With an actual mass the percent yield of the chosen product is printed as well.
pub fn theoretical_yield(args: YieldArgs, out: &mut impl Write) -> Result<()> {
    let mut equation = Equation::parse(&args.equation).map_err(BalanceError::from)?;
    equation.solve()?;
    let balanced = equation.solution_str().ok_or(BalanceError::InvalidSolution)?;
    info!("Balanced '{}' as '{}'", args.equation, balanced);

    let amounts = reactant_amounts(&equation, &args)?;
    debug!("Reactant amounts: {:?}", amounts);

    let result = limiting_reagent_from(&equation, &amounts)?;
    debug!("Extent of reaction {} mol", result.extent);

    writeln!(out, "Balanced: {}", balanced)?;
    writeln!(out, "Limiting reagent: {}", result.formula)?;
    writeln!(out, "Extent of reaction: {:.4} mol", result.extent)?;
    for product in &result.products {
        writeln!(out, "{}: {:.4} mol ({:.4} g)", product.formula, product.moles, product.grams)?;
    }
    for (species, leftover) in equation.reactants().iter().zip(result.leftovers.iter()) {
        if leftover.is_infinite() {
            writeln!(out, "Left over {}: excess", species.formula())?;
        } else {
            writeln!(out, "Left over {}: {:.4} mol", species.formula(), leftover)?;
        }
    }

    if let Some(actual) = args.actual {
        let product = match &args.product {
            Some(formula) => result
                .products
                .iter()
                .find(|p| &p.formula == formula)
                .ok_or_else(|| CliError::Argument(format!("'{}' is not a product of the equation", formula)))?,
            None => &result.products[0],
        };
        let percent = percent_yield(actual, product).ok_or_else(|| {
            CliError::Argument(format!("percent yield of {} is undefined for {} g", product.formula, actual))
        })?;
        writeln!(out, "Percent yield of {}: {:.2} %", product.formula, percent)?;
    }
    Ok(())
}

/// Pairs the given amounts with the reactants that are not in excess, in order.
fn reactant_amounts(equation: &Equation, args: &YieldArgs) -> Result<Vec<ReactantAmount>> {
    let reactants = equation.reactants();
    if let Some(unknown) = args.excess.iter().find(|f| !reactants.iter().any(|s| s.formula() == f.as_str())) {
        return Err(CliError::Argument(format!("'{}' is not a reactant of the equation", unknown)));
    }

    let (values, unit): (&[f64], fn(f64) -> ReactantAmount) = if args.grams.is_empty() {
        (args.moles.as_slice(), ReactantAmount::Moles)
    } else {
        (args.grams.as_slice(), ReactantAmount::Grams)
    };

    let limiting_count = reactants.iter().filter(|s| !args.excess.iter().any(|f| f == s.formula())).count();
    if values.len() != limiting_count {
        return Err(StoichiometryError::AmountCount { expected: limiting_count, found: values.len() }.into());
    }

    let mut values = values.iter();
    Ok(reactants
        .iter()
        .map(|species| {
            if args.excess.iter().any(|f| f == species.formula()) {
                ReactantAmount::Excess
            } else {
                values.next().map_or(ReactantAmount::Excess, |&v| unit(v))
            }
        })
        .collect())
}
