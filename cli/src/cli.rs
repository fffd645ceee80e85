use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "chembalance - balance chemical equations with exact arithmetic and relate amounts through them.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Balance one or more equations (one per line from stdin when none are given).
    Balance(BalanceArgs),
    /// Show the element counts of a formula.
    Parse(FormulaArgs),
    /// Show the molar mass of a formula in g/mol.
    Mass(FormulaArgs),
    /// Balance an equation and find the limiting reagent and theoretical yields.
    Yield(YieldArgs),
}

/// Arguments for the `balance` subcommand.
#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Equations to balance, e.g. "Fe + O2 -> Fe2O3".
    #[arg(value_name = "EQUATION")]
    pub equations: Vec<String>,
}

/// Arguments for the `parse` and `mass` subcommands.
#[derive(Args, Debug)]
pub struct FormulaArgs {
    /// Chemical formula, e.g. "Ba3(PO4)2".
    #[arg(required = true, value_name = "FORMULA")]
    pub formula: String,
}

/// Arguments for the `yield` subcommand.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("amounts").required(true).args(["moles", "grams"])))]
pub struct YieldArgs {
    /// Equation relating the amounts, coefficients are recomputed.
    #[arg(required = true, value_name = "EQUATION")]
    pub equation: String,

    /// Available moles of every reactant not in excess, in order. Example: --moles 1,0.5
    #[arg(short, long, value_name = "MOL", value_delimiter = ',', num_args = 1..)]
    pub moles: Vec<f64>,

    /// Available grams of every reactant not in excess, in order. Example: --grams 28,6
    #[arg(short, long, value_name = "GRAMS", value_delimiter = ',', num_args = 1..)]
    pub grams: Vec<f64>,

    /// Reactants present in excess, they never limit the reaction. Example: --excess O2
    #[arg(short, long, value_name = "FORMULA", value_delimiter = ',')]
    pub excess: Vec<String>,

    /// Mass of product actually obtained in grams, prints the percent yield
    #[arg(short, long, value_name = "GRAMS")]
    pub actual: Option<f64>,

    /// Product the actual mass belongs to (defaults to the first product)
    #[arg(short, long, value_name = "FORMULA", requires = "actual")]
    pub product: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_accepts_many_equations() {
        let cli = Cli::try_parse_from(["chembalance", "balance", "H2 + O2 -> H2O", "Fe + O2 -> Fe2O3"]).unwrap();

        match cli.command {
            Commands::Balance(args) => assert_eq!(args.equations.len(), 2),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_flags() {
        let cli = Cli::try_parse_from(["chembalance", "mass", "H2O", "-vv", "--log-file", "out.log"]).unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_file, Some(PathBuf::from("out.log")));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["chembalance", "-q", "-v", "parse", "H2O"]).is_err());
    }

    #[test]
    fn yield_moles_are_comma_separated() {
        let cli = Cli::try_parse_from(["chembalance", "yield", "N2 + H2 -> NH3", "--moles", "1,0.5"]).unwrap();

        match cli.command {
            Commands::Yield(args) => assert_eq!(args.moles, vec![1.0, 0.5]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn yield_in_grams_with_excess() {
        let cli = Cli::try_parse_from([
            "chembalance", "yield", "CH4 + O2 -> CO2 + H2O", "--grams", "16", "--excess", "O2", "--actual", "30.5",
        ]).unwrap();

        match cli.command {
            Commands::Yield(args) => {
                assert!(args.moles.is_empty());
                assert_eq!(args.grams, vec![16.0]);
                assert_eq!(args.excess, vec!["O2".to_string()]);
                assert_eq!(args.actual, Some(30.5));
                assert_eq!(args.product, None);
            },
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn yield_needs_exactly_one_unit() {
        assert!(Cli::try_parse_from(["chembalance", "yield", "N2 + H2 -> NH3"]).is_err());
        assert!(Cli::try_parse_from(["chembalance", "yield", "N2 + H2 -> NH3", "-m", "1,1", "-g", "28,6"]).is_err());
    }

    #[test]
    fn formula_is_required() {
        assert!(Cli::try_parse_from(["chembalance", "parse"]).is_err());
    }
}
