use wasm_bindgen::prelude::*;
use chembalance::{balance, Compound};


// Export a `balance_io` function from Rust to JavaScript.
#[wasm_bindgen]
/// Balance input equation and return output
/// First char is 1 on success (followed by the balanced equation), 0 on error (followed by the message)
pub fn balance_io(equation: &str) -> String {
    match balance(equation) {
        Ok(balanced) => format!("1{}", balanced),
        Err(err) => format!("0{}", err),
    }
}

// Export a `molar_mass_io` function from Rust to JavaScript.
#[wasm_bindgen]
/// Compute molar mass of input formula in g/mol
/// First char is 1 on success (followed by the mass with 3 decimals), 0 on error
/// Unknown element symbols make the call fail since the mass would be wrong
pub fn molar_mass_io(formula: &str) -> String {
    let compound = match Compound::parse(formula.trim()) {
        Ok(compound) => compound,
        Err(err) => return format!("0{}", err),
    };

    let mass = compound.molar_mass();
    if !mass.missing.is_empty() {
        return format!("0Unknown elements: {}", mass.missing.join(", "));
    }
    format!("1{:.3}", mass.grams_per_mole)
}
