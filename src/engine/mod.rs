pub mod equation;
pub mod format;
pub mod hint;
pub mod ledger;
pub mod stage;
pub mod term;
