pub mod linear;

use crate::engine::equation::Equation;
use crate::generator::linear::GeneratorConstraints;

pub trait EquationGenerator {
    fn generate(&mut self, constraints: &GeneratorConstraints) -> Equation;
}
