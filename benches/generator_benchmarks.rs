use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use eqlab::engine::equation::{Equation, EquationId};
use eqlab::engine::format::{equation_markup, equation_text};
use eqlab::engine::term::{Side, SourceTermId};
use eqlab::generator::EquationGenerator;
use eqlab::generator::linear::{GeneratorConstraints, LinearGenerator};
use eqlab::session::round::Round;

fn all_constraints() -> Vec<GeneratorConstraints> {
    (0..8u8)
        .map(|bits| GeneratorConstraints {
            force_left_constant_zero: bits & 1 != 0,
            force_right_variable_zero: bits & 2 != 0,
            force_right_constant_zero: bits & 4 != 0,
        })
        .collect()
}

fn bench_generate(c: &mut Criterion) {
    for constraints in all_constraints() {
        let name = format!(
            "generate (lc0={} rv0={} rc0={})",
            constraints.force_left_constant_zero as u8,
            constraints.force_right_variable_zero as u8,
            constraints.force_right_constant_zero as u8,
        );
        let mut generator = LinearGenerator::new(SmallRng::seed_from_u64(42));
        c.bench_function(&name, |b| {
            b.iter(|| generator.generate(black_box(&constraints)))
        });
    }
}

fn bench_format(c: &mut Criterion) {
    let equation = Equation::from_coefficients(EquationId(1), -3, 7, 2, -8).unwrap();

    c.bench_function("equation_text", |b| {
        b.iter(|| equation_text(black_box(&equation)))
    });
    c.bench_function("equation_markup", |b| {
        b.iter(|| equation_markup(black_box(&equation)))
    });
}

fn bench_round(c: &mut Criterion) {
    let equation = Equation::from_coefficients(EquationId(1), 2, 3, 0, 7).unwrap();

    c.bench_function("round place + sync (3 cards)", |b| {
        b.iter(|| {
            let mut round = Round::new(black_box(equation));
            round.place(SourceTermId(0), Side::Left);
            if let Some(id) = round.place(SourceTermId(1), Side::Right) {
                round.toggle_sign(id);
            }
            round.place(SourceTermId(3), Side::Right);
            round
        })
    });
}

criterion_group!(benches, bench_generate, bench_format, bench_round);
criterion_main!(benches);
