use std::collections::VecDeque;
use std::time::{Duration, Instant};

use eqlab::engine::equation::{Equation, EquationId};
use eqlab::engine::stage::Stage;
use eqlab::engine::term::{Side, SourceTermId};
use eqlab::generator::EquationGenerator;
use eqlab::generator::linear::GeneratorConstraints;
use eqlab::session::drag::{DragEvent, DragPayload, DropZone};
use eqlab::session::input::{InputOp, KeypadField};
use eqlab::session::practice::{PracticeSession, PracticeSettings};

/// Replays a fixed list of equations, then repeats the last one.
struct Scripted {
    queue: VecDeque<(i32, i32, i32, i32)>,
    last: (i32, i32, i32, i32),
    next_id: u64,
}

impl Scripted {
    fn new(equations: &[(i32, i32, i32, i32)]) -> Self {
        Self {
            queue: equations.iter().copied().collect(),
            last: equations[0],
            next_id: 0,
        }
    }
}

impl EquationGenerator for Scripted {
    fn generate(&mut self, _constraints: &GeneratorConstraints) -> Equation {
        if let Some(next) = self.queue.pop_front() {
            self.last = next;
        }
        self.next_id += 1;
        let (lv, lc, rv, rc) = self.last;
        Equation::from_coefficients(EquationId(self.next_id), lv, lc, rv, rc)
            .expect("scripted equation must have an integer solution")
    }
}

fn session(equations: &[(i32, i32, i32, i32)], now: Instant) -> PracticeSession<Scripted> {
    PracticeSession::new(
        Scripted::new(equations),
        GeneratorConstraints::default(),
        PracticeSettings::default(),
        now,
    )
}

/// Lines up `bx + c = 0x + d` (sources 0, 1, 3) so the constant sits on the
/// right with a flipped sign. The `0x` card (source 2) stays on its shelf.
fn place_cards(session: &mut PracticeSession<Scripted>, now: Instant) {
    session.place(SourceTermId(0), Side::Left, now);
    let constant = session
        .place(SourceTermId(1), Side::Right, now)
        .expect("constant card placed");
    session.toggle_sign(constant, now);
    session.place(SourceTermId(3), Side::Right, now);
}

#[test]
fn two_x_plus_three_walks_every_stage() {
    let t0 = Instant::now();
    let mut s = session(&[(2, 3, 0, 7)], t0);
    assert_eq!(s.round().equation().solution, 2);
    assert_eq!(s.round().stage(), Stage::Placing);

    // the right side still offers its 0x card
    let zero_x = s.round().source(SourceTermId(2)).unwrap();
    assert!(zero_x.is_variable);
    assert_eq!(zero_x.coefficient, 0);
    assert_eq!(zero_x.origin_side, Side::Right);

    s.place(SourceTermId(0), Side::Left, t0);
    let three = s.place(SourceTermId(1), Side::Right, t0).unwrap();
    s.place(SourceTermId(3), Side::Right, t0);
    // +3 on the right is still the wrong sign
    assert_eq!(s.round().stage(), Stage::Placing);

    s.toggle_sign(three, t0);
    assert_eq!(s.round().stage(), Stage::Totals);
    assert_eq!(s.round().left_coefficient(), 2);
    assert_eq!(s.round().right_constant(), 4);

    assert!(s.replace_text(KeypadField::Coefficient, "2x", t0));
    assert_eq!(s.round().stage(), Stage::Totals);
    assert!(s.replace_text(KeypadField::Constant, "4", t0));
    assert_eq!(s.round().stage(), Stage::Division);

    s.keypad_input(&InputOp::Key('2'), t0);
    assert_eq!(s.round().stage(), Stage::Solution);
    assert_eq!(s.solved_count(), 0);

    s.keypad_input(&InputOp::Key('2'), t0);
    assert!(s.round().is_solved());
    assert_eq!(s.solved_count(), 1);
    assert_eq!(s.solve_log().len(), 1);
    // three placements and one sign flip
    assert_eq!(s.solve_log()[0].moves, 4);

    // further input on a solved round is not counted twice
    s.keypad_input(&InputOp::Backspace, t0);
    s.keypad_input(&InputOp::Key('2'), t0);
    assert_eq!(s.solved_count(), 1);
}

#[test]
fn unit_coefficient_skips_division() {
    let t0 = Instant::now();
    let mut s = session(&[(1, 5, 0, 8)], t0);
    place_cards(&mut s, t0);
    assert_eq!(s.round().stage(), Stage::Totals);

    s.replace_text(KeypadField::Coefficient, "x", t0);
    s.replace_text(KeypadField::Constant, "3", t0);
    assert_eq!(s.round().stage(), Stage::Solution);
    assert_eq!(s.round().keypad().active(), Some(KeypadField::Solution));

    // the division field is never active, so replacing it is ignored
    assert!(!s.replace_text(KeypadField::Division, "1", t0));

    s.replace_text(KeypadField::Solution, "3", t0);
    assert!(s.round().is_solved());
    assert_eq!(s.solved_count(), 1);
}

#[test]
fn full_width_paste_is_normalized() {
    let t0 = Instant::now();
    let mut s = session(&[(1, 5, 0, 8)], t0);
    place_cards(&mut s, t0);

    s.replace_text(KeypadField::Coefficient, "ｘ", t0);
    s.replace_text(KeypadField::Constant, "３", t0);
    assert_eq!(s.round().stage(), Stage::Solution);
    assert!(s.round().field(KeypadField::Constant).matches_expected_value);
}

#[test]
fn no_op_move_does_not_duplicate_history() {
    let t0 = Instant::now();
    let mut s = session(&[(2, 3, 0, 7)], t0);
    let x = s.place(SourceTermId(0), Side::Left, t0).unwrap();
    let len = s.round().history().len();

    assert!(!s.move_term(x, Side::Left, t0));
    assert_eq!(s.round().history().len(), len);

    assert!(s.move_term(x, Side::Right, t0));
    assert_eq!(s.round().history().len(), len + 1);
}

#[test]
fn drag_and_drop_places_and_removes_cards() {
    let t0 = Instant::now();
    let mut s = session(&[(2, 3, 0, 7)], t0);

    s.handle_drag(DragEvent::Started(DragPayload::Source(SourceTermId(0))), t0);
    assert!(s.handle_drag(DragEvent::ended(None, Some("drop-left")), t0));
    assert_eq!(s.round().ledger().len(), 1);
    let placed = s.round().ledger().terms()[0].instance_id;

    // releasing outside any zone keeps the card where it was
    s.handle_drag(DragEvent::Started(DragPayload::Placed(placed)), t0);
    assert!(!s.handle_drag(DragEvent::ended(None, None), t0));
    assert_eq!(s.round().ledger().len(), 1);

    // a shelf takes the card back
    s.handle_drag(DragEvent::Started(DragPayload::Placed(placed)), t0);
    assert!(s.handle_drag(
        DragEvent::ended(None, Some(DropZone::ShelfLeft.id())),
        t0
    ));
    assert!(s.round().ledger().is_empty());
}

#[test]
fn auto_advance_loads_the_next_equation() {
    let t0 = Instant::now();
    let mut s = session(&[(2, 3, 0, 7), (1, 5, 0, 8)], t0);
    let first = s.round().equation().id;
    place_cards(&mut s, t0);
    s.replace_text(KeypadField::Coefficient, "2x", t0);
    s.replace_text(KeypadField::Constant, "4", t0);
    s.keypad_input(&InputOp::Key('2'), t0);
    s.keypad_input(&InputOp::Key('2'), t0);
    assert_eq!(s.solved_count(), 1);

    let deadline = s.pending_advance().expect("advance scheduled");
    assert!(!s.tick(deadline - Duration::from_millis(1)));
    assert_eq!(s.round().equation().id, first);

    assert!(s.tick(deadline));
    assert_ne!(s.round().equation().id, first);
    assert_eq!(s.round().equation().solution, 3);
    assert_eq!(s.round().stage(), Stage::Placing);
    assert_eq!(s.pending_advance(), None);
}

#[test]
fn reset_cancels_pending_advance() {
    let t0 = Instant::now();
    let mut s = session(&[(1, 5, 0, 8)], t0);
    place_cards(&mut s, t0);
    s.replace_text(KeypadField::Coefficient, "x", t0);
    s.replace_text(KeypadField::Constant, "3", t0);
    s.replace_text(KeypadField::Solution, "3", t0);
    let deadline = s.pending_advance().expect("advance scheduled");

    s.reset();
    assert_eq!(s.pending_advance(), None);
    assert!(!s.tick(deadline + Duration::from_secs(5)));
    assert!(s.round().ledger().is_empty());
    assert_eq!(s.round().stage(), Stage::Placing);
}

#[test]
fn next_equation_cancels_pending_advance() {
    let t0 = Instant::now();
    let mut s = session(&[(1, 5, 0, 8)], t0);
    place_cards(&mut s, t0);
    s.replace_text(KeypadField::Coefficient, "x", t0);
    s.replace_text(KeypadField::Constant, "3", t0);
    s.replace_text(KeypadField::Solution, "3", t0);
    assert!(s.pending_advance().is_some());

    let later = t0 + Duration::from_millis(100);
    s.load_next(later);
    assert_eq!(s.pending_advance(), None);
    assert!(!s.tick(later + Duration::from_secs(5)));
}

#[test]
fn keep_practicing_off_waits_for_the_learner() {
    let t0 = Instant::now();
    let mut s = session(&[(1, 5, 0, 8)], t0);
    s.set_keep_practicing(false);
    place_cards(&mut s, t0);
    s.replace_text(KeypadField::Coefficient, "x", t0);
    s.replace_text(KeypadField::Constant, "3", t0);
    s.replace_text(KeypadField::Solution, "3", t0);

    assert_eq!(s.solved_count(), 1);
    assert_eq!(s.pending_advance(), None);
    assert!(!s.tick(t0 + Duration::from_secs(60)));
    assert!(s.round().is_solved());
}
