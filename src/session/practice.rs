use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::engine::equation::{Equation, EquationId};
use crate::engine::term::{InstanceId, Side, SourceTermId};
use crate::generator::EquationGenerator;
use crate::generator::linear::{GeneratorConstraints, LinearGenerator};
use crate::session::drag::DragEvent;
use crate::session::input::{InputOp, KeypadField};
use crate::session::round::Round;

pub const DEFAULT_AUTO_ADVANCE: Duration = Duration::from_millis(1600);
pub const DEFAULT_HIGHLIGHT: Duration = Duration::from_millis(900);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PracticeSettings {
    pub keep_practicing: bool,
    pub auto_advance: Duration,
    pub highlight: Duration,
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            keep_practicing: true,
            auto_advance: DEFAULT_AUTO_ADVANCE,
            highlight: DEFAULT_HIGHLIGHT,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolveRecord {
    pub equation: Equation,
    pub solved_at: DateTime<Utc>,
    pub moves: u32,
}

/// Owns the generator and the current round, counts solved equations and
/// drives the two deferred actions (auto-advance and banner highlight).
///
/// Time is passed in explicitly; the caller's event loop feeds `tick`.
#[derive(Debug)]
pub struct PracticeSession<G: EquationGenerator = LinearGenerator> {
    generator: G,
    constraints: GeneratorConstraints,
    settings: PracticeSettings,
    round: Round,
    solved_count: u32,
    last_solved: Option<EquationId>,
    pending_advance: Option<Instant>,
    highlight_until: Option<Instant>,
    solve_log: Vec<SolveRecord>,
}

impl<G: EquationGenerator> PracticeSession<G> {
    /// Start a session with its first equation already loaded.
    pub fn new(
        mut generator: G,
        constraints: GeneratorConstraints,
        settings: PracticeSettings,
        now: Instant,
    ) -> Self {
        let round = Round::new(generator.generate(&constraints));
        info!(id = %round.equation().id, "session started");
        Self {
            generator,
            constraints,
            settings,
            round,
            solved_count: 0,
            last_solved: None,
            pending_advance: None,
            highlight_until: Some(now + settings.highlight),
            solve_log: Vec::new(),
        }
    }

    /// Replace the round with a freshly generated equation. Also used for
    /// the learner's "next equation" request.
    pub fn load_next(&mut self, now: Instant) {
        self.pending_advance = None;
        let equation = self.generator.generate(&self.constraints);
        info!(id = %equation.id, solution = equation.solution, "loaded equation");
        self.round = Round::new(equation);
        self.last_solved = None;
        self.highlight_until = Some(now + self.settings.highlight);
    }

    /// Clear the learner's work on the current equation.
    pub fn reset(&mut self) {
        self.pending_advance = None;
        self.round.reset();
    }

    /// Fire due deadlines. Returns true when a new equation was loaded.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.highlight_until.is_some_and(|until| now >= until) {
            self.highlight_until = None;
        }
        match self.pending_advance {
            Some(deadline) if now >= deadline => {
                self.load_next(now);
                true
            }
            _ => false,
        }
    }

    pub fn handle_drag(&mut self, event: DragEvent, now: Instant) -> bool {
        let changed = self.round.handle_drag(event);
        self.check_solved(now);
        changed
    }

    pub fn place(&mut self, source: SourceTermId, side: Side, now: Instant) -> Option<InstanceId> {
        let placed = self.round.place(source, side);
        self.check_solved(now);
        placed
    }

    pub fn move_term(&mut self, id: InstanceId, side: Side, now: Instant) -> bool {
        let changed = self.round.move_term(id, side);
        self.check_solved(now);
        changed
    }

    pub fn remove(&mut self, id: InstanceId, now: Instant) -> bool {
        let changed = self.round.remove(id);
        self.check_solved(now);
        changed
    }

    pub fn toggle_sign(&mut self, id: InstanceId, now: Instant) -> bool {
        let changed = self.round.toggle_sign(id);
        self.check_solved(now);
        changed
    }

    pub fn keypad_input(&mut self, op: &InputOp, now: Instant) -> bool {
        let changed = self.round.keypad_input(op);
        self.check_solved(now);
        changed
    }

    pub fn replace_text(&mut self, field: KeypadField, raw: &str, now: Instant) -> bool {
        let changed = self.round.replace_text(field, raw);
        self.check_solved(now);
        changed
    }

    /// Count the round once, the first time it is observed solved.
    fn check_solved(&mut self, now: Instant) -> bool {
        let id = self.round.equation().id;
        if !self.round.is_solved() || self.last_solved == Some(id) {
            return false;
        }
        self.last_solved = Some(id);
        self.solved_count += 1;
        self.solve_log.push(SolveRecord {
            equation: *self.round.equation(),
            solved_at: Utc::now(),
            moves: self.round.moves(),
        });
        info!(%id, solved = self.solved_count, moves = self.round.moves(), "round solved");
        if self.settings.keep_practicing {
            self.pending_advance = Some(now + self.settings.auto_advance);
        }
        true
    }

    /// Turning the mode off cancels an advance that is already scheduled.
    pub fn set_keep_practicing(&mut self, enabled: bool) {
        self.settings.keep_practicing = enabled;
        if !enabled {
            self.pending_advance = None;
        }
    }

    /// Takes effect from the next generated equation.
    pub fn set_constraints(&mut self, constraints: GeneratorConstraints) {
        self.constraints = constraints;
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn constraints(&self) -> GeneratorConstraints {
        self.constraints
    }

    pub fn settings(&self) -> PracticeSettings {
        self.settings
    }

    pub fn keep_practicing(&self) -> bool {
        self.settings.keep_practicing
    }

    pub fn solved_count(&self) -> u32 {
        self.solved_count
    }

    pub fn solve_log(&self) -> &[SolveRecord] {
        &self.solve_log
    }

    pub fn pending_advance(&self) -> Option<Instant> {
        self.pending_advance
    }

    pub fn is_highlighted(&self, now: Instant) -> bool {
        self.highlight_until.is_some_and(|until| now < until)
    }
}
