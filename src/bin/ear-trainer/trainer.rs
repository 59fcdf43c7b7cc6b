//! Game rules, free of any terminal or audio code.
//!
//! Practice mode shows a random target note; pressing its key scores 10
//! points, extends the streak and brings up the next note after a short
//! pause. A wrong key resets the streak and leaves the target in place.
//! Free mode just shows whatever is being played.

use std::time::{Duration, Instant};

use ear_trainer::catalog::{NoteDescriptor, NOTES};
use rand::Rng;

pub const NEXT_QUESTION_DELAY: Duration = Duration::from_millis(800);
const FEEDBACK_DURATION: Duration = Duration::from_millis(800);
const POINTS_PER_HIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Practice,
    Free,
}

/// What a key press meant for the game; the app turns it into sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Practice press while the next question is pending
    Ignored,
    /// Free play, nothing to judge
    Played,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Correct,
    Incorrect,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: &'static str,
    pub kind: FeedbackKind,
    until: Instant,
}

pub struct Trainer {
    mode: Mode,
    score: u32,
    streak: u32,
    target: Option<usize>,
    played: Option<usize>,
    next_question_at: Option<Instant>,
    feedback: Option<Feedback>,
    show_note_names: bool,
    /// Scene changed since the staff was last drawn
    dirty: bool,
}

impl Trainer {
    /// Start in practice mode with a first question already picked.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut trainer = Self {
            mode: Mode::Practice,
            score: 0,
            streak: 0,
            target: None,
            played: None,
            next_question_at: None,
            feedback: None,
            show_note_names: false,
            dirty: true,
        };
        trainer.next_question(rng);
        trainer
    }

    pub fn press(&mut self, index: usize, now: Instant) -> Verdict {
        match self.mode {
            Mode::Free => {
                self.played = Some(index);
                self.dirty = true;
                Verdict::Played
            }
            Mode::Practice if self.next_question_at.is_some() => Verdict::Ignored,
            Mode::Practice if self.target == Some(index) => {
                self.score += POINTS_PER_HIT;
                self.streak += 1;
                self.next_question_at = Some(now + NEXT_QUESTION_DELAY);
                self.show_feedback("Correct!", FeedbackKind::Correct, now);
                Verdict::Correct
            }
            Mode::Practice => {
                self.streak = 0;
                self.show_feedback("Almost!", FeedbackKind::Incorrect, now);
                Verdict::Incorrect
            }
        }
    }

    pub fn release(&mut self, index: usize) {
        if self.mode == Mode::Free && self.played == Some(index) {
            self.played = None;
            self.dirty = true;
        }
    }

    /// Switch between practice and free play, resetting score and streak.
    pub fn toggle_mode(&mut self, now: Instant, rng: &mut impl Rng) {
        self.mode = match self.mode {
            Mode::Practice => Mode::Free,
            Mode::Free => Mode::Practice,
        };
        self.score = 0;
        self.streak = 0;
        self.target = None;
        self.played = None;
        self.next_question_at = None;
        self.dirty = true;

        match self.mode {
            Mode::Practice => self.next_question(rng),
            Mode::Free => self.show_feedback("Free Play", FeedbackKind::Info, now),
        }
    }

    /// Advance timers: bring up a pending question and expire feedback.
    pub fn update(&mut self, now: Instant, rng: &mut impl Rng) {
        if self.next_question_at.is_some_and(|at| now >= at) {
            self.next_question(rng);
        }
        if self.feedback.as_ref().is_some_and(|f| now >= f.until) {
            self.feedback = None;
        }
    }

    pub fn toggle_note_names(&mut self) -> bool {
        self.show_note_names = !self.show_note_names;
        self.show_note_names
    }

    /// Notes to draw: the target (practice) and what is being played (free).
    pub fn scene(&self) -> (Option<&'static NoteDescriptor>, Vec<NoteDescriptor>) {
        let target = self.target.map(|i| &NOTES[i]);
        let played = self.played.map(|i| NOTES[i]).into_iter().collect();
        (target, played)
    }

    /// True once per scene change.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[cfg(test)]
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn show_note_names(&self) -> bool {
        self.show_note_names
    }

    fn next_question(&mut self, rng: &mut impl Rng) {
        if self.mode != Mode::Practice {
            return;
        }
        self.target = Some(rng.random_range(0..NOTES.len()));
        self.next_question_at = None;
        self.dirty = true;
    }

    fn show_feedback(&mut self, text: &'static str, kind: FeedbackKind, now: Instant) {
        self.feedback = Some(Feedback {
            text,
            kind,
            until: now + FEEDBACK_DURATION,
        });
    }
}
