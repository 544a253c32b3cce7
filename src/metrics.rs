use serde::{Deserialize, Serialize};

use crate::expression::ExpressionField;
use crate::mood::MoodField;
use crate::session::TurnOutcome;

/// Per-session turn counters
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TurnMetrics {
    pub turns_total: u64,
    pub turns_ok: u64,
    pub turns_failed: u64,
    pub mood_changes: u64,
    pub expressions_triggered: u64,
    pub unrecognized_moods: u64,
    pub unrecognized_expressions: u64,
}

impl TurnMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a completed turn
    pub fn record_turn(&mut self, outcome: &TurnOutcome) {
        self.turns_total += 1;
        if outcome.failed {
            self.turns_failed += 1;
        } else {
            self.turns_ok += 1;
        }
        if outcome.mood_changed {
            self.mood_changes += 1;
        }
        if outcome.triggered.is_some() {
            self.expressions_triggered += 1;
        }
        if matches!(outcome.signal.mood, MoodField::Unrecognized(_)) {
            self.unrecognized_moods += 1;
        }
        if matches!(outcome.signal.expression, ExpressionField::Unrecognized(_)) {
            self.unrecognized_expressions += 1;
        }
    }

    /// Count a pose fired from the expression controls
    pub fn record_manual_expression(&mut self) {
        self.expressions_triggered += 1;
    }

    /// Get success rate as percentage
    pub fn success_rate(&self) -> f64 {
        if self.turns_total == 0 {
            return 100.0;
        }
        (self.turns_ok as f64 / self.turns_total as f64) * 100.0
    }
}
