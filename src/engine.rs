//! Mood/expression engine.
//!
//! Holds the session mood and the last triggered avatar expression. Moods are
//! sticky: a turn only moves the mood when it names a recognized one, and any
//! mood may follow any other. Unrecognized values never fail, they are dropped.

use tracing::debug;

use crate::expression::{Expression, ExpressionField};
use crate::mood::{Mood, MoodField};

/// Typed mood/expression pair carried by one assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TurnSignal {
    pub mood: MoodField,
    pub expression: ExpressionField,
}

impl TurnSignal {
    pub fn from_raw(mood: Option<&str>, expression: Option<&str>) -> Self {
        Self {
            mood: MoodField::from_raw(mood),
            expression: ExpressionField::from_raw(expression),
        }
    }

    pub fn new(mood: Option<Mood>, expression: Option<Expression>) -> Self {
        Self {
            mood: mood.map(MoodField::Known).unwrap_or_default(),
            expression: expression.map(ExpressionField::Known).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoodEngine {
    default: Mood,
    mood: Mood,
    active_expression: Option<Expression>,
}

impl MoodEngine {
    pub fn new(default: Mood) -> Self {
        Self {
            default,
            mood: default,
            active_expression: None,
        }
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn default_mood(&self) -> Mood {
        self.default
    }

    pub fn active_expression(&self) -> Option<Expression> {
        self.active_expression
    }

    /// Apply the outcome of a completed turn. Returns the expression to play, if any.
    pub fn record_turn(&mut self, signal: &TurnSignal) -> Option<Expression> {
        match &signal.mood {
            MoodField::Known(mood) => {
                if *mood != self.mood {
                    debug!(from = %self.mood, to = %mood, "mood transition");
                }
                self.mood = *mood;
            }
            MoodField::Unrecognized(raw) => {
                debug!(mood = %raw, "ignoring unrecognized mood from backend");
            }
            MoodField::Absent => {}
        }

        match &signal.expression {
            ExpressionField::Known(expr) => {
                self.active_expression = Some(*expr);
                Some(*expr)
            }
            ExpressionField::Unrecognized(raw) => {
                debug!(expression = %raw, "ignoring unrecognized expression from backend");
                None
            }
            ExpressionField::Absent => None,
        }
    }

    /// User-initiated pose change. Unknown names do nothing.
    pub fn trigger_expression_manually(&mut self, name: &str) -> Option<Expression> {
        let expr = Expression::parse(name)?;
        self.active_expression = Some(expr);
        Some(expr)
    }

    pub fn reset(&mut self) {
        self.mood = self.default;
        self.active_expression = None;
    }
}

impl Default for MoodEngine {
    fn default() -> Self {
        Self::new(Mood::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(mood: Option<&str>, expression: Option<&str>) -> TurnSignal {
        TurnSignal::from_raw(mood, expression)
    }

    #[test]
    fn test_starts_at_default() {
        let engine = MoodEngine::new(Mood::Neutral);
        assert_eq!(engine.mood(), Mood::Neutral);
        assert_eq!(engine.default_mood(), Mood::Neutral);
        assert_eq!(engine.active_expression(), None);
    }

    #[test]
    fn test_empty_turn_changes_nothing() {
        let mut engine = MoodEngine::default();
        let fired = engine.record_turn(&TurnSignal::default());
        assert_eq!(fired, None);
        assert_eq!(engine.mood(), Mood::Devoted);
        assert_eq!(engine.active_expression(), None);
    }

    #[test]
    fn test_unrecognized_mood_is_ignored() {
        let mut engine = MoodEngine::default();
        engine.record_turn(&turn(Some("happy"), None));
        engine.record_turn(&turn(Some("not-a-real-mood"), None));
        assert_eq!(engine.mood(), Mood::Happy);
    }

    #[test]
    fn test_unrecognized_expression_is_not_emitted() {
        let mut engine = MoodEngine::default();
        engine.record_turn(&turn(None, Some("3")));
        let fired = engine.record_turn(&turn(None, Some("blush")));
        assert_eq!(fired, None);
        assert_eq!(engine.active_expression(), Some(Expression::Angry));
    }

    #[test]
    fn test_last_recognized_mood_wins() {
        let mut engine = MoodEngine::default();
        let sequence = [
            turn(Some("manic"), None),
            turn(None, Some("1")),
            turn(Some("yandere"), Some("4")),
            turn(Some("Happy"), None),
            turn(None, None),
        ];
        for signal in &sequence {
            engine.record_turn(signal);
        }
        assert_eq!(engine.mood(), Mood::Yandere);
    }

    #[test]
    fn test_every_transition_allowed() {
        let mut engine = MoodEngine::default();
        for from in Mood::ALL {
            for to in Mood::ALL {
                engine.record_turn(&TurnSignal::new(Some(from), None));
                engine.record_turn(&TurnSignal::new(Some(to), None));
                assert_eq!(engine.mood(), to);
            }
        }
    }

    #[test]
    fn test_manual_trigger() {
        let mut engine = MoodEngine::default();
        assert_eq!(engine.trigger_expression_manually("expression2"), Some(Expression::Wink));
        assert_eq!(engine.active_expression(), Some(Expression::Wink));
        assert_eq!(engine.mood(), Mood::Devoted);
    }

    #[test]
    fn test_manual_trigger_unknown_is_noop() {
        let mut engine = MoodEngine::default();
        engine.trigger_expression_manually("5");
        assert_eq!(engine.trigger_expression_manually("unknown-name"), None);
        assert_eq!(engine.active_expression(), Some(Expression::Think));
        assert_eq!(engine.mood(), Mood::Devoted);
    }

    #[test]
    fn test_reset_restores_default() {
        let mut engine = MoodEngine::new(Mood::Possessive);
        engine.record_turn(&turn(Some("glitch"), Some("expression1")));
        engine.reset();
        assert_eq!(engine.mood(), Mood::Possessive);
        assert_eq!(engine.active_expression(), None);
    }

    #[test]
    fn test_session_scenario() {
        let mut engine = MoodEngine::new(Mood::Devoted);
        assert_eq!(engine.mood(), Mood::Devoted);

        let fired = engine.record_turn(&turn(Some("happy"), Some("1")));
        assert_eq!(engine.mood(), Mood::Happy);
        assert_eq!(fired, Some(Expression::Happy));
        assert_eq!(engine.active_expression(), Some(Expression::Happy));

        let fired = engine.record_turn(&turn(None, None));
        assert_eq!(fired, None);
        assert_eq!(engine.mood(), Mood::Happy);

        engine.reset();
        assert_eq!(engine.mood(), Mood::Devoted);
        assert_eq!(engine.active_expression(), None);
    }
}
