use tracing::info;

use crate::display;
use crate::expression::Expression;

/// Avatar renderer that plays a pose once. Playback is fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait AvatarRenderer: Send {
    fn play(&mut self, expression: Expression);
}

/// Renderer for the terminal: prints the pose and remembers what it showed.
#[derive(Debug, Default)]
pub struct TerminalAvatar {
    last_played: Option<Expression>,
    quiet: bool,
}

impl TerminalAvatar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log plays without printing them, for non-interactive use.
    pub fn quiet() -> Self {
        Self {
            last_played: None,
            quiet: true,
        }
    }

    pub fn last_played(&self) -> Option<Expression> {
        self.last_played
    }
}

impl AvatarRenderer for TerminalAvatar {
    fn play(&mut self, expression: Expression) {
        info!(expression = %expression, "playing avatar expression");
        if !self.quiet {
            println!(
                "  [{} {}]",
                display::expression_icon(expression),
                display::expression_label(expression)
            );
        }
        self.last_played = Some(expression);
    }
}
