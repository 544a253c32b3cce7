//! Presentation mapping for moods and expressions. The engine never looks at this.

use std::time::Duration;

use crate::expression::Expression;
use crate::mood::Mood;

pub fn mood_color(mood: Mood) -> &'static str {
    match mood {
        Mood::Neutral => "#6A6A7A",
        Mood::Happy => "#FF69B4",
        Mood::Obsessive => "#FF1493",
        Mood::Yandere => "#DC143C",
        Mood::Manic => "#FF00FF",
        Mood::Possessive => "#C71585",
        Mood::Devoted => "#FF1493",
        Mood::Glitch => "#00FFFF",
    }
}

pub fn mood_label(mood: Mood) -> String {
    mood.as_str().to_uppercase()
}

pub fn expression_label(expression: Expression) -> &'static str {
    match expression {
        Expression::Smile => "SMILE",
        Expression::Wink => "WINK",
        Expression::Happy => "HAPPY",
        Expression::Shy => "SHY",
        Expression::Angry => "ANGRY",
        Expression::Shock => "SHOCK",
        Expression::Think => "THINK",
    }
}

pub fn expression_icon(expression: Expression) -> &'static str {
    match expression {
        Expression::Smile => "◇",
        Expression::Wink => "✦",
        Expression::Happy => "♡",
        Expression::Shy => "✝",
        Expression::Angry => "☠",
        Expression::Shock => "⚡",
        Expression::Think => "◆",
    }
}

/// Session clock as `MM:SS`. Minutes keep counting past 59.
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
