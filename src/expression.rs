use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete avatar pose from the model's expression catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expression {
    #[serde(rename = "expression1")]
    Smile,
    #[serde(rename = "expression2")]
    Wink,
    #[serde(rename = "1")]
    Happy,
    #[serde(rename = "2")]
    Shy,
    #[serde(rename = "3")]
    Angry,
    #[serde(rename = "4")]
    Shock,
    #[serde(rename = "5")]
    Think,
}

impl Expression {
    /// Catalog order, as the expression controls list them.
    pub const ALL: [Expression; 7] = [
        Expression::Smile,
        Expression::Wink,
        Expression::Happy,
        Expression::Shy,
        Expression::Angry,
        Expression::Shock,
        Expression::Think,
    ];

    pub fn parse(raw: &str) -> Option<Expression> {
        match raw {
            "expression1" => Some(Expression::Smile),
            "expression2" => Some(Expression::Wink),
            "1" => Some(Expression::Happy),
            "2" => Some(Expression::Shy),
            "3" => Some(Expression::Angry),
            "4" => Some(Expression::Shock),
            "5" => Some(Expression::Think),
            _ => None,
        }
    }

    /// Name the avatar model knows the pose by.
    pub fn as_str(&self) -> &'static str {
        match self {
            Expression::Smile => "expression1",
            Expression::Wink => "expression2",
            Expression::Happy => "1",
            Expression::Shy => "2",
            Expression::Angry => "3",
            Expression::Shock => "4",
            Expression::Think => "5",
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a reply's `expression` field looked on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExpressionField {
    #[default]
    Absent,
    Unrecognized(String),
    Known(Expression),
}

impl ExpressionField {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => ExpressionField::Absent,
            Some(s) => match Expression::parse(s) {
                Some(expr) => ExpressionField::Known(expr),
                None => ExpressionField::Unrecognized(s.to_string()),
            },
        }
    }

    pub fn known(&self) -> Option<Expression> {
        match self {
            ExpressionField::Known(expr) => Some(*expr),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_roundtrips_names() {
        for expr in Expression::ALL {
            assert_eq!(Expression::parse(expr.as_str()), Some(expr));
        }
        assert_eq!(Expression::ALL.len(), 7);
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(Expression::parse("6"), None);
        assert_eq!(Expression::parse("Expression1"), None);
        assert_eq!(Expression::parse("unknown-name"), None);
        assert_eq!(Expression::parse(""), None);
    }

    #[test]
    fn test_serde_uses_model_names() {
        assert_eq!(serde_json::to_string(&Expression::Smile).unwrap(), "\"expression1\"");
        let e: Expression = serde_json::from_str("\"4\"").unwrap();
        assert_eq!(e, Expression::Shock);
    }

    #[test]
    fn test_expression_field() {
        assert_eq!(ExpressionField::from_raw(None), ExpressionField::Absent);
        assert_eq!(
            ExpressionField::from_raw(Some("2")),
            ExpressionField::Known(Expression::Shy)
        );
        assert_eq!(
            ExpressionField::from_raw(Some("blush")),
            ExpressionField::Unrecognized("blush".to_string())
        );
    }
}
