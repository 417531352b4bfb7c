#![forbid(unsafe_code)]

//! Operator precedence levels and expression context flags.

use bitflags::bitflags;

/// Binding strength of an expression position. Higher binds tighter.
///
/// Several grammar productions share a level (`yield`/assignment,
/// conditional/arrow, `await`/unary), so this is a number rather than an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Precedence(u8);

impl Precedence {
    pub(crate) const SEQUENCE: Self = Self(0);
    pub(crate) const YIELD: Self = Self(1);
    pub(crate) const ASSIGNMENT: Self = Self(1);
    pub(crate) const CONDITIONAL: Self = Self(2);
    pub(crate) const ARROW_FUNCTION: Self = Self(2);
    pub(crate) const COALESCE: Self = Self(3);
    pub(crate) const LOGICAL_OR: Self = Self(4);
    pub(crate) const LOGICAL_AND: Self = Self(5);
    pub(crate) const BITWISE_OR: Self = Self(6);
    pub(crate) const BITWISE_XOR: Self = Self(7);
    pub(crate) const BITWISE_AND: Self = Self(8);
    pub(crate) const EQUALITY: Self = Self(9);
    pub(crate) const RELATIONAL: Self = Self(10);
    pub(crate) const BITWISE_SHIFT: Self = Self(11);
    pub(crate) const ADDITIVE: Self = Self(12);
    pub(crate) const MULTIPLICATIVE: Self = Self(13);
    pub(crate) const EXPONENTIATION: Self = Self(14);
    pub(crate) const AWAIT: Self = Self(15);
    pub(crate) const UNARY: Self = Self(15);
    pub(crate) const POSTFIX: Self = Self(16);
    pub(crate) const OPTIONAL_CHAINING: Self = Self(17);
    pub(crate) const CALL: Self = Self(18);
    pub(crate) const NEW: Self = Self(19);
    pub(crate) const TAGGED_TEMPLATE: Self = Self(20);
    pub(crate) const MEMBER: Self = Self(21);
    pub(crate) const PRIMARY: Self = Self(22);

    /// The next tighter level.
    #[must_use]
    pub(crate) const fn tighter(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Precedence of a binary or logical operator, `None` if unknown.
    #[must_use]
    pub(crate) fn of_binary(operator: &str) -> Option<Self> {
        let prec = match operator {
            "??" => Self::COALESCE,
            "||" => Self::LOGICAL_OR,
            "&&" => Self::LOGICAL_AND,
            "|" => Self::BITWISE_OR,
            "^" => Self::BITWISE_XOR,
            "&" => Self::BITWISE_AND,
            "==" | "!=" | "===" | "!==" => Self::EQUALITY,
            "<" | ">" | "<=" | ">=" | "instanceof" | "in" => Self::RELATIONAL,
            "<<" | ">>" | ">>>" => Self::BITWISE_SHIFT,
            "+" | "-" => Self::ADDITIVE,
            "*" | "/" | "%" => Self::MULTIPLICATIVE,
            "**" => Self::EXPONENTIATION,
            _ => return None,
        };
        Some(prec)
    }
}

bitflags! {
    /// Context carried into an expression position.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct ExprFlags: u8 {
        /// A bare `in` operator is allowed (false inside `for (...;` heads).
        const ALLOW_IN = 0b001;
        /// A call may appear unparenthesized (false for `new` callees).
        const ALLOW_CALL = 0b010;
        /// `new X` may omit its argument list.
        const ALLOW_UNPARENTHESIZED_NEW = 0b100;
    }
}

impl ExprFlags {
    /// The unrestricted context.
    pub(crate) const TTT: Self = Self::all();
    pub(crate) const TTF: Self = Self::ALLOW_IN.union(Self::ALLOW_CALL);
    pub(crate) const TFF: Self = Self::ALLOW_IN;
    pub(crate) const TFT: Self = Self::ALLOW_IN.union(Self::ALLOW_UNPARENTHESIZED_NEW);
    pub(crate) const FTT: Self = Self::ALLOW_CALL.union(Self::ALLOW_UNPARENTHESIZED_NEW);
}

/// Wrap `text` in parentheses when `current` binds looser than `required`.
pub(crate) fn parenthesize(text: String, current: Precedence, required: Precedence) -> String {
    if current < required {
        format!("({text})")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_levels_compare_equal() {
        assert_eq!(Precedence::YIELD, Precedence::ASSIGNMENT);
        assert_eq!(Precedence::AWAIT, Precedence::UNARY);
        assert!(Precedence::ADDITIVE < Precedence::MULTIPLICATIVE);
        assert_eq!(Precedence::ADDITIVE.tighter(), Precedence::MULTIPLICATIVE);
    }

    #[test]
    fn parenthesize_only_when_looser() {
        assert_eq!(
            parenthesize("a + b".into(), Precedence::ADDITIVE, Precedence::MULTIPLICATIVE),
            "(a + b)"
        );
        assert_eq!(
            parenthesize("a * b".into(), Precedence::MULTIPLICATIVE, Precedence::ADDITIVE),
            "a * b"
        );
    }

    #[test]
    fn unknown_operator_has_no_precedence() {
        assert_eq!(Precedence::of_binary("<>"), None);
        assert_eq!(Precedence::of_binary("in"), Some(Precedence::RELATIONAL));
    }
}
