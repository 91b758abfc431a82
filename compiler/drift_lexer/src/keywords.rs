//! Keyword resolution.
//!
//! Identifiers are matched against the fixed keyword table before falling
//! back to generic identifiers. The lookup uses the word's length as a
//! first-pass filter (keywords range from 2 to 11 bytes), then matches
//! against the keywords of that length.
//!
//! The six interrogatives (`what` .. `how`) and six state predicates
//! (`converged` .. `equilibrium`) resolve to dedicated token kinds; the
//! parser decides from context whether an interrogative is an observer
//! query or a plain variable reference.

use drift_ir::{InterrogativeKind, PredicateKind, TokenKind};

/// Look up a keyword by text.
///
/// Returns `None` for ordinary identifiers. Words shorter than 2 or longer
/// than 11 bytes are rejected without any comparison.
#[inline]
pub(crate) fn lookup(text: &str) -> Option<TokenKind> {
    match text.len() {
        2 => match text {
            "as" => Some(TokenKind::As),
            "if" => Some(TokenKind::If),
            "in" => Some(TokenKind::In),
            "is" => Some(TokenKind::Is),
            "of" => Some(TokenKind::Of),
            "or" => Some(TokenKind::Or),
            _ => None,
        },
        3 => match text {
            "and" => Some(TokenKind::And),
            "for" => Some(TokenKind::For),
            "how" => Some(TokenKind::Interrogative(InterrogativeKind::How)),
            "not" => Some(TokenKind::Not),
            "who" => Some(TokenKind::Interrogative(InterrogativeKind::Who)),
            "why" => Some(TokenKind::Interrogative(InterrogativeKind::Why)),
            _ => None,
        },
        4 => match text {
            "else" => Some(TokenKind::Else),
            "loop" => Some(TokenKind::Loop),
            "null" => Some(TokenKind::Null),
            "what" => Some(TokenKind::Interrogative(InterrogativeKind::What)),
            "when" => Some(TokenKind::Interrogative(InterrogativeKind::When)),
            _ => None,
        },
        5 => match text {
            "where" => Some(TokenKind::Interrogative(InterrogativeKind::Where)),
            "while" => Some(TokenKind::While),
            _ => None,
        },
        6 => match text {
            "define" => Some(TokenKind::Define),
            "return" => Some(TokenKind::Return),
            "stable" => Some(TokenKind::Predicate(PredicateKind::Stable)),
            _ => None,
        },
        9 => match text {
            "converged" => Some(TokenKind::Predicate(PredicateKind::Converged)),
            "diverging" => Some(TokenKind::Predicate(PredicateKind::Diverging)),
            "improving" => Some(TokenKind::Predicate(PredicateKind::Improving)),
            _ => None,
        },
        11 => match text {
            "equilibrium" => Some(TokenKind::Predicate(PredicateKind::Equilibrium)),
            "oscillating" => Some(TokenKind::Predicate(PredicateKind::Oscillating)),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::lookup;
    use drift_ir::{InterrogativeKind, PredicateKind, TokenKind};

    #[test]
    fn test_all_keywords_resolve() {
        let keywords = [
            "is",
            "of",
            "define",
            "as",
            "if",
            "else",
            "loop",
            "while",
            "return",
            "and",
            "or",
            "not",
            "for",
            "in",
            "null",
            "what",
            "who",
            "when",
            "where",
            "why",
            "how",
            "converged",
            "stable",
            "improving",
            "oscillating",
            "diverging",
            "equilibrium",
        ];
        for word in keywords {
            assert!(lookup(word).is_some(), "`{word}` should be a keyword");
        }
    }

    #[test]
    fn test_identifiers_do_not_resolve() {
        for word in ["x", "isnt", "defined", "Loop", "whatx", "converge", ""] {
            assert_eq!(lookup(word), None, "`{word}` should be an identifier");
        }
    }

    #[test]
    fn test_interrogatives_and_predicates() {
        assert_eq!(
            lookup("what"),
            Some(TokenKind::Interrogative(InterrogativeKind::What))
        );
        assert_eq!(
            lookup("equilibrium"),
            Some(TokenKind::Predicate(PredicateKind::Equilibrium))
        );
    }
}
