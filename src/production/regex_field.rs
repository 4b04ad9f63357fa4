use super::Combinator;
use crate::pt::{RuleId, PT};
use crate::stream::TokenStream;
use regex::Regex;

/// Matches a single token against a regex, anchored at the start of the
/// token the way Python's `re.match` is (the pattern need not consume the
/// whole token, only its prefix) — mirrors
/// `original_source/parser/combinators.py`'s `match_regex`.
pub struct RegexField<R> {
    rule_id: Option<R>,
    regex: Regex,
}

impl<R> RegexField<R> {
    pub fn new(rule_id: Option<R>, pattern: &str) -> Self {
        let anchored = format!("^(?:{pattern})");
        Self {
            rule_id,
            regex: Regex::new(&anchored).expect("invalid regex literal in grammar"),
        }
    }
}

impl<R: RuleId> Combinator<R> for RegexField<R> {
    fn parse(&self, tokens: TokenStream) -> (bool, PT<R>, TokenStream) {
        match tokens.peek() {
            Some(tok) if self.regex.is_match(tok) => {
                let (token, rest) = tokens.advance();
                (true, PT::leaf(self.rule_id, token.to_string()), rest)
            }
            _ => (false, PT::empty(), tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_token_prefix() {
        let tokens = TokenStream::new(vec!["42".into()]);
        let (ok, pt, _) = RegexField::<()>::new(None, r"\d+").parse(tokens);
        assert!(ok);
        assert_eq!(pt.matched, vec!["42"]);
    }

    #[test]
    fn rejects_non_matching_token() {
        let tokens = TokenStream::new(vec!["abc".into()]);
        let (ok, _, rest) = RegexField::<()>::new(None, r"\d+").parse(tokens.clone());
        assert!(!ok);
        assert_eq!(rest.position(), tokens.position());
    }
}
