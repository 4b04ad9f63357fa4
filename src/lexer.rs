//! Single-pass regex-alternation tokenizer (spec §4.3).
use regex::Regex;

/// One named token class contributing one alternative to the lexer's master
/// regex. Order matters: when two classes could both match at the same
/// position, the earlier one in the list wins (PEG-style ordered choice,
/// mirroring the combinator kernel's `or`).
#[derive(Debug, Clone)]
pub struct TokenClass {
    pub name: &'static str,
    pub pattern: &'static str,
}

const NUMBER: TokenClass = TokenClass {
    name: "number",
    pattern: r"\d+(?:\.\d+)?",
};
const STRING: TokenClass = TokenClass {
    name: "string",
    pattern: r#""[^"]*""#,
};
const IDENTIFIER: TokenClass = TokenClass {
    name: "identifier",
    pattern: r"[a-zA-Z\-+*^/0-9<>=]+",
};
const PARENTHESIS: TokenClass = TokenClass {
    name: "parenthesis",
    pattern: r"[()]",
};
const SPECIAL: TokenClass = TokenClass {
    name: "special",
    pattern: r"[:,\[\]]",
};

/// Tokenizer built from an ordered list of [`TokenClass`]es. Runs of input
/// matched by none of them (whitespace, in practice) are silently dropped.
pub struct Lexer {
    regex: Regex,
}

impl Lexer {
    pub fn new(classes: Vec<TokenClass>) -> Self {
        let union = classes
            .iter()
            .map(|c| format!("(?:{})", c.pattern))
            .collect::<Vec<_>>()
            .join("|");
        Self {
            regex: Regex::new(&union).expect("lexer token classes form a valid regex union"),
        }
    }

    /// The canonical class set from spec §4.3: number, string, identifier,
    /// parenthesis, special.
    pub fn surface() -> Self {
        Self::new(vec![NUMBER, STRING, IDENTIFIER, PARENTHESIS, SPECIAL])
    }

    /// Splits `source` into tokens. Newlines are non-semantic whitespace
    /// (spec §6) and are normalized to spaces before matching, though this
    /// makes no observable difference since neither is part of any class.
    pub fn tokenize(&self, source: &str) -> Vec<String> {
        let normalized = source.replace('\n', " ");
        self.regex
            .find_iter(&normalized)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::surface()
    }
}
