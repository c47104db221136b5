//! Token reader - splits an in-memory syllable sheet into tokens
//!
//! The sheet holds one syllable per line. A syllable ending in `-` continues
//! into the next line; a blank line starts a new caption line.

use crate::types::Token;

/// Parse a syllable sheet into tokens, one per line
///
/// Leading and trailing blank lines carry no information and are dropped;
/// runs of blank lines collapse into a single [`Token::LineBreak`].
pub fn parse_tokens(sheet: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    for raw in sheet.lines() {
        let token = Token::parse(raw);
        if token == Token::LineBreak
            && matches!(tokens.last(), None | Some(Token::LineBreak))
        {
            continue;
        }
        tokens.push(token);
    }
    if tokens.last() == Some(&Token::LineBreak) {
        tokens.pop();
    }
    tokens
}

/// Number of syllable tokens (line breaks excluded)
pub fn syllable_count(tokens: &[Token]) -> usize {
    tokens.iter().filter(|token| token.is_syllable()).count()
}
