// Lexer implementation using pest

use crate::token::{Token, TokenKind, is_keyword};
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "tokens.pest"]
struct TokenGrammar;

/// Split `source` into tokens, left to right.
///
/// Never fails: whitespace other than `\n` is dropped, and so is any character
/// that cannot start a token.
pub fn tokenize(source: &str) -> Vec<Token> {
    let pairs = match TokenGrammar::parse(Rule::program, source) {
        Ok(pairs) => pairs,
        // `stray` matches any character, so the grammar cannot reject input.
        Err(e) => unreachable!("token grammar rejected input: {}", e),
    };

    let mut lines = LineCounter::new(source);
    let mut tokens = Vec::new();
    for pair in pairs {
        if pair.as_rule() != Rule::program {
            continue;
        }
        for inner_pair in pair.into_inner() {
            let line = lines.line_at(inner_pair.as_span().start());
            if let Some(token) = classify(inner_pair, line) {
                tokens.push(token);
            }
        }
    }
    tokens
}

/// Tracks the current line while offsets only move forward, so each byte of
/// the source is scanned once.
struct LineCounter<'a> {
    source: &'a str,
    offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, offset: usize) -> usize {
        if offset > self.offset {
            let skipped = &self.source.as_bytes()[self.offset..offset];
            self.line += skipped.iter().filter(|&&b| b == b'\n').count();
            self.offset = offset;
        }
        self.line
    }
}

fn classify(pair: Pair<Rule>, line: usize) -> Option<Token> {
    let token = match pair.as_rule() {
        Rule::newline => Token::new(TokenKind::Newline, "\n", line),
        Rule::word => {
            let text = pair.as_str();
            let kind = if is_keyword(text) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            Token::new(kind, text, line)
        }
        Rule::operator => Token::new(TokenKind::Operator, pair.as_str(), line),
        Rule::number => Token::new(TokenKind::Number, pair.as_str(), line),
        Rule::string => {
            // Quotes are not part of the token text.
            let body = pair
                .into_inner()
                .find(|inner| inner.as_rule() == Rule::string_body)
                .map(|inner| inner.as_str().to_string())
                .unwrap_or_default();
            Token::new(TokenKind::String, body, line)
        }
        // EOI
        _ => return None,
    };
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn kinds_and_texts(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .into_iter()
            .map(|token| (token.kind, token.text))
            .collect()
    }

    #[test]
    fn test_assignment_line() {
        let tokens = tokenize("x = 5\n");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Identifier, "x", 1),
                Token::new(TokenKind::Operator, "=", 1),
                Token::new(TokenKind::Number, "5", 1),
                Token::new(TokenKind::Newline, "\n", 1),
            ]
        );
    }

    #[test]
    fn test_telugu_run_is_one_identifier() {
        let tokens = tokenize("నమస్కారం");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "నమస్కారం");
    }

    #[test]
    fn test_whole_telugu_block_is_one_identifier() {
        let block: String = ('\u{0C00}'..='\u{0C7F}').collect();
        let tokens = tokenize(&block);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, block);
    }

    #[test]
    fn test_mixed_latin_and_telugu_word() {
        assert_eq!(
            kinds_and_texts("abcపేరు"),
            vec![(TokenKind::Identifier, "abcపేరు".to_string())]
        );
    }

    #[test]
    fn test_string_literal_strips_quotes() {
        assert_eq!(
            kinds_and_texts(r#"name = "abc""#),
            vec![
                (TokenKind::Identifier, "name".to_string()),
                (TokenKind::Operator, "=".to_string()),
                (TokenKind::String, "abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_string_keeps_inner_whitespace() {
        assert_eq!(
            kinds_and_texts("\"hello world\""),
            vec![(TokenKind::String, "hello world".to_string())]
        );
    }

    #[test]
    fn test_empty_string_literal() {
        assert_eq!(
            kinds_and_texts("\"\""),
            vec![(TokenKind::String, String::new())]
        );
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        assert_eq!(
            kinds_and_texts("x = \"open\nstill open"),
            vec![
                (TokenKind::Identifier, "x".to_string()),
                (TokenKind::Operator, "=".to_string()),
                (TokenKind::String, "open\nstill open".to_string()),
            ]
        );
    }

    #[test]
    fn test_keywords_are_classified() {
        assert_eq!(
            kinds_and_texts("if True print"),
            vec![
                (TokenKind::Keyword, "if".to_string()),
                (TokenKind::Keyword, "True".to_string()),
                (TokenKind::Identifier, "print".to_string()),
            ]
        );
    }

    #[test]
    fn test_double_equals_is_two_operators() {
        assert_eq!(
            kinds_and_texts("=="),
            vec![
                (TokenKind::Operator, "=".to_string()),
                (TokenKind::Operator, "=".to_string()),
            ]
        );
    }

    #[test]
    fn test_digits_and_underscores_end_a_word() {
        assert_eq!(
            kinds_and_texts("ab12_cd"),
            vec![
                (TokenKind::Identifier, "ab".to_string()),
                (TokenKind::Number, "12".to_string()),
                (TokenKind::Identifier, "cd".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_characters_are_dropped() {
        assert_eq!(
            kinds_and_texts("a;b,#c"),
            vec![
                (TokenKind::Identifier, "a".to_string()),
                (TokenKind::Identifier, "b".to_string()),
                (TokenKind::Identifier, "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_parens_braces_and_colon_are_operators() {
        let tokens = tokenize("if (x): {}");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword,
                TokenKind::Operator,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Operator,
            ]
        );
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("a\n\nb");
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 1, 2, 3]);
    }

    #[test]
    fn test_line_numbers_after_multiline_string() {
        let tokens = tokenize("s = \"a\nb\nc\"\nprint(s)");
        let print = tokens.iter().find(|t| t.text == "print").unwrap();
        assert_eq!(tokens[2].line, 1);
        assert_eq!(print.line, 4);
    }

    #[test]
    fn test_large_input_lexes_in_linear_time() {
        let lines = 100_000;
        let source = "x = 1\n".repeat(lines);

        let started = Instant::now();
        let tokens = tokenize(&source);
        let elapsed = started.elapsed();

        assert_eq!(tokens.len(), lines * 4);
        assert_eq!(tokens.last().map(|t| t.line), Some(lines));
        // Rescanning from the start for every token takes minutes at this size.
        assert!(elapsed < Duration::from_secs(20), "lexing took {:?}", elapsed);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\r").is_empty());
    }

    #[test]
    fn test_tokenize_is_repeatable() {
        let source = "x = 1\nif (x):\nprint(\"ok\")\n";
        assert_eq!(tokenize(source), tokenize(source));
    }
}
