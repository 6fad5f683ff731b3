//! Lexer (tokenizer) and replayable token cursor
//!
//! [`Lexer`] converts raw source text into a flat vector of [`Token`]s in one
//! pass. [`TokenStream`] wraps that vector with the cursor the interpreter
//! drives: bounded lookahead plus checkpoint/restore of the read position,
//! which is how loop and function bodies are executed again.
//!
//! Scanning never fails. Anything that is not part of the language becomes a
//! [`TokenKind::Invalid`] token and is reported by the interpreter only when
//! it is reached.

pub mod token;

pub use token::{SourceLocation, Token, TokenKind};

use rustc_hash::FxHashMap;

/// Lexer for minic source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    keywords: FxHashMap<&'static str, TokenKind>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        let mut keywords = FxHashMap::default();
        keywords.insert("for", TokenKind::For);
        keywords.insert("int", TokenKind::Int);
        keywords.insert("long", TokenKind::Long);
        keywords.insert("void", TokenKind::Void);
        keywords.insert("main", TokenKind::Main);

        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            keywords,
        }
    }

    /// Tokenize the entire input. The result always ends with an `Eof` token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.is_at_end() {
                tokens.push(Token::new(
                    TokenKind::Eof,
                    "",
                    self.current_location(),
                ));
                break;
            }

            tokens.push(self.next_token());
        }

        tokens
    }

    fn next_token(&mut self) -> Token {
        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, "", loc);
        };

        match ch {
            '0'..='9' => self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(ch, loc),

            '+' => self.one_or_two(loc, '+', TokenKind::PlusPlus, TokenKind::Plus),
            '-' => {
                self.one_or_two(loc, '-', TokenKind::MinusMinus, TokenKind::Minus)
            }
            '=' => self.one_or_two(loc, '=', TokenKind::EqEq, TokenKind::Assign),
            '<' => self.one_or_two(loc, '=', TokenKind::Le, TokenKind::Lt),
            '>' => self.one_or_two(loc, '=', TokenKind::Ge, TokenKind::Gt),
            '!' => self.one_or_two(loc, '=', TokenKind::NotEq, TokenKind::Invalid),
            '*' => Token::new(TokenKind::Star, "*", loc),
            '/' => Token::new(TokenKind::Slash, "/", loc),
            '%' => Token::new(TokenKind::Percent, "%", loc),
            '(' => Token::new(TokenKind::LParen, "(", loc),
            ')' => Token::new(TokenKind::RParen, ")", loc),
            '{' => Token::new(TokenKind::LBrace, "{", loc),
            '}' => Token::new(TokenKind::RBrace, "}", loc),
            ',' => Token::new(TokenKind::Comma, ",", loc),
            ';' => Token::new(TokenKind::Semicolon, ";", loc),

            _ => Token::new(TokenKind::Invalid, ch.to_string(), loc),
        }
    }

    /// Scans an operator that is either `first` alone or `first` followed by
    /// `second`. The first character has already been consumed.
    fn one_or_two(
        &mut self,
        loc: SourceLocation,
        second: char,
        double: TokenKind,
        single: TokenKind,
    ) -> Token {
        let first = self.input[self.position - 1];
        if self.peek() == Some(second) {
            self.advance();
            Token::new(double, format!("{first}{second}"), loc)
        } else {
            Token::new(single, first.to_string(), loc)
        }
    }

    /// Scan a decimal, octal or hexadecimal literal with an optional `l`/`L`
    /// suffix. The value is not computed here.
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Token {
        let mut text = String::new();
        text.push(first_digit);

        let mut kind = if first_digit != '0' {
            self.take_while(&mut text, |c| c.is_ascii_digit());
            TokenKind::DecNumber
        } else if matches!(self.peek(), Some('x' | 'X')) {
            if let Some(x) = self.advance() {
                text.push(x);
            }
            if self.take_while(&mut text, |c| c.is_ascii_hexdigit()) == 0 {
                TokenKind::Invalid
            } else {
                TokenKind::HexNumber
            }
        } else {
            self.take_while(&mut text, |c| ('0'..='7').contains(&c));
            TokenKind::OctNumber
        };

        if let Some(suffix @ ('l' | 'L')) = self.peek() {
            text.push(suffix);
            self.advance();
        }

        // `12abc`, `089`, `1LL`: the whole word is one invalid token
        if self.take_while(&mut text, is_word_char) > 0 {
            kind = TokenKind::Invalid;
        }

        Token::new(kind, text, loc)
    }

    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);
        self.take_while(&mut ident, is_word_char);

        let kind = self
            .keywords
            .get(ident.as_str())
            .copied()
            .unwrap_or(TokenKind::Ident);
        Token::new(kind, ident, loc)
    }

    /// Skip whitespace and `//` comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => {
                    while let Some(ch) = self.advance() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    /// Appends characters matching `pred` to `buf`, returning how many were
    /// consumed.
    fn take_while(&mut self, buf: &mut String, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            buf.push(ch);
            self.advance();
            count += 1;
        }
        count
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Opaque checkpoint of a [`TokenStream`] read position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position(usize);

/// Seekable cursor over a scanned token vector.
///
/// The cursor never moves past the final `Eof` token, so reading or peeking
/// beyond the end keeps returning it.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    pub fn new(source: &str) -> Self {
        Self::from_tokens(Lexer::new(source).tokenize())
    }

    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let location = tokens.last().map(|t| t.location).unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, "", location));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    /// Consume and return the next token.
    pub fn next(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    /// Look `k` tokens ahead without consuming; `peek(1)` is the token
    /// [`next`](Self::next) would return.
    pub fn peek(&self, k: usize) -> &Token {
        let index = (self.position + k.saturating_sub(1)).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    pub fn position(&self) -> Position {
        Position(self.position)
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position.0.min(self.tokens.len() - 1);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).tokenize().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("void main int long for form _x1"),
            vec![
                TokenKind::Void,
                TokenKind::Main,
                TokenKind::Int,
                TokenKind::Long,
                TokenKind::For,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("= == != > >= < <= + ++ - -- * / %"),
            vec![
                TokenKind::Assign,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Gt,
                TokenKind::Ge,
                TokenKind::Lt,
                TokenKind::Le,
                TokenKind::Plus,
                TokenKind::PlusPlus,
                TokenKind::Minus,
                TokenKind::MinusMinus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Eof,
            ]
        );
        // greedy: `+++` is `++` then `+`
        assert_eq!(
            kinds("a+++b"),
            vec![
                TokenKind::Ident,
                TokenKind::PlusPlus,
                TokenKind::Plus,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_classification() {
        let tokens = Lexer::new("42 42L 0 017 0x1F 0XffL").tokenize();
        let got: Vec<(TokenKind, &str)> =
            tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(
            got,
            vec![
                (TokenKind::DecNumber, "42"),
                (TokenKind::DecNumber, "42L"),
                (TokenKind::OctNumber, "0"),
                (TokenKind::OctNumber, "017"),
                (TokenKind::HexNumber, "0x1F"),
                (TokenKind::HexNumber, "0XffL"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_malformed_numbers_are_single_invalid_words() {
        for source in ["12abc", "089", "0x", "1LL", "0xZ"] {
            let tokens = Lexer::new(source).tokenize();
            assert_eq!(tokens.len(), 2, "{source}");
            assert_eq!(tokens[0].kind, TokenKind::Invalid, "{source}");
            assert_eq!(tokens[0].text, source);
        }
    }

    #[test]
    fn test_unknown_characters() {
        assert_eq!(
            kinds("a ! b # c"),
            vec![
                TokenKind::Ident,
                TokenKind::Invalid,
                TokenKind::Ident,
                TokenKind::Invalid,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_and_locations() {
        let tokens = Lexer::new("int a; // trailing\n  long b;").tokenize();
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(1, 5));
        assert_eq!(tokens[3].text, "long");
        assert_eq!(tokens[3].location, SourceLocation::new(2, 3));
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn test_stream_peek_and_seek() {
        let mut stream = TokenStream::new("a = 1;");
        assert_eq!(stream.peek(2).kind, TokenKind::Assign);
        let start = stream.position();

        assert_eq!(stream.next().text, "a");
        assert_eq!(stream.next().text, "=");
        assert_eq!(stream.peek(1).text, "1");

        stream.set_position(start);
        assert_eq!(stream.next().text, "a");
    }

    #[test]
    fn test_stream_stays_at_eof() {
        let mut stream = TokenStream::new("x");
        stream.next();
        assert!(stream.next().is_eof());
        assert!(stream.next().is_eof());
        assert!(stream.peek(5).is_eof());
    }
}
