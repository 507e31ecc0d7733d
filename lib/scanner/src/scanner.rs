use errors::{Line, TloxError, TloxErrors};

mod token;
pub use token::{Token, TokenData};
use TokenData::*;

/// Turns source text into an Eof-terminated token vector. Lexical errors
/// don't stop the scan; they are collected and returned in one batch so
/// a single pass can report everything.
pub struct Scanner {
    start: usize,
    current: usize,
    line: usize,
    source: Vec<char>,
    tokens: Vec<Token>,
    errors: TloxErrors,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self {
            start: 0,
            current: 0,
            line: 1,
            source: source.chars().collect(),
            tokens: Vec::new(),
            errors: TloxErrors::default(),
        }
    }

    pub fn scan_tokens(mut self) -> Result<Vec<Token>, TloxErrors> {
        while let Some(c) = self.consume() {
            self.start = self.current - 1;
            match c {
                '(' => self.add_token(LeftParen),
                ')' => self.add_token(RightParen),
                '{' => self.add_token(LeftBrace),
                '}' => self.add_token(RightBrace),
                ',' => self.add_token(Comma),
                '.' => self.add_token(Dot),
                '-' => self.add_token(Minus),
                '+' => self.add_token(Plus),
                ';' => self.add_token(Semicolon),
                '*' => self.add_token(Star),
                '?' => self.add_token(Question),
                ':' => self.add_token(Colon),

                '!' => {
                    if self.consume_if_matches('=') {
                        self.add_token(BangEqual)
                    } else {
                        self.add_token(Bang)
                    }
                }

                '=' => {
                    if self.consume_if_matches('=') {
                        self.add_token(EqualEqual)
                    } else {
                        self.add_token(Equal)
                    }
                }

                '<' => {
                    if self.consume_if_matches('=') {
                        self.add_token(LessEqual)
                    } else {
                        self.add_token(Less)
                    }
                }

                '>' => {
                    if self.consume_if_matches('=') {
                        self.add_token(GreaterEqual)
                    } else {
                        self.add_token(Greater)
                    }
                }

                '/' => {
                    if self.consume_if_matches('/') {
                        // Comment runs to end of line; the newline itself is
                        // handled by the main loop.
                        while !matches!(self.peek(), Some('\n') | None) {
                            self.consume();
                        }
                    } else {
                        self.add_token(Slash)
                    }
                }

                '"' => self.string(),

                d if d.is_ascii_digit() => self.number(),

                a if a.is_ascii_alphabetic() || a == '_' => self.identifier(),

                ' ' | '\r' | '\t' => (),

                '\n' => self.line += 1,

                _ => self.error("Unexpected character."),
            }
        }

        self.start = self.current;
        self.add_token(Eof);

        self.errors.is_empty().then_some(self.tokens).ok_or(self.errors)
    }

    fn string(&mut self) {
        loop {
            match self.consume() {
                Some('"') => break,
                Some('\n') => self.line += 1,
                Some(_) => (),
                None => {
                    self.error("Unterminated string.");
                    return;
                }
            }
        }
        let value: String = self.source[self.start + 1..self.current - 1].iter().collect();
        self.add_token(Str(value));
    }

    fn number(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.consume();
        }

        // A fractional part needs a digit after the dot, otherwise the dot
        // is left for the next token.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.consume();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.consume();
            }
        }

        let lexeme: String = self.source[self.start..self.current].iter().collect();
        // The scan above only admits digits[.digits], which always parses.
        let n = lexeme.parse().expect("number lexeme is a valid float literal");
        self.add_token(Number(n));
    }

    fn identifier(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.consume();
        }

        let lexeme: String = self.source[self.start..self.current].iter().collect();
        self.add_token(keyword(&lexeme).unwrap_or(Identifier));
    }

    fn add_token(&mut self, data: TokenData) {
        self.tokens.push(Token {
            data,
            lexeme: self.source[self.start..self.current].iter().collect(),
            line: Line(self.line),
        })
    }

    fn error(&mut self, message: &str) {
        self.errors.push(TloxError::bare(Line(self.line), message));
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source.get(self.current + 1).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.source.get(self.current).copied();
        if c.is_some() {
            self.current += 1;
        }
        c
    }

    fn consume_if_matches(&mut self, expected: char) -> bool {
        match self.peek() {
            Some(c) if c == expected => {
                self.consume();
                true
            }
            _ => false,
        }
    }
}

fn keyword(lexeme: &str) -> Option<TokenData> {
    Some(match lexeme {
        "and" => And,
        "class" => Class,
        "else" => Else,
        "false" => False,
        "fun" => Fun,
        "for" => For,
        "if" => If,
        "nil" => Nil,
        "or" => Or,
        "print" => Print,
        "return" => Return,
        "super" => Super,
        "this" => This,
        "true" => True,
        "var" => Var,
        "while" => While,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn eof(line: usize) -> Token {
        Token::new(Eof, "", Line(line))
    }

    fn scan(source: &str) -> Vec<Token> {
        Scanner::new(source).scan_tokens().unwrap()
    }

    #[test]
    fn operators_and_punctuation() {
        let data: Vec<TokenData> = scan("( ) , . - + ; / * ? : ! != = == > >= < <=")
            .into_iter()
            .map(|t| t.data)
            .collect();
        assert_eq!(
            data,
            vec![
                LeftParen, RightParen, Comma, Dot, Minus, Plus, Semicolon, Slash, Star, Question,
                Colon, Bang, BangEqual, Equal, EqualEqual, Greater, GreaterEqual, Less, LessEqual,
                Eof,
            ]
        );
    }

    #[test]
    fn number_literals() {
        assert_eq!(
            scan("12 3.5 0"),
            vec![
                Token::new(Number(12.0), "12", Line(1)),
                Token::new(Number(3.5), "3.5", Line(1)),
                Token::new(Number(0.0), "0", Line(1)),
                eof(1),
            ]
        );
    }

    #[test]
    fn awkward_digit_strings_still_scan() {
        assert_eq!(
            scan("007 0.0000001 9007199254740993"),
            vec![
                Token::new(Number(7.0), "007", Line(1)),
                Token::new(Number(0.0000001), "0.0000001", Line(1)),
                Token::new(Number(9007199254740992.0), "9007199254740993", Line(1)),
                eof(1),
            ]
        );
    }

    #[test]
    fn dot_after_number_is_not_a_fraction() {
        assert_eq!(
            scan("4."),
            vec![
                Token::new(Number(4.0), "4", Line(1)),
                Token::new(Dot, ".", Line(1)),
                eof(1),
            ]
        );
    }

    #[test]
    fn string_literals() {
        assert_eq!(
            scan("\"hello world\""),
            vec![
                Token::new(Str("hello world".to_string()), "\"hello world\"", Line(1)),
                eof(1),
            ]
        );
    }

    #[test]
    fn multiline_string_counts_lines() {
        assert_eq!(
            scan("\"a\nb\" 1"),
            vec![
                Token::new(Str("a\nb".to_string()), "\"a\nb\"", Line(2)),
                Token::new(Number(1.0), "1", Line(2)),
                eof(2),
            ]
        );
    }

    #[test]
    fn unterminated_string() {
        let errors = Scanner::new("\"abc").scan_tokens().unwrap_err();
        assert_eq!(errors.to_string(), "[line 1] Error: Unterminated string.");
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            scan("nil true false foo _bar"),
            vec![
                Token::new(Nil, "nil", Line(1)),
                Token::new(True, "true", Line(1)),
                Token::new(False, "false", Line(1)),
                Token::new(Identifier, "foo", Line(1)),
                Token::new(Identifier, "_bar", Line(1)),
                eof(1),
            ]
        );
    }

    #[test]
    fn comments_and_newlines() {
        assert_eq!(
            scan("1 // one\n2"),
            vec![
                Token::new(Number(1.0), "1", Line(1)),
                Token::new(Number(2.0), "2", Line(2)),
                eof(2),
            ]
        );
    }

    #[test]
    fn unexpected_characters_are_all_reported() {
        let errors = Scanner::new("@\n#").scan_tokens().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "[line 1] Error: Unexpected character.\n[line 2] Error: Unexpected character."
        );
    }
}
