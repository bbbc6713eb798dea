//! Scanner implementation.

use super::{Keyword, Pos, Token, TokenKind};

const BUF: usize = 3;

/// A character reader with a small unread ring buffer.
///
/// Each rune is tagged with the position it was first read at, and an
/// unread rune keeps that position when re-delivered. The EOF rune
/// advances the position once; identifier scans consume it, number
/// scans push it back.
struct Reader<'a> {
    chars: std::str::Chars<'a>,
    buf: [(Option<char>, Pos); BUF],
    i: usize,
    n: usize,
    pos: Pos,
    eof: bool,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars(),
            buf: [(None, Pos::new(0, 0)); BUF],
            i: 0,
            n: 0,
            pos: Pos::new(0, 0),
            eof: false,
        }
    }

    /// Reads the next rune, or `None` at end of input.
    fn read(&mut self) -> (Option<char>, Pos) {
        if self.n > 0 {
            self.n -= 1;
            return self.curr();
        }

        let ch = self.chars.next();
        self.i = (self.i + 1) % BUF;
        self.buf[self.i] = (ch, self.pos);

        match ch {
            Some('\n') => {
                self.pos.line += 1;
                self.pos.char = 0;
            }
            Some(_) => self.pos.char += 1,
            None => {
                if !self.eof {
                    self.pos.char += 1;
                    self.eof = true;
                }
            }
        }

        self.buf[self.i]
    }

    /// Pushes the most recently read rune back onto the reader.
    fn unread(&mut self) {
        self.n += 1;
    }

    /// Peeks the rune that the next `read` will deliver, without
    /// consuming it.
    fn curr_start(&mut self) -> (Option<char>, Pos) {
        let out = self.read();
        self.unread();
        out
    }

    fn curr(&self) -> (Option<char>, Pos) {
        self.buf[(self.i + BUF - self.n) % BUF]
    }
}

/// A lexical scanner for the query language.
pub struct Scanner<'a> {
    r: Reader<'a>,
    pushback: Option<Token>,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            r: Reader::new(input),
            pushback: None,
        }
    }

    /// Returns the next significant token, skipping whitespace and
    /// comments. Repeated calls at end of input keep returning EOF.
    pub fn next_token(&mut self) -> Token {
        if let Some(tok) = self.pushback.take() {
            return tok;
        }
        loop {
            let tok = self.scan();
            if !tok.kind.is_trivia() {
                return tok;
            }
        }
    }

    /// Pushes a token back onto the scanner; the next call to
    /// [`next_token`](Self::next_token) returns it. Holds one token.
    pub fn push_back(&mut self, tok: Token) {
        self.pushback = Some(tok);
    }

    /// Scans the next raw token, including whitespace and comment runs.
    pub fn scan(&mut self) -> Token {
        let (ch, pos) = self.r.read();
        let Some(c) = ch else {
            return Token::new(TokenKind::Eof, String::new(), pos);
        };

        if c.is_whitespace() {
            self.r.unread();
            return self.scan_whitespace();
        }
        if c == '"' || c == '_' || c.is_ascii_alphabetic() {
            self.r.unread();
            return self.scan_ident();
        }
        if c.is_ascii_digit() {
            self.r.unread();
            return self.scan_number();
        }

        match c {
            '\'' => self.scan_string(pos),
            '-' => {
                if self.r.read().0 == Some('-') {
                    self.scan_comment(pos)
                } else {
                    self.r.unread();
                    self.punct(TokenKind::Minus, "-", pos)
                }
            }
            '+' => self.punct(TokenKind::Plus, "+", pos),
            '*' => self.punct(TokenKind::Star, "*", pos),
            '/' => self.punct(TokenKind::Slash, "/", pos),
            '(' => self.punct(TokenKind::LeftParen, "(", pos),
            ')' => self.punct(TokenKind::RightParen, ")", pos),
            ',' => self.punct(TokenKind::Comma, ",", pos),
            ';' => self.punct(TokenKind::Semicolon, ";", pos),
            '.' => self.punct(TokenKind::Dot, ".", pos),
            '=' => self.punct(TokenKind::Eq, "=", pos),
            '!' => {
                if self.r.read().0 == Some('=') {
                    self.punct(TokenKind::NotEq, "!=", pos)
                } else {
                    self.r.unread();
                    Token::new(TokenKind::Illegal, String::from("unexpected character: !"), pos)
                }
            }
            '<' => {
                if self.r.read().0 == Some('=') {
                    self.punct(TokenKind::LtEq, "<=", pos)
                } else {
                    self.r.unread();
                    self.punct(TokenKind::Lt, "<", pos)
                }
            }
            '>' => {
                if self.r.read().0 == Some('=') {
                    self.punct(TokenKind::GtEq, ">=", pos)
                } else {
                    self.r.unread();
                    self.punct(TokenKind::Gt, ">", pos)
                }
            }
            _ => Token::new(
                TokenKind::Illegal,
                format!("unexpected character: {c}"),
                pos,
            ),
        }
    }

    /// Tokenizes the remaining input, EOF token included.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.scan();
            let done = tok.is_eof();
            tokens.push(tok);
            if done {
                break;
            }
        }
        tokens
    }

    fn punct(&self, kind: TokenKind, lit: &str, pos: Pos) -> Token {
        Token::new(kind, String::from(lit), pos)
    }

    fn scan_whitespace(&mut self) -> Token {
        let (first, pos) = self.r.read();
        let mut lit = String::new();
        if let Some(c) = first {
            lit.push(c);
        }
        loop {
            match self.r.read().0 {
                None => break,
                Some(c) if c.is_whitespace() => lit.push(c),
                Some(_) => {
                    self.r.unread();
                    break;
                }
            }
        }
        Token::new(TokenKind::Ws, lit, pos)
    }

    /// Scans a bare or double-quoted identifier, or a keyword.
    ///
    /// Quoted segments keep their surrounding quotes in the literal, so
    /// downstream name fields can store the lexeme verbatim.
    fn scan_ident(&mut self) -> Token {
        let (_, pos) = self.r.curr_start();
        let mut lit = String::new();
        loop {
            let (ch, _) = self.r.read();
            match ch {
                None => break,
                Some('"') => match self.scan_quoted(pos, '"') {
                    Ok(contents) => {
                        lit.push('"');
                        lit.push_str(&contents);
                        lit.push('"');
                    }
                    Err(tok) => return tok,
                },
                Some(c) if is_ident_char(c) => lit.push(c),
                Some(_) => {
                    self.r.unread();
                    break;
                }
            }
        }

        match Keyword::from_str(&lit) {
            Some(kw) => Token::new(TokenKind::Keyword(kw), lit, pos),
            None => Token::new(TokenKind::Ident, lit, pos),
        }
    }

    fn scan_string(&mut self, pos: Pos) -> Token {
        match self.scan_quoted(pos, '\'') {
            Ok(contents) => Token::new(TokenKind::Str, contents, pos),
            Err(tok) => tok,
        }
    }

    /// Scans the body of a quoted literal, opening quote already
    /// consumed. Recognized escapes: `\n`, `\\`, and the quote itself.
    fn scan_quoted(&mut self, pos: Pos, quote: char) -> Result<String, Token> {
        let mut out = String::new();
        loop {
            let (ch, _) = self.r.read();
            match ch {
                None => {
                    return Err(Token::new(
                        TokenKind::Illegal,
                        String::from("unterminated string"),
                        pos,
                    ));
                }
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.r.read().0 {
                    Some('n') => out.push('\n'),
                    Some('\\') => out.push('\\'),
                    Some(c) if c == quote => out.push(c),
                    _ => {
                        return Err(Token::new(
                            TokenKind::Illegal,
                            String::from("bad escape"),
                            pos,
                        ));
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Scans a number or a unit-suffixed duration literal.
    fn scan_number(&mut self) -> Token {
        let (first, pos) = self.r.read();
        let mut lit = String::new();
        if let Some(c) = first {
            lit.push(c);
        }
        self.scan_digits(&mut lit);

        // A dot is a fraction only when a digit follows; `series.field`
        // keeps its dot token.
        let mut is_decimal = false;
        if self.r.read().0 == Some('.') {
            match self.r.read().0 {
                Some(c) if c.is_ascii_digit() => {
                    is_decimal = true;
                    lit.push('.');
                    lit.push(c);
                    self.scan_digits(&mut lit);
                }
                _ => {
                    self.r.unread();
                    self.r.unread();
                }
            }
        } else {
            self.r.unread();
        }

        // Fractional durations are rejected by emitting the unit as its
        // own token, which the parser then reports.
        if !is_decimal {
            match self.r.read().0 {
                Some(c @ ('u' | 'µ' | 's' | 'h' | 'd' | 'w')) => {
                    lit.push(c);
                    return Token::new(TokenKind::DurationVal, lit, pos);
                }
                Some('m') => {
                    lit.push('m');
                    if self.r.read().0 == Some('s') {
                        lit.push('s');
                    } else {
                        self.r.unread();
                    }
                    return Token::new(TokenKind::DurationVal, lit, pos);
                }
                _ => self.r.unread(),
            }
        }

        // f64 parsing saturates to infinity on overflow, so the
        // representability check is explicit.
        match lit.parse::<f64>() {
            Ok(v) if v.is_finite() => Token::new(TokenKind::Number, lit, pos),
            _ => Token::new(
                TokenKind::Illegal,
                String::from("unable to parse number"),
                pos,
            ),
        }
    }

    fn scan_digits(&mut self, lit: &mut String) {
        loop {
            match self.r.read().0 {
                Some(c) if c.is_ascii_digit() => lit.push(c),
                _ => {
                    self.r.unread();
                    break;
                }
            }
        }
    }

    fn scan_comment(&mut self, pos: Pos) -> Token {
        let mut lit = String::from("--");
        loop {
            match self.r.read().0 {
                None => break,
                Some('\n') => {
                    self.r.unread();
                    break;
                }
                Some(c) => lit.push(c),
            }
        }
        Token::new(TokenKind::Comment, lit, pos)
    }
}

const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
