//! Parser for `.psd1` module manifests
//!
//! Manifests are written in the restricted PowerShell data language: one
//! hashtable literal holding strings, numbers, `$true`/`$false`/`$null`,
//! arrays and nested hashtables. The parser is tolerant: a malformed entry
//! is recorded as a [`ParseError`] and skipped up to the next separator, so
//! every recoverable `key = value` pair survives. Strict callers reject any
//! recorded error.

use std::fmt;

use super::value::Value;

/// A top-level `key = value` pair
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub value: Value,
    /// 1-based line of the key
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Result of a tolerant parse
#[derive(Debug, Clone, Default)]
pub struct ParsedManifest {
    pub entries: Vec<Entry>,
    /// Problems skipped over while parsing
    pub errors: Vec<ParseError>,
}

/// Parse a manifest, recovering what it can.
///
/// Fails only when the text has no outer `@{` hashtable at all.
pub fn parse_tolerant(src: &str) -> Result<ParsedManifest, ParseError> {
    let tokens = Lexer::new(src).tokenize();
    let mut parser = Parser {
        tokens,
        pos: 0,
        errors: Vec::new(),
    };
    let entries = parser.parse_document()?;
    Ok(ParsedManifest {
        entries,
        errors: parser.errors,
    })
}

/// Parse a manifest, rejecting any syntax error
pub fn parse_strict(src: &str) -> Result<Vec<Entry>, ParseError> {
    let parsed = parse_tolerant(src)?;
    match parsed.errors.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(parsed.entries),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    TableStart,
    ArrayStart,
    LParen,
    RBrace,
    RParen,
    Eq,
    Semi,
    Comma,
    Newline,
    Str(String),
    Num(String),
    Var(String),
    Word(String),
    Error(String),
}

#[derive(Debug, Clone)]
struct Token {
    tok: Tok,
    line: usize,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    out: Vec<Token>,
}

impl Lexer {
    fn new(src: &str) -> Self {
        Self {
            chars: src.trim_start_matches('\u{feff}').chars().collect(),
            pos: 0,
            line: 1,
            out: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn push(&mut self, tok: Tok, line: usize) {
        self.out.push(Token { tok, line });
    }

    fn skip_to_eol(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn tokenize(mut self) -> Vec<Token> {
        while let Some(c) = self.peek(0) {
            let line = self.line;
            match c {
                ' ' | '\t' | '\r' => self.pos += 1,
                '\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.push(Tok::Newline, line);
                }
                '#' => self.skip_to_eol(),
                '<' if self.peek(1) == Some('#') => self.block_comment(),
                '@' => self.at_sign(),
                '}' => self.single(Tok::RBrace),
                '(' => self.single(Tok::LParen),
                ')' => self.single(Tok::RParen),
                '=' => self.single(Tok::Eq),
                ';' => self.single(Tok::Semi),
                ',' => self.single(Tok::Comma),
                '\'' => self.single_quoted(),
                '"' => self.double_quoted(),
                '$' => {
                    self.pos += 1;
                    let name = self.take_while(is_word_char);
                    self.push(Tok::Var(name), line);
                }
                c if c.is_ascii_digit()
                    || (matches!(c, '-' | '+' | '.')
                        && self.peek(1).is_some_and(|n| n.is_ascii_digit())) =>
                {
                    let text = self.take_while(is_word_char);
                    if is_number(&text) {
                        self.push(Tok::Num(text), line);
                    } else {
                        self.push(Tok::Word(text), line);
                    }
                }
                c if is_word_char(c) => {
                    let text = self.take_while(is_word_char);
                    self.push(Tok::Word(text), line);
                }
                other => {
                    self.pos += 1;
                    self.push(Tok::Error(format!("unexpected character '{other}'")), line);
                }
            }
        }
        self.out
    }

    fn single(&mut self, tok: Tok) {
        let line = self.line;
        self.pos += 1;
        self.push(tok, line);
    }

    fn take_while(&mut self, pred: fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek(0).is_some_and(pred) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn block_comment(&mut self) {
        let line = self.line;
        self.pos += 2;
        while let Some(c) = self.peek(0) {
            if c == '#' && self.peek(1) == Some('>') {
                self.pos += 2;
                return;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
        self.push(Tok::Error("unterminated block comment".to_string()), line);
    }

    fn at_sign(&mut self) {
        let line = self.line;
        match self.peek(1) {
            Some('{') => {
                self.pos += 2;
                self.push(Tok::TableStart, line);
            }
            Some('(') => {
                self.pos += 2;
                self.push(Tok::ArrayStart, line);
            }
            Some(q @ ('\'' | '"')) => self.here_string(q),
            _ => {
                self.pos += 1;
                self.push(Tok::Error("unexpected '@'".to_string()), line);
            }
        }
    }

    /// `@'...'@` / `@"..."@`: body starts on the next line, terminator at the
    /// start of a line.
    fn here_string(&mut self, quote: char) {
        let line = self.line;
        self.pos += 2;
        self.skip_to_eol();
        if self.peek(0).is_none() {
            self.push(Tok::Error("unterminated here-string".to_string()), line);
            return;
        }
        self.pos += 1;
        self.line += 1;

        let mut body = String::new();
        let mut at_line_start = true;
        while let Some(c) = self.peek(0) {
            if at_line_start && c == quote && self.peek(1) == Some('@') {
                self.pos += 2;
                if body.ends_with('\n') {
                    body.pop();
                    if body.ends_with('\r') {
                        body.pop();
                    }
                }
                self.push(Tok::Str(body), line);
                return;
            }
            at_line_start = c == '\n';
            if c == '\n' {
                self.line += 1;
            }
            body.push(c);
            self.pos += 1;
        }
        self.push(Tok::Error("unterminated here-string".to_string()), line);
    }

    fn single_quoted(&mut self) {
        let line = self.line;
        let start = self.pos;
        self.pos += 1;
        let mut text = String::new();
        while let Some(c) = self.peek(0) {
            if c == '\'' {
                if self.peek(1) == Some('\'') {
                    text.push('\'');
                    self.pos += 2;
                    continue;
                }
                self.pos += 1;
                self.push(Tok::Str(text), line);
                return;
            }
            if c == '\n' {
                self.line += 1;
            }
            text.push(c);
            self.pos += 1;
        }
        self.unterminated(start, line);
    }

    fn double_quoted(&mut self) {
        let line = self.line;
        let start = self.pos;
        self.pos += 1;
        let mut text = String::new();
        while let Some(c) = self.peek(0) {
            match c {
                '"' if self.peek(1) == Some('"') => {
                    text.push('"');
                    self.pos += 2;
                }
                '"' => {
                    self.pos += 1;
                    self.push(Tok::Str(text), line);
                    return;
                }
                '`' => {
                    let escaped = match self.peek(1) {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some(other) => other,
                        None => break,
                    };
                    text.push(escaped);
                    self.pos += 2;
                }
                c => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    text.push(c);
                    self.pos += 1;
                }
            }
        }
        self.unterminated(start, line);
    }

    /// Record an unterminated string and resume after the line it started on
    fn unterminated(&mut self, start: usize, line: usize) {
        self.pos = start + 1;
        self.line = line;
        self.skip_to_eol();
        self.push(Tok::Error("unterminated string".to_string()), line);
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '\\' | '/' | '*' | '?' | '+')
}

fn is_number(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if let Some(hex) = digits.strip_prefix("0x") {
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    let mut seen_dot = false;
    let mut seen_digit = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|t| &t.tok)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn next(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).map(|t| t.tok.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.line(),
            message: message.into(),
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(Tok::Newline | Tok::Semi)) {
            self.pos += 1;
        }
    }

    fn parse_document(&mut self) -> Result<Vec<Entry>, ParseError> {
        // Stray tokens before the hashtable are tolerated but recorded
        loop {
            self.skip_separators();
            match self.peek() {
                Some(Tok::TableStart) => break,
                Some(_) => {
                    let err = self.error("unexpected content before manifest hashtable");
                    self.errors.push(err);
                    self.pos += 1;
                }
                None => {
                    return Err(ParseError {
                        line: self.line(),
                        message: "no '@{' hashtable found".to_string(),
                    });
                }
            }
        }
        self.pos += 1;

        let entries = self
            .parse_table_body()
            .into_iter()
            .map(|(key, value, line)| Entry { key, value, line })
            .collect();

        self.skip_separators();
        if self.peek().is_some() {
            let err = self.error("unexpected content after manifest hashtable");
            self.errors.push(err);
        }
        Ok(entries)
    }

    /// Entries up to and including the closing `}`
    fn parse_table_body(&mut self) -> Vec<(String, Value, usize)> {
        let mut entries = Vec::new();
        loop {
            self.skip_separators();
            match self.peek() {
                None => {
                    let err = self.error("unterminated hashtable, expected '}'");
                    self.errors.push(err);
                    break;
                }
                Some(Tok::RBrace) => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    let start = self.pos;
                    match self.parse_entry() {
                        Ok(entry) => {
                            entries.push(entry);
                            if !matches!(
                                self.peek(),
                                None | Some(Tok::Newline | Tok::Semi | Tok::RBrace)
                            ) {
                                let err = self.error("expected newline or ';' after value");
                                self.errors.push(err);
                                self.recover();
                            }
                        }
                        Err(err) => {
                            self.errors.push(err);
                            self.recover();
                            if self.pos == start {
                                self.pos += 1;
                            }
                        }
                    }
                }
            }
        }
        entries
    }

    fn parse_entry(&mut self) -> Result<(String, Value, usize), ParseError> {
        let line = self.line();
        let key = match self.next() {
            Some(Tok::Word(w)) => w,
            Some(Tok::Str(s)) => s,
            Some(Tok::Error(msg)) => return Err(ParseError { line, message: msg }),
            _ => return Err(ParseError {
                line,
                message: "expected a key".to_string(),
            }),
        };
        if self.next() != Some(Tok::Eq) {
            return Err(ParseError {
                line,
                message: format!("expected '=' after key '{key}'"),
            });
        }
        let value = self.parse_value()?;
        Ok((key, value, line))
    }

    /// A value, absorbing a bare `a, b, c` comma list into an array
    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let first = self.parse_primary()?;
        if self.peek() != Some(&Tok::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.peek() == Some(&Tok::Comma) {
            self.pos += 1;
            // A trailing comma may continue the list on the next line
            while self.peek() == Some(&Tok::Newline) {
                self.pos += 1;
            }
            items.push(self.parse_primary()?);
        }
        Ok(Value::Array(items))
    }

    fn parse_primary(&mut self) -> Result<Value, ParseError> {
        if matches!(
            self.peek(),
            None | Some(Tok::Newline | Tok::Semi | Tok::RBrace | Tok::RParen)
        ) {
            return Err(self.error("missing value"));
        }
        let line = self.line();
        match self.next() {
            Some(Tok::Str(s)) => Ok(Value::String(s)),
            Some(Tok::Num(n)) => Ok(Value::Number(n)),
            Some(Tok::Word(w)) => Ok(Value::Bare(w)),
            Some(Tok::Var(name)) => Ok(match name.to_ascii_lowercase().as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                "null" => Value::Null,
                _ => Value::Bare(format!("${name}")),
            }),
            Some(Tok::TableStart) => Ok(Value::Table(
                self.parse_table_body()
                    .into_iter()
                    .map(|(k, v, _)| (k, v))
                    .collect(),
            )),
            Some(Tok::ArrayStart) => Ok(Value::Array(self.parse_array_body())),
            Some(Tok::Error(message)) => Err(ParseError { line, message }),
            Some(other) => Err(ParseError {
                line,
                message: format!("unexpected {}", describe(&other)),
            }),
            None => Err(ParseError {
                line,
                message: "missing value".to_string(),
            }),
        }
    }

    /// Elements up to and including the closing `)`
    fn parse_array_body(&mut self) -> Vec<Value> {
        let mut items = Vec::new();
        loop {
            while matches!(self.peek(), Some(Tok::Newline | Tok::Semi | Tok::Comma)) {
                self.pos += 1;
            }
            match self.peek() {
                None => {
                    let err = self.error("unterminated array, expected ')'");
                    self.errors.push(err);
                    break;
                }
                Some(Tok::RParen) => {
                    self.pos += 1;
                    break;
                }
                Some(Tok::RBrace) => {
                    // Leave the '}' to close the enclosing table
                    let err = self.error("expected ')' before '}'");
                    self.errors.push(err);
                    break;
                }
                Some(_) => {
                    let start = self.pos;
                    match self.parse_primary() {
                        Ok(v) => items.push(v),
                        Err(err) => {
                            self.errors.push(err);
                            self.recover_in_array();
                            if self.pos == start {
                                self.pos += 1;
                            }
                        }
                    }
                }
            }
        }
        items
    }

    /// Skip to the next entry separator, staying inside the current table
    fn recover(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            match tok {
                Tok::TableStart | Tok::ArrayStart | Tok::LParen => depth += 1,
                Tok::RBrace if depth == 0 => return,
                Tok::RBrace | Tok::RParen => depth = depth.saturating_sub(1),
                Tok::Newline | Tok::Semi if depth == 0 => return,
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Skip to the next element separator, staying inside the current array
    fn recover_in_array(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            match tok {
                Tok::TableStart | Tok::ArrayStart | Tok::LParen => depth += 1,
                Tok::RBrace | Tok::RParen if depth == 0 => return,
                Tok::RBrace | Tok::RParen => depth -= 1,
                Tok::Newline | Tok::Comma if depth == 0 => return,
                _ => {}
            }
            self.pos += 1;
        }
    }
}

fn describe(tok: &Tok) -> String {
    match tok {
        Tok::TableStart => "'@{'".to_string(),
        Tok::ArrayStart => "'@('".to_string(),
        Tok::LParen => "'('".to_string(),
        Tok::RBrace => "'}'".to_string(),
        Tok::RParen => "')'".to_string(),
        Tok::Eq => "'='".to_string(),
        Tok::Semi => "';'".to_string(),
        Tok::Comma => "','".to_string(),
        Tok::Newline => "end of line".to_string(),
        Tok::Str(s) => format!("string '{s}'"),
        Tok::Num(n) => format!("number {n}"),
        Tok::Var(v) => format!("variable ${v}"),
        Tok::Word(w) => format!("'{w}'"),
        Tok::Error(e) => e.clone(),
    }
}
