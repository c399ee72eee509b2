//! Parser for incoming query documents.
//!
//! Covers the subset of the query language the API surface needs: an
//! optional `query`/`mutation` keyword with an optional operation name and
//! variable definitions, followed by a selection set of fields with
//! arguments (scalars, enums, strings, lists, input objects and `$variable`
//! references) and optional nested selection sets. Fragments, directives
//! and subscriptions are not part of the contract.
//!
//! Variables are left unresolved here; the schema contract resolves them
//! against the request envelope at bind time.

use crate::error::DocumentError;

/// Position in the source document, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    /// The root type a field of this operation kind is resolved against.
    pub fn parent_type(self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub operation: Operation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    pub name: Option<String>,
    pub variables: Vec<VariableDef>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDef {
    pub name: String,
    /// Rendered type reference, e.g. `IconInput!` or `[IconSizeInput!]`.
    pub ty: String,
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub arguments: Vec<(String, Value)>,
    /// Nested selections are parsed for syntax; responses always carry the
    /// full entity shape.
    pub selection: Vec<Field>,
}

/// An argument value as written in the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    Variable(String),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

pub fn parse(source: &str) -> Result<Document, DocumentError> {
    Parser::new(source)?.parse_document()
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    Int(i64),
    Float(f64),
    Str(String),
    Punct(char),
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Name(name) => format!("\"{name}\""),
            Token::Int(i) => i.to_string(),
            Token::Float(f) => f.to_string(),
            Token::Str(_) => "a string".to_string(),
            Token::Punct(c) => format!("\"{c}\""),
            Token::Eof => "end of document".to_string(),
        }
    }
}

struct Lexer {
    chars: Vec<char>,
    idx: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            idx: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.idx += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error_at(&self, pos: Pos, message: impl Into<String>) -> DocumentError {
        DocumentError {
            message: message.into(),
            line: pos.line,
            column: pos.column,
        }
    }

    /// Whitespace, commas and `#` comments are insignificant.
    fn skip_ignored(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() || c == ',' => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<(Token, Pos), DocumentError> {
        self.skip_ignored();
        let pos = Pos {
            line: self.line,
            column: self.column,
        };
        let Some(c) = self.peek_char() else {
            return Ok((Token::Eof, pos));
        };
        match c {
            '{' | '}' | '(' | ')' | '[' | ']' | ':' | '=' | '!' | '$' => {
                self.bump();
                Ok((Token::Punct(c), pos))
            }
            '"' => self.lex_string(pos),
            '_' => self.lex_name(pos),
            c if c.is_ascii_alphabetic() => self.lex_name(pos),
            c if c == '-' || c.is_ascii_digit() => self.lex_number(pos),
            other => Err(self.error_at(pos, format!("unexpected character {other:?}"))),
        }
    }

    fn lex_name(&mut self, pos: Pos) -> Result<(Token, Pos), DocumentError> {
        let mut name = String::new();
        while let Some(c) = self.peek_char() {
            if c == '_' || c.is_ascii_alphanumeric() {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Ok((Token::Name(name), pos))
    }

    fn lex_number(&mut self, pos: Pos) -> Result<(Token, Pos), DocumentError> {
        let mut text = String::new();
        if self.peek_char() == Some('-') {
            text.push('-');
            self.bump();
        }
        let mut is_float = false;
        while let Some(c) = self.peek_char() {
            match c {
                '0'..='9' => {
                    text.push(c);
                    self.bump();
                }
                '.' | 'e' | 'E' | '+' | '-' if !text.is_empty() => {
                    is_float = true;
                    text.push(c);
                    self.bump();
                }
                _ => break,
            }
        }
        if is_float {
            text.parse::<f64>()
                .map(|f| (Token::Float(f), pos))
                .map_err(|_| self.error_at(pos, format!("malformed number \"{text}\"")))
        } else {
            text.parse::<i64>()
                .map(|i| (Token::Int(i), pos))
                .map_err(|_| self.error_at(pos, format!("malformed number \"{text}\"")))
        }
    }

    fn lex_string(&mut self, pos: Pos) -> Result<(Token, Pos), DocumentError> {
        self.bump(); // opening quote
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error_at(pos, "unterminated string")),
                Some('"') => return Ok((Token::Str(text), pos)),
                Some('\n') => return Err(self.error_at(pos, "unterminated string")),
                Some('\\') => match self.bump() {
                    Some('"') => text.push('"'),
                    Some('\\') => text.push('\\'),
                    Some('/') => text.push('/'),
                    Some('b') => text.push('\u{0008}'),
                    Some('f') => text.push('\u{000C}'),
                    Some('n') => text.push('\n'),
                    Some('r') => text.push('\r'),
                    Some('t') => text.push('\t'),
                    Some('u') => {
                        let mut hex = String::new();
                        for _ in 0..4 {
                            match self.bump() {
                                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                                _ => {
                                    return Err(self
                                        .error_at(pos, "invalid unicode escape in string"));
                                }
                            }
                        }
                        let code = u32::from_str_radix(&hex, 16)
                            .ok()
                            .and_then(char::from_u32)
                            .ok_or_else(|| {
                                self.error_at(pos, "invalid unicode escape in string")
                            })?;
                        text.push(code);
                    }
                    _ => return Err(self.error_at(pos, "invalid escape sequence in string")),
                },
                Some(c) => text.push(c),
            }
        }
    }
}

struct Parser {
    lexer: Lexer,
    token: Token,
    pos: Pos,
}

impl Parser {
    fn new(source: &str) -> Result<Self, DocumentError> {
        let mut lexer = Lexer::new(source);
        let (token, pos) = lexer.next_token()?;
        Ok(Self { lexer, token, pos })
    }

    fn advance(&mut self) -> Result<(), DocumentError> {
        let (token, pos) = self.lexer.next_token()?;
        self.token = token;
        self.pos = pos;
        Ok(())
    }

    fn error(&self, message: impl Into<String>) -> DocumentError {
        DocumentError {
            message: message.into(),
            line: self.pos.line,
            column: self.pos.column,
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<(), DocumentError> {
        if self.token == Token::Punct(c) {
            self.advance()
        } else {
            Err(self.error(format!("expected \"{c}\", found {}", self.token.describe())))
        }
    }

    fn expect_name(&mut self) -> Result<String, DocumentError> {
        if let Token::Name(name) = &self.token {
            let name = name.clone();
            self.advance()?;
            Ok(name)
        } else {
            Err(self.error(format!("expected a name, found {}", self.token.describe())))
        }
    }

    fn parse_document(&mut self) -> Result<Document, DocumentError> {
        let operation = self.parse_operation()?;
        if self.token != Token::Eof {
            return Err(self.error("expected end of document (one operation per document)"));
        }
        Ok(Document { operation })
    }

    fn parse_operation(&mut self) -> Result<Operation, DocumentError> {
        let (kind, name, variables) = match self.token.clone() {
            // Anonymous shorthand `{ ... }` is a query.
            Token::Punct('{') => (OperationKind::Query, None, Vec::new()),
            Token::Name(word) => {
                let kind = match word.as_str() {
                    "query" => OperationKind::Query,
                    "mutation" => OperationKind::Mutation,
                    "subscription" => {
                        return Err(self.error("subscriptions are not supported"));
                    }
                    other => {
                        return Err(self.error(format!(
                            "expected \"query\" or \"mutation\", found \"{other}\""
                        )));
                    }
                };
                self.advance()?;
                let name = if let Token::Name(n) = &self.token {
                    let n = n.clone();
                    self.advance()?;
                    Some(n)
                } else {
                    None
                };
                let variables = if self.token == Token::Punct('(') {
                    self.parse_variable_defs()?
                } else {
                    Vec::new()
                };
                (kind, name, variables)
            }
            other => {
                return Err(self.error(format!("expected an operation, found {}", other.describe())));
            }
        };
        let fields = self.parse_selection_set()?;
        Ok(Operation {
            kind,
            name,
            variables,
            fields,
        })
    }

    fn parse_variable_defs(&mut self) -> Result<Vec<VariableDef>, DocumentError> {
        self.expect_punct('(')?;
        if self.token == Token::Punct(')') {
            return Err(self.error("expected a variable definition, found \")\""));
        }
        let mut defs = Vec::new();
        while self.token != Token::Punct(')') {
            self.expect_punct('$')?;
            let name = self.expect_name()?;
            self.expect_punct(':')?;
            let ty = self.parse_type()?;
            let default = if self.token == Token::Punct('=') {
                self.advance()?;
                Some(self.parse_value()?)
            } else {
                None
            };
            defs.push(VariableDef { name, ty, default });
        }
        self.advance()?;
        Ok(defs)
    }

    fn parse_type(&mut self) -> Result<String, DocumentError> {
        let mut rendered = match self.token.clone() {
            Token::Name(name) => {
                self.advance()?;
                name
            }
            Token::Punct('[') => {
                self.advance()?;
                let inner = self.parse_type()?;
                self.expect_punct(']')?;
                format!("[{inner}]")
            }
            other => {
                return Err(self.error(format!("expected a type, found {}", other.describe())));
            }
        };
        if self.token == Token::Punct('!') {
            self.advance()?;
            rendered.push('!');
        }
        Ok(rendered)
    }

    fn parse_selection_set(&mut self) -> Result<Vec<Field>, DocumentError> {
        self.expect_punct('{')?;
        if self.token == Token::Punct('}') {
            return Err(self.error("expected a field name, found \"}\""));
        }
        let mut fields = Vec::new();
        while self.token != Token::Punct('}') {
            fields.push(self.parse_field()?);
        }
        self.advance()?;
        Ok(fields)
    }

    fn parse_field(&mut self) -> Result<Field, DocumentError> {
        let name = self.expect_name()?;
        let arguments = if self.token == Token::Punct('(') {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        let selection = if self.token == Token::Punct('{') {
            self.parse_selection_set()?
        } else {
            Vec::new()
        };
        Ok(Field {
            name,
            arguments,
            selection,
        })
    }

    fn parse_arguments(&mut self) -> Result<Vec<(String, Value)>, DocumentError> {
        self.expect_punct('(')?;
        if self.token == Token::Punct(')') {
            return Err(self.error("expected an argument, found \")\""));
        }
        let mut arguments = Vec::new();
        while self.token != Token::Punct(')') {
            let name = self.expect_name()?;
            self.expect_punct(':')?;
            arguments.push((name, self.parse_value()?));
        }
        self.advance()?;
        Ok(arguments)
    }

    fn parse_value(&mut self) -> Result<Value, DocumentError> {
        match self.token.clone() {
            Token::Int(i) => {
                self.advance()?;
                Ok(Value::Int(i))
            }
            Token::Float(f) => {
                self.advance()?;
                Ok(Value::Float(f))
            }
            Token::Str(s) => {
                self.advance()?;
                Ok(Value::String(s))
            }
            Token::Name(word) => {
                self.advance()?;
                Ok(match word.as_str() {
                    "true" => Value::Boolean(true),
                    "false" => Value::Boolean(false),
                    "null" => Value::Null,
                    _ => Value::Enum(word),
                })
            }
            Token::Punct('$') => {
                self.advance()?;
                Ok(Value::Variable(self.expect_name()?))
            }
            Token::Punct('[') => {
                self.advance()?;
                let mut items = Vec::new();
                while self.token != Token::Punct(']') {
                    items.push(self.parse_value()?);
                }
                self.advance()?;
                Ok(Value::List(items))
            }
            Token::Punct('{') => {
                self.advance()?;
                let mut fields = Vec::new();
                while self.token != Token::Punct('}') {
                    let name = self.expect_name()?;
                    self.expect_punct(':')?;
                    fields.push((name, self.parse_value()?));
                }
                self.advance()?;
                Ok(Value::Object(fields))
            }
            other => Err(self.error(format!("expected a value, found {}", other.describe()))),
        }
    }
}
