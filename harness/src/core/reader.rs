//! S-expression reader turning program source into top-level forms.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::core::error::ParseError;
use crate::core::value::Value;

/// Deepest list or quote nesting the reader accepts.
pub const MAX_READ_DEPTH: usize = 256;

/// Read every top-level form in `source`, in order.
pub fn read_program(source: &str) -> Result<Vec<Value>, ParseError> {
    let mut reader = Reader::new(source);
    let mut forms = Vec::new();
    while let Some(form) = reader.next_form()? {
        forms.push(form);
    }
    Ok(forms)
}

struct Reader<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            depth: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.line,
            message: message.into(),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn skip_trivia(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.bump();
            } else if ch == ';' {
                while let Some(&(_, ch)) = self.chars.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn next_form(&mut self) -> Result<Option<Value>, ParseError> {
        self.skip_trivia();
        let Some(&(_, ch)) = self.chars.peek() else {
            return Ok(None);
        };
        match ch {
            ')' => Err(self.error("unexpected ')'")),
            _ => self.form().map(Some),
        }
    }

    fn form(&mut self) -> Result<Value, ParseError> {
        if self.depth >= MAX_READ_DEPTH {
            return Err(self.error(format!("forms nested deeper than {MAX_READ_DEPTH}")));
        }
        self.depth += 1;
        let form = self.datum();
        self.depth -= 1;
        form
    }

    fn datum(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia();
        let Some(&(start, ch)) = self.chars.peek() else {
            return Err(self.error("unexpected end of input"));
        };
        match ch {
            '(' => {
                self.bump();
                self.list()
            }
            ')' => Err(self.error("unexpected ')'")),
            '\'' => {
                self.bump();
                let quoted = self.form()?;
                Ok(Value::List(vec![Value::Symbol("quote".to_string()), quoted]))
            }
            '"' => {
                self.bump();
                self.string()
            }
            _ => Ok(self.atom(start)),
        }
    }

    fn list(&mut self) -> Result<Value, ParseError> {
        let open_line = self.line;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.chars.peek() {
                None => {
                    return Err(ParseError {
                        line: open_line,
                        message: "unclosed '('".to_string(),
                    });
                }
                Some(&(_, ')')) => {
                    self.bump();
                    return Ok(Value::List(items));
                }
                Some(_) => items.push(self.form()?),
            }
        }
    }

    fn string(&mut self) -> Result<Value, ParseError> {
        let open_line = self.line;
        let mut out = String::new();
        loop {
            let Some(ch) = self.bump() else {
                return Err(ParseError {
                    line: open_line,
                    message: "unterminated string".to_string(),
                });
            };
            match ch {
                '"' => return Ok(Value::Str(out)),
                '\\' => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some(other) => return Err(self.error(format!("unknown escape \\{other}"))),
                    None => return Err(self.error("unterminated escape")),
                },
                other => out.push(other),
            }
        }
    }

    fn atom(&mut self, start: usize) -> Value {
        let mut end = self.source.len();
        while let Some(&(index, ch)) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | ';' | '\'') {
                end = index;
                break;
            }
            self.bump();
        }
        classify_atom(&self.source[start..end])
    }
}

fn classify_atom(token: &str) -> Value {
    match token {
        "nil" => Value::Nil,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = token.parse::<i64>() {
                return Value::Int(n);
            }
            let numeric_start = token
                .trim_start_matches(['-', '+'])
                .starts_with(|ch: char| ch.is_ascii_digit());
            if numeric_start && let Ok(x) = token.parse::<f64>() {
                return Value::Float(x);
            }
            Value::Symbol(token.to_string())
        }
    }
}
