//! Generic KeyValues text reader and writer
//!
//! VMF files are KeyValues text: quoted `"key" "value"` properties and
//! `name { ... }` classes, nested arbitrarily. This module reads that text
//! into an ordered tree without interpreting it, which is useful for
//! inspecting generated maps or loading existing ones.

use thiserror::Error;

/// Error reading KeyValues text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyValuesError {
    #[error("line {line}: unterminated quoted string")]
    UnterminatedString { line: usize },
    #[error("line {line}: property \"{key}\" has no quoted value")]
    MalformedProperty { line: usize, key: String },
    #[error("line {line}: class name '{name}' is not followed by '{{'")]
    ExpectedOpenBrace { line: usize, name: String },
    #[error("line {line}: unexpected '{token}'")]
    UnexpectedToken { line: usize, token: String },
    #[error("line {line}: '}}' with no open class")]
    UnmatchedClose { line: usize },
    #[error("end of input with {open} unclosed class(es)")]
    UnexpectedEof { open: usize },
}

/// One entry of a class, in file order
#[derive(Clone, Debug, PartialEq)]
pub enum KvEntry {
    Property(String, String),
    Class(String, KvNode),
}

/// A class body (or the document root)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KvNode {
    pub entries: Vec<KvEntry>,
}

impl KvNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole document
    pub fn parse(text: &str) -> Result<Self, KeyValuesError> {
        let tokens = tokenize(text)?;
        let mut tokens = tokens.into_iter().peekable();

        let mut root = KvNode::new();
        let mut open: Vec<(String, KvNode)> = Vec::new();

        while let Some((line, token)) = tokens.next() {
            let current = match open.last_mut() {
                Some((_, node)) => node,
                None => &mut root,
            };
            match token {
                Token::Quoted(key) => match tokens.next() {
                    Some((_, Token::Quoted(value))) => current.push_property(key, value),
                    _ => return Err(KeyValuesError::MalformedProperty { line, key }),
                },
                Token::Word(name) => match tokens.next() {
                    Some((_, Token::Open)) => open.push((name, KvNode::new())),
                    _ => return Err(KeyValuesError::ExpectedOpenBrace { line, name }),
                },
                Token::Open => {
                    return Err(KeyValuesError::UnexpectedToken { line, token: "{".to_string() });
                }
                Token::Close => {
                    let (name, node) = open.pop().ok_or(KeyValuesError::UnmatchedClose { line })?;
                    let parent = match open.last_mut() {
                        Some((_, parent)) => parent,
                        None => &mut root,
                    };
                    parent.push_class(name, node);
                }
            }
        }

        if !open.is_empty() {
            return Err(KeyValuesError::UnexpectedEof { open: open.len() });
        }
        Ok(root)
    }

    pub fn push_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push(KvEntry::Property(key.into(), value.into()));
    }

    pub fn push_class(&mut self, name: impl Into<String>, node: KvNode) {
        self.entries.push(KvEntry::Class(name.into(), node));
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// All properties in order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|entry| match entry {
            KvEntry::Property(k, v) => Some((k.as_str(), v.as_str())),
            KvEntry::Class(..) => None,
        })
    }

    /// All direct child classes called `name`, in order
    pub fn classes<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a KvNode> + 'a {
        self.entries.iter().filter_map(move |entry| match entry {
            KvEntry::Class(n, node) if n == name => Some(node),
            _ => None,
        })
    }

    /// Write back as tab-indented text
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        let pad = "\t".repeat(depth);
        for entry in &self.entries {
            match entry {
                KvEntry::Property(k, v) => {
                    out.push_str(&format!("{pad}\"{k}\" \"{v}\"\n"));
                }
                KvEntry::Class(name, node) => {
                    out.push_str(&format!("{pad}{name}\n{pad}{{\n"));
                    node.dump_into(out, depth + 1);
                    out.push_str(&format!("{pad}}}\n"));
                }
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    Open,
    Close,
    Quoted(String),
    Word(String),
}

/// Split text into tokens tagged with their 1-based line number
fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, KeyValuesError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line = 1;

    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            c if c.is_whitespace() => {}
            '{' => tokens.push((line, Token::Open)),
            '}' => tokens.push((line, Token::Close)),
            '/' if chars.peek() == Some(&'/') => {
                // line comment
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '"' => {
                let start = line;
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            value.push(c);
                        }
                        None => return Err(KeyValuesError::UnterminatedString { line: start }),
                    }
                }
                tokens.push((start, Token::Quoted(value)));
            }
            c => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || matches!(next, '{' | '}' | '"') {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                tokens.push((line, Token::Word(word)));
            }
        }
    }
    Ok(tokens)
}
