use arch::Word;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relative {
    /// `?`, the word after this one
    Next,
    /// `@`, this word
    Here,
}

/// One operand word of a statement, with its optional `+N`/`-N` modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(Word),
    Symbol(String, Word),
    Relative(Relative, Word),
    Indirect(String, Word),
    DataMarker,
}

/// Why a word could not become a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadModifier;

impl Token {
    pub fn zero() -> Token {
        Token::Literal(0)
    }

    pub fn next() -> Token {
        Token::Relative(Relative::Next, 0)
    }

    pub fn symbol(name: &str) -> Token {
        Token::Symbol(name.to_string(), 0)
    }

    pub fn parse(word: &str) -> Result<Token, BadModifier> {
        if word == "." {
            return Ok(Token::DataMarker);
        }
        let (body, modifier) = split_modifier(word)?;
        if let Ok(value) = body.parse::<Word>() {
            return value
                .checked_add(modifier)
                .map(Token::Literal)
                .ok_or(BadModifier);
        }
        Ok(match body {
            "?" => Token::Relative(Relative::Next, modifier),
            "@" => Token::Relative(Relative::Here, modifier),
            _ => match body.strip_prefix('*') {
                Some(name) => Token::Indirect(name.to_string(), modifier),
                None => Token::Symbol(body.to_string(), modifier),
            },
        })
    }
}

// The modifier starts at the first `+` past index 0, else the first `-` past index 0.
fn split_modifier(word: &str) -> Result<(&str, Word), BadModifier> {
    let at = match word.find('+') {
        Some(i) if i > 0 => Some(i),
        _ => match word.find('-') {
            Some(i) if i > 0 => Some(i),
            _ => None,
        },
    };
    match at {
        Some(i) => {
            let (body, modifier) = word.split_at(i);
            let modifier = modifier.parse::<Word>().map_err(|_| BadModifier)?;
            Ok((body, modifier))
        }
        None => Ok((word, 0)),
    }
}

fn fmt_modifier(f: &mut fmt::Formatter<'_>, modifier: Word) -> fmt::Result {
    match modifier {
        0 => Ok(()),
        m if m > 0 => write!(f, "+{}", m),
        m => write!(f, "{}", m),
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(v) => write!(f, "{}", v),
            Token::Symbol(name, m) => {
                write!(f, "{}", name)?;
                fmt_modifier(f, *m)
            }
            Token::Relative(rel, m) => {
                let sym = match rel {
                    Relative::Next => "?",
                    Relative::Here => "@",
                };
                write!(f, "{}", sym)?;
                fmt_modifier(f, *m)
            }
            Token::Indirect(name, m) => {
                write!(f, "*{}", name)?;
                fmt_modifier(f, *m)
            }
            Token::DataMarker => write!(f, "."),
        }
    }
}
