use crate::error::Error;
use crate::token::Token;

/// A statement after expansion: either raw data words or one instruction triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `marked` is false only for statement 0 written without a leading `.`.
    Data { words: Vec<Token>, marked: bool },
    Instr([Token; 3]),
}

impl Line {
    /// Number of image words the line occupies.
    pub fn size(&self) -> usize {
        match self {
            Line::Data { words, .. } => words.len(),
            Line::Instr(_) => 3,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        match self {
            Line::Data { words, .. } => words.as_slice(),
            Line::Instr(triple) => triple.as_slice(),
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Line::Data { .. })
    }
}

fn join(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize(statements: Vec<Vec<Token>>) -> Result<Vec<Line>, Error> {
    let mut lines = Vec::with_capacity(statements.len());
    for (statement, mut tokens) in statements.into_iter().enumerate() {
        let marked = tokens.first() == Some(&Token::DataMarker);
        if marked {
            tokens.remove(0);
        }
        if tokens.contains(&Token::DataMarker) {
            return Err(Error::MisplacedDataMarker {
                statement,
                words: join(&tokens),
            });
        }

        // Statement 0 holds the entry pointer and is never an instruction.
        if marked || statement == 0 {
            lines.push(Line::Data {
                words: tokens,
                marked,
            });
            continue;
        }

        let triple = match tokens.as_slice() {
            [] => return Err(Error::EmptyStatement(statement)),
            [a] => [a.clone(), a.clone(), Token::next()],
            [a, b] => [a.clone(), b.clone(), Token::next()],
            [a, b, c] => [a.clone(), b.clone(), c.clone()],
            _ => {
                return Err(Error::TooManyOperands {
                    count: tokens.len(),
                    statement,
                    words: join(&tokens),
                })
            }
        };
        lines.push(Line::Instr(triple));
    }
    Ok(lines)
}
