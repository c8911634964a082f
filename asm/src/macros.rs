use arch::Macro;

use crate::error::Error;
use crate::lexer::{Statement, ZERO};
use crate::token::Token;

fn tokens(words: &[String], statement: usize) -> Result<Vec<Token>, Error> {
    words
        .iter()
        .map(|word| {
            Token::parse(word).map_err(|_| Error::BadModifier {
                token: word.clone(),
                statement,
            })
        })
        .collect()
}

/// Rewrite `/mnemonic args..` statements into canonical operand lists.
pub fn expand(statements: Vec<Statement>) -> Result<Vec<Vec<Token>>, Error> {
    let mut out = Vec::with_capacity(statements.len());
    for (statement, words) in statements.into_iter().enumerate() {
        let line = match words.split_first() {
            Some((head, args)) if head.starts_with('/') => {
                let mnemonic = &head[1..];
                let kind = Macro::parse(mnemonic).map_err(|_| Error::UnknownMacro {
                    mnemonic: mnemonic.to_string(),
                    statement,
                    words: words.join(" "),
                })?;
                let args = tokens(args, statement)?;
                apply(kind, args).ok_or_else(|| Error::MacroArity {
                    mnemonic: mnemonic.to_string(),
                    statement,
                    words: words.join(" "),
                })?
            }
            _ => tokens(&words, statement)?,
        };
        out.push(line);
    }
    Ok(out)
}

/// Expansion of one macro, or `None` if the operand count does not fit.
pub fn apply(kind: Macro, args: Vec<Token>) -> Option<Vec<Token>> {
    use Macro::*;

    if !kind.arity().contains(&args.len()) {
        return None;
    }
    if kind == Subleq {
        return Some(args);
    }
    let zero = Token::zero;
    let line = match (kind, args.as_slice()) {
        (Move, [a, b]) => vec![a.clone(), b.clone(), zero()],
        (Call, [target]) => vec![Token::symbol(ZERO), zero(), target.clone()],
        (Call, [a, target]) => vec![a.clone(), zero(), target.clone()],
        (Jump, [target]) => vec![Token::symbol(ZERO), Token::symbol(ZERO), target.clone()],
        (Halt, []) => vec![zero(), zero(), zero()],
        (Push, [a]) => vec![a.clone(), zero(), zero()],
        (Pop, [b]) => vec![zero(), b.clone(), zero()],
        (Io | Print | Input, [b, c]) => vec![zero(), b.clone(), c.clone()],
        (Print, [b]) => vec![zero(), b.clone(), Token::Literal(1)],
        (Input, [b]) => vec![zero(), b.clone(), Token::Literal(-1)],
        (Ret, []) => vec![zero(), zero(), Token::symbol(ZERO)],
        (Ret, [c]) => vec![zero(), zero(), c.clone()],
        _ => return None,
    };
    Some(line)
}
