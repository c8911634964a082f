use arch::{Addr, Word};

use crate::error::Error;
use crate::label::{Labels, Location};
use crate::normalize::Line;
use crate::token::{Relative, Token};

/// Image offset of the first word of every line.
pub fn bases(lines: &[Line]) -> Vec<usize> {
    lines
        .iter()
        .scan(0, |offset, line| {
            let base = *offset;
            *offset += line.size();
            Some(base)
        })
        .collect()
}

/// Phase 1: turn every structural label location into a flat word offset.
pub fn flatten_labels(lines: &[Line], labels: &mut Labels) {
    let bases = bases(lines);
    for (_, location) in labels.iter_mut() {
        let Location::Structural { statement, operand } = *location else {
            continue;
        };
        let base = bases.get(statement).copied().unwrap_or_default();
        let offset = match lines.get(statement) {
            // The marker itself emits no word; a label before it names the first data word.
            Some(Line::Data { marked: true, .. }) => base + operand.max(1) - 1,
            Some(Line::Data { marked: false, .. }) => base + operand,
            _ => base,
        };
        *location = Location::Resolved(offset);
    }
}

fn label(labels: &Labels, name: &str, token: &Token, position: usize) -> Result<Word, Error> {
    labels
        .get_val(name)
        .map(|offset| offset as Word)
        .ok_or_else(|| Error::UnmatchedLabel {
            token: token.to_string(),
            position,
        })
}

/// Phase 2: rewrite every token of the flattened stream into its final word.
pub fn resolve(lines: &[Line], labels: &Labels) -> Result<Vec<Word>, Error> {
    lines
        .iter()
        .flat_map(Line::tokens)
        .enumerate()
        .map(|(i, token)| {
            let here = i as Word;
            let overflow = || Error::ModifierOverflow {
                token: token.to_string(),
                position: i,
            };
            match token {
                Token::Literal(v) => Ok(*v),
                Token::Relative(Relative::Next, m) => here
                    .checked_add(1)
                    .and_then(|next| next.checked_add(*m))
                    .ok_or_else(overflow),
                Token::Relative(Relative::Here, m) => here.checked_add(*m).ok_or_else(overflow),
                Token::Symbol(name, m) => label(labels, name, token, i)?
                    .checked_add(*m)
                    .ok_or_else(overflow),
                Token::Indirect(name, m) => {
                    let target = label(labels, name, token, i)?
                        .checked_add(*m)
                        .ok_or_else(overflow)?;
                    match usize::try_from(target) {
                        Ok(cell) => Ok(Addr::Indirect(cell).encode()),
                        Err(_) => target.checked_neg().ok_or_else(overflow),
                    }
                }
                Token::DataMarker => Err(Error::UnmatchedLabel {
                    token: token.to_string(),
                    position: i,
                }),
            }
        })
        .collect()
}
