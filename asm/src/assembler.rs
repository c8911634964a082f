use arch::{Image, Word};
use std::path::Path;

use crate::error::Error;
use crate::label::{self, Labels};
use crate::normalize::{self, Line};
use crate::{lexer, literal, macros, resolve};

/// Result of assembling one source: the image plus what produced it.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub image: Image,
    pub labels: Labels,
    pub lines: Vec<Line>,
}

impl Assembly {
    /// Image offset and line, in image order.
    pub fn layout(&self) -> impl Iterator<Item = (usize, &Line)> {
        resolve::bases(&self.lines).into_iter().zip(self.lines.iter())
    }
}

pub fn assemble(source: &str) -> Result<Assembly, Error> {
    let text = literal::expand(source);
    let statements = lexer::lex(&text);
    log::debug!("lexed {} statements", statements.len());

    let (statements, mut labels) = label::collect(statements)?;
    let expanded = macros::expand(statements)?;
    let lines = normalize::normalize(expanded)?;

    resolve::flatten_labels(&lines, &mut labels);
    let words = resolve::resolve(&lines, &labels)?;
    log::debug!("resolved {} words, {} labels", words.len(), labels.len());

    let image = Image::new(words);
    check_entry(&image)?;
    Ok(Assembly {
        image,
        labels,
        lines,
    })
}

pub fn assemble_file(path: impl AsRef<Path>) -> Result<Assembly, Error> {
    let name = path.as_ref().display().to_string();
    let source = std::fs::read_to_string(&path).map_err(|e| Error::FileOpen(name, e))?;
    assemble(&source)
}

fn check_entry(image: &Image) -> Result<(), Error> {
    if image.has_valid_entry() {
        return Ok(());
    }
    Err(Error::InvalidEntry {
        entry: image.entry().unwrap_or_default(),
        max: image.len() as Word - 3,
    })
}
