use crate::inst::Triple;
use crate::word::Word;

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use thiserror::Error;

const WORD_BYTES: usize = std::mem::size_of::<Word>();

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to open image: {0}")]
    Open(String, #[source] io::Error),

    #[error("Failed to write image: {0}")]
    Write(String, #[source] io::Error),

    #[error("Image length {0} is not a multiple of the 8-byte word size")]
    Truncated(usize),

    #[error("Cannot parse `{0}` as a word")]
    Parse(String),
}

/// Flat memory image. Word 0 is the entry pointer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Image(pub Vec<Word>);

impl Image {
    pub fn new(words: Vec<Word>) -> Self {
        Image(words)
    }

    pub fn words(&self) -> &[Word] {
        &self.0
    }

    pub fn into_words(self) -> Vec<Word> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entry(&self) -> Option<Word> {
        self.0.first().copied()
    }

    /// `true` if word 0 points at a whole triple inside the image.
    pub fn has_valid_entry(&self) -> bool {
        match self.entry() {
            Some(ip) => ip >= 1 && (ip as u64).saturating_add(3) <= self.0.len() as u64,
            None => false,
        }
    }

    pub fn triple(&self, addr: usize) -> Option<Triple> {
        self.0.get(addr..).and_then(Triple::from_slice)
    }

    /// Pad with zero words up to `len`. Never shrinks.
    pub fn padded(mut self, len: usize) -> Self {
        if self.0.len() < len {
            self.0.resize(len, 0);
        }
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.len() % WORD_BYTES != 0 {
            return Err(ImageError::Truncated(bytes.len()));
        }
        let words = bytes
            .chunks_exact(WORD_BYTES)
            .map(|chunk| {
                let mut buf = [0u8; WORD_BYTES];
                buf.copy_from_slice(chunk);
                Word::from_le_bytes(buf)
            })
            .collect();
        Ok(Image(words))
    }

    pub fn to_text(&self) -> String {
        let mut text = self
            .0
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        text.push('\n');
        text
    }

    pub fn from_text(text: &str) -> Result<Self, ImageError> {
        text.split_whitespace()
            .map(|w| w.parse::<Word>().map_err(|_| ImageError::Parse(w.to_string())))
            .collect::<Result<Vec<_>, _>>()
            .map(Image)
    }

    /// Reads a binary image, or a text image of decimal words when `text` is set.
    pub fn read_file(path: impl AsRef<Path>, text: bool) -> Result<Self, ImageError> {
        let name = path.as_ref().display().to_string();
        let mut buf = Vec::new();
        File::open(&path)
            .and_then(|mut file| file.read_to_end(&mut buf))
            .map_err(|e| ImageError::Open(name.clone(), e))?;
        match text {
            true => std::str::from_utf8(&buf)
                .map_err(|_| ImageError::Parse(name))
                .and_then(Image::from_text),
            false => Image::from_bytes(&buf),
        }
    }

    pub fn write_file(&self, path: impl AsRef<Path>, text: bool) -> Result<(), ImageError> {
        let name = path.as_ref().display().to_string();
        let bytes = match text {
            true => self.to_text().into_bytes(),
            false => self.to_bytes(),
        };
        File::create(&path)
            .and_then(|mut file| file.write_all(&bytes))
            .map_err(|e| ImageError::Write(name, e))
    }
}

impl From<Vec<Word>> for Image {
    fn from(words: Vec<Word>) -> Self {
        Image(words)
    }
}
