use indexmap::IndexMap;

use crate::error::Error;
use crate::lexer::Statement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Statement index and the operand index the label precedes, before expansion.
    Structural { statement: usize, operand: usize },
    /// Flat word offset in the image.
    Resolved(usize),
}

#[derive(Debug, Clone, Default)]
pub struct Labels(IndexMap<String, Location>);

impl Labels {
    pub fn new() -> Self {
        Labels(IndexMap::new())
    }

    pub fn insert(&mut self, name: String, location: Location) -> Option<Location> {
        self.0.insert(name, location)
    }

    pub fn get(&self, name: &str) -> Option<&Location> {
        self.0.get(name)
    }

    /// Resolved offset of `name`.
    pub fn get_val(&self, name: &str) -> Option<usize> {
        match self.0.get(name) {
            Some(Location::Resolved(offset)) => Some(*offset),
            _ => None,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Location)> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names resolved to `offset`, in definition order.
    pub fn names_at(&self, offset: usize) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, loc)| **loc == Location::Resolved(offset))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

fn label_name(word: &str) -> Option<&str> {
    word.strip_suffix(':')
}

fn is_label_only(stmt: &Statement) -> bool {
    stmt.iter().all(|word| label_name(word).is_some())
}

/// Attach lone labels to the statement after them, then strip every `name:` into the table.
pub fn collect(statements: Vec<Statement>) -> Result<(Vec<Statement>, Labels), Error> {
    let mut merged: Vec<Statement> = Vec::with_capacity(statements.len());
    let mut pending: Statement = vec![];

    for stmt in statements {
        if is_label_only(&stmt) {
            pending.extend(stmt);
            continue;
        }
        let mut stmt = stmt;
        if !pending.is_empty() {
            pending.append(&mut stmt);
            stmt = std::mem::take(&mut pending);
        }
        merged.push(stmt);
    }
    if let Some(first) = pending.first() {
        let name = label_name(first).unwrap_or(first.as_str()).to_string();
        return Err(Error::DanglingLabel(name));
    }

    let mut labels = Labels::new();
    let mut stripped = Vec::with_capacity(merged.len());
    for (statement, stmt) in merged.into_iter().enumerate() {
        let mut operands = Vec::with_capacity(stmt.len());
        for word in stmt {
            match label_name(&word) {
                Some(name) => {
                    let location = Location::Structural {
                        statement,
                        operand: operands.len(),
                    };
                    if labels.insert(name.to_string(), location).is_some() {
                        return Err(Error::RedefinedLabel {
                            name: name.to_string(),
                            statement,
                        });
                    }
                }
                None => operands.push(word),
            }
        }
        stripped.push(operands);
    }

    log::debug!("collected {} labels", labels.len());
    Ok((stripped, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn loc(statement: usize, operand: usize) -> Location {
        Location::Structural { statement, operand }
    }

    #[test]
    fn test_inline_label() {
        let (stmts, labels) = collect(lex("start; loop: a b ?")).unwrap();
        assert_eq!(stmts[1], vec!["a", "b", "?"]);
        assert_eq!(labels.get("loop"), Some(&loc(1, 0)));
    }

    #[test]
    fn test_lone_label_merges_forward() {
        let (stmts, labels) = collect(lex("start\nloop:\n a b")).unwrap();
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[1], vec!["a", "b"]);
        assert_eq!(labels.get("loop"), Some(&loc(1, 0)));
    }

    #[test]
    fn test_consecutive_lone_labels() {
        let (stmts, labels) = collect(lex("start\nfirst:\nsecond:\n a b\n c")).unwrap();
        assert_eq!(stmts[1], vec!["a", "b"]);
        assert_eq!(stmts[2], vec!["c"]);
        assert_eq!(labels.get("first"), Some(&loc(1, 0)));
        assert_eq!(labels.get("second"), Some(&loc(1, 0)));
    }

    #[test]
    fn test_data_label_position() {
        let (stmts, labels) = collect(lex("start; . 5 mid: 6")).unwrap();
        assert_eq!(stmts[1], vec![".", "5", "6"]);
        assert_eq!(labels.get("mid"), Some(&loc(1, 2)));
    }

    #[test]
    fn test_zero_label_is_collected() {
        let (stmts, labels) = collect(lex("start")).unwrap();
        assert_eq!(stmts[1], vec!["0"]);
        assert_eq!(labels.get("ZERO"), Some(&loc(1, 0)));
    }

    #[test]
    fn test_redefined() {
        let err = collect(lex("start; a: x; a: y")).unwrap_err();
        assert!(matches!(err, Error::RedefinedLabel { ref name, statement: 2 } if name == "a"));
    }

    #[test]
    fn test_dangling() {
        let stmts = vec![vec!["x".to_string()], vec!["end:".to_string()]];
        assert!(matches!(collect(stmts), Err(Error::DanglingLabel(name)) if name == "end"));
    }

    #[test]
    fn test_names_at() {
        let mut labels = Labels::new();
        labels.insert("a".into(), Location::Resolved(4));
        labels.insert("b".into(), Location::Resolved(4));
        labels.insert("c".into(), Location::Resolved(5));
        assert_eq!(labels.names_at(4), vec!["a", "b"]);
        assert_eq!(labels.get_val("c"), Some(5));
    }
}
