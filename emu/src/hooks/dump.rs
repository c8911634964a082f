use arch::Word;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

use super::Hook;
use crate::error::Error;
use crate::model::{Cycle, State};

/// Prints interpreter state after selected instructions.
#[derive(Debug)]
pub struct Dump {
    file: Option<String>,
    all: bool,
    list: List,
}

/// Instruction address to what to print after it runs.
#[derive(Debug, Default, Serialize, Deserialize)]
struct List(HashMap<usize, Config>);

#[derive(Debug, Serialize, Deserialize)]
struct Config {
    #[serde(default)]
    stack: bool,
    #[serde(default)]
    words: Vec<usize>,
}

impl Dump {
    pub fn arg(file: Option<String>, all: bool) -> Result<Self, Error> {
        let list = match &file {
            Some(fname) => {
                let reader = File::open(fname)
                    .map(BufReader::new)
                    .map_err(|e| Error::ConfigOpen(fname.clone(), e))?;
                serde_yaml::from_reader(reader).map_err(|e| Error::ConfigParse(fname.clone(), e))?
            }
            None => List::default(),
        };
        Ok(Self { file, all, list })
    }

    fn get(&self, addr: usize) -> Option<&Config> {
        self.list.0.get(&addr)
    }
}

impl Hook for Dump {
    fn init(&mut self, state: State) -> State {
        if self.all {
            println!(" * Dump all");
        }
        if let Some(fname) = &self.file {
            println!(" * Dump[{}] {:?}", self.list.0.len(), fname);
        }
        state
    }

    fn exec(&mut self, time: u64, cycle: &Cycle, state: State) -> State {
        if let Some(cfg) = self.get(cycle.addr) {
            self.print_reg(time, cycle, &state);
            if cfg.stack {
                self.print_stack(&state);
            }
            self.print_words(&state, &cfg.words);
        } else if self.all {
            self.print_reg(time, cycle, &state);
        }
        state
    }
}

impl Dump {
    fn print_reg(&self, time: u64, cycle: &Cycle, state: &State) {
        println!(" +--------------+---------------------------------------+");
        println!(
            " | {:>12} | [{:>6}] {:<29} |",
            time,
            cycle.addr,
            format!("{} {} {} {}", cycle.op, cycle.triple.a, cycle.triple.b, cycle.triple.c)
        );
        println!(
            " |   ip: {:>6} | data: {:>4} | ret: {:>4} | halt: {:<5} |",
            state.ip(),
            state.data_stack().len(),
            state.return_stack().len(),
            state.is_halted()
        );
        println!(" +--------------+---------------------------------------+");
    }

    fn print_stack(&self, state: &State) {
        for (depth, value) in state.data_stack().iter().rev().enumerate() {
            println!(" | d{:<3} : {:>20}                          |", depth, value);
        }
        for (depth, addr) in state.return_stack().iter().rev().enumerate() {
            println!(" | r{:<3} : {:>20}                          |", depth, addr);
        }
        println!(" +------------------------------------------------------+");
    }

    fn print_words(&self, state: &State, addrs: &[usize]) {
        for addr in addrs {
            let value = state
                .get(*addr)
                .map(|w: Word| w.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(" | {:>6} : {:>20}                          |", addr, value);
        }
        println!(" +------------------------------------------------------+");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let list: List = serde_yaml::from_str("3:\n  stack: true\n  words: [1, 2]\n9:\n  words: [5]\n").unwrap();
        assert!(list.0[&3].stack);
        assert_eq!(list.0[&3].words, vec![1, 2]);
        assert!(!list.0[&9].stack);
    }

    #[test]
    fn test_missing_config() {
        let err = Dump::arg(Some("no/such/dump.yaml".into()), false).unwrap_err();
        assert!(matches!(err, Error::ConfigOpen(..)));
    }
}
