pub mod dump;

use crate::model::{Cycle, State};

/// Side effect run around every cycle of the main loop.
pub trait Hook {
    fn init(&mut self, state: State) -> State;
    fn exec(&mut self, time: u64, cycle: &Cycle, state: State) -> State;
}
