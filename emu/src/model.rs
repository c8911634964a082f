use arch::{Addr, Image, Op, Triple, Word};
use std::path::Path;

use crate::console::Console;
use crate::error::{Error, Fault, Trap};
use crate::hooks::Hook;

/// Interpreter state. Word 0 of `mem` mirrors the instruction pointer after every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct State {
    mem: Vec<Word>,
    ip: usize,
    data_stack: Vec<Word>,
    return_stack: Vec<usize>,
    halted: bool,
}

/// What one call to [`State::exec`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    pub addr: usize,
    pub triple: Triple,
    pub op: Op,
    pub halted: bool,
}

/// How a program file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Little-endian 8-byte words
    Binary,
    /// Whitespace separated decimal words
    Text,
    /// Assembly source
    Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Clean stop at the given instruction.
    Halted(usize),
    TimeLimit,
}

// Valid pointers address a whole triple and never word 0.
fn pointer(ip: Word, len: usize) -> Option<usize> {
    let ip = usize::try_from(ip).ok()?;
    (ip >= 1 && ip.saturating_add(3) <= len).then_some(ip)
}

fn max_pointer(len: usize) -> Word {
    len as Word - 3
}

impl State {
    pub fn new(image: Image) -> Result<State, Fault> {
        let mem = image.into_words();
        let entry = mem.first().copied().unwrap_or_default();
        let ip = pointer(entry, mem.len()).ok_or(Fault::EntryOutOfRange {
            entry,
            max: max_pointer(mem.len()),
        })?;
        Ok(State {
            mem,
            ip,
            data_stack: vec![],
            return_stack: vec![],
            halted: false,
        })
    }

    /// Load a program file. `mem_size` pads memory with zero words.
    pub fn load_file(
        path: impl AsRef<Path>,
        format: Format,
        mem_size: Option<usize>,
    ) -> Result<State, Error> {
        let image = match format {
            Format::Binary => Image::read_file(&path, false)?,
            Format::Text => Image::read_file(&path, true)?,
            Format::Source => sqasm::assemble_file(&path)?.image,
        };
        let image = match mem_size {
            Some(len) => image.padded(len),
            None => image,
        };
        log::debug!("loaded {} words, entry {:?}", image.len(), image.entry());
        Ok(State::new(image)?)
    }

    pub fn mem(&self) -> &[Word] {
        &self.mem
    }

    pub fn get(&self, addr: usize) -> Option<Word> {
        self.mem.get(addr).copied()
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn data_stack(&self) -> &[Word] {
        &self.data_stack
    }

    pub fn return_stack(&self) -> &[usize] {
        &self.return_stack
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

// Memory access
impl State {
    fn load(&self, addr: usize) -> Result<Word, Fault> {
        self.mem.get(addr).copied().ok_or(Fault::OutOfBounds {
            addr: addr as Word,
            len: self.mem.len(),
        })
    }

    /// Resolve a raw operand to the address it names, following at most one indirection.
    fn deref(&self, raw: Word) -> Result<usize, Fault> {
        let addr = match Addr::decode(raw) {
            Addr::Direct(addr) => addr,
            Addr::Indirect(cell) => {
                let value = self.load(cell)?;
                usize::try_from(value).map_err(|_| Fault::DoubleIndirection { cell, value })?
            }
        };
        self.load(addr).map(|_| addr)
    }

    fn trap(&mut self, addr: usize, triple: Option<Triple>, fault: Fault) -> Trap {
        self.halted = true;
        Trap {
            addr,
            triple,
            fault,
        }
    }
}

impl State {
    /// Run one instruction.
    pub fn exec(&mut self, console: &mut dyn Console) -> Result<Cycle, Trap> {
        let addr = self.ip;
        let len = self.mem.len();
        let Some(triple) = self.mem.get(addr..).and_then(Triple::from_slice) else {
            let fault = Fault::PointerOutOfRange {
                ip: addr as Word,
                max: max_pointer(len),
            };
            return Err(self.trap(addr, None, fault));
        };
        let op = triple.op();
        log::trace!("[{:>6}] {}", addr, triple.cformat());

        let next = match self.step(addr, &triple, console) {
            Ok(next) => next,
            Err(fault) => return Err(self.trap(addr, Some(triple), fault)),
        };
        let Some(next) = next else {
            self.halted = true;
            self.mem[0] = addr as Word;
            return Ok(Cycle {
                addr,
                triple,
                op,
                halted: true,
            });
        };

        self.ip = next;
        self.mem[0] = next as Word;
        if pointer(next as Word, len).is_none() {
            let fault = Fault::PointerOutOfRange {
                ip: next as Word,
                max: max_pointer(len),
            };
            return Err(self.trap(addr, Some(triple), fault));
        }
        Ok(Cycle {
            addr,
            triple,
            op,
            halted: false,
        })
    }

    /// Run until halt, a fault, or `tmax` cycles.
    pub fn run(&mut self, console: &mut dyn Console, tmax: Option<u64>) -> Result<Exit, Trap> {
        self.run_with(console, tmax, &mut [])
    }

    /// Like [`State::run`], folding every hook over the state after each cycle.
    pub fn run_with(
        &mut self,
        console: &mut dyn Console,
        tmax: Option<u64>,
        hooks: &mut [Box<dyn Hook>],
    ) -> Result<Exit, Trap> {
        for time in 0..tmax.unwrap_or(u64::MAX) {
            let cycle = self.exec(console)?;
            let state = std::mem::take(self);
            *self = hooks
                .iter_mut()
                .fold(state, |state, hook| hook.exec(time, &cycle, state));
            if cycle.halted {
                return Ok(Exit::Halted(cycle.addr));
            }
        }
        Ok(Exit::TimeLimit)
    }

    // Next instruction pointer, or `None` to halt.
    fn step(
        &mut self,
        addr: usize,
        t: &Triple,
        console: &mut dyn Console,
    ) -> Result<Option<usize>, Fault> {
        let a = self.deref(t.a)?;
        let b = self.deref(t.b)?;
        let c = self.deref(t.c)?;
        let (a_val, b_val, c_val) = (self.mem[a], self.mem[b], self.mem[c]);
        let next = addr + 3;

        let next = match t.op() {
            Op::Halt => return Ok(None),
            Op::Push => {
                self.data_stack.push(a_val);
                next
            }
            Op::Pop => {
                self.mem[b] = self.data_stack.pop().ok_or(Fault::EmptyDataStack)?;
                next
            }
            Op::Ret if c_val <= 0 => self.return_stack.pop().ok_or(Fault::EmptyReturnStack)?,
            Op::Ret => next,
            Op::Move => {
                self.mem[b] = a_val;
                next
            }
            Op::Call if a_val <= 0 => {
                self.return_stack.push(next);
                c
            }
            Op::Call => next,
            Op::Io => {
                self.io(t.c, b, b_val, console)?;
                next
            }
            Op::Subleq => {
                let result = b_val.wrapping_sub(a_val);
                self.mem[b] = result;
                match (result <= 0, c > 0) {
                    (false, _) => next,
                    (true, true) => c,
                    (true, false) => return Ok(None),
                }
            }
        };
        Ok(Some(next))
    }

    // `mode` is the raw C operand: 1 prints a character, other positives a number,
    // -1 reads with echo, other non-positives read without.
    fn io(
        &mut self,
        mode: Word,
        b: usize,
        value: Word,
        console: &mut dyn Console,
    ) -> Result<(), Fault> {
        match mode {
            1 => {
                let c = u32::try_from(value)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(Fault::InvalidCharacter(value))?;
                console.write_char(c)?;
            }
            m if m > 0 => console.write_number(value)?,
            m => self.mem[b] = console.read_char(m == -1)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Tape;
    use std::cell::Cell;
    use std::rc::Rc;

    fn load(src: &str) -> State {
        State::new(sqasm::assemble(src).unwrap().image).unwrap()
    }

    fn label(src: &str, name: &str) -> usize {
        sqasm::assemble(src).unwrap().labels.get_val(name).unwrap()
    }

    fn run(src: &str, input: &str) -> (State, Result<Exit, Trap>, String) {
        let mut state = load(src);
        let mut tape = Tape::new(input, Vec::new());
        let exit = state.run(&mut tape, Some(10_000));
        (state, exit, String::from_utf8(tape.into_output()).unwrap())
    }

    #[test]
    fn test_entry_out_of_range() {
        for words in [vec![0, 0, 0, 0], vec![2, 0, 0, 0], vec![-1, 0, 0, 0], vec![]] {
            assert!(matches!(
                State::new(Image::new(words)),
                Err(Fault::EntryOutOfRange { .. })
            ));
        }
        assert!(State::new(Image::new(vec![1, 0, 0, 0])).is_ok());
    }

    #[test]
    fn test_halt_first_cycle() {
        let src = "?; /halt";
        let before = sqasm::assemble(src).unwrap().image.into_words();
        let (state, exit, out) = run(src, "");
        assert_eq!(exit.unwrap(), Exit::Halted(1));
        assert_eq!(state.mem(), before.as_slice());
        assert!(state.is_halted());
        assert!(state.data_stack().is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn test_subleq_then_halt() {
        let src = "start; a: . 5; b: . 0; start: /subleq a b ?; /halt";
        let mut state = load(src);
        let mut tape = Tape::new("", Vec::new());

        let cycle = state.exec(&mut tape).unwrap();
        assert_eq!(cycle.op, Op::Subleq);
        assert_eq!(state.get(label(src, "b")), Some(-5));
        assert_eq!(state.ip(), 6);
        assert_eq!(state.get(0), Some(6));

        let cycle = state.exec(&mut tape).unwrap();
        assert_eq!(cycle.op, Op::Halt);
        assert!(cycle.halted);
    }

    #[test]
    fn test_print_data_char() {
        let (_, exit, out) = run("go; ch: . 'A'; go: /print ch; /halt", "");
        assert!(matches!(exit, Ok(Exit::Halted(_))));
        assert_eq!(out, "A");
    }

    #[test]
    fn test_print_literal_char() {
        // `'A'` addresses word 65, which is padded to hold 65.
        let src = format!(
            "go; go: /print 'A'; /halt; . {}; . 65",
            vec!["0"; 58].join(" ")
        );
        let (state, exit, out) = run(&src, "");
        assert_eq!(state.get(65), Some(65));
        assert_eq!(exit.unwrap(), Exit::Halted(4));
        assert_eq!(out, "A");
    }

    #[test]
    fn test_word_zero_tracks_pointer() {
        let src = "go; n: . 3; one: . 1; go: one n done; /jmp go; done: /halt";
        let mut state = load(src);
        let mut tape = Tape::new("", Vec::new());
        let mut cycles = 0;
        loop {
            let cycle = state.exec(&mut tape).unwrap();
            assert_eq!(state.get(0), Some(state.ip() as Word));
            cycles += 1;
            if cycle.halted {
                break;
            }
        }
        assert_eq!(cycles, 6);
        assert_eq!(state.get(label(src, "n")), Some(0));
        assert_eq!(state.ip(), label(src, "done"));
    }

    #[test]
    fn test_indirect_move() {
        let src = "go; p: . v; v: . 7; go: /move *p dst; /halt; dst: . 0";
        let (state, exit, _) = run(src, "");
        assert!(exit.is_ok());
        assert_eq!(state.get(label(src, "dst")), Some(7));
    }

    #[test]
    fn test_double_indirection() {
        let src = "go; p: . -1; go: /move *p dst; /halt; dst: . 0";
        let (state, exit, _) = run(src, "");
        assert!(matches!(
            exit,
            Err(Trap {
                addr: 2,
                fault: Fault::DoubleIndirection { cell: 1, value: -1 },
                ..
            })
        ));
        assert!(state.is_halted());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut state = State::new(Image::new(vec![1, 100, 0, 0])).unwrap();
        let mut tape = Tape::new("", Vec::new());
        let trap = state.exec(&mut tape).unwrap_err();
        assert!(matches!(trap.fault, Fault::OutOfBounds { addr: 100, len: 4 }));
        assert_eq!(trap.triple, Some(Triple::new(100, 0, 0)));
    }

    #[test]
    fn test_push_pop_round_trip() {
        let src = "go; x: . 9; go: /push x; /pop x; /halt";
        let mut state = load(src);
        let before = state.clone();
        let mut tape = Tape::new("", Vec::new());
        state.exec(&mut tape).unwrap();
        assert_eq!(state.data_stack(), &[9]);
        state.exec(&mut tape).unwrap();
        assert!(state.data_stack().is_empty());
        assert_eq!(&state.mem()[1..], &before.mem()[1..]);
    }

    #[test]
    fn test_pop_empty_stack() {
        let src = "go; go: /pop x; /halt; x: . 0";
        let x = label(src, "x") as Word;
        let (state, exit, _) = run(src, "");
        let trap = exit.unwrap_err();
        assert!(matches!(trap.fault, Fault::EmptyDataStack));
        assert_eq!(trap.addr, 1);
        assert_eq!(trap.triple, Some(Triple::new(0, x, 0)));
        assert!(state.is_halted());
    }

    #[test]
    fn test_return_empty_stack() {
        let (_, exit, _) = run("go; go: /ret; /halt", "");
        assert!(matches!(exit.unwrap_err().fault, Fault::EmptyReturnStack));
    }

    #[test]
    fn test_call_and_return() {
        let (state, exit, _) = run("go; go: /jsr f; /halt; f: /ret", "");
        assert_eq!(exit.unwrap(), Exit::Halted(4));
        assert!(state.return_stack().is_empty());
    }

    #[test]
    fn test_call_not_taken() {
        let (_, exit, _) = run("go; one: . 1; go: /call? one f; /halt; f: /halt", "");
        assert_eq!(exit.unwrap(), Exit::Halted(5));
    }

    #[test]
    fn test_return_not_taken() {
        let (_, exit, _) = run("go; one: . 1; go: /ret? one; /halt", "");
        assert_eq!(exit.unwrap(), Exit::Halted(5));
    }

    #[test]
    fn test_print_number() {
        let (_, _, out) = run("go; n: . -42; go: /output n 2; /halt", "");
        assert_eq!(out, "-42");
    }

    #[test]
    fn test_input() {
        let src = "go; c: . 0; d: . 0; go: /input c; /in d -2; /halt";
        let (state, exit, out) = run(src, "xy");
        assert!(exit.is_ok());
        assert_eq!(state.get(label(src, "c")), Some('x' as Word));
        assert_eq!(state.get(label(src, "d")), Some('y' as Word));
        assert_eq!(out, "x");
    }

    #[test]
    fn test_input_exhausted() {
        let (_, exit, _) = run("go; c: . 0; go: /input c; /halt", "");
        assert!(matches!(exit.unwrap_err().fault, Fault::Io(_)));
    }

    #[test]
    fn test_invalid_character() {
        let (_, exit, _) = run("go; c: . -5; go: /print c; /halt", "");
        assert!(matches!(exit.unwrap_err().fault, Fault::InvalidCharacter(-5)));
    }

    #[test]
    fn test_subleq_branch_to_zero_halts() {
        let (state, exit, _) = run("go; five: . 5; z: . 0; go: five five *z", "");
        assert_eq!(exit.unwrap(), Exit::Halted(3));
        assert_eq!(state.get(0), Some(3));
        assert_eq!(state.get(1), Some(0));
    }

    #[test]
    fn test_pointer_out_of_range() {
        let mut state = State::new(Image::new(vec![1, 3, 3, 3])).unwrap();
        let mut tape = Tape::new("", Vec::new());
        let trap = state.exec(&mut tape).unwrap_err();
        assert!(matches!(
            trap.fault,
            Fault::PointerOutOfRange { ip: 3, max: 1 }
        ));
        assert_eq!(state.get(0), Some(3));
        assert!(state.is_halted());
    }

    #[test]
    fn test_time_limit() {
        let mut state = load("go; go: /jmp go");
        let mut tape = Tape::new("", Vec::new());
        assert_eq!(state.run(&mut tape, Some(10)).unwrap(), Exit::TimeLimit);
        assert!(!state.is_halted());
    }

    struct Counter(Rc<Cell<u64>>);

    impl Hook for Counter {
        fn init(&mut self, state: State) -> State {
            state
        }

        fn exec(&mut self, time: u64, _cycle: &Cycle, state: State) -> State {
            assert_eq!(time, self.0.get());
            self.0.set(time + 1);
            state
        }
    }

    #[test]
    fn test_hooks_see_every_cycle() {
        let src = "go; n: . 3; one: . 1; go: one n done; /jmp go; done: /halt";
        let mut state = load(src);
        let mut tape = Tape::new("", Vec::new());
        let count = Rc::new(Cell::new(0));
        let mut hooks: Vec<Box<dyn Hook>> = vec![Box::new(Counter(count.clone()))];
        let exit = state.run_with(&mut tape, None, &mut hooks).unwrap();
        assert_eq!(exit, Exit::Halted(label(src, "done")));
        assert_eq!(count.get(), 6);
        assert_eq!(state.get(label(src, "n")), Some(0));
        assert!(state.is_halted());
    }

    #[test]
    fn test_load_text_image() {
        let path = std::env::temp_dir().join("sqemu_load_text_test.txt");
        std::fs::write(&path, "1 0 0 0 0\n").unwrap();
        let state = State::load_file(&path, Format::Text, None).unwrap();
        assert_eq!(state.mem(), &[1, 0, 0, 0, 0]);
        assert!(matches!(
            State::load_file(&path, Format::Binary, None),
            Err(Error::Image(_))
        ));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_source_with_padding() {
        let path = std::env::temp_dir().join("sqemu_load_source_test.sq");
        std::fs::write(&path, "go; go: /halt").unwrap();
        let state = State::load_file(&path, Format::Source, Some(64)).unwrap();
        assert_eq!(state.mem().len(), 64);
        assert_eq!(state.ip(), 1);
        std::fs::remove_file(&path).unwrap();
    }
}
