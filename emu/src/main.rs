use clap::Parser;
use color_print::cprintln;

use sqemu::hooks::{dump::Dump, Hook};
use sqemu::{Console, Error, Exit, Format, State, Tape, Terminal};

#[derive(Parser, Debug)]
#[clap(
    name = "SUBLEQ+ Emulator",
    author = "kanade-k-1228",
    version = "v1.0.0",
    about = "Emulator for the SUBLEQ+ one-instruction computer"
)]
struct Args {
    #[arg(short = 't', long)]
    tmax: Option<u64>,

    /// Pad memory with zero words up to this length
    #[arg(short, long)]
    mem_size: Option<usize>,

    #[arg(short, long)]
    dump_cfg: Option<String>,

    #[arg(short = 'a', long)]
    dump_all: bool,

    /// Read console input from this file instead of stdin
    #[arg(short, long)]
    input: Option<String>,

    /// Assemble the input file before running it
    #[arg(short, long, conflicts_with = "text")]
    source: bool,

    /// Read the input file as whitespace separated integers
    #[arg(long)]
    text: bool,

    /// Print debug logs
    #[arg(short, long)]
    verbose: bool,

    #[arg(default_value = "main.sq.bin")]
    input_file: String,
}

fn console(input: Option<&str>) -> Result<Box<dyn Console>, Error> {
    match input {
        Some(fname) => {
            let text =
                std::fs::read_to_string(fname).map_err(|e| Error::TapeOpen(fname.to_string(), e))?;
            Ok(Box::new(Tape::new(&text, std::io::stdout())))
        }
        None => Ok(Box::new(Terminal)),
    }
}

fn fail(e: Error, file: &str) -> ! {
    e.print_diag(file);
    std::process::exit(1)
}

fn main() {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    println!("SUBLEQ+ Emulator by kanade-k-1228");

    println!("+-----------------------------------------------+");
    println!("| Emulate: {:<36} |", args.input_file);
    let format = match (args.source, args.text) {
        (true, _) => Format::Source,
        (false, true) => Format::Text,
        (false, false) => Format::Binary,
    };
    println!("|  - Format: {:<34} |", format!("{:?}", format));
    if let Some(fname) = &args.input {
        println!("|  - Input: {:<35} |", fname);
    }
    println!("+-----------------------------------------------+");

    // ------------------------------------------------------------------------
    // Initialize state machine model
    let mut state = State::load_file(&args.input_file, format, args.mem_size)
        .unwrap_or_else(|e| fail(e, &args.input_file));
    let mut console = console(args.input.as_deref()).unwrap_or_else(|e| fail(e, &args.input_file));

    // ------------------------------------------------------------------------
    // Initialize hooks
    println!("[INIT]");
    let dump = Dump::arg(args.dump_cfg, args.dump_all).unwrap_or_else(|e| fail(e, &args.input_file));
    let mut hooks: Vec<Box<dyn Hook>> = vec![Box::new(dump)];
    // Apply initializations
    state = hooks.iter_mut().fold(state, |state, hook| hook.init(state));

    // ------------------------------------------------------------------------
    // Main loop
    let exit = match state.run_with(console.as_mut(), args.tmax, &mut hooks) {
        Ok(exit) => exit,
        Err(trap) => {
            println!();
            trap.print_diag(&args.input_file);
            std::process::exit(1);
        }
    };

    // Exit
    println!();
    match exit {
        Exit::Halted(at) => cprintln!("<g,s>Program successfully halted</> @ {}", at),
        Exit::TimeLimit => cprintln!("<y,s>Time limit</> @ {}", state.ip()),
    }
    println!("=================================================");
}
