use sqasm::util::print_dump;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.sq")]
    input: String,

    /// Output file
    #[clap(short, long, default_value = "main.sq.bin")]
    output: String,

    /// Dump assembly code
    #[clap(short, long)]
    dump: bool,

    /// Write the image as whitespace separated integers
    #[clap(long)]
    text: bool,

    /// Print debug logs
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    println!("SUBLEQ+ Assembler by kanade-k-1228");

    println!("1. Read File and Assemble");
    println!("  < {}", args.input);
    let asm = match sqasm::assemble_file(&args.input) {
        Ok(asm) => asm,
        Err(e) => {
            e.print_diag(&args.input);
            std::process::exit(1);
        }
    };

    println!("2. Write Image");
    println!("  > {}", args.output);
    if let Err(e) = asm.image.write_file(&args.output, args.text) {
        sqasm::Error::from(e).print_diag(&args.output);
        std::process::exit(1);
    }
    log::info!(
        "{} words, {} labels, entry {}",
        asm.image.len(),
        asm.labels.len(),
        asm.image.entry().unwrap_or_default()
    );

    if args.dump {
        print_dump(&asm);
    }
}
