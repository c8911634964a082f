use arch::Triple;
use color_print::cformat;

use crate::assembler::Assembly;
use crate::normalize::Line;

const RULE: &str = "-------+---------------------------+---------------------------------------";

fn label_column(asm: &Assembly, base: usize, size: usize) -> String {
    (base..base + size.max(1))
        .flat_map(|offset| asm.labels.names_at(offset))
        .map(|name| cformat!("<g>{}:</>", name))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print every line with its image offset, resolved words and labels.
pub fn print_dump(asm: &Assembly) {
    let words = asm.image.words();
    println!("{}", RULE);
    for (base, line) in asm.layout() {
        let size = line.size();
        let raw = &words[base..base + size];
        let labels = label_column(asm, base, size);
        match line {
            Line::Instr(_) => {
                let inst = Triple::from_slice(raw).unwrap_or_default();
                println!(
                    "[{:04}] {:>8} {:>8} {:>8} | {} {}",
                    base,
                    inst.a,
                    inst.b,
                    inst.c,
                    inst.cformat(),
                    labels
                );
            }
            Line::Data { .. } => {
                let body = raw
                    .iter()
                    .map(|w| w.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                println!(
                    "[{:04}] {:>26} | {} {}",
                    base,
                    "",
                    cformat!("<y>.data {}</>", body),
                    labels
                );
            }
        }
    }
    println!("{}", RULE);
}
