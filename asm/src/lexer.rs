/// Raw words of one statement, before labels and macros are handled.
pub type Statement = Vec<String>;

pub const ZERO: &str = "ZERO";

// Applied in order to the literal-expanded text.
const REWRITES: [(&str, &str); 6] = [
    ("\n", ";"),
    ("#", ";#"),
    (":", ": "),
    (".", ". "),
    ("!", "0 "),
    (",", " "),
];

pub fn lex(text: &str) -> Vec<Statement> {
    let text = REWRITES
        .iter()
        .fold(text.to_string(), |text, (from, to)| text.replace(from, to));

    let mut statements: Vec<Statement> = text
        .split(';')
        .filter(|stmt| !stmt.contains('#') && !stmt.trim().is_empty())
        .map(|stmt| stmt.split_whitespace().map(str::to_string).collect())
        .collect();

    let zero = format!("{}:", ZERO);
    if !statements.iter().flatten().any(|word| *word == zero) {
        statements.push(vec![zero, "0".to_string()]);
    }
    statements
}
