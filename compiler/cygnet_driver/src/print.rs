use std::io::{self, Write};

use itertools::Itertools;
use lexer::Token;

use crate::Artifact;

/// Writes a human readable dump of a stage's output
pub fn write_artifact<W: Write>(writer: &mut W, artifact: &Artifact) -> io::Result<()> {
    match artifact {
        Artifact::Tokens(tokens) => write_tokens(writer, tokens),
        Artifact::Ast(program) => write!(writer, "{}", program),
        Artifact::Tacky(tacky) => mir::write_tacky(writer, tacky),
        Artifact::Assembly(assm) => writeln!(writer, "{:#?}", assm),
    }
}

/// Writes the source with line numbers, in the same gutter as the token dump
pub fn write_source<W: Write>(writer: &mut W, source: &str) -> io::Result<()> {
    for (number, line) in source.lines().enumerate() {
        write_row(writer, number + 1, line)?;
    }

    Ok(())
}

// One row per source line
fn write_tokens<W: Write>(writer: &mut W, tokens: &[Token]) -> io::Result<()> {
    let lines = tokens.iter().chunk_by(|token| token.line);

    for (line, mut group) in &lines {
        write_row(writer, line, &group.join(" "))?;
    }

    Ok(())
}

fn write_row<W: Write>(writer: &mut W, line: usize, text: &str) -> io::Result<()> {
    writeln!(writer, "{:>4} | {}", line, text)
}
