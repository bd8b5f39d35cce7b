use std::fs::{self, read_to_string};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser as ClapParser};

pub use compile::*;
pub use print::{write_artifact, write_source};

mod compile;
mod print;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = "Runs the Cygnet C compiler")]
struct CLI {
    /// Path to C source file
    path: PathBuf,

    /// Specifies a point in the compilation process to stop at, only one option can be given
    #[command(flatten)]
    stage_options: StageOptions,

    /// Print a line to stderr for each driver step
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct StageOptions {
    /// Stop after lexer
    #[arg(long)]
    lex: bool,

    /// Stop after parser
    #[arg(long)]
    parse: bool,

    /// Stop after TACKY generation
    #[arg(long)]
    tacky: bool,

    /// Stop after assembly generation
    #[arg(long)]
    codegen: bool,

    /// Emit assembly file, but do not assemble or link it
    #[arg(short = 'S')]
    s: bool,

    /// Compile and assemble into object file, but do not link
    #[arg(short = 'c')]
    c: bool,
}

/// Which stage the driver should stop at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StopStage {
    Lexer,
    Parser,
    Tacky,
    CodeGen,
    Assembly,
    Object,
}

impl StopStage {
    fn from_args(options: &StageOptions) -> Option<StopStage> {
        if options.lex {
            Some(StopStage::Lexer)
        } else if options.parse {
            Some(StopStage::Parser)
        } else if options.tacky {
            Some(StopStage::Tacky)
        } else if options.codegen {
            Some(StopStage::CodeGen)
        } else if options.s {
            Some(StopStage::Assembly)
        } else if options.c {
            Some(StopStage::Object)
        } else {
            None
        }
    }

    /// Core stage that produces what this stop point needs
    fn core_stage(self) -> Stage {
        match self {
            StopStage::Lexer => Stage::Lex,
            StopStage::Parser => Stage::Parse,
            StopStage::Tacky => Stage::Tacky,
            StopStage::CodeGen | StopStage::Assembly | StopStage::Object => Stage::CodeGen,
        }
    }

    /// Stops that print the stage output instead of writing files
    fn prints(self) -> bool {
        matches!(
            self,
            StopStage::Lexer | StopStage::Parser | StopStage::Tacky | StopStage::CodeGen
        )
    }
}

pub fn main() -> Result<()> {
    let args = CLI::parse();

    let stop_stage = StopStage::from_args(&args.stage_options);

    run_driver(&args.path, stop_stage, args.verbose)
}

/// Paths of the files the driver reads and writes for one source file
struct OutputPaths {
    preprocessed: PathBuf,
    assembly: PathBuf,
    object: PathBuf,
    executable: PathBuf,
}

impl OutputPaths {
    fn new(source: &Path) -> Result<Self> {
        if source.file_stem().is_none() {
            bail!("Not a source file: {}", source.display());
        }

        Ok(Self {
            preprocessed: source.with_extension("i"),
            assembly: source.with_extension("s"),
            object: source.with_extension("o"),
            executable: source.with_extension(""),
        })
    }
}

fn run_driver(path: &Path, stop_stage: Option<StopStage>, verbose: bool) -> Result<()> {
    let log = |msg: String| {
        if verbose {
            eprintln!("[cygnet] {}", msg);
        }
    };

    let paths = OutputPaths::new(path)?;

    log(format!(
        "preprocessing {} -> {}",
        path.display(),
        paths.preprocessed.display()
    ));
    run_tool(
        Command::new("gcc")
            .arg("-E")
            .arg("-P")
            .arg(path)
            .arg("-o")
            .arg(&paths.preprocessed),
        "preprocessor",
    )?;

    let core_stage = stop_stage.map_or(Stage::CodeGen, StopStage::core_stage);
    log(format!("compiling through {:?}", core_stage));

    // The preprocessed file goes away whether or not compilation succeeds
    let compiled = compile_file(&paths.preprocessed, core_stage);
    let (source, artifact) = with_cleanup(compiled, &paths.preprocessed)?;

    if stop_stage == Some(StopStage::Lexer) {
        let mut stdout = io::stdout().lock();
        write_source(&mut stdout, &source)
            .and_then(|()| writeln!(stdout))
            .context("Failed to print source listing")?;
    }

    if stop_stage.is_some_and(StopStage::prints) {
        return write_artifact(&mut io::stdout().lock(), &artifact)
            .context("Failed to print compiler output");
    }

    let Artifact::Assembly(assm) = artifact else {
        bail!("Compilation stopped before assembly generation");
    };

    log(format!("writing {}", paths.assembly.display()));
    emission::output(&paths.assembly, &assm).with_context(|| {
        format!(
            "Failed to write assembly file {}",
            paths.assembly.display()
        )
    })?;

    if stop_stage == Some(StopStage::Assembly) {
        return Ok(());
    }

    let assembled = if stop_stage == Some(StopStage::Object) {
        log(format!("assembling {}", paths.object.display()));
        run_tool(
            Command::new("gcc")
                .arg("-c")
                .arg(&paths.assembly)
                .arg("-o")
                .arg(&paths.object),
            "assembler",
        )
    } else {
        log(format!("linking {}", paths.executable.display()));
        run_tool(
            Command::new("gcc")
                .arg(&paths.assembly)
                .arg("-o")
                .arg(&paths.executable),
            "assembler and linker",
        )
    };

    with_cleanup(assembled, &paths.assembly)
}

/// Reads a preprocessed file and runs the core over it, handing back the source too
fn compile_file(path: &Path, stage: Stage) -> Result<(String, Artifact)> {
    let source = read_to_string(path)
        .with_context(|| format!("Unable to read preprocessed file {}", path.display()))?;

    let artifact = compile(source.lines(), stage)?;

    Ok((source, artifact))
}

/// Deletes an intermediate file after the step that used it.
///
/// The step's own error wins over a failed delete, and a file that was never
/// written is not an error.
fn with_cleanup<T>(result: Result<T>, intermediate: &Path) -> Result<T> {
    let removed = match fs::remove_file(intermediate) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        removed => removed,
    };

    let value = result?;
    removed.with_context(|| format!("Failed to delete {}", intermediate.display()))?;

    Ok(value)
}

/// Runs an external tool, failing with its stderr if it exits unsuccessfully
fn run_tool(command: &mut Command, name: &str) -> Result<()> {
    let output = command
        .output()
        .with_context(|| format!("Failed to execute {}", name))?;

    if !output.status.success() {
        bail!(
            "The {} failed ({}):\n{}",
            name,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim_end()
        );
    }

    Ok(())
}
