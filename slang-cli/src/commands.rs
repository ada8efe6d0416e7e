//! CLI command implementations.

use std::fs;

use slang_common::Module;
use slang_engine::{Program, Snapshot, Step};
use tracing::{debug, info};

/// Expansion requested with `--degree`.
#[derive(Debug, Clone, Copy)]
enum Degree {
    Rounds(u32),
    /// As many rounds as the program needs to become basic.
    Max,
}

/// Flags and positional arguments of one command.
#[derive(Debug, Default)]
struct Options {
    positional: Vec<String>,
    degree: Option<Degree>,
    trace: bool,
    max_steps: Option<u64>,
    output: Option<String>,
}

/// Verify a program file.
pub fn verify(args: &[String]) -> Result<(), i32> {
    let opts = parse_options(args, &[])?;
    let [input] = opts.positional.as_slice() else {
        eprintln!("error: verify requires exactly one input file");
        eprintln!("Usage: slang verify <file.sl>");
        return Err(1);
    };

    let module = load(input)?;
    println!(
        "OK: {input} ({} instructions, {} functions)",
        module.program.instructions.len(),
        module.functions.len()
    );
    Ok(())
}

/// Verify and execute a program file.
///
/// `--max-steps` bounds steps of the main program. A call that is not
/// expanded runs inside one step and is not bounded.
pub fn run(args: &[String]) -> Result<(), i32> {
    let opts = parse_options(args, &["--degree", "--trace", "--max-steps"])?;
    let Some((input, rest)) = opts.positional.split_first() else {
        eprintln!("error: run requires an input file");
        eprintln!("Usage: slang run <file.sl> [inputs...] [--degree N] [--trace] [--max-steps N]");
        return Err(1);
    };
    let inputs = rest
        .iter()
        .map(|s| {
            s.parse::<u64>().map_err(|_| {
                eprintln!("error: invalid input value '{s}'");
                1
            })
        })
        .collect::<Result<Vec<u64>, i32>>()?;

    let module = load(input)?;
    let mut program = build(&module, opts.degree)?;

    program.start(&inputs);
    let mut steps = 0u64;
    let mut limit_hit = false;
    loop {
        match program.step() {
            Ok(Step::Executed { .. }) => steps += 1,
            Ok(Step::Halted) => break,
            Err(e) => {
                eprintln!("runtime error: {e}");
                return Err(3);
            }
        }
        if opts.max_steps.is_some_and(|limit| steps >= limit) && !finished(&program) {
            limit_hit = true;
            break;
        }
    }
    debug!(file = %input, steps, "run finished");

    let main = program.main();
    if opts.trace {
        for snapshot in main.history() {
            println!("{}", format_snapshot(snapshot));
        }
    }
    if limit_hit {
        eprintln!("error: step limit of {steps} reached before termination");
        return Err(3);
    }
    println!("y = {}", main.result());
    println!("cycles = {}", main.cycles());
    Ok(())
}

/// Print the instruction table of the main program.
pub fn list(args: &[String]) -> Result<(), i32> {
    let opts = parse_options(args, &["--degree"])?;
    let [input] = opts.positional.as_slice() else {
        eprintln!("error: list requires exactly one input file");
        eprintln!("Usage: slang list <file.sl> [--degree N]");
        return Err(1);
    };

    let module = load(input)?;
    let program = build(&module, opts.degree)?;
    let main = program.main();

    println!(
        "{:>4}  {}  {:<6} {:<36} {:>3}  {:<4} {:>5}  DIGEST",
        "#", "C", "LABEL", "INSTRUCTION", "CYC", "GEN", "DEPTH"
    );
    for row in main.rows() {
        println!(
            "{:>4}  {}  {:<6} {:<36} {:>3}  {:<4} {:>5}  {}",
            row.position,
            row.class,
            row.label.to_string(),
            row.text,
            row.cycles,
            row.generation.to_string(),
            row.depth,
            row.signature.digest()
        );
    }
    println!();
    println!("instructions = {}", main.len());
    println!("cost = {}", program.cost());
    println!("degree = {}", program.degree());
    println!("nesting = {}", main.nesting());
    Ok(())
}

/// Expand the main program and emit it as source text.
pub fn expand(args: &[String]) -> Result<(), i32> {
    let opts = parse_options(args, &["--degree", "-o"])?;
    let [input] = opts.positional.as_slice() else {
        eprintln!("error: expand requires exactly one input file");
        eprintln!("Usage: slang expand <file.sl> --degree N [-o out.sl]");
        return Err(1);
    };
    let Some(degree) = opts.degree else {
        eprintln!("error: expand requires --degree");
        return Err(1);
    };

    let module = load(input)?;
    let before = module.program.instructions.len();
    let program = build(&module, Some(degree))?;
    let expanded = Module::new(program.main().to_definition(), module.functions.clone());
    let text = slang_assembler::disassemble(&expanded);

    match &opts.output {
        Some(output) => {
            fs::write(output, &text).map_err(|e| {
                eprintln!("error: cannot write '{output}': {e}");
                1
            })?;
            eprintln!(
                "expanded {before} instructions to {} -> {output}",
                program.main().len()
            );
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Print the derivation chain of one instruction, nearest first.
pub fn lineage(args: &[String]) -> Result<(), i32> {
    let opts = parse_options(args, &["--degree"])?;
    let [input, position] = opts.positional.as_slice() else {
        eprintln!("error: lineage requires an input file and a position");
        eprintln!("Usage: slang lineage <file.sl> <position> [--degree N]");
        return Err(1);
    };
    let position: usize = position.parse().map_err(|_| {
        eprintln!("error: invalid position '{position}'");
        1
    })?;

    let module = load(input)?;
    let program = build(&module, opts.degree)?;
    let main = program.main();
    let Some(chain) = position.checked_sub(1).and_then(|p| main.lineage(p)) else {
        eprintln!("error: position {position} is outside 1..={}", main.len());
        return Err(1);
    };

    for node in chain {
        println!(
            "{:>5}  {:<36} {}",
            node.depth,
            node.instruction.to_string(),
            node.signature.digest()
        );
    }
    Ok(())
}

/// Read, assemble and verify a program file.
fn load(path: &str) -> Result<Module, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    let module = slang_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    if let Err(errors) = slang_verifier::verify(&module) {
        for e in &errors {
            eprintln!("error: {e}");
        }
        return Err(2);
    }
    info!(file = path, functions = module.functions.len(), "verified");
    Ok(module)
}

/// Load the module's main program and expand it as requested.
fn build(module: &Module, degree: Option<Degree>) -> Result<Program, i32> {
    let mut program = Program::load(module).map_err(|e| {
        eprintln!("error: {e}");
        3
    })?;
    let rounds = match degree {
        None => return Ok(program),
        Some(Degree::Rounds(n)) => n,
        Some(Degree::Max) => program.degree(),
    };
    program.expand(rounds).map_err(|e| {
        eprintln!("expansion error: {e}");
        3
    })?;
    Ok(program)
}

/// True when the next step would halt without executing anything.
fn finished(program: &Program) -> bool {
    let main = program.main();
    main.context().is_halted() || main.context().pc() >= main.len()
}

fn format_snapshot(snapshot: &Snapshot) -> String {
    let at = match snapshot.position {
        Some(p) => format!("#{}", p + 1),
        None => "start".to_string(),
    };
    let values: Vec<String> = snapshot
        .values
        .iter()
        .map(|(var, value)| format!("{var}={value}"))
        .collect();
    format!(
        "step {:>4}  {:<6} cycles={:<6} {}",
        snapshot.step,
        at,
        snapshot.cycles,
        values.join(" ")
    )
}

/// Split `args` into positionals and the flags listed in `allowed`.
fn parse_options(args: &[String], allowed: &[&str]) -> Result<Options, i32> {
    let mut opts = Options::default();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if !arg.starts_with('-') || arg.parse::<i64>().is_ok() {
            opts.positional.push(args[i].clone());
            i += 1;
            continue;
        }
        if !allowed.contains(&arg) {
            eprintln!("error: unknown option '{arg}'");
            return Err(1);
        }
        if arg == "--trace" {
            opts.trace = true;
            i += 1;
            continue;
        }

        let Some(value) = args.get(i + 1) else {
            eprintln!("error: {arg} requires a value");
            return Err(1);
        };
        match arg {
            "--degree" => opts.degree = Some(parse_degree(value)?),
            "--max-steps" => {
                opts.max_steps = Some(value.parse().map_err(|_| {
                    eprintln!("error: invalid step count '{value}'");
                    1
                })?)
            }
            _ => opts.output = Some(value.clone()),
        }
        i += 2;
    }
    Ok(opts)
}

fn parse_degree(value: &str) -> Result<Degree, i32> {
    if value.eq_ignore_ascii_case("max") {
        return Ok(Degree::Max);
    }
    value.parse().map(Degree::Rounds).map_err(|_| {
        eprintln!("error: invalid degree '{value}' (expected a number or 'max')");
        1
    })
}
