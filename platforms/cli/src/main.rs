use atty::Stream;
use clap::{ArgAction, Parser, ValueEnum};
use memtur::{
    JsonTracer, LoadedMachine, MachineError, MachineLoader, NoTrace, ProgramManager, TextTracer,
    Tracer, TuringMachine, MAX_EXECUTION_STEPS,
};
use std::io::{self, Read};
use std::path::Path;
use std::process;
use tracing::Level;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  memtur-cli machine.yaml
  memtur-cli machine.yaml -i 0110 -i 1
  memtur-cli --builtin 'Even ones' --format json
  cat machine.yaml | memtur-cli")]
struct Cli {
    /// The machine description (YAML) to simulate.
    /// Can also pipe the description via stdin.
    program: Option<String>,

    /// Simulate one of the built-in machines
    #[clap(short, long, conflicts_with = "program")]
    builtin: Option<String>,

    /// List the built-in machines and exit
    #[clap(short, long)]
    list: bool,

    /// Input strings to simulate, replacing the machine's simulation_strings
    #[clap(short, long)]
    input: Vec<String>,

    /// Maximum number of steps executed for each input
    #[clap(short, long, default_value_t = MAX_EXECUTION_STEPS)]
    max_steps: usize,

    /// Trace output format
    #[clap(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Only print the verdict of each input
    #[clap(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if cli.list {
        print_builtins();
        return;
    }

    let loaded = match load_machine(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let inputs = if cli.input.is_empty() {
        loaded.inputs
    } else {
        cli.input.clone()
    };

    if inputs.is_empty() {
        println!(
            "Machine '{}' has no simulation_strings. Pass inputs with --input.",
            loaded.definition.name
        );
        return;
    }

    let mut machine = TuringMachine::new(loaded.definition);

    let written = if cli.quiet {
        simulate(&mut machine, &inputs, cli.max_steps, &mut NoTrace, true);
        Ok(())
    } else {
        match cli.format {
            Format::Text => {
                let mut tracer = TextTracer::new(io::stdout().lock());
                simulate(&mut machine, &inputs, cli.max_steps, &mut tracer, false);
                tracer.finish().map(drop)
            }
            Format::Json => {
                let mut tracer = JsonTracer::new(io::stdout().lock());
                simulate(&mut machine, &inputs, cli.max_steps, &mut tracer, false);
                tracer.finish().map(drop)
            }
        }
    };

    if let Err(e) = written {
        eprintln!("Error: failed to write trace: {}", e);
        process::exit(1);
    }
}

/// Runs every input through the machine, each from a fresh configuration.
fn simulate<T: Tracer>(
    machine: &mut TuringMachine,
    inputs: &[String],
    max_steps: usize,
    tracer: &mut T,
    print_verdicts: bool,
) {
    for input in inputs {
        let accepted = machine.run(input, max_steps, tracer);

        if print_verdicts {
            let verdict = if accepted { "accepted" } else { "rejected" };
            println!("{:?}: {}", input, verdict);
        }
    }
}

/// Loads the machine named on the command line.
///
/// It tries a built-in machine, then a file path, and finally stdin when it is piped.
fn load_machine(cli: &Cli) -> Result<LoadedMachine, MachineError> {
    if let Some(name) = &cli.builtin {
        return ProgramManager::get_by_name(name);
    }

    if let Some(path) = &cli.program {
        return MachineLoader::load_file(Path::new(path));
    }

    if !atty::is(Stream::Stdin) {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| MachineError::FileError(format!("Failed to read stdin: {}", e)))?;
        return MachineLoader::load_str(&content);
    }

    Err(MachineError::FileError(
        "No machine given. Pass a YAML file, use --builtin <NAME>, or pipe YAML via stdin"
            .to_string(),
    ))
}

fn print_builtins() {
    for index in 0..ProgramManager::count() {
        if let Ok(info) = ProgramManager::get_info(index) {
            println!(
                "{:<24} states: {:<3} transitions: {:<3} {} -> {}",
                info.name,
                info.state_count,
                info.transition_count,
                info.initial_state,
                info.final_state
            );
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
