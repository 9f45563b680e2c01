use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

use memopt::assembler::{assemble, disassemble, disassemble_inline};
use memopt::ir::{Program, Value};
use memopt::parser::{parse_assembly_file, parse_number};
use memopt::pruning::PruningKind;
use memopt::search::{
    EnumerativeSearch, ParallelConfig, SearchAlgorithm, SearchBounds, SearchConfig, SearchRequest,
    SearchResult, run_parallel_search,
};
use memopt::semantics::{AbstractMachine, SolverConfig};
use memopt::validation::{
    EquivalenceResult, RandomStateConfig, check_equivalence_on_inputs,
    check_equivalence_on_states, generate_edge_case_states, generate_random_states,
};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "memopt")]
#[command(about = "memopt - shortest-program search for a tiny memory machine")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Enable verbose (debug-level) logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// A comma-separated list of cell values, e.g. `3,3,0`
#[derive(Clone, Debug)]
struct StateList(Vec<Value>);

fn parse_state_list(s: &str) -> Result<StateList, String> {
    s.split(',')
        .map(parse_number)
        .collect::<Result<Vec<_>, _>>()
        .map(StateList)
}

/// Leading-cell values to compare on: `LO..HI` (exclusive) or `LO..=HI`
#[derive(Clone, Copy, Debug)]
struct InputRange {
    low: Value,
    high: Value,
}

fn parse_input_range(s: &str) -> Result<InputRange, String> {
    let (low, rest) = s
        .split_once("..")
        .ok_or_else(|| format!("expected LO..HI or LO..=HI, got '{}'", s))?;
    let low = parse_number(low)?;
    let high = match rest.strip_prefix('=') {
        Some(high) => parse_number(high)?,
        None => parse_number(rest)?
            .checked_sub(1)
            .ok_or_else(|| format!("empty range '{}'", s))?,
    };
    if high < low {
        return Err(format!("empty range '{}'", s));
    }
    Ok(InputRange { low, high })
}

/// Where a program comes from: a file, or inline text via `-e`
#[derive(ClapArgs, Debug)]
struct SourceArgs {
    /// Assembly file (one instruction per line)
    #[arg(required_unless_present = "expr", conflicts_with = "expr")]
    file: Option<PathBuf>,
    /// Inline assembly; `;` separates instructions
    #[arg(short = 'e', long = "expr")]
    expr: Option<String>,
}

impl SourceArgs {
    fn load(&self) -> Result<Program, Box<dyn std::error::Error>> {
        match (&self.expr, &self.file) {
            (Some(expr), _) => Ok(assemble(expr)?),
            (None, Some(path)) => Ok(parse_assembly_file(path)?),
            (None, None) => Err("no program given".into()),
        }
    }
}

/// Options shared by the search subcommands
#[derive(ClapArgs, Debug)]
struct SearchArgs {
    /// Longest program to consider
    #[arg(long)]
    max_length: usize,
    /// Largest LOAD literal
    #[arg(long)]
    max_val: Value,
    /// Start state (defaults to all zeros)
    #[arg(long, value_parser = parse_state_list)]
    start: Option<StateList>,
    /// Compare only the first N cells
    #[arg(long)]
    output_size: Option<usize>,
    /// Pruning strategy: none, basic, heuristic, smt
    #[arg(long, default_value = "basic")]
    pruning: PruningKind,
    /// Timeout in seconds for the whole search
    #[arg(long)]
    timeout: Option<u64>,
    /// Timeout in seconds for each SMT check
    #[arg(long, default_value = "30")]
    solver_timeout: u64,
    /// Number of worker threads (parallel search when greater than 1)
    #[arg(long, short = 'j')]
    cores: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a program and print the final state
    Run {
        #[command(flatten)]
        source: SourceArgs,
        /// Number of memory cells
        #[arg(long)]
        mem: usize,
        /// Start state (defaults to all zeros)
        #[arg(long, value_parser = parse_state_list)]
        start: Option<StateList>,
    },
    /// Find the shortest program with the same effect as the given one
    Opt {
        #[command(flatten)]
        source: SourceArgs,
        /// Number of memory cells
        #[arg(long)]
        max_mem: usize,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Find the shortest program that reaches a target state
    Target {
        /// Target state, e.g. 3,3,0
        #[arg(long, value_parser = parse_state_list)]
        state: StateList,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Check two programs for equivalence on concrete start states
    Equiv {
        /// First program (inline assembly, or a path with --files)
        left: String,
        /// Second program (inline assembly, or a path with --files)
        right: String,
        /// Read both programs from files
        #[arg(long)]
        files: bool,
        /// Number of memory cells
        #[arg(long)]
        mem: usize,
        /// Compare only the first N cells
        #[arg(long)]
        output_size: Option<usize>,
        /// Values placed in cell 0 (other cells zero)
        #[arg(long, value_parser = parse_input_range, default_value = "0..10")]
        inputs: InputRange,
        /// Compare on N random start states (plus edge cases) instead
        #[arg(long)]
        random: Option<usize>,
        /// Largest cell value for random start states
        #[arg(long, default_value = "255")]
        max_val: Value,
        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },
}

// --- Subcommands ---

fn run_program(
    source: &SourceArgs,
    mem: usize,
    start: Option<&StateList>,
) -> Result<(), Box<dyn std::error::Error>> {
    let program = source.load()?;
    let machine = AbstractMachine::new(mem);
    machine.check_program(&program)?;

    let state = machine.execute(&program, start.map(|s| s.0.as_slice()));
    println!("{}", state);
    Ok(())
}

impl SearchArgs {
    fn search_config(&self) -> SearchConfig {
        SearchConfig::default()
            .with_pruning(self.pruning)
            .with_solver(SolverConfig::with_timeout(Duration::from_secs(
                self.solver_timeout,
            )))
            .with_timeout_option(self.timeout.map(Duration::from_secs))
    }

    fn request(&self, target: Vec<Value>) -> SearchRequest {
        let bounds = SearchBounds::new(self.max_length, target.len(), self.max_val);
        SearchRequest::new(bounds, target)
            .with_start_option(self.start.as_ref().map(|s| s.0.clone()))
            .with_output_size_option(self.output_size)
    }
}

fn search_and_report(
    search: &SearchArgs,
    target: Vec<Value>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = search.request(target);
    let config = search.search_config();

    println!(
        "Target: [{}]",
        request
            .target_key()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Pruning: {}", config.pruning);

    let result: SearchResult = match search.cores {
        Some(cores) if cores > 1 => {
            let parallel = ParallelConfig::default().with_workers(cores);
            println!("Workers: {}", parallel.workers_for(&request.bounds));
            let outcome = run_parallel_search(&request, &config, &parallel)?;
            if verbose {
                for (worker_id, stats) in &outcome.worker_statistics {
                    println!(
                        "  worker {}: {} generated, {} executed",
                        worker_id, stats.candidates_generated, stats.candidates_executed
                    );
                }
            }
            outcome.best_result
        }
        _ => {
            let mut engine = EnumerativeSearch::with_config(config);
            engine.search(&request)?
        }
    };

    println!();
    print!("{}", result);
    println!();
    print!("{}", result.statistics.format_summary());
    println!("Status: {}", result.status);
    Ok(())
}

fn optimize_program(
    source: &SourceArgs,
    max_mem: usize,
    search: &SearchArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let program = source.load()?;
    let machine = AbstractMachine::new(max_mem);
    machine.check_program(&program)?;

    println!("Original program ({} instructions):", program.len());
    for line in disassemble(&program).lines() {
        println!("  {}", line);
    }

    let start = search.start.as_ref().map(|s| s.0.as_slice());
    let target = machine.execute(&program, start).into_values();
    search_and_report(search, target, verbose)
}

#[allow(clippy::too_many_arguments)]
fn check_equivalence(
    left: &str,
    right: &str,
    files: bool,
    mem: usize,
    output_size: Option<usize>,
    inputs: InputRange,
    random: Option<usize>,
    max_val: Value,
    seed: Option<u64>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let load = |arg: &str| -> Result<Program, Box<dyn std::error::Error>> {
        if files {
            Ok(parse_assembly_file(Path::new(arg))?)
        } else {
            Ok(assemble(arg)?)
        }
    };
    let left = load(left)?;
    let right = load(right)?;

    let machine = AbstractMachine::new(mem);
    machine.check_program(&left)?;
    machine.check_program(&right)?;

    println!("Left:  {}", disassemble_inline(&left));
    println!("Right: {}", disassemble_inline(&right));

    let result = match random {
        Some(count) => {
            let config = RandomStateConfig {
                max_mem: mem,
                max_val,
                ..Default::default()
            }
            .with_count(count)
            .with_seed_option(seed);
            let mut states = generate_edge_case_states(mem, max_val);
            states.extend(generate_random_states(&config));
            println!("Checking {} start states", states.len());
            check_equivalence_on_states(&left, &right, &states, mem, output_size)
        }
        None => {
            println!(
                "Checking cell 0 in {}..={}",
                inputs.low, inputs.high
            );
            check_equivalence_on_inputs(&left, &right, inputs.low..=inputs.high, mem, output_size)
        }
    };

    match result {
        EquivalenceResult::Equivalent => {
            println!("Equivalent");
            Ok(true)
        }
        EquivalenceResult::NotEquivalent { start, left, right } => {
            println!("Not equivalent");
            println!("  start: {:?}", start);
            println!("  left:  {:?}", left);
            println!("  right: {:?}", right);
            Ok(false)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let outcome = match args.command {
        Commands::Run { source, mem, start } => run_program(&source, mem, start.as_ref()),
        Commands::Opt {
            source,
            max_mem,
            search,
        } => optimize_program(&source, max_mem, &search, args.verbose),
        Commands::Target { state, search } => search_and_report(&search, state.0, args.verbose),
        Commands::Equiv {
            left,
            right,
            files,
            mem,
            output_size,
            inputs,
            random,
            max_val,
            seed,
        } => match check_equivalence(
            &left,
            &right,
            files,
            mem,
            output_size,
            inputs,
            random,
            max_val,
            seed,
        ) {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(1),
            Err(e) => Err(e),
        },
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
