use std::process::{Command, Output};

fn memopt(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_memopt"))
        .args(args)
        .output()
        .expect("Failed to execute memopt")
}

fn stdout_of(output: &Output) -> String {
    if !output.status.success() {
        panic!(
            "Command failed with status: {:?}\nstderr: {}\nstdout: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
    }
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_run_prints_final_state() {
    let output = memopt(&[
        "run",
        "-e",
        "LOAD 3; SWAP 0, 1; INC 2",
        "--mem",
        "4",
        "--start",
        "1,2,3,4",
    ]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("[2, 3, 4, 4]"), "unexpected output: {}", stdout);
}

#[test]
fn test_opt_shortens_program() {
    let output = memopt(&[
        "opt",
        "-e",
        "LOAD 1; INC 0; INC 0",
        "--max-mem",
        "2",
        "--max-length",
        "3",
        "--max-val",
        "5",
    ]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Original program (3 instructions)"));
    assert!(stdout.contains("Shortest program (1 instructions)"));
    assert!(stdout.contains("LOAD 3"));
    assert!(stdout.contains("Status: complete"));
}

#[test]
fn test_opt_parallel() {
    let output = memopt(&[
        "opt",
        "-e",
        "LOAD 2; SWAP 0, 1",
        "--max-mem",
        "2",
        "--max-length",
        "2",
        "--max-val",
        "3",
        "--pruning",
        "none",
        "-j",
        "2",
    ]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Workers: 2"));
    assert!(stdout.contains("Shortest program (2 instructions)"));
}

#[test]
fn test_target_with_output_size() {
    let output = memopt(&[
        "target",
        "--state",
        "3,0,0",
        "--max-length",
        "3",
        "--max-val",
        "5",
        "--output-size",
        "1",
        "--pruning",
        "heuristic",
    ]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Target: [3]"));
    assert!(stdout.contains("Pruning: heuristic"));
    assert!(stdout.contains("Status: complete"));
}

#[test]
fn test_target_not_found() {
    let output = memopt(&[
        "target",
        "--state",
        "9,9",
        "--max-length",
        "1",
        "--max-val",
        "5",
    ]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("No program found within bounds"));
}

#[test]
fn test_equiv_on_leading_cell() {
    let output = memopt(&[
        "equiv",
        "LOAD 1; INC 0; INC 0",
        "LOAD 3",
        "--mem",
        "3",
        "--output-size",
        "1",
        "--inputs",
        "1..=9",
    ]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Equivalent"));
}

#[test]
fn test_equiv_reports_counterexample() {
    let output = memopt(&[
        "equiv", "INC 0", "LOAD 1", "--mem", "2", "--random", "5", "--seed", "3",
    ]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Not equivalent"));
}

#[test]
fn test_invalid_start_length_fails() {
    let output = memopt(&[
        "target",
        "--state",
        "1,2",
        "--start",
        "0,0,0",
        "--max-length",
        "2",
        "--max-val",
        "3",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("start state has 3 cells but max_mem is 2"));
}

#[test]
fn test_parse_error_is_reported() {
    let output = memopt(&["run", "-e", "MOV 1", "--mem", "2"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"));
}

#[test]
fn test_programs_read_from_files() {
    let dir = std::env::temp_dir();
    let long = dir.join(format!("memopt-cli-long-{}.asm", std::process::id()));
    let short = dir.join(format!("memopt-cli-short-{}.asm", std::process::id()));
    std::fs::write(&long, "LOAD 1\nINC 0 # twice\nINC 0\n").unwrap();
    std::fs::write(&short, "LOAD 3\n").unwrap();

    let run = memopt(&["run", long.to_str().unwrap(), "--mem", "2"]);
    let equiv = memopt(&[
        "equiv",
        long.to_str().unwrap(),
        short.to_str().unwrap(),
        "--files",
        "--mem",
        "2",
        "--output-size",
        "1",
    ]);
    std::fs::remove_file(&long).unwrap();
    std::fs::remove_file(&short).unwrap();

    assert!(stdout_of(&run).contains("[3, 0]"));
    assert!(stdout_of(&equiv).contains("Equivalent"));
}

#[test]
fn test_missing_file_is_reported() {
    let output = memopt(&["run", "memopt-no-such-program.asm", "--mem", "2"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read file"));
}
