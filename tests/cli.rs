use std::process::{Command, Output};

fn stackcc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stackcc"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn prints_assembly_on_stdout() {
    let out = stackcc(&["int main() { 100; }"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with(".intel_syntax noprefix\n  mov rax, 0\n  call main\n  ret\n"));
    assert!(stdout.contains(".globl main\nmain:\n"));
    assert!(out.stderr.is_empty());
}

#[test]
fn missing_argument_is_usage_error() {
    let out = stackcc(&[]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn extra_argument_is_usage_error() {
    let out = stackcc(&["int main() { 1; }", "int f() { 2; }"]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn compile_error_goes_to_stderr() {
    let out = stackcc(&["int main() { return x; }"]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("unknown identifier: x"), "{stderr}");
}

#[test]
fn lex_dump_stops_early() {
    let out = stackcc(&["--lex", "int main() { 1; }"]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("Identifier"), "{stderr}");
}

#[test]
fn parse_dump_stops_early() {
    let out = stackcc(&["--parse", "int main() { 1; }"]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("Constant"), "{stderr}");
}

#[test]
fn debug_logs_go_to_stderr() {
    let out = stackcc(&["-vv", "int main() { 1; }"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(!stdout.contains("parsed function"));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("parsed function"), "{stderr}");
}
