//! Assembles and runs compiled programs, checking their exit status.
//!
//! Only meaningful on x86-64 Linux with a C toolchain on `PATH`; elsewhere the
//! tests return early.

use std::path::PathBuf;
use std::process::Command;

fn scratch_path(name: &str, ext: &str) -> PathBuf {
    let file = format!("stackcc-{}-{name}.{ext}", std::process::id());
    std::env::temp_dir().join(file)
}

fn toolchain_available() -> bool {
    cfg!(all(target_arch = "x86_64", target_os = "linux")) && which::which("cc").is_ok()
}

/// Exit status of the compiled program, or `None` when it cannot be run here.
fn run(name: &str, source: &str) -> Option<i32> {
    if !toolchain_available() {
        eprintln!("skipping {name}: no x86-64 Linux toolchain");
        return None;
    }

    let asm = stackcc::compile(source).unwrap();
    let asm_path = scratch_path(name, "s");
    let exe_path = scratch_path(name, "out");
    std::fs::write(&asm_path, asm).unwrap();

    let status = Command::new("cc")
        .arg("-o")
        .arg(&exe_path)
        .arg(&asm_path)
        .status()
        .unwrap();
    assert!(status.success(), "cc failed on {name}");

    let status = Command::new(&exe_path).status().unwrap();
    let _ = std::fs::remove_file(&asm_path);
    let _ = std::fs::remove_file(&exe_path);
    status.code()
}

fn check(name: &str, source: &str, expected: i32) {
    if let Some(code) = run(name, source) {
        assert_eq!(code, expected, "{name}: {source}");
    }
}

#[test_log::test]
fn expression_statement_is_exit_code() {
    check("expr", "int main() { 100; }", 100);
}

#[test]
fn additive_chain() {
    check("additive", "int main() { 80 - 95 + 50 - 20; }", 15);
}

#[test]
fn pointer_round_trip() {
    check(
        "pointer",
        "int main() { int a; int *b; a = 10; b = &a; return *b; }",
        10,
    );
}

#[test]
fn array_through_pointer() {
    check(
        "array",
        "int main() { int a[2]; *a = 2; *(a+1) = 10; int *p; p = a; *p = *p * 2; return *p + *(p+1); }",
        14,
    );
}

#[test]
fn if_else() {
    check("if_else", "int main() { if (1) return 2; else return 3; }", 2);
}

#[test]
fn for_loop() {
    check(
        "for_loop",
        "int main() { int a; int i; a = 10; i = 0; for (i = 0; i < 3; i = i + 1) a = a + 1; return a; }",
        13,
    );
}

#[test]
fn call_with_arguments() {
    check(
        "call",
        "int add(int x, int y) { return x + y; } int main() { return add(3, 4); }",
        7,
    );
}

#[test]
fn while_and_index() {
    check(
        "while_index",
        "int main() { int a[3]; int i; i = 0; while (i < 3) { a[i] = i * 2; i = i + 1; } return a[0] + a[1] + a[2]; }",
        6,
    );
}

#[test]
fn comparisons_and_division() {
    check(
        "compare",
        "int main() { return (7 / 2 == 3) + (2 >= 2) + (1 > 2) + (4 != 4); }",
        2,
    );
}

#[test]
fn recursion_keeps_stack_aligned() {
    check(
        "fib",
        "int fib(int n) { if (n <= 1) return n; return fib(n - 1) + fib(n - 2); } int main() { return fib(10); }",
        55,
    );
}
