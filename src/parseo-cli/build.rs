use std::process::Command;

/// Trimmed stdout of a successful command
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn main() {
    let build_env = [
        ("GIT_HASH", command_output("git", &["rev-parse", "--short", "HEAD"])),
        ("BUILD_DATE", command_output("date", &["+%Y-%m-%d"])),
        (
            "RUSTC_VERSION",
            command_output("rustc", &["--version"])
                .and_then(|v| v.split_whitespace().nth(1).map(str::to_string)),
        ),
    ];

    for (key, value) in build_env {
        if let Some(value) = value {
            println!("cargo:rustc-env={key}={value}");
        }
    }

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
}
