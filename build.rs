use std::env;
use std::process::Command;

/// Stamps `BANKCLI_VERSION` from the nearest git tag, falling back to the
/// package version outside a git checkout.
fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");

    let fallback = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0-dev".to_string());
    let version = git_version().unwrap_or(fallback);

    println!("cargo:rustc-env=BANKCLI_VERSION={}", version);
}

fn git_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty=+dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    // "v1.2.0" -> "1.2.0"
    let version = described.strip_prefix('v').unwrap_or(described);
    (!version.is_empty()).then(|| version.to_string())
}
