use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-env-changed=GYMLOG_VERSION");

    println!("cargo:rustc-env=GIT_VERSION={}", resolve_version());
}

/// Release builds pass `GYMLOG_VERSION`; local builds describe the checkout.
/// Outside a git checkout the crate version is used.
fn resolve_version() -> String {
    std::env::var("GYMLOG_VERSION")
        .ok()
        .filter(|version| !version.trim().is_empty())
        .or_else(git_describe)
        .unwrap_or_else(|| format!("v{}", env!("CARGO_PKG_VERSION")))
}

fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|output| output.status.success())?;
    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!version.is_empty()).then_some(version)
}
