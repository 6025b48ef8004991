use std::{
    env,
    process::Command,
    time::{SystemTime, UNIX_EPOCH},
};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    println!("cargo:rustc-env=PSSH_FORMULA_VERSION={}", version());
}

/// Version from the nearest git tag, or the package version when building
/// from a release tarball without `.git`.
fn version() -> String {
    let described = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let Some(described) = described else {
        return env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0-unknown".to_string());
    };

    // Tags are "v1.0.0"; the binary reports "1.0.0"
    let version = described.strip_prefix('v').unwrap_or(&described);
    if version.ends_with("-dirty") {
        format!("{}-{}", version, timestamp())
    } else {
        version.to_string()
    }
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
