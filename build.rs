use std::process::Command;

/// Commit embedded in `/status`. CI can inject it through `GIT_COMMIT_SHA`
/// when the build runs without a `.git` directory.
fn commit_hash() -> Option<String> {
    if let Ok(sha) = std::env::var("GIT_COMMIT_SHA")
        && !sha.trim().is_empty()
    {
        return Some(sha.trim().to_owned());
    }

    let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_owned())
}

fn main() {
    let short = commit_hash()
        .map(|hash| hash.chars().take(7).collect::<String>())
        .unwrap_or_else(|| "unknown".to_owned());

    println!("cargo:rustc-env=GIT_COMMIT_SHORT={short}");
    println!("cargo:rerun-if-env-changed=GIT_COMMIT_SHA");
    if std::path::Path::new(".git/HEAD").exists() {
        println!("cargo:rerun-if-changed=.git/HEAD");
    }
}
