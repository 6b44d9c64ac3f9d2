/// Build script for soc-synth
/// Captures build metadata printed by `soc-synth version`

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=Cargo.lock");

    if let Ok(version) = std::env::var("CARGO_PKG_VERSION") {
        println!("cargo:rustc-env=SOC_SYNTH_VERSION={version}");
    }

    // Generated tables are reproducible per seed; the git hash pins the code.
    if let Ok(output) = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        if output.status.success() {
            if let Ok(hash) = String::from_utf8(output.stdout) {
                println!("cargo:rustc-env=SOC_SYNTH_GIT_HASH={}", hash.trim());
            }
        }
    }
}
