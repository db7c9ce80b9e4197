fn main() {
    set_version();
}

/// Export `SPEEDNOTIFY_VERSION`: the package version, followed by the short
/// git hash when the build runs inside a checkout.
fn set_version() {
    use std::process::Command;

    println!("cargo:rerun-if-changed=.git/HEAD");

    let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let args = &["rev-parse", "--short=10", "HEAD"];
    let rev = match Command::new("git").args(args).output() {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        _ => String::new(),
    };

    if rev.is_empty() {
        println!("cargo:rustc-env=SPEEDNOTIFY_VERSION={}", version);
    } else {
        println!("cargo:rustc-env=SPEEDNOTIFY_VERSION={} ({})", version, rev);
    }
}
