//! Build metadata captured by the build script
//!
//! The constants are baked in at compile time via `vergen` env vars; the
//! helpers format them for log output.

/// When the binary was compiled
pub const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

/// Cargo optimization level (0-3, s, z)
pub const CARGO_OPT_LEVEL: &str = env!("VERGEN_CARGO_OPT_LEVEL");

/// Compilation target triple
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

/// rustc version
pub const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");

/// rustc release channel (stable, beta, nightly)
pub const RUSTC_CHANNEL: &str = env!("VERGEN_RUSTC_CHANNEL");

/// Compact build identifier, `{target_triple}-opt{opt_level}`. Logged once
/// at startup so bug reports carry the build flavor.
pub fn version_string() -> String {
    format!("{}-opt{}", CARGO_TARGET_TRIPLE, CARGO_OPT_LEVEL)
}

/// Multi-line build summary: timestamp, target, opt level, and compiler.
pub fn detailed_info() -> String {
    format!(
        "Built: {}\nTarget: {}\nOptimization: {}\nRustc: {} ({})",
        BUILD_TIMESTAMP, CARGO_TARGET_TRIPLE, CARGO_OPT_LEVEL, RUSTC_SEMVER, RUSTC_CHANNEL
    )
}
