use std::env;
use std::fs;
use std::path::Path;
use vergen::{BuildBuilder, CargoBuilder, Emitter, RustcBuilder};
use vergen_gitcl::{Emitter as GitEmitter, GitclBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Capture the build metadata that build_info exposes as constants.
    let build = BuildBuilder::default().build_timestamp(true).build()?;

    let cargo = CargoBuilder::default()
        .opt_level(true)
        .target_triple(true)
        .build()?;

    let rustc = RustcBuilder::default()
        .semver(true)
        .channel(true)
        .build()?;

    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&cargo)?
        .add_instructions(&rustc)?
        .emit()?;

    // Git metadata comes from the git CLI so a plain source checkout works.
    let gitcl = GitclBuilder::default()
        .sha(true)
        .branch(true)
        .commit_timestamp(true)
        .dirty(true)
        .build()?;
    GitEmitter::default().add_instructions(&gitcl)?.emit()?;

    copy_configs()?;

    Ok(())
}

/// Stages the config profiles next to the binary so `AppConfig::load` finds
/// them without the crate source tree. Release builds only get release.toml;
/// debug builds get every profile.
fn copy_configs() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = env::var("OUT_DIR")?;
    let profile = env::var("PROFILE")?;

    // OUT_DIR sits at target/<profile>/build/<crate>-<hash>/out; walk back
    // up to target/<profile>.
    let target_dir = Path::new(&out_dir)
        .parent()
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .ok_or("could not locate target directory from OUT_DIR")?;

    let config_out_dir = target_dir.join("config");
    fs::create_dir_all(&config_out_dir)?;

    let profiles: &[&str] = if profile == "release" {
        &["release"]
    } else {
        &["debug", "release"]
    };

    for name in profiles {
        let file = format!("{name}.toml");
        let source = Path::new("config").join(&file);
        if source.exists() {
            fs::copy(&source, config_out_dir.join(&file))?;
            println!("cargo:rerun-if-changed=config/{file}");
        }
    }

    Ok(())
}
