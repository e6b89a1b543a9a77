use island_config::{errors::IslandConfigError, get_config_from_file};
use std::path::Path;

const OVERRIDES: [&str; 3] = [
    "ISLAND_MOUNT_SELECTOR",
    "ISLAND_PROPS_ATTRIBUTE",
    "ISLAND_READY_FLAG",
];

fn main() -> Result<(), IslandConfigError> {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
    println!("cargo:rerun-if-changed={}", manifest.display());
    for var in OVERRIDES {
        println!("cargo:rerun-if-env-changed={var}");
    }

    let options = get_config_from_file(&manifest)?.island_options;
    println!(
        "cargo:rustc-env=ISLAND_BUILD_MOUNT_SELECTOR={}",
        options.mount_selector
    );
    println!(
        "cargo:rustc-env=ISLAND_BUILD_PROPS_ATTRIBUTE={}",
        options.props_attribute
    );
    println!(
        "cargo:rustc-env=ISLAND_BUILD_READY_FLAG={}",
        options.ready_flag
    );
    Ok(())
}
