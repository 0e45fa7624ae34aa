// zombie_ai/build.rs

fn main() {
    // Package metadata for the startup banner of the simulation binary.
    built::write_built_file().expect("Failed to acquire build-time information");
    println!("cargo:rerun-if-changed=build.rs");
}
