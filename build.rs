use vergen_gix::{Emitter, GixBuilder};

// Only the commit hash is needed, for the --version string of dev builds
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let git = GixBuilder::default().sha(true).build()?;

    Emitter::default()
        .add_instructions(&git)?
        .emit()?;

    Ok(())
}
