//! Preview command - print the Applications an ApplicationSet generates

use appset_engine::Engine;
use std::io::Write;
use std::path::Path;

use crate::display::{self, OutputFormat};
use crate::error::Result;

pub fn run(
    engine: &Engine,
    manifest: &Path,
    name: Option<&str>,
    output: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let format: OutputFormat = output.parse()?;

    let apps = super::generate(engine, manifest)?;
    let selected = super::select(&apps, name);

    display::write_applications(out, format, &selected, name.is_some())
}
