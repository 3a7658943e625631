use std::path::Path;

use anyhow::Result;

use csds_core::prelude::*;

use crate::io::export::{self, SystemViewer};
use crate::io::input;
use crate::output;

pub async fn run(input_path: &Path, out: &Path, open: bool) -> Result<()> {
    let snapshot = input::read_snapshot(input_path)?;
    let cfg = RenderConfig::default();
    validate_config(&cfg)?;

    let res = export::visualize(&snapshot, &cfg, out, open, &SystemViewer)?;
    if output::is_json() {
        output::print(&res)?;
    } else {
        output::line(&format!("Config graph has been saved to {}", res.file));
    }
    Ok(())
}
