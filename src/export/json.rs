use anyhow::{Context, Result};
use std::io::Write;

use crate::report::Snapshot;

pub(super) fn write_json<W: Write>(snapshot: &Snapshot, mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, snapshot).context("Failed to serialize snapshot")?;
    writeln!(out)?;
    Ok(())
}
