//! JSON dump of a loaded scene and its diagnostics.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::model::{Diagnostic, Scene};

#[derive(Debug, Serialize)]
struct SceneDump<'a> {
    scene: &'a Scene,
    diagnostics: &'a [Diagnostic],
}

pub fn to_json(scene: &Scene, diagnostics: &[Diagnostic]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&SceneDump { scene, diagnostics })
}

pub fn emit(scene: &Scene, diagnostics: &[Diagnostic], out_path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(out_path)?);
    serde_json::to_writer_pretty(&mut out, &SceneDump { scene, diagnostics })?;
    writeln!(out)?;
    out.flush()
}
