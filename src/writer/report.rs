//! Plain-text rendering of diagnostics, load summaries and token listings.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use crate::model::{CommandKind, Diagnostic, Scene, SceneState};
use crate::processor::lexer::{self, Token};

/// `path:line[:column]: message`
pub fn format_diagnostic(path: &Path, diag: &Diagnostic) -> String {
    match diag.column {
        Some(column) => format!(
            "{}:{}:{}: {}",
            path.display(),
            diag.line,
            column,
            diag.message
        ),
        None => format!("{}:{}: {}", path.display(), diag.line, diag.message),
    }
}

pub fn render_summary(scene: &Scene) -> String {
    match scene.state {
        SceneState::Loaded => {
            let tilemaps = scene.tilemaps().count();
            let placements = scene.placements().count();
            let mut out = format!(
                "{}: loaded {} commands ({} tilemaps, {} tiles placed)",
                scene.source_path.display(),
                scene.commands.len(),
                tilemaps,
                placements
            );
            if let Some(dims) = scene.cell_dimensions() {
                let _ = write!(out, ", cell {}x{}px", dims.x, dims.y);
            }
            out
        }
        SceneState::Failed { error_count } => format!(
            "{}: failed with {} error(s)",
            scene.source_path.display(),
            error_count
        ),
    }
}

/// One line per command, in file order.
pub fn render_commands(scene: &Scene) -> String {
    let mut out = String::new();
    for cmd in &scene.commands {
        let _ = match &cmd.kind {
            CommandKind::CellDimensions(d) => {
                writeln!(out, "{:>4} cell_dimensions x={} y={}", cmd.line_number, d.x, d.y)
            }
            CommandKind::TileMap(m) => writeln!(
                out,
                "{:>4} tilemap id={} path={} ext={}",
                cmd.line_number, m.id, m.atlas_path, m.dir_atlas_extension
            ),
            CommandKind::PlaceTile(t) => writeln!(
                out,
                "{:>4} place_tile map={} tile={} cell=({}, {})",
                cmd.line_number, t.tilemap_id, t.tile_idx, t.cell_x, t.cell_y
            ),
        };
    }
    out
}

pub fn render_tokens(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    for token in tokens {
        let _ = writeln!(
            out,
            "{}:{}-{} {:?} {:?}",
            token.line, token.col_start, token.col_end, token.kind, token.text
        );
    }
    out
}

/// Lexes `text` and writes the token listing, or the lex error in the same
/// `path:line:column: message` form as other diagnostics.
pub fn emit_tokens(out: &mut impl Write, path: &Path, text: &str) -> io::Result<()> {
    match lexer::tokenize(text) {
        Ok(tokens) => write!(out, "{}", render_tokens(&tokens)),
        Err(err) => {
            let diag = Diagnostic::new(err.line, err.message).with_column(err.column);
            writeln!(out, "{}", format_diagnostic(path, &diag))
        }
    }
}

/// Writes every diagnostic followed by the summary line.
pub fn emit(out: &mut impl Write, scene: &Scene, diagnostics: &[Diagnostic]) -> io::Result<()> {
    for diag in diagnostics {
        writeln!(out, "{}", format_diagnostic(&scene.source_path, diag))?;
    }
    writeln!(out, "{}", render_summary(scene))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellDimensions, Command, PlaceTile};
    use std::path::PathBuf;

    fn loaded_scene() -> Scene {
        Scene {
            source_path: PathBuf::from("scenes/test.scn"),
            state: SceneState::Loaded,
            commands: vec![
                Command {
                    line_number: 1,
                    kind: CommandKind::CellDimensions(CellDimensions { x: 16, y: 8 }),
                },
                Command {
                    line_number: 3,
                    kind: CommandKind::PlaceTile(PlaceTile {
                        tilemap_id: 0,
                        tile_idx: 4,
                        cell_x: 1,
                        cell_y: 2,
                    }),
                },
            ],
        }
    }

    #[test]
    fn test_format_diagnostic() {
        let path = Path::new("a.scn");
        let diag = Diagnostic::new(4, "bad");
        assert_eq!(format_diagnostic(path, &diag), "a.scn:4: bad");
        assert_eq!(format_diagnostic(path, &diag.with_column(7)), "a.scn:4:7: bad");
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            render_summary(&loaded_scene()),
            "scenes/test.scn: loaded 2 commands (0 tilemaps, 1 tiles placed), cell 16x8px"
        );

        let failed = Scene {
            source_path: PathBuf::from("b.scn"),
            state: SceneState::Failed { error_count: 3 },
            commands: Vec::new(),
        };
        assert_eq!(render_summary(&failed), "b.scn: failed with 3 error(s)");
    }

    #[test]
    fn test_render_commands() {
        let text = render_commands(&loaded_scene());
        assert_eq!(
            text,
            "   1 cell_dimensions x=16 y=8\n   3 place_tile map=0 tile=4 cell=(1, 2)\n"
        );
    }

    #[test]
    fn test_emit_tokens() {
        let mut buf = Vec::new();
        emit_tokens(&mut buf, Path::new("t.scn"), ":tilemap 2 maps").expect("write");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "1:1-9 Command(TileMap) \":tilemap\"\n\
             1:10-11 Integer(2) \"2\"\n\
             1:12-16 Path(\"maps\") \"maps\"\n"
        );

        let mut buf = Vec::new();
        emit_tokens(&mut buf, Path::new("t.scn"), ":place_tile 0\n 12ab").expect("write");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "t.scn:2:4: unexpected characters 'ab' after integer 12\n"
        );
    }

    #[test]
    fn test_emit_lists_diagnostics_first() {
        let scene = Scene {
            source_path: PathBuf::from("c.scn"),
            state: SceneState::Failed { error_count: 1 },
            commands: Vec::new(),
        };
        let mut buf = Vec::new();
        emit(&mut buf, &scene, &[Diagnostic::new(2, "oops")]).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text, "c.scn:2: oops\nc.scn: failed with 1 error(s)\n");
    }
}
