//! The functional core: text → tokens/lines → commands → scene.
pub mod commands;
pub mod lexer;
pub mod scene;
pub mod split;

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::fs::{FileSystem, FsError};
use crate::model::{Diagnostic, ParsedScnFile, Scene, SceneState};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Which front end turns text into commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ParseMode {
    /// Line split, then space split. Positional and strict.
    #[default]
    Lines,
    /// Lexer with line/column positions, free-form whitespace.
    Tokens,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub mode: ParseMode,
}

/// Fatal, file-level failure. No partial scene exists.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not load scene: {0}")]
    File(#[from] FsError),
}

/// Parses text into a `ParsedScnFile` without building a scene.
///
/// A leading UTF-8 byte order mark is skipped.
pub fn parse_scene(
    text: &str,
    source_path: &Path,
    mode: ParseMode,
    fs: &impl FileSystem,
) -> (ParsedScnFile, Vec<Diagnostic>) {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    match mode {
        ParseMode::Lines => scene::parse_lines(text, source_path, fs),
        ParseMode::Tokens => scene::parse_tokens(text, source_path, fs),
    }
}

/// Reads and parses one scene file.
///
/// Line-level problems come back as diagnostics next to a failed scene; only
/// a missing or unreadable file is an `Err`.
pub fn load_scene(
    path: &Path,
    options: &LoadOptions,
    fs: &impl FileSystem,
) -> Result<(Scene, Vec<Diagnostic>), LoadError> {
    let text = fs.read_file_to_text(path)?;
    info!(path = %path.display(), size_bytes = text.len(), "scene file read");
    Ok(load_scene_from_str(&text, path, options, fs))
}

/// Same as [`load_scene`] for text already in memory. `source_path` only
/// labels the scene and its diagnostics.
pub fn load_scene_from_str(
    text: &str,
    source_path: &Path,
    options: &LoadOptions,
    fs: &impl FileSystem,
) -> (Scene, Vec<Diagnostic>) {
    let (parsed, diagnostics) = parse_scene(text, source_path, options.mode, fs);
    let scene = build_scene(parsed, &diagnostics);

    match scene.state {
        SceneState::Loaded => info!(
            path = %scene.source_path.display(),
            commands = scene.commands.len(),
            "scene loaded"
        ),
        SceneState::Failed { error_count } => info!(
            path = %scene.source_path.display(),
            error_count,
            "scene failed to load"
        ),
    }
    (scene, diagnostics)
}

fn build_scene(parsed: ParsedScnFile, diagnostics: &[Diagnostic]) -> Scene {
    let source_path = parsed.source_path.clone();
    let commands = if diagnostics.is_empty() {
        parsed.into_commands()
    } else {
        None
    };

    match commands {
        Some(commands) => Scene {
            source_path,
            state: SceneState::Loaded,
            commands,
        },
        None => Scene {
            source_path,
            state: SceneState::Failed {
                error_count: diagnostics.len(),
            },
            commands: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::testing::MemoryFileSystem;
    use crate::model::{CellDimensions, CommandKind};

    #[test]
    fn test_load_scene_missing_file() {
        let fs = MemoryFileSystem::new().with_dir("scenes");
        let err = load_scene(Path::new("scenes/none.scn"), &LoadOptions::default(), &fs)
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"), "{err}");

        let err = load_scene(Path::new("scenes"), &LoadOptions::default(), &fs).unwrap_err();
        assert!(matches!(err, LoadError::File(FsError::IsADirectory { .. })));
    }

    #[test]
    fn test_load_scene_success() {
        let fs = MemoryFileSystem::new().with_file("a.scn", ":cell_dimensions 32px 16px\n");
        let (scene, diags) =
            load_scene(Path::new("a.scn"), &LoadOptions::default(), &fs).expect("loads");

        assert!(diags.is_empty());
        assert!(scene.is_loaded());
        assert_eq!(scene.cell_dimensions(), Some(CellDimensions { x: 32, y: 16 }));
        assert_eq!(scene.commands[0].line_number, 1);
    }

    #[test]
    fn test_failed_scene_has_no_commands() {
        let fs = MemoryFileSystem::new();
        let text = ":cell_dimensions 32px 16px\n:place_tile 0 0 0\n:bogus\n";
        for mode in [ParseMode::Lines, ParseMode::Tokens] {
            let options = LoadOptions { mode };
            let (scene, diags) = load_scene_from_str(text, Path::new("x.scn"), &options, &fs);
            assert_eq!(scene.state, SceneState::Failed { error_count: 2 }, "{mode:?}");
            assert!(scene.commands.is_empty());
            assert_eq!(diags.len(), 2);
        }
    }

    #[test]
    fn test_empty_file_loads_empty_scene() {
        let fs = MemoryFileSystem::new();
        let (scene, diags) =
            load_scene_from_str("", Path::new("e.scn"), &LoadOptions::default(), &fs);
        assert!(diags.is_empty());
        assert!(scene.is_loaded());
        assert!(scene.commands.is_empty());
    }

    #[test]
    fn test_leading_byte_order_mark_is_skipped() {
        let fs = MemoryFileSystem::new().with_file("bom.scn", "\u{feff}:cell_dimensions 8px 8px\n");
        for mode in [ParseMode::Lines, ParseMode::Tokens] {
            let (scene, diags) =
                load_scene(Path::new("bom.scn"), &LoadOptions { mode }, &fs).expect("loads");
            assert!(diags.is_empty(), "{mode:?}: {diags:?}");
            assert_eq!(scene.cell_dimensions(), Some(CellDimensions { x: 8, y: 8 }));
        }

        // only a leading mark is special
        let (_, diags) = parse_scene(
            ":cell_dimensions 8px 8px\n\u{feff}:cell_dimensions 8px 8px\n",
            Path::new("s.scn"),
            ParseMode::Lines,
            &fs,
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 2);
    }

    #[test]
    fn test_parse_scene_keeps_slots_for_failed_lines() {
        let fs = MemoryFileSystem::new();
        let (parsed, _) = parse_scene(
            ":cell_dimensions 1px 1px\n:cell_dimensions 1 1\n",
            Path::new("s.scn"),
            ParseMode::Lines,
            &fs,
        );
        assert_eq!(parsed.len(), 2);
        assert!(matches!(
            parsed.slots[0].command,
            Some(CommandKind::CellDimensions(_))
        ));
        assert_eq!(parsed.slots[1].command, None);
        assert_eq!(parsed.slots[1].line_number, 2);
    }
}
