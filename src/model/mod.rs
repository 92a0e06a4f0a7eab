use std::path::PathBuf;

use serde::Serialize;

/// Extension used to look up per-tile images inside a directory atlas.
pub const DIR_ATLAS_EXTENSION: &str = ".png";

/// Marker every command line starts with.
pub const COMMAND_MARKER: char = ':';

// ─────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────

/// `:cell_dimensions <x>px <y>px`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellDimensions {
    pub x: i32,
    pub y: i32,
}

/// `:tilemap <id> <directory>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileMap {
    pub id: u32,
    /// Path exactly as written in the scene file.
    pub atlas_path: String,
    pub is_dir_atlas: bool,
    pub dir_atlas_extension: String,
}

/// `:place_tile <tilemap-id> <tile-index> <cell-x> <cell-y>`
///
/// `tilemap_id` is not checked against the declared tilemaps here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaceTile {
    pub tilemap_id: u32,
    pub tile_idx: u32,
    pub cell_x: i32,
    pub cell_y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandKind {
    CellDimensions(CellDimensions),
    #[serde(rename = "tilemap")]
    TileMap(TileMap),
    PlaceTile(PlaceTile),
}

impl CommandKind {
    pub fn keyword(&self) -> Keyword {
        match self {
            CommandKind::CellDimensions(_) => Keyword::CellDimensions,
            CommandKind::TileMap(_) => Keyword::TileMap,
            CommandKind::PlaceTile(_) => Keyword::PlaceTile,
        }
    }
}

/// One directive parsed from a scene file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// 1-based source line.
    pub line_number: u32,
    #[serde(flatten)]
    pub kind: CommandKind,
}

/// The fixed command keyword set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    CellDimensions,
    #[serde(rename = "tilemap")]
    TileMap,
    PlaceTile,
}

impl Keyword {
    pub const ALL: [Keyword; 3] = [Keyword::CellDimensions, Keyword::TileMap, Keyword::PlaceTile];

    /// Matches the text after the `:` marker.
    pub fn from_name(name: &str) -> Option<Keyword> {
        match name {
            "cell_dimensions" => Some(Keyword::CellDimensions),
            "tilemap" => Some(Keyword::TileMap),
            "place_tile" => Some(Keyword::PlaceTile),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Keyword::CellDimensions => "cell_dimensions",
            Keyword::TileMap => "tilemap",
            Keyword::PlaceTile => "place_tile",
        }
    }

    /// Argument names in the order they are written.
    pub fn argument_names(self) -> &'static [&'static str] {
        match self {
            Keyword::CellDimensions => &["x", "y"],
            Keyword::TileMap => &["id", "path"],
            Keyword::PlaceTile => &["tilemap_id", "tile_idx", "cell_x", "cell_y"],
        }
    }

    /// Number of arguments the command takes.
    pub fn arity(self) -> usize {
        self.argument_names().len()
    }
}

// ─────────────────────────────────────────────────────
// Loader output
// ─────────────────────────────────────────────────────

/// One command position reserved by the counting pass.
///
/// `command` stays `None` when the line failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSlot {
    pub line_number: u32,
    pub command: Option<CommandKind>,
}

/// Intermediate result of parsing one file.
///
/// `slots.len()` is the number of command lines found by the counting pass,
/// whether or not each of them parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedScnFile {
    pub source_path: PathBuf,
    pub slots: Vec<CommandSlot>,
}

impl ParsedScnFile {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every command, or `None` if any slot failed to parse.
    pub fn into_commands(self) -> Option<Vec<Command>> {
        self.slots
            .into_iter()
            .map(|slot| {
                slot.command.map(|kind| Command {
                    line_number: slot.line_number,
                    kind,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SceneState {
    Loaded,
    Failed { error_count: usize },
}

/// A loaded scene. Built once by the loader, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scene {
    pub source_path: PathBuf,
    pub state: SceneState,
    /// Empty unless `state` is `Loaded`.
    pub commands: Vec<Command>,
}

impl Scene {
    pub fn is_loaded(&self) -> bool {
        self.state == SceneState::Loaded
    }

    pub fn cell_dimensions(&self) -> Option<CellDimensions> {
        self.commands.iter().find_map(|cmd| match cmd.kind {
            CommandKind::CellDimensions(dims) => Some(dims),
            _ => None,
        })
    }

    pub fn tilemaps(&self) -> impl Iterator<Item = &TileMap> {
        self.commands.iter().filter_map(|cmd| match &cmd.kind {
            CommandKind::TileMap(map) => Some(map),
            _ => None,
        })
    }

    pub fn placements(&self) -> impl Iterator<Item = &PlaceTile> {
        self.commands.iter().filter_map(|cmd| match &cmd.kind {
            CommandKind::PlaceTile(tile) => Some(tile),
            _ => None,
        })
    }
}

/// A line-anchored error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: u32,
    /// Only the token pipeline knows columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            message: message.into(),
        }
    }

    pub fn with_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }
}
