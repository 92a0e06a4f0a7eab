//! One parser per command keyword.
//!
//! The parsers work on anything implementing [`Argument`], which covers both
//! raw space-split substrings (line pipeline) and lexer tokens (token
//! pipeline). Every parser validates all of its arguments before giving up,
//! so one call reports every bad field on the line.

use std::path::Path;

use thiserror::Error;

use super::lexer::{Token, TokenKind};
use crate::fs::FileSystem;
use crate::model::{
    CellDimensions, CommandKind, DIR_ATLAS_EXTENSION, Keyword, PlaceTile, TileMap,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(":{command} takes {expected} arguments, found {found}")]
    ArgumentCount {
        command: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{field} must be an integer, found '{text}'")]
    MalformedInteger { field: &'static str, text: String },
    #[error("{field} '{text}' is missing the 'px' suffix")]
    MissingPixelSuffix { field: &'static str, text: String },
    #[error("{field} must be an integer followed by 'px', found '{text}'")]
    MalformedPixels { field: &'static str, text: String },
    #[error("{field} {value} does not fit in {ty}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        ty: &'static str,
    },
    #[error("tilemap path '{path}' does not exist")]
    PathDoesNotExist { path: String },
    #[error("tilemap path '{path}' is not a directory (file atlases are not supported)")]
    NotADirectory { path: String },
    #[error("unrecognized command '{text}'")]
    UnrecognizedCommand { text: String },
}

impl CommandError {
    /// Name of the argument the error is about, matching
    /// [`Keyword::argument_names`]. `None` for whole-command errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            CommandError::MalformedInteger { field, .. }
            | CommandError::MissingPixelSuffix { field, .. }
            | CommandError::MalformedPixels { field, .. }
            | CommandError::OutOfRange { field, .. } => Some(*field),
            CommandError::PathDoesNotExist { .. } | CommandError::NotADirectory { .. } => {
                Some("path")
            }
            CommandError::ArgumentCount { .. } | CommandError::UnrecognizedCommand { .. } => None,
        }
    }

    /// Position of the offending argument within a `keyword` command.
    pub fn argument_index(&self, keyword: Keyword) -> Option<usize> {
        let field = self.field()?;
        keyword.argument_names().iter().position(|name| *name == field)
    }
}

pub type CommandResult<T> = Result<T, Vec<CommandError>>;

/// How a `px` argument read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelValue {
    Pixels(i64),
    MissingSuffix,
    Malformed,
}

/// A single command argument, however it was produced.
pub trait Argument {
    fn text(&self) -> &str;

    /// A plain integer with nothing trailing.
    fn integer(&self) -> Option<i64>;

    fn pixels(&self) -> PixelValue;
}

impl Argument for &str {
    fn text(&self) -> &str {
        self
    }

    fn integer(&self) -> Option<i64> {
        self.parse().ok()
    }

    fn pixels(&self) -> PixelValue {
        match self.strip_suffix("px") {
            Some(number) => match number.parse() {
                Ok(value) => PixelValue::Pixels(value),
                Err(_) => PixelValue::Malformed,
            },
            None if self.integer().is_some() => PixelValue::MissingSuffix,
            None => PixelValue::Malformed,
        }
    }
}

impl Argument for Token<'_> {
    fn text(&self) -> &str {
        self.text
    }

    fn integer(&self) -> Option<i64> {
        match self.kind {
            TokenKind::Integer(value) => Some(value),
            _ => None,
        }
    }

    fn pixels(&self) -> PixelValue {
        match self.kind {
            TokenKind::Pixels(value) => PixelValue::Pixels(value),
            TokenKind::Integer(_) => PixelValue::MissingSuffix,
            _ => PixelValue::Malformed,
        }
    }
}

fn check_arity<A>(keyword: Keyword, args: &[A]) -> CommandResult<()> {
    if args.len() == keyword.arity() {
        Ok(())
    } else {
        Err(vec![CommandError::ArgumentCount {
            command: keyword.name(),
            expected: keyword.arity(),
            found: args.len(),
        }])
    }
}

fn narrow<T: TryFrom<i64>>(
    field: &'static str,
    value: i64,
    ty: &'static str,
) -> Result<T, CommandError> {
    T::try_from(value).map_err(|_| CommandError::OutOfRange { field, value, ty })
}

fn int_field<A: Argument>(field: &'static str, arg: &A) -> Result<i64, CommandError> {
    arg.integer().ok_or_else(|| CommandError::MalformedInteger {
        field,
        text: arg.text().to_string(),
    })
}

fn i32_field<A: Argument>(field: &'static str, arg: &A) -> Result<i32, CommandError> {
    narrow(field, int_field(field, arg)?, "i32")
}

fn u32_field<A: Argument>(field: &'static str, arg: &A) -> Result<u32, CommandError> {
    narrow(field, int_field(field, arg)?, "u32")
}

fn pixel_field<A: Argument>(field: &'static str, arg: &A) -> Result<i32, CommandError> {
    let text = || arg.text().to_string();
    match arg.pixels() {
        PixelValue::Pixels(value) => narrow(field, value, "i32"),
        PixelValue::MissingSuffix => Err(CommandError::MissingPixelSuffix {
            field,
            text: text(),
        }),
        PixelValue::Malformed => Err(CommandError::MalformedPixels {
            field,
            text: text(),
        }),
    }
}

/// Collects the error side of every field so none is dropped.
fn collect_errors<const N: usize>(results: [Option<CommandError>; N]) -> Vec<CommandError> {
    results.into_iter().flatten().collect()
}

/// `:cell_dimensions <x>px <y>px`
pub fn parse_cell_dimensions<A: Argument>(args: &[A]) -> CommandResult<CellDimensions> {
    check_arity(Keyword::CellDimensions, args)?;

    match (pixel_field("x", &args[0]), pixel_field("y", &args[1])) {
        (Ok(x), Ok(y)) => Ok(CellDimensions { x, y }),
        (x, y) => Err(collect_errors([x.err(), y.err()])),
    }
}

/// `:tilemap <id> <directory>`
///
/// The path is checked exactly as written, so relative paths resolve against
/// the working directory. The stored `atlas_path` is the path that was checked.
pub fn parse_tilemap<A: Argument>(args: &[A], fs: &impl FileSystem) -> CommandResult<TileMap> {
    check_arity(Keyword::TileMap, args)?;

    let id = u32_field("id", &args[0]);

    let atlas_path = args[1].text().to_string();
    let info = fs.file_info(Path::new(&atlas_path));
    let dir_check = if !info.exists {
        Err(CommandError::PathDoesNotExist {
            path: atlas_path.clone(),
        })
    } else if !info.is_dir {
        Err(CommandError::NotADirectory {
            path: atlas_path.clone(),
        })
    } else {
        Ok(())
    };

    match (id, dir_check) {
        (Ok(id), Ok(())) => Ok(TileMap {
            id,
            atlas_path,
            is_dir_atlas: true,
            dir_atlas_extension: DIR_ATLAS_EXTENSION.to_string(),
        }),
        (id, dir_check) => Err(collect_errors([id.err(), dir_check.err()])),
    }
}

/// `:place_tile <tilemap-id> <tile-index> <cell-x> <cell-y>`
pub fn parse_place_tile<A: Argument>(args: &[A]) -> CommandResult<PlaceTile> {
    check_arity(Keyword::PlaceTile, args)?;

    let tilemap_id = u32_field("tilemap_id", &args[0]);
    let tile_idx = u32_field("tile_idx", &args[1]);
    let cell_x = i32_field("cell_x", &args[2]);
    let cell_y = i32_field("cell_y", &args[3]);

    match (tilemap_id, tile_idx, cell_x, cell_y) {
        (Ok(tilemap_id), Ok(tile_idx), Ok(cell_x), Ok(cell_y)) => Ok(PlaceTile {
            tilemap_id,
            tile_idx,
            cell_x,
            cell_y,
        }),
        (a, b, c, d) => Err(collect_errors([a.err(), b.err(), c.err(), d.err()])),
    }
}

/// Dispatches on the keyword.
pub fn parse_command<A: Argument>(
    keyword: Keyword,
    args: &[A],
    fs: &impl FileSystem,
) -> CommandResult<CommandKind> {
    Ok(match keyword {
        Keyword::CellDimensions => CommandKind::CellDimensions(parse_cell_dimensions(args)?),
        Keyword::TileMap => CommandKind::TileMap(parse_tilemap(args, fs)?),
        Keyword::PlaceTile => CommandKind::PlaceTile(parse_place_tile(args)?),
    })
}

/// Error for a command word that is not a keyword. Only the text up to the
/// first space is kept.
pub fn unrecognized(text: &str) -> CommandError {
    let word = text.split(' ').next().unwrap_or_default();
    CommandError::UnrecognizedCommand {
        text: word.to_string(),
    }
}
