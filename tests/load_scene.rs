use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use scnload::fs::OsFileSystem;
use scnload::model::{CellDimensions, PlaceTile, TileMap};
use scnload::processor::parse_scene;
use scnload::{CommandKind, LoadError, LoadOptions, ParseMode, SceneState, load_scene};

/// Writes `text` as `level.scn` next to an `atlas/` directory and a
/// `sheet.png` file. `{dir}` in the text is replaced by the temp directory.
fn scene_dir(text: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("tempdir");
    fs::create_dir(temp.path().join("atlas")).expect("create atlas");
    fs::write(temp.path().join("sheet.png"), b"png").expect("write sheet");
    let path = temp.path().join("level.scn");
    let text = text.replace("{dir}", &temp.path().display().to_string());
    fs::write(&path, text).expect("write scene");
    (temp, path)
}

fn load(path: &Path, mode: ParseMode) -> (scnload::Scene, Vec<scnload::Diagnostic>) {
    load_scene(path, &LoadOptions { mode }, &OsFileSystem).expect("file loads")
}

#[test]
fn loads_example_scene() {
    let (temp, path) = scene_dir(
        ":cell_dimensions 16px 16px\n:tilemap 0 {dir}/atlas\n:place_tile 0 3 1 2\n",
    );
    let atlas_path = format!("{}/atlas", temp.path().display());

    for mode in [ParseMode::Lines, ParseMode::Tokens] {
        let (scene, diags) = load(&path, mode);
        assert!(diags.is_empty(), "{mode:?}: {diags:?}");
        assert_eq!(scene.state, SceneState::Loaded);

        let kinds: Vec<CommandKind> = scene.commands.iter().map(|c| c.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                CommandKind::CellDimensions(CellDimensions { x: 16, y: 16 }),
                CommandKind::TileMap(TileMap {
                    id: 0,
                    atlas_path: atlas_path.clone(),
                    is_dir_atlas: true,
                    dir_atlas_extension: ".png".into(),
                }),
                CommandKind::PlaceTile(PlaceTile {
                    tilemap_id: 0,
                    tile_idx: 3,
                    cell_x: 1,
                    cell_y: 2,
                }),
            ]
        );
    }
}

#[test]
fn reports_every_bad_line() {
    let (_temp, path) = scene_dir(
        ":tilemap 0 {dir}/sheet.png\n\
         :unknown foo bar\n\
         :tilemap 1 missing\n\
         :place_tile 0 x 1 y\n\
         :cell_dimensions 8px 8px\n",
    );

    let (scene, diags) = load(&path, ParseMode::Lines);
    assert_eq!(scene.state, SceneState::Failed { error_count: 5 });
    assert!(scene.commands.is_empty());

    let lines: Vec<u32> = diags.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![1, 2, 3, 4, 4]);
    assert!(diags[0].message.contains("not a directory"));
    assert!(diags[1].message.contains("unknown"));
    assert!(diags[2].message.contains("does not exist"));
    assert!(diags[3].message.contains("tile_idx"));
    assert!(diags[4].message.contains("cell_y"));
}

#[test]
fn command_count_matches_marker_lines() {
    let text = "\n:cell_dimensions 8px 8px\n\n:place_tile 0 0 0 0\n:bad\n\n:place_tile 0 1 1 1\n";
    let (_temp, path) = scene_dir(text);

    let (parsed, _) = parse_scene(text, &path, ParseMode::Lines, &OsFileSystem);
    let lines: Vec<u32> = parsed.slots.iter().map(|s| s.line_number).collect();
    assert_eq!(lines, vec![2, 4, 5, 7]);
}

#[test]
fn absolute_atlas_paths_are_accepted() {
    let atlas = TempDir::new().expect("tempdir");
    let text = format!(":tilemap 9 {}\n", atlas.path().display());
    let (_temp, path) = scene_dir(&text);

    let (scene, diags) = load(&path, ParseMode::Lines);
    assert!(diags.is_empty(), "{diags:?}");
    let map = scene.tilemaps().next().expect("one tilemap");
    assert_eq!(map.id, 9);
    assert_eq!(Path::new(&map.atlas_path), atlas.path());
}

#[test]
fn relative_atlas_paths_resolve_against_working_directory() {
    // `atlas/` sits next to the scene, not in the working directory
    let (_temp, path) = scene_dir(":tilemap 0 atlas\n");
    assert!(!Path::new("atlas").exists());

    for mode in [ParseMode::Lines, ParseMode::Tokens] {
        let (scene, diags) = load(&path, mode);
        assert_eq!(scene.state, SceneState::Failed { error_count: 1 }, "{mode:?}");
        assert!(diags[0].message.contains("'atlas' does not exist"), "{diags:?}");
    }

    // integration tests run from the package root
    let (_temp, path) = scene_dir(":tilemap 0 src\n");
    let (scene, diags) = load(&path, ParseMode::Lines);
    assert!(diags.is_empty(), "{diags:?}");
    let map = scene.tilemaps().next().expect("one tilemap");
    assert_eq!(map.atlas_path, "src");
    assert!(Path::new(&map.atlas_path).is_dir());
}

#[test]
fn missing_scene_is_a_load_error() {
    let temp = TempDir::new().expect("tempdir");
    let err = load_scene(
        &temp.path().join("nope.scn"),
        &LoadOptions::default(),
        &OsFileSystem,
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::File(_)));

    let err = load_scene(temp.path(), &LoadOptions::default(), &OsFileSystem).unwrap_err();
    assert!(err.to_string().contains("is a directory"), "{err}");
}

#[test]
fn loading_twice_is_identical() {
    let (_temp, path) = scene_dir(":cell_dimensions 4px 2px\n:tilemap 0 {dir}/atlas\n");
    assert_eq!(load(&path, ParseMode::Lines), load(&path, ParseMode::Lines));
}
