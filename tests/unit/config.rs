use super::*;
use chrono::TimeZone;
use std::time::{Duration, UNIX_EPOCH};

#[test]
fn presets_resolve_by_name() {
    let p = VideoPreset::find("1080p").unwrap();
    assert_eq!((p.width, p.height), (1920, 1080));
    assert_eq!(VideoPreset::find("360p").unwrap().canvas().unwrap().width, 640);
    assert!(VideoPreset::ALL.iter().all(|p| p.width % 2 == 0 && p.height % 2 == 0));
}

#[test]
fn unknown_preset_lists_available_names() {
    let err = VideoPreset::find("999p").unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("360p, 480p"));
}

#[test]
fn scene_builds_layers_in_order() {
    let scene = SceneFile::from_json(
        r#"{ "layers": [
            { "animation": "Wave", "mirroredX": true },
            { "animation": "circles", "count": 10 }
        ] }"#,
    )
    .unwrap();
    let comp = scene.into_composition().unwrap();
    assert_eq!(comp.len(), 2);
    assert_eq!(comp.animations()[1].config().count, 10);
}

#[test]
fn bad_scenes_are_config_errors() {
    assert!(SceneFile::from_json("{").unwrap_err().is_config());
    assert!(SceneFile::from_json(r#"{"layers": [], "x": 1}"#).unwrap_err().is_config());
    let empty = SceneFile::from_json(r#"{"layers": []}"#).unwrap();
    assert!(empty.into_composition().unwrap_err().is_config());
    let unknown = SceneFile::from_json(r#"{"layers": [{"animation": "Spiral"}]}"#).unwrap();
    assert!(unknown.into_composition().unwrap_err().is_config());
    assert!(SceneFile::load(Path::new("no/such/scene.json")).unwrap_err().is_config());
}

#[test]
fn layout_paths_follow_debug_mode() {
    let plain = OutputLayout::new("output", false);
    assert_eq!(plain.raw_path("20240102-030405"), PathBuf::from("output/temp.raw"));
    assert_eq!(plain.image_dir(), None);
    assert_eq!(
        plain.mp4_path("20240102-030405", "0"),
        PathBuf::from("output/mp4/20240102-030405-0.mp4")
    );

    let debug = OutputLayout::new("output", true);
    assert_eq!(
        debug.raw_path("20240102-030405"),
        PathBuf::from("output/raw/20240102-030405-output.raw")
    );
    assert_eq!(debug.image_dir(), Some(PathBuf::from("output/images")));
}

#[test]
fn layout_creates_its_directories() {
    let root = std::env::temp_dir().join(format!("audio_viz_layout_{}", std::process::id()));
    let layout = OutputLayout::new(&root, true);
    layout.create().unwrap();
    assert!(layout.mp4_dir().is_dir());
    assert!(root.join("raw").is_dir());
    assert!(root.join("images").is_dir());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn timestamps_are_utc_civil_time() {
    assert_eq!(file_timestamp(UNIX_EPOCH), "19700101-000000");
    // 2024-02-29T23:59:58Z
    let t = UNIX_EPOCH + Duration::from_secs(1_709_251_198);
    assert_eq!(file_timestamp(t), "20240229-235958");

    let leap_day = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 58).unwrap();
    assert_eq!(file_timestamp(SystemTime::from(leap_day)), "20240229-235958");
    // Pre-epoch instants format as well.
    let t = UNIX_EPOCH - Duration::from_secs(1);
    assert_eq!(file_timestamp(t), "19691231-235959");
}
