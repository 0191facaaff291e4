use std::io::Cursor;

use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_assets").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &Path, w: u32, h: u32) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

#[test]
fn normalize_rel_path_rules() {
    assert_eq!(normalize_rel_path("a/./b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("/etc/x.png").is_err());
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn preload_records_ready_and_failed() {
    let dir = scratch_dir("preload");
    write_png(&dir.join("ok.png"), 3, 2);
    std::fs::write(dir.join("bad.png"), b"nope").unwrap();

    let mut store = ImageStore::new(&dir);
    store.preload(["ok.png", "bad.png", "gone.png", "https://cdn/x.png"]);

    assert_eq!(store.status("ok.png"), AssetStatus::Ready);
    assert_eq!(store.get("ok.png").unwrap().natural_size(), Size::new(3.0, 2.0));
    assert!(matches!(store.status("bad.png"), AssetStatus::Failed(_)));
    assert!(matches!(store.status("gone.png"), AssetStatus::Failed(_)));
    assert!(matches!(
        store.status("https://cdn/x.png"),
        AssetStatus::Failed(_)
    ));
    assert_eq!(store.status("never.png"), AssetStatus::Missing);
}

#[test]
fn load_is_cached_and_insert_overrides_failure() {
    let dir = scratch_dir("cache");
    let mut store = ImageStore::new(&dir);
    assert!(matches!(store.load("late.png"), AssetStatus::Failed(_)));

    write_png(&dir.join("late.png"), 1, 1);
    // Failures are remembered; the file is not re-read.
    assert!(matches!(store.load("late.png"), AssetStatus::Failed(_)));

    store.insert(
        "late.png",
        PreparedImage::from_premul(1, 1, vec![0, 0, 0, 255]).unwrap(),
    );
    assert_eq!(store.status("late.png"), AssetStatus::Ready);
}

#[test]
fn from_premul_checks_length() {
    assert!(PreparedImage::from_premul(2, 2, vec![0; 15]).is_err());
}
