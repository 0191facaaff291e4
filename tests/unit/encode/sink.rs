use super::*;

fn frame(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied: true,
    }
}

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig {
        width: w,
        height: h,
        fps: Fps::new(30, 1).unwrap(),
    }
}

#[test]
fn in_memory_sink_keeps_order_and_resets_on_begin() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(2, 2, [0, 0, 0, 255])).unwrap();
    sink.push_frame(FrameIndex(1), &frame(2, 2, [9, 9, 9, 255])).unwrap();
    sink.end().unwrap();
    assert!(sink.is_finished());
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, FrameIndex(1));

    sink.begin(cfg(2, 2)).unwrap();
    assert!(sink.frames().is_empty());
    assert!(!sink.is_finished());
}

#[test]
fn png_sequence_writes_numbered_files() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("target/test-out/png_sequence_sink");
    let _ = std::fs::remove_dir_all(&dir);
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(cfg(3, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(3, 2, [128, 0, 0, 128])).unwrap();
    sink.push_frame(FrameIndex(1), &frame(3, 2, [0, 0, 255, 255])).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.written(), 2);

    let img = image::open(sink.frame_path(FrameIndex(0))).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 128]);
}

#[test]
fn png_sequence_rejects_size_mismatch() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("target/test-out/png_sink_mismatch");
    let mut sink = PngSequenceSink::new(&dir);
    assert!(sink.push_frame(FrameIndex(0), &frame(1, 1, [0; 4])).is_err());
    sink.begin(cfg(3, 2)).unwrap();
    let err = sink.push_frame(FrameIndex(0), &frame(2, 2, [0; 4])).unwrap_err();
    assert!(err.to_string().contains("frame size mismatch"));
}

#[test]
fn sink_config_rejects_empty_frames_and_short_buffers() {
    assert!(cfg(0, 2).validate().is_err());
    assert!(cfg(3, 2).validate().is_ok());

    let mut short = frame(3, 2, [0; 4]);
    short.data.truncate(8);
    let err = cfg(3, 2).check_frame(&short).unwrap_err();
    assert!(err.to_string().contains("width*height*4"));
}
