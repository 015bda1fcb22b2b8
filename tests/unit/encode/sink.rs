use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::whole(15).unwrap(),
    }
}

fn frame(width: u32, height: u32, fill: u8) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: vec![fill; (width * height * 4) as usize],
    }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "audio_viz_sink_{}_{name}.raw",
        std::process::id()
    ))
}

#[test]
fn in_memory_sink_captures_config_and_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(4, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(4, 2, 1)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(4, 2, 2)).unwrap();
    assert!(!sink.ended());
    sink.end().unwrap();

    assert!(sink.ended());
    assert_eq!(sink.config(), Some(cfg(4, 2)));
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, FrameIndex(1));
    assert_eq!(sink.frames()[1].1.data[0], 2);
}

#[test]
fn raw_file_sink_appends_frames_back_to_back() {
    let path = temp_path("append");
    let mut sink = RawFileSink::new(&path);
    sink.begin(cfg(2, 2)).unwrap();
    for i in 0..3u8 {
        sink.push_frame(FrameIndex(u64::from(i)), &frame(2, 2, i))
            .unwrap();
    }
    sink.end().unwrap();
    assert_eq!(sink.bytes_written(), 48);

    let bytes = std::fs::read(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(bytes.len(), 48);
    assert!(bytes[..16].iter().all(|&b| b == 0));
    assert!(bytes[32..].iter().all(|&b| b == 2));
}

#[test]
fn raw_file_sink_rejects_repeated_index() {
    let path = temp_path("order");
    let mut sink = RawFileSink::new(&path);
    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(2, 2, 0)).unwrap();
    let err = sink.push_frame(FrameIndex(0), &frame(2, 2, 0)).unwrap_err();
    let _ = std::fs::remove_file(&path);
    assert!(matches!(err, VizError::Encode(_)));
}

#[test]
fn raw_file_sink_rejects_wrong_frame_size() {
    let path = temp_path("size");
    let mut sink = RawFileSink::new(&path);
    sink.begin(cfg(2, 2)).unwrap();
    let err = sink.push_frame(FrameIndex(0), &frame(4, 2, 0)).unwrap_err();
    let _ = std::fs::remove_file(&path);
    assert!(matches!(err, VizError::Validation(_)));
}

#[test]
fn raw_file_sink_requires_begin() {
    let mut sink = RawFileSink::new(temp_path("unstarted"));
    assert!(sink.push_frame(FrameIndex(0), &frame(2, 2, 0)).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn order_guard_accepts_gaps_but_not_regressions() {
    let mut g = OrderGuard::default();
    g.advance(FrameIndex(0)).unwrap();
    g.advance(FrameIndex(5)).unwrap();
    assert!(g.advance(FrameIndex(4)).is_err());
    g.reset();
    g.advance(FrameIndex(0)).unwrap();
}
