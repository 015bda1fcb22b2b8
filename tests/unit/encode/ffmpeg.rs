use super::*;

fn opts() -> MuxOpts {
    MuxOpts {
        raw_path: PathBuf::from("out/temp.raw"),
        audio_path: PathBuf::from("song.mp3"),
        out_path: PathBuf::from("out/mp4/clip.mp4"),
        width: 640,
        height: 360,
        fps: Fps::whole(15).unwrap(),
        duration_secs: 5.0,
        profile: EncoderProfile::Cpu,
    }
}

fn position(args: &[OsString], needle: &str) -> usize {
    args.iter()
        .position(|a| a == needle)
        .unwrap_or_else(|| panic!("missing {needle}"))
}

#[test]
fn mux_args_describe_raw_input_then_audio() {
    let args = mux_args(&opts());
    let s = position(&args, "-s");
    assert_eq!(args[s + 1], "640x360");
    let r = position(&args, "-framerate");
    assert_eq!(args[r + 1], "15/1");

    let inputs: Vec<usize> = args
        .iter()
        .enumerate()
        .filter(|(_, a)| *a == "-i")
        .map(|(i, _)| i)
        .collect();
    assert_eq!(inputs.len(), 2);
    assert_eq!(args[inputs[0] + 1], "out/temp.raw");
    assert_eq!(args[inputs[1] + 1], "song.mp3");
    assert!(s < inputs[0], "raw options must precede the raw input");

    let t = position(&args, "-t");
    assert_eq!(args[t + 1], "5");
    assert_eq!(args.last().unwrap(), "out/mp4/clip.mp4");
    assert!(args.iter().any(|a| a == "yuv420p"));
}

#[test]
fn profiles_pick_their_codec() {
    assert!(EncoderProfile::Cpu.codec_args().contains(&"libx264"));
    assert!(EncoderProfile::Cpu.codec_args().contains(&"15"));
    assert!(EncoderProfile::Nvenc.codec_args().contains(&"h264_nvenc"));

    let mut o = opts();
    o.profile = EncoderProfile::Nvenc;
    assert!(mux_args(&o).iter().any(|a| a == "h264_nvenc"));
}

#[test]
fn file_sink_rejects_odd_dimensions() {
    let dir = std::env::temp_dir().join(format!("audio_viz_ffmpeg_odd_{}", std::process::id()));
    let mut sink = FfmpegFileSink::new(
        dir.join("temp.raw"),
        "song.mp3",
        dir.join("clip.mp4"),
        1.0,
        EncoderProfile::Cpu,
    );
    let err = sink
        .begin(SinkConfig {
            width: 641,
            height: 360,
            fps: Fps::whole(15).unwrap(),
        })
        .unwrap_err();
    assert!(matches!(err, VizError::Validation(_)));
}

#[test]
fn dropped_file_sink_removes_its_raw_stream() {
    let dir = std::env::temp_dir().join(format!("audio_viz_ffmpeg_drop_{}", std::process::id()));
    let raw = dir.join("temp.raw");
    {
        let mut sink =
            FfmpegFileSink::new(&raw, "song.mp3", dir.join("clip.mp4"), 1.0, EncoderProfile::Cpu);
        sink.begin(SinkConfig {
            width: 2,
            height: 2,
            fps: Fps::whole(15).unwrap(),
        })
        .unwrap();
        assert!(raw.exists());
    }
    assert!(!raw.exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn kept_raw_stream_survives_the_sink() {
    let dir = std::env::temp_dir().join(format!("audio_viz_ffmpeg_keep_{}", std::process::id()));
    let raw = dir.join("kept.raw");
    {
        let mut sink =
            FfmpegFileSink::new(&raw, "song.mp3", dir.join("clip.mp4"), 1.0, EncoderProfile::Cpu)
                .keep_raw(true);
        sink.begin(SinkConfig {
            width: 2,
            height: 2,
            fps: Fps::whole(15).unwrap(),
        })
        .unwrap();
        assert_eq!(sink.raw_path(), raw.as_path());
    }
    assert!(raw.exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn ensure_parent_dir_creates_missing_directories() {
    let dir = std::env::temp_dir().join(format!("audio_viz_parent_{}", std::process::id()));
    let file = dir.join("a").join("b").join("out.mp4");
    ensure_parent_dir(&file).unwrap();
    assert!(file.parent().unwrap().is_dir());
    let _ = std::fs::remove_dir_all(&dir);

    ensure_parent_dir(Path::new("bare.mp4")).unwrap();
}
