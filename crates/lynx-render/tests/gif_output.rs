//! Rendered frames written to a GIF and decoded back.

use std::fs::File;
use std::io::BufReader;

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use lynx_render::{FrameLayout, FrameSink, GifSink};
use lynx_test_utils::grid_from_fn;

#[test]
fn frames_round_trip_through_gif() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.gif");
    let layout = FrameLayout::new(8, 3, 12).unwrap();

    let mut sink = GifSink::create(&path, 20).unwrap();
    for t in 1..=12u64 {
        let prey = grid_from_fn(8, |r, c| ((r + c) as f64 / 16.0 + t as f64 / 12.0) % 1.0);
        let predator = grid_from_fn(8, |r, _| r as f64 / 8.0);
        sink.push(layout.render(&prey, &predator, t).unwrap()).unwrap();
    }
    sink.finish().unwrap();
    drop(sink);

    let decoder = GifDecoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 12);
    for frame in &frames {
        assert_eq!(
            frame.buffer().dimensions(),
            (layout.width(), layout.height())
        );
        let (numer, denom) = frame.delay().numer_denom_ms();
        assert_eq!(f64::from(numer) / f64::from(denom), 50.0);
    }
}

#[test]
fn create_fails_for_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope").join("run.gif");
    assert!(matches!(
        GifSink::create(&path, 10),
        Err(lynx_render::RenderError::Io { .. })
    ));
}
