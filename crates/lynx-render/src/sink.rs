//! Frame sinks.
//!
//! A [`FrameSink`] accepts rendered frames in order and is finished once.
//! [`GifSink`] encodes them into a looping GIF; [`VecSink`] keeps them in
//! memory.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use tracing::{debug, info};

use crate::error::RenderError;

/// Consumer of rendered frames.
pub trait FrameSink {
    /// Append one frame. All frames must share the first frame's size.
    fn push(&mut self, frame: RgbaImage) -> Result<(), RenderError>;

    /// Number of frames accepted so far.
    fn frames(&self) -> usize;

    /// Complete the output. Pushing afterwards fails with
    /// [`RenderError::Finished`].
    fn finish(&mut self) -> Result<(), RenderError>;
}

fn check_size(first: &mut Option<(u32, u32)>, frame: &RgbaImage) -> Result<(), RenderError> {
    let found = frame.dimensions();
    match *first {
        None => {
            *first = Some(found);
            Ok(())
        }
        Some(expected) if expected == found => Ok(()),
        Some(expected) => Err(RenderError::FrameSizeChanged { expected, found }),
    }
}

// ── GifSink ────────────────────────────────────────────────────────

/// Shared slot for the first write error seen by a [`Latched`] writer.
type Failure = Arc<Mutex<Option<io::Error>>>;

/// Passes writes through and keeps a copy of the first error.
///
/// The GIF trailer is written when the encoder drops, where errors are
/// otherwise discarded.
struct Latched<W> {
    inner: W,
    failure: Failure,
}

impl<W> Latched<W> {
    fn record(&self, e: &io::Error) {
        if let Ok(mut slot) = self.failure.lock() {
            slot.get_or_insert_with(|| io::Error::new(e.kind(), e.to_string()));
        }
    }
}

impl<W: Write> Write for Latched<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).inspect_err(|e| self.record(e))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().inspect_err(|e| self.record(e))
    }
}

/// Looping GIF at a fixed frame rate.
pub struct GifSink<W: Write> {
    encoder: Option<GifEncoder<BufWriter<Latched<W>>>>,
    failure: Failure,
    path: Option<PathBuf>,
    delay: Delay,
    size: Option<(u32, u32)>,
    frames: usize,
}

impl GifSink<File> {
    /// Create (or truncate) the GIF at `path`.
    pub fn create(path: impl AsRef<Path>, fps: u32) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), fps, "writing animation");
        let mut sink = Self::new(file, fps)?;
        sink.path = Some(path.to_path_buf());
        Ok(sink)
    }
}

impl<W: Write> GifSink<W> {
    /// Encode into `out` through a buffer. The GIF trailer is written by
    /// [`FrameSink::finish`]; dropping an unfinished sink writes it too but
    /// loses any error.
    pub fn new(out: W, fps: u32) -> Result<Self, RenderError> {
        if fps == 0 {
            return Err(RenderError::ZeroFrameRate);
        }
        let failure = Failure::default();
        let writer = BufWriter::new(Latched {
            inner: out,
            failure: Arc::clone(&failure),
        });
        let mut encoder = GifEncoder::new(writer);
        encoder.set_repeat(Repeat::Infinite)?;
        Ok(Self {
            encoder: Some(encoder),
            failure,
            path: None,
            delay: Delay::from_numer_denom_ms(1000, fps),
            size: None,
            frames: 0,
        })
    }

    fn write_error(&self, source: io::Error) -> RenderError {
        match &self.path {
            Some(path) => RenderError::Io {
                path: path.clone(),
                source,
            },
            None => RenderError::Write(source),
        }
    }
}

impl<W: Write> FrameSink for GifSink<W> {
    fn push(&mut self, frame: RgbaImage) -> Result<(), RenderError> {
        let encoder = self.encoder.as_mut().ok_or(RenderError::Finished)?;
        check_size(&mut self.size, &frame)?;
        encoder.encode_frame(Frame::from_parts(frame, 0, 0, self.delay))?;
        self.frames += 1;
        Ok(())
    }

    fn frames(&self) -> usize {
        self.frames
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        let Some(encoder) = self.encoder.take() else {
            return Ok(());
        };
        // Dropping writes the trailer and flushes the buffer.
        drop(encoder);
        let failure = self.failure.lock().ok().and_then(|mut slot| slot.take());
        if let Some(source) = failure {
            return Err(self.write_error(source));
        }
        debug!(frames = self.frames, "animation finished");
        Ok(())
    }
}

impl<W: Write> std::fmt::Debug for GifSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifSink")
            .field("path", &self.path)
            .field("frames", &self.frames)
            .field("size", &self.size)
            .field("finished", &self.encoder.is_none())
            .finish()
    }
}

// ── VecSink ────────────────────────────────────────────────────────

/// Keeps every frame in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    frames: Vec<RgbaImage>,
    size: Option<(u32, u32)>,
    finished: bool,
}

impl VecSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames received so far.
    pub fn images(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// Whether [`FrameSink::finish`] has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for VecSink {
    fn push(&mut self, frame: RgbaImage) -> Result<(), RenderError> {
        if self.finished {
            return Err(RenderError::Finished);
        }
        check_size(&mut self.size, &frame)?;
        self.frames.push(frame);
        Ok(())
    }

    fn frames(&self) -> usize {
        self.frames.len()
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, v: u8) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([v, v, v, 255]))
    }

    #[test]
    fn vec_sink_collects_in_order() {
        let mut sink = VecSink::new();
        sink.push(solid(2, 2, 1)).unwrap();
        sink.push(solid(2, 2, 2)).unwrap();
        sink.finish().unwrap();
        assert!(sink.is_finished());
        assert_eq!(sink.frames(), 2);
        assert_eq!(sink.images()[1].get_pixel(0, 0).0[0], 2);
        assert!(matches!(
            sink.push(solid(2, 2, 3)),
            Err(RenderError::Finished)
        ));
    }

    #[test]
    fn size_change_is_rejected() {
        let mut sink = VecSink::new();
        sink.push(solid(4, 2, 0)).unwrap();
        match sink.push(solid(2, 4, 0)) {
            Err(RenderError::FrameSizeChanged { expected, found }) => {
                assert_eq!(expected, (4, 2));
                assert_eq!(found, (2, 4));
            }
            other => panic!("expected FrameSizeChanged, got {other:?}"),
        }
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(matches!(
            GifSink::new(Vec::new(), 0),
            Err(RenderError::ZeroFrameRate)
        ));
    }

    /// Accepts nothing.
    struct Refusing;

    impl Write for Refusing {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_surfaces_from_push_or_finish() {
        let mut sink = GifSink::new(Refusing, 10).unwrap();
        let outcome = sink.push(solid(3, 3, 10)).and_then(|()| sink.finish());
        assert!(matches!(
            outcome,
            Err(RenderError::Write(_) | RenderError::Encode(_))
        ));
    }

    #[test]
    fn finishing_twice_is_harmless() {
        let mut sink = GifSink::new(Vec::new(), 10).unwrap();
        sink.push(solid(2, 2, 0)).unwrap();
        sink.finish().unwrap();
        sink.finish().unwrap();
    }

    #[test]
    fn gif_sink_counts_and_finishes() {
        let mut sink = GifSink::new(Vec::new(), 20).unwrap();
        sink.push(solid(3, 3, 10)).unwrap();
        sink.push(solid(3, 3, 20)).unwrap();
        assert_eq!(sink.frames(), 2);
        sink.finish().unwrap();
        assert!(matches!(
            sink.push(solid(3, 3, 30)),
            Err(RenderError::Finished)
        ));
    }
}
