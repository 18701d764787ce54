//! Error types for frame rendering and output.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while laying out, rendering or writing frames.
#[derive(Debug)]
pub enum RenderError {
    /// `cell_px` was zero.
    ZeroCellSize,
    /// The frame rate was zero.
    ZeroFrameRate,
    /// The frame would exceed the GIF dimension limit.
    FrameTooLarge {
        /// Requested `(width, height)` in pixels.
        size: (u64, u64),
    },
    /// A slice does not match the layout's domain size.
    DomainMismatch {
        /// Domain size the layout was built for.
        expected: usize,
        /// Domain size of the offending slice.
        found: usize,
    },
    /// A frame's dimensions differ from the first frame written.
    FrameSizeChanged {
        /// Dimensions of the first frame.
        expected: (u32, u32),
        /// Dimensions of the offending frame.
        found: (u32, u32),
    },
    /// A frame was pushed after the sink was finished.
    Finished,
    /// Creating or writing the output file failed.
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Writing to a caller-supplied stream failed.
    Write(io::Error),
    /// The image encoder failed.
    Encode(image::ImageError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCellSize => write!(f, "cell size must be at least one pixel"),
            Self::ZeroFrameRate => write!(f, "frame rate must be at least 1 fps"),
            Self::FrameTooLarge { size } => write!(
                f,
                "frame of {}x{} px exceeds the 65535 px GIF limit",
                size.0, size.1
            ),
            Self::DomainMismatch { expected, found } => write!(
                f,
                "slice domain is {found}x{found}, layout expects {expected}x{expected}"
            ),
            Self::FrameSizeChanged { expected, found } => write!(
                f,
                "frame is {}x{}, earlier frames are {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::Finished => write!(f, "sink already finished"),
            Self::Io { path, source } => write!(f, "cannot write {}: {source}", path.display()),
            Self::Write(e) => write!(f, "cannot write animation: {e}"),
            Self::Encode(e) => write!(f, "GIF encoding failed: {e}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Write(e) => Some(e),
            Self::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        Self::Encode(e)
    }
}
