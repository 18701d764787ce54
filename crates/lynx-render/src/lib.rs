//! Visualization sink for Lynx simulations.
//!
//! Turns pairs of prey/predator slices into two-panel heatmap frames and
//! appends them to a looping GIF.
//!
//! - [`colormap`]: fixed-range `[0, 1]` colour ramp
//! - [`font`]: 3x5 bitmap digits for the frame index
//! - [`FrameLayout`]: pixel geometry of one frame and the renderer
//! - [`FrameSink`]: where frames go ([`GifSink`], [`VecSink`])

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod colormap;
pub mod error;
pub mod font;
pub mod frame;
pub mod sink;

pub use error::RenderError;
pub use frame::FrameLayout;
pub use sink::{FrameSink, GifSink, VecSink};
