//! In-memory BGRA framebuffer for native presentation surfaces.
//!
//! The crate centers on one type, [`PixelBuffer`]: a rectangle of 8-bit,
//! premultiplied pixels stored as B, G, R, A bytes with an explicit row
//! pitch, ready to be registered as a surface's backing store.
//!
//! - [`Color`] / [`Bgra8`] — conversion into the native pixel layout
//! - [`PixelBuffer::at`] / [`PixelBuffer::set`] — clamped pixel access
//! - [`PixelBuffer::sub_image`] — zero-copy views that alias their parent
//! - [`PixelBuffer::scroll`] / [`PixelBuffer::region_scroll`] — overlap-safe row shifts
//! - [`PixelBuffer::fill`] / [`PixelBuffer::opaque`] — rectangle fill and alpha scan
//! - [`BufferConfig`] — row alignment and size limits
//! - [`Presenter`] / [`Window`] — the seam to a real display surface
//!
//! ```
//! use bgra_framebuffer::{PixelBuffer, Rectangle, Rgba};
//!
//! let mut buf = PixelBuffer::with_size(4, 4);
//! buf.fill(buf.bounds(), Rgba { r: 10u8, g: 20, b: 30, a: 255 });
//! assert!(buf.opaque());
//!
//! let mut view = buf.sub_image(Rectangle::new(1, 1, 3, 3));
//! view.set(2, 2, Rgba { r: 0u8, g: 0, b: 0, a: 0 });
//! assert!(!buf.opaque());
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

mod buffer;
pub mod color;
mod config;
mod geom;
mod present;

pub use buffer::{BufferError, PixelBuffer};
pub use color::{Bgra8, Color};
pub use config::{BufferConfig, LimitExceeded};
pub use geom::{Point, Rectangle};
pub use present::{Frame, PresentMode, Presenter, Window, WindowConfig, WindowError};

// Re-exports for callers building colors and interop images.
pub use imgref::{ImgRef, ImgVec};
pub use rgb;
pub use rgb::alt::BGRA;
pub use rgb::{Rgb, Rgba};
