//! Handing a pixel buffer to a presentation surface.
//!
//! The crate does not open windows. A native surface is wrapped in a
//! [`Presenter`], which receives [`Frame`]s (raw bytes, dimensions, row
//! pitch) and yields input events. [`Window`] ties a root [`PixelBuffer`]
//! to a presenter and decides when to push.
//!
//! ```text
//! Window::open(w, h, presenter, &config)
//!     ├─ set(x, y, c)   → buffer write, then present() in Immediate mode
//!     ├─ sync()         → present() the whole buffer
//!     └─ next_event()   → presenter's next input event
//! ```

use core::fmt;

use crate::buffer::{BufferError, PixelBuffer};
use crate::color::Color;
use crate::config::BufferConfig;
use crate::geom::Rectangle;

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// Borrowed pixel bytes ready to be pushed to a surface.
///
/// `data` starts at the first pixel. Row `y` begins at `y * stride`; each
/// pixel is four bytes in B, G, R, A order.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(data: &'a [u8], width: u32, height: u32, stride: usize) -> Self {
        Self {
            data,
            width,
            height,
            stride,
        }
    }

    /// Raw B, G, R, A bytes, including any row padding.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Byte stride between row starts.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }
}

impl fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame({}x{}, stride {}, {} bytes)",
            self.width,
            self.height,
            self.stride,
            self.data.len()
        )
    }
}

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

/// A native surface that can show frames and report input.
///
/// Implemented outside this crate, typically over a window system image
/// whose backing store is registered once and repainted on every
/// [`present`](Presenter::present).
pub trait Presenter {
    /// Input event type delivered by the surface.
    type Event;

    /// Surface error type.
    type Error: core::error::Error + 'static;

    /// Block until the surface can accept frames (for example, until it has
    /// been mapped and exposed).
    fn wait_ready(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Push `frame` to the screen.
    fn present(&mut self, frame: Frame<'_>) -> Result<(), Self::Error>;

    /// Block until the next input event arrives.
    fn next_event(&mut self) -> Result<Self::Event, Self::Error>;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// When a [`Window`] pushes its buffer to the presenter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PresentMode {
    /// Push after every [`Window::set`].
    #[default]
    Immediate,
    /// Push only on [`Window::sync`].
    Deferred,
}

/// Settings for [`Window::open`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct WindowConfig {
    /// Initial present mode.
    pub present_mode: PresentMode,
    /// Allocation settings for the window's buffer.
    pub buffer: BufferConfig,
}

impl WindowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial present mode.
    pub fn with_present_mode(mut self, mode: PresentMode) -> Self {
        self.present_mode = mode;
        self
    }

    /// Set the buffer allocation settings.
    pub fn with_buffer(mut self, buffer: BufferConfig) -> Self {
        self.buffer = buffer;
        self
    }
}

// ---------------------------------------------------------------------------
// WindowError
// ---------------------------------------------------------------------------

/// Errors from [`Window::open`].
#[derive(Debug)]
pub enum WindowError<E> {
    /// The buffer could not be allocated.
    Buffer(BufferError),
    /// The presenter failed.
    Present(E),
}

impl<E: fmt::Display> fmt::Display for WindowError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffer(e) => write!(f, "window buffer: {e}"),
            Self::Present(e) => write!(f, "presenter: {e}"),
        }
    }
}

impl<E: core::error::Error + 'static> core::error::Error for WindowError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Buffer(e) => Some(e),
            Self::Present(e) => Some(e),
        }
    }
}

impl<E> From<BufferError> for WindowError<E> {
    fn from(e: BufferError) -> Self {
        Self::Buffer(e)
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// A root pixel buffer bound to a presenter.
pub struct Window<P: Presenter> {
    buffer: PixelBuffer,
    presenter: P,
    mode: PresentMode,
}

impl<P: Presenter> Window<P> {
    /// Allocate a `width x height` buffer for `presenter` and wait until the
    /// presenter is ready.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::Buffer`] if a size is above `i32::MAX` or the
    /// buffer configuration rejects it, or [`WindowError::Present`] if the presenter fails while
    /// getting ready.
    pub fn open(
        width: u32,
        height: u32,
        mut presenter: P,
        config: &WindowConfig,
    ) -> Result<Self, WindowError<P::Error>> {
        let rect = Rectangle::try_from_size(width, height).ok_or(BufferError::InvalidDimensions)?;
        let buffer = PixelBuffer::with_config(rect, &config.buffer)?;
        presenter.wait_ready().map_err(WindowError::Present)?;
        log::debug!(
            "window {width}x{height} ready, stride {}, {:?}",
            buffer.stride(),
            config.present_mode
        );
        Ok(Self {
            buffer,
            presenter,
            mode: config.present_mode,
        })
    }

    /// Push after every `set`.
    pub fn use_immediate(&mut self) {
        self.mode = PresentMode::Immediate;
    }

    /// Push only on `sync`.
    pub fn use_deferred(&mut self) {
        self.mode = PresentMode::Deferred;
    }

    /// Current present mode.
    pub fn present_mode(&self) -> PresentMode {
        self.mode
    }

    /// Store `c` at `(x, y)`, pushing the buffer in
    /// [`Immediate`](PresentMode::Immediate) mode.
    pub fn set<C: Color>(&mut self, x: i32, y: i32, c: C) -> Result<(), P::Error> {
        self.buffer.set(x, y, c);
        match self.mode {
            PresentMode::Immediate => self.sync(),
            PresentMode::Deferred => Ok(()),
        }
    }

    /// Push the whole buffer to the presenter.
    pub fn sync(&mut self) -> Result<(), P::Error> {
        let Self {
            buffer, presenter, ..
        } = self;
        buffer.with_frame(|frame| {
            log::trace!("presenting {frame:?}");
            presenter.present(frame)
        })
    }

    /// Wait for the presenter's next input event.
    pub fn next_event(&mut self) -> Result<P::Event, P::Error> {
        self.presenter.next_event()
    }

    /// The window's buffer.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// The window's buffer, for drawing without pushing.
    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Split into the buffer and the presenter.
    pub fn into_parts(self) -> (PixelBuffer, P) {
        (self.buffer, self.presenter)
    }
}

impl<P: Presenter> fmt::Debug for Window<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Window({:?}, {:?})", self.buffer, self.mode)
    }
}
