//! BGRA pixel buffer with aliasing sub-image views.
//!
//! A [`PixelBuffer`] is a rectangle of premultiplied B, G, R, A pixels in a
//! byte array with an explicit row pitch. Its storage is shared: views made
//! with [`sub_image`](PixelBuffer::sub_image) hold a reference-counted handle
//! to the same bytes plus the byte offset of their first pixel, so writes
//! through a view show up in the parent and the other way around.
//!
//! Pixel access never fails. Reads outside the bounds return
//! [`TRANSPARENT`](crate::color::TRANSPARENT), writes outside the bounds are
//! dropped, and every rectangle argument is clipped to the bounds first.

use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::ops::Range;

use imgref::{ImgRef, ImgVec};
use rgb::Rgba;

use crate::color::{self, A, BYTES_PER_PIXEL, Bgra8, Color};
use crate::config::{BufferConfig, LimitExceeded};
use crate::geom::{Point, Rectangle};
use crate::present::Frame;

/// Shared pixel storage. Views clone the handle, never the bytes.
type Storage = Rc<RefCell<Vec<u8>>>;

// ---------------------------------------------------------------------------
// BufferError
// ---------------------------------------------------------------------------

/// Errors from constructing a pixel buffer.
///
/// Pixel operations themselves are infallible; only the allocation and
/// wrapping boundaries report errors.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum BufferError {
    /// Stride is smaller than `width * 4`.
    StrideTooSmall,
    /// Data is too small for the given stride and height.
    InsufficientData,
    /// Dimensions overflow when computing the storage size.
    InvalidDimensions,
    /// Row alignment is not a power of two.
    InvalidAlignment,
    /// A configured size limit was exceeded.
    Limit(LimitExceeded),
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StrideTooSmall => write!(f, "stride is smaller than width * 4"),
            Self::InsufficientData => {
                write!(f, "data is too small for the given stride and height")
            }
            Self::InvalidDimensions => write!(f, "dimensions overflow the storage size"),
            Self::InvalidAlignment => write!(f, "row alignment is not a power of two"),
            Self::Limit(e) => write!(f, "buffer limit exceeded: {e}"),
        }
    }
}

impl core::error::Error for BufferError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Limit(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LimitExceeded> for BufferError {
    fn from(e: LimitExceeded) -> Self {
        Self::Limit(e)
    }
}

// ---------------------------------------------------------------------------
// PixelBuffer
// ---------------------------------------------------------------------------

/// In-memory image of native [`Bgra8`] pixels.
///
/// The pixel at `(x, y)` starts at byte
/// `(y - rect.min.y) * stride + (x - rect.min.x) * 4` of the buffer's
/// storage, which itself starts `offset` bytes into the shared allocation.
///
/// Storage is `Rc`-shared and therefore `!Send`: a buffer and all views cut
/// from it stay on one thread. Mutating methods take `&mut self`, but two
/// handles to the same storage can still write the same pixels; that
/// aliasing is the point of [`sub_image`](Self::sub_image).
#[derive(Default)]
pub struct PixelBuffer {
    pix: Option<Storage>,
    /// Byte offset from the start of `pix` to the pixel at `rect.min`.
    offset: usize,
    stride: usize,
    rect: Rectangle,
}

impl PixelBuffer {
    /// Allocate a zeroed (fully transparent) buffer covering `rect`, with
    /// tightly packed rows.
    pub fn new(rect: Rectangle) -> Self {
        let stride = rect.width() * BYTES_PER_PIXEL;
        let len = stride * rect.height();
        log::trace!("allocating {rect} buffer, stride {stride}, {len} bytes");
        Self {
            pix: Some(Rc::new(RefCell::new(vec![0u8; len]))),
            offset: 0,
            stride,
            rect,
        }
    }

    /// Allocate a zeroed `width x height` buffer anchored at the origin.
    ///
    /// Sizes above `i32::MAX` saturate, as in [`Rectangle::from_size`].
    pub fn with_size(width: u32, height: u32) -> Self {
        Self::new(Rectangle::from_size(width, height))
    }

    /// Allocate a zeroed buffer covering `rect` with the row alignment and
    /// limits from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidAlignment`] if the row alignment is not
    /// a power of two, [`BufferError::InvalidDimensions`] if the storage
    /// size overflows, and [`BufferError::Limit`] if a configured limit is
    /// exceeded.
    pub fn with_config(rect: Rectangle, config: &BufferConfig) -> Result<Self, BufferError> {
        Self::allocate(rect, config)
            .inspect_err(|e| log::debug!("rejecting {rect} buffer: {e}"))
    }

    fn allocate(rect: Rectangle, config: &BufferConfig) -> Result<Self, BufferError> {
        let (width, height) = (rect.width(), rect.height());
        config.check_size(
            u32::try_from(width).map_err(|_| BufferError::InvalidDimensions)?,
            u32::try_from(height).map_err(|_| BufferError::InvalidDimensions)?,
        )?;
        let (stride, len) = config.layout(width, height)?;
        log::trace!("allocating {rect} buffer, stride {stride}, {len} bytes");
        Ok(Self {
            pix: Some(Rc::new(RefCell::new(vec![0u8; len]))),
            offset: 0,
            stride,
            rect,
        })
    }

    /// Wrap existing storage as a buffer covering `rect`.
    ///
    /// `data` must hold at least `stride * height` bytes and `stride` must be
    /// at least `width * 4`. Bytes past the end of each row's pixels are
    /// padding and are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::StrideTooSmall`] or
    /// [`BufferError::InsufficientData`] if the layout does not fit, and
    /// [`BufferError::InvalidDimensions`] on overflow.
    pub fn from_vec(data: Vec<u8>, stride: usize, rect: Rectangle) -> Result<Self, BufferError> {
        let min_stride = rect
            .width()
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or(BufferError::InvalidDimensions)?;
        if stride < min_stride {
            return Err(BufferError::StrideTooSmall);
        }
        let required = stride
            .checked_mul(rect.height())
            .ok_or(BufferError::InvalidDimensions)?;
        if data.len() < required {
            return Err(BufferError::InsufficientData);
        }
        Ok(Self {
            pix: Some(Rc::new(RefCell::new(data))),
            offset: 0,
            stride,
            rect,
        })
    }

    /// A buffer with empty bounds and no storage. Every operation on it is a
    /// no-op.
    pub const fn empty() -> Self {
        Self {
            pix: None,
            offset: 0,
            stride: 0,
            rect: Rectangle::ZERO,
        }
    }

    /// Recover the backing storage for reuse.
    ///
    /// Succeeds only when no other buffer or view shares the storage. The
    /// whole allocation is returned, so a surviving view yields the bytes of
    /// the buffer it was cut from. Otherwise `self` is handed back unchanged.
    pub fn into_vec(self) -> Result<Vec<u8>, Self> {
        let Some(pix) = self.pix else {
            return Ok(Vec::new());
        };
        match Rc::try_unwrap(pix) {
            Ok(cell) => Ok(cell.into_inner()),
            Err(pix) => Err(Self {
                pix: Some(pix),
                offset: self.offset,
                stride: self.stride,
                rect: self.rect,
            }),
        }
    }

    // --- Layout ---

    /// The addressable rectangle.
    #[inline]
    pub fn bounds(&self) -> Rectangle {
        self.rect
    }

    /// Byte distance between vertically adjacent pixels.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.rect.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.rect.height()
    }

    /// Whether `other` shares storage with `self`.
    pub fn shares_storage(&self, other: &PixelBuffer) -> bool {
        match (&self.pix, &other.pix) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Offset of the first byte of pixel `(x, y)`, relative to this
    /// buffer's first pixel.
    ///
    /// Not bounds-checked: points outside [`bounds`](Self::bounds) give
    /// offsets that do not address this buffer's pixels.
    #[inline]
    pub fn pix_offset(&self, x: i32, y: i32) -> isize {
        let dy = y as isize - self.rect.min.y as isize;
        let dx = x as isize - self.rect.min.x as isize;
        dy * self.stride as isize + dx * BYTES_PER_PIXEL as isize
    }

    /// Index into the shared allocation. `(x, y)` must be in bounds.
    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        self.offset + self.pix_offset(x, y) as usize
    }

    /// Index range of the pixels `[x0, x1)` on row `y`.
    #[inline]
    fn span(&self, y: i32, x0: i32, x1: i32) -> Range<usize> {
        let start = self.index(x0, y);
        start..start + x1.abs_diff(x0) as usize * BYTES_PER_PIXEL
    }

    /// Storage length this buffer may address: `stride * height` bytes,
    /// cut short where a view's last row ends the shared allocation.
    fn extent(&self, len: usize) -> Range<usize> {
        let end = self.offset + self.stride * self.rect.height();
        self.offset.min(len)..end.min(len)
    }

    /// Borrow this buffer's bytes, starting at its first pixel.
    ///
    /// The slice covers `stride * height` bytes, or up to the end of the
    /// shared allocation for a view cut from the bottom of its parent. An
    /// empty buffer yields an empty slice.
    ///
    /// # Panics
    ///
    /// Panics if the shared storage is currently borrowed mutably, which can
    /// only happen from inside a [`with_pix_mut`](Self::with_pix_mut)
    /// closure on an aliasing buffer.
    pub fn with_pix<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        match &self.pix {
            Some(pix) => {
                let pix = pix.borrow();
                let range = self.extent(pix.len());
                f(&pix[range])
            }
            None => f(&[]),
        }
    }

    /// Mutably borrow this buffer's bytes, starting at its first pixel.
    ///
    /// Same extent as [`with_pix`](Self::with_pix). Bytes outside
    /// [`bounds`](Self::bounds) (row padding, or the parent's pixels beside
    /// a view) are reachable through this slice; leave them alone.
    ///
    /// # Panics
    ///
    /// Panics if the shared storage is already borrowed.
    pub fn with_pix_mut<R>(&mut self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        match &self.pix {
            Some(pix) => {
                let mut pix = pix.borrow_mut();
                let range = self.extent(pix.len());
                f(&mut pix[range])
            }
            None => f(&mut []),
        }
    }

    /// Borrow the buffer as a [`Frame`] for a presentation surface.
    pub fn with_frame<R>(&self, f: impl FnOnce(Frame<'_>) -> R) -> R {
        let (width, height, stride) = (self.width(), self.height(), self.stride);
        self.with_pix(|data| f(Frame::new(data, width as u32, height as u32, stride)))
    }

    // --- Indexed access ---

    /// The pixel at `(x, y)`, or transparent black outside the bounds.
    pub fn at(&self, x: i32, y: i32) -> Bgra8 {
        let Some(pix) = self.pix.as_ref().filter(|_| Point::new(x, y).is_in(self.rect)) else {
            return color::TRANSPARENT;
        };
        let i = self.index(x, y);
        let pix = pix.borrow();
        let s = &pix[i..i + BYTES_PER_PIXEL];
        color::from_bytes([s[0], s[1], s[2], s[3]])
    }

    /// The pixel at `(x, y)` in R, G, B, A order.
    pub fn rgba_at(&self, x: i32, y: i32) -> Rgba<u8> {
        let c = self.at(x, y);
        Rgba {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }

    /// The pixel at `(x, y)` widened to 16 bits per channel.
    pub fn rgba64_at(&self, x: i32, y: i32) -> Rgba<u16> {
        color::expand16(self.at(x, y))
    }

    /// Store `c` at `(x, y)`. Does nothing outside the bounds.
    pub fn set<C: Color>(&mut self, x: i32, y: i32, c: C) {
        let Some(pix) = self.pix.as_ref().filter(|_| Point::new(x, y).is_in(self.rect)) else {
            return;
        };
        let i = self.index(x, y);
        pix.borrow_mut()[i..i + BYTES_PER_PIXEL].copy_from_slice(&color::to_bytes(c.to_native()));
    }

    /// Store a 16-bit color at `(x, y)`, keeping the high byte of each
    /// channel.
    pub fn set_rgba64(&mut self, x: i32, y: i32, c: Rgba<u16>) {
        self.set(x, y, c);
    }

    /// Whether every pixel has full alpha. An empty buffer is opaque.
    pub fn opaque(&self) -> bool {
        if self.rect.is_empty() {
            return true;
        }
        let Some(pix) = &self.pix else {
            return true;
        };
        let pix = pix.borrow();
        let (x0, x1) = (self.rect.min.x, self.rect.max.x);
        (self.rect.min.y..self.rect.max.y).all(|y| {
            pix[self.span(y, x0, x1)]
                .chunks_exact(BYTES_PER_PIXEL)
                .all(|px| px[A] == 0xff)
        })
    }

    // --- Views ---

    /// A view of the part of this buffer inside `r`, sharing its pixels.
    ///
    /// The view keeps this buffer's stride and coordinate system, so pixel
    /// `(x, y)` of the view is pixel `(x, y)` of `self`. If `r` does not
    /// overlap the bounds the result is [`PixelBuffer::empty`].
    pub fn sub_image(&self, r: Rectangle) -> PixelBuffer {
        let r = r.intersect(self.rect);
        let Some(pix) = self.pix.as_ref().filter(|_| !r.is_empty()) else {
            return Self::empty();
        };
        let offset = self.index(r.min.x, r.min.y);
        log::trace!("view {r} at byte {offset}, stride {}", self.stride);
        PixelBuffer {
            pix: Some(Rc::clone(pix)),
            offset,
            stride: self.stride,
            rect: r,
        }
    }

    // --- Scrolling ---

    /// Shift the buffer's content up by `delta` rows (down if negative).
    ///
    /// After `scroll(d)` with `d > 0`, row `y` holds what row `y + d` held.
    /// `|delta|` is clamped to the height. The `|delta|` rows uncovered at
    /// the trailing edge keep their old bytes and should be redrawn.
    pub fn scroll(&mut self, delta: i32) {
        if delta == 0 || self.rect.is_empty() {
            return;
        }
        let Some(pix) = &self.pix else {
            return;
        };
        let height = self.rect.height();
        let amount = (delta.unsigned_abs() as usize).min(height);
        let kept = height - amount;
        if kept == 0 {
            return;
        }
        let mut pix = pix.borrow_mut();
        let row_bytes = self.rect.width() * BYTES_PER_PIXEL;
        let shift = amount * self.stride;

        if row_bytes == self.stride {
            // Rows are back to back, so the retained block moves in one copy.
            let (base, len) = (self.offset, kept * self.stride);
            if delta > 0 {
                pix.copy_within(base + shift..base + shift + len, base);
            } else {
                pix.copy_within(base..base + len, base + shift);
            }
            return;
        }

        if delta > 0 {
            for row in 0..kept {
                let dst = self.offset + row * self.stride;
                pix.copy_within(dst + shift..dst + shift + row_bytes, dst);
            }
        } else {
            for row in (0..kept).rev() {
                let src = self.offset + row * self.stride;
                pix.copy_within(src..src + row_bytes, src + shift);
            }
        }
    }

    /// Shift the content inside `region` up by `delta` rows (down if
    /// negative), leaving everything outside the region alone.
    ///
    /// Only rows that have a source inside the region are written; the
    /// `|delta|` rows at the trailing edge keep their old bytes. A `delta`
    /// at least as large as the region's height moves nothing.
    pub fn region_scroll(&mut self, region: Rectangle, delta: i32) {
        let region = region.intersect(self.rect);
        if region.is_empty() || delta == 0 {
            return;
        }
        let Some(pix) = &self.pix else {
            return;
        };
        let mut pix = pix.borrow_mut();
        let (x0, x1) = (region.min.x, region.max.x);

        if delta > 0 {
            for y in region.min.y..region.max.y.saturating_sub(delta) {
                let src = self.span(y + delta, x0, x1);
                pix.copy_within(src, self.index(x0, y));
            }
        } else {
            for y in (region.min.y.saturating_sub(delta)..region.max.y).rev() {
                let src = self.span(y + delta, x0, x1);
                pix.copy_within(src, self.index(x0, y));
            }
        }
    }

    // --- Fill ---

    /// Set every pixel in `r` to `c`.
    pub fn fill<C: Color>(&mut self, r: Rectangle, c: C) {
        let r = r.intersect(self.rect);
        if r.is_empty() {
            return;
        }
        let Some(pix) = &self.pix else {
            return;
        };
        let px = color::to_bytes(c.to_native());
        let mut pix = pix.borrow_mut();
        for y in r.min.y..r.max.y {
            for dst in pix[self.span(y, r.min.x, r.max.x)].chunks_exact_mut(BYTES_PER_PIXEL) {
                dst.copy_from_slice(&px);
            }
        }
    }

    // --- Interop ---

    /// Copy the visible pixels into a tightly packed [`ImgVec`].
    pub fn to_img_vec(&self) -> ImgVec<Bgra8> {
        let (width, height) = (self.width(), self.height());
        let mut out = Vec::with_capacity(width * height);
        if let Some(pix) = &self.pix {
            let pix = pix.borrow();
            let (x0, x1) = (self.rect.min.x, self.rect.max.x);
            for y in self.rect.min.y..self.rect.max.y {
                out.extend(
                    pix[self.span(y, x0, x1)]
                        .chunks_exact(BYTES_PER_PIXEL)
                        .map(|s| color::from_bytes([s[0], s[1], s[2], s[3]])),
                );
            }
        }
        ImgVec::new(out, width, height)
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PixelBuffer({}x{} at {}, stride {})",
            self.width(),
            self.height(),
            self.rect.min,
            self.stride
        )
    }
}

// ---------------------------------------------------------------------------
// ImgRef → PixelBuffer (always copies)
// ---------------------------------------------------------------------------

impl From<ImgRef<'_, Bgra8>> for PixelBuffer {
    fn from(img: ImgRef<'_, Bgra8>) -> Self {
        let size = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        let mut buf = PixelBuffer::with_size(size(img.width()), size(img.height()));
        let (stride, width, height) = (buf.stride, buf.width(), buf.height());
        buf.with_pix_mut(|pix| {
            for (y, row) in img.rows().take(height).enumerate() {
                for (x, px) in row.iter().take(width).enumerate() {
                    let i = y * stride + x * BYTES_PER_PIXEL;
                    pix[i..i + BYTES_PER_PIXEL].copy_from_slice(&color::to_bytes(*px));
                }
            }
        });
        buf
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
