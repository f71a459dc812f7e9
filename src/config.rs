//! Allocation settings and resource limits for pixel buffers.
//!
//! [`BufferConfig`] controls row padding and caps how large a buffer may be.
//! [`LimitExceeded`] is returned when a check fails. Plain
//! [`PixelBuffer::new`](crate::PixelBuffer::new) ignores all of this and
//! allocates tightly packed rows.

use crate::buffer::BufferError;
use crate::color::BYTES_PER_PIXEL;

/// Allocation settings for [`PixelBuffer::with_config`](crate::PixelBuffer::with_config).
///
/// All limits are optional; `None` means no limit for that resource.
///
/// # Example
///
/// ```
/// use bgra_framebuffer::{BufferConfig, PixelBuffer, Rectangle};
///
/// let config = BufferConfig::new()
///     .with_row_alignment(64)
///     .with_max_pixels(4096 * 4096);
/// let buf = PixelBuffer::with_config(Rectangle::from_size(100, 10), &config).unwrap();
/// assert_eq!(buf.stride(), 448);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct BufferConfig {
    /// Row pitch is rounded up to a multiple of this many bytes. Must be a
    /// power of two; 1 means tightly packed.
    pub row_alignment: usize,
    /// Maximum width in pixels.
    pub max_width: Option<u32>,
    /// Maximum height in pixels.
    pub max_height: Option<u32>,
    /// Maximum total pixels (width × height).
    pub max_pixels: Option<u64>,
    /// Maximum storage allocation in bytes, padding included.
    pub max_memory_bytes: Option<u64>,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            row_alignment: 1,
            max_width: None,
            max_height: None,
            max_pixels: None,
            max_memory_bytes: None,
        }
    }
}

impl BufferConfig {
    /// Tightly packed rows, no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Round row pitch up to a multiple of `bytes`.
    pub fn with_row_alignment(mut self, bytes: usize) -> Self {
        self.row_alignment = bytes;
        self
    }

    /// Set maximum width in pixels.
    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Set maximum height in pixels.
    pub fn with_max_height(mut self, height: u32) -> Self {
        self.max_height = Some(height);
        self
    }

    /// Set maximum total pixels.
    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    /// Set maximum storage allocation in bytes.
    pub fn with_max_memory(mut self, bytes: u64) -> Self {
        self.max_memory_bytes = Some(bytes);
        self
    }

    /// Whether any limits are set.
    pub fn has_limits(&self) -> bool {
        self.max_width.is_some()
            || self.max_height.is_some()
            || self.max_pixels.is_some()
            || self.max_memory_bytes.is_some()
    }

    /// Row pitch for a buffer `width` pixels wide, or `None` if it
    /// overflows or the alignment is not a power of two.
    pub fn stride_for(&self, width: usize) -> Option<usize> {
        if !self.row_alignment.is_power_of_two() {
            return None;
        }
        let raw = width.checked_mul(BYTES_PER_PIXEL)?;
        let mask = self.row_alignment - 1;
        Some(raw.checked_add(mask)? & !mask)
    }

    // --- Validation ---

    /// Check dimensions against `max_width`, `max_height`, and `max_pixels`.
    pub fn check_size(&self, width: u32, height: u32) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_width.filter(|&max| width > max) {
            return Err(LimitExceeded::Width { actual: width, max });
        }
        if let Some(max) = self.max_height.filter(|&max| height > max) {
            return Err(LimitExceeded::Height {
                actual: height,
                max,
            });
        }
        let pixels = u64::from(width) * u64::from(height);
        match self.max_pixels.filter(|&max| pixels > max) {
            Some(max) => Err(LimitExceeded::Pixels {
                actual: pixels,
                max,
            }),
            None => Ok(()),
        }
    }

    /// Row pitch and total storage length for a buffer `width` pixels wide
    /// and `height` rows tall.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidAlignment`] if the row alignment is not a power
    /// of two, [`BufferError::InvalidDimensions`] if the size overflows, and
    /// [`LimitExceeded::Memory`] if the storage, padding included, is larger
    /// than `max_memory_bytes`.
    pub fn layout(&self, width: usize, height: usize) -> Result<(usize, usize), BufferError> {
        if !self.row_alignment.is_power_of_two() {
            return Err(BufferError::InvalidAlignment);
        }
        let stride = self.stride_for(width).ok_or(BufferError::InvalidDimensions)?;
        let len = stride.checked_mul(height).ok_or(BufferError::InvalidDimensions)?;
        let bytes = len as u64;
        if let Some(max) = self.max_memory_bytes.filter(|&max| bytes > max) {
            return Err(LimitExceeded::Memory { actual: bytes, max }.into());
        }
        Ok((stride, len))
    }
}

/// A buffer size limit was exceeded.
///
/// Each variant carries the requested value and the limit it broke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LimitExceeded {
    /// Width exceeded `max_width`.
    Width {
        /// Requested width.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Height exceeded `max_height`.
    Height {
        /// Requested height.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Pixel count exceeded `max_pixels`.
    Pixels {
        /// Requested pixel count.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
    /// Storage size exceeded `max_memory_bytes`.
    Memory {
        /// Storage size in bytes.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
}

impl core::fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Width { actual, max } => write!(f, "width {actual} exceeds limit {max}"),
            Self::Height { actual, max } => write!(f, "height {actual} exceeds limit {max}"),
            Self::Pixels { actual, max } => {
                write!(f, "pixel count {actual} exceeds limit {max}")
            }
            Self::Memory { actual, max } => {
                write!(f, "memory {actual} bytes exceeds limit {max}")
            }
        }
    }
}

impl core::error::Error for LimitExceeded {}
