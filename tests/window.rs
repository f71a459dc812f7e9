use std::collections::VecDeque;

use bgra_framebuffer::{
    BufferConfig, Frame, PresentMode, Presenter, Rectangle, Rgb, Window, WindowConfig, WindowError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Expose,
    Key(u32),
}

#[derive(Debug, thiserror::Error)]
enum SurfaceError {
    #[error("display connection closed")]
    Closed,
    #[error("frame rejected: expected stride {expected}, got {actual}")]
    Stride { expected: usize, actual: usize },
}

/// Records what a real surface would have drawn.
struct RecordingSurface {
    queue: VecDeque<Event>,
    screen: Vec<u8>,
    stride: usize,
    presents: usize,
}

impl RecordingSurface {
    fn new(stride: usize, events: &[Event]) -> Self {
        Self {
            queue: events.iter().copied().collect(),
            screen: Vec::new(),
            stride,
            presents: 0,
        }
    }
}

impl Presenter for RecordingSurface {
    type Event = Event;
    type Error = SurfaceError;

    fn wait_ready(&mut self) -> Result<(), SurfaceError> {
        loop {
            match self.next_event()? {
                Event::Expose => return Ok(()),
                Event::Key(_) => continue,
            }
        }
    }

    fn present(&mut self, frame: Frame<'_>) -> Result<(), SurfaceError> {
        if frame.stride() != self.stride {
            return Err(SurfaceError::Stride {
                expected: self.stride,
                actual: frame.stride(),
            });
        }
        self.screen = frame.data().to_vec();
        self.presents += 1;
        Ok(())
    }

    fn next_event(&mut self) -> Result<Event, SurfaceError> {
        self.queue.pop_front().ok_or(SurfaceError::Closed)
    }
}

#[test]
fn open_consumes_events_until_expose() {
    let surface = RecordingSurface::new(8, &[Event::Key(1), Event::Expose, Event::Key(2)]);
    let mut window = Window::open(2, 2, surface, &WindowConfig::new()).unwrap();
    assert_eq!(window.next_event().unwrap(), Event::Key(2));
    assert!(matches!(window.next_event(), Err(SurfaceError::Closed)));
}

#[test]
fn open_without_expose_fails() {
    let surface = RecordingSurface::new(8, &[Event::Key(1)]);
    let err = Window::open(2, 2, surface, &WindowConfig::new()).unwrap_err();
    assert!(matches!(err, WindowError::Present(SurfaceError::Closed)));
    assert_eq!(err.to_string(), "presenter: display connection closed");
}

#[test]
fn screen_shows_bgra_bytes() {
    let surface = RecordingSurface::new(8, &[Event::Expose]);
    let mut window = Window::open(2, 1, surface, &WindowConfig::new()).unwrap();
    window.set(1, 0, Rgb { r: 0xcc_u8, g: 0xbb, b: 0xaa }).unwrap();
    let (_, surface) = window.into_parts();
    assert_eq!(surface.presents, 1);
    assert_eq!(surface.screen, vec![0, 0, 0, 0, 0xaa, 0xbb, 0xcc, 0xff]);
}

#[test]
fn deferred_batches_drawing() {
    let config = WindowConfig::new().with_present_mode(PresentMode::Deferred);
    let surface = RecordingSurface::new(12, &[Event::Expose]);
    let mut window = Window::open(3, 3, surface, &config).unwrap();
    for x in 0..3 {
        window.set(x, x, Rgb { r: 1u8, g: 1, b: 1 }).unwrap();
    }
    window.buffer_mut().scroll(1);
    assert_eq!(window.presenter().presents, 0);
    window.sync().unwrap();
    assert_eq!(window.presenter().presents, 1);
    assert_eq!(window.buffer().at(1, 0).a, 0xff);
}

#[test]
fn presenter_errors_surface_from_sync() {
    let config = WindowConfig::new()
        .with_present_mode(PresentMode::Deferred)
        .with_buffer(BufferConfig::new().with_row_alignment(32));
    let surface = RecordingSurface::new(12, &[Event::Expose]);
    let mut window = Window::open(3, 2, surface, &config).unwrap();
    let err = window.sync().unwrap_err();
    assert_eq!(err.to_string(), "frame rejected: expected stride 12, got 32");
    // Drawing still works without a successful push.
    window.buffer_mut().fill(Rectangle::from_size(3, 2), [0u8, 0, 0, 0xff]);
    assert!(window.buffer().opaque());
}
