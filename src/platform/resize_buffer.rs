//=========================================================================
// Resize Buffer
//
// Holds the latest window size seen since the last frame boundary.
//
// A drag-resize produces a burst of `Resized` events per frame; only the
// last one matters to the core loop, so the buffer keeps a single slot
// and sends nothing when the size did not change.
//=========================================================================

//=== ResizeBuffer ========================================================

#[derive(Debug, Default)]
pub(crate) struct ResizeBuffer {
    pending: Option<(u32, u32)>,
    last_sent: Option<(u32, u32)>,
}

impl ResizeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a size, replacing anything pending.
    pub(crate) fn push(&mut self, width: u32, height: u32) {
        self.pending = Some((width, height));
    }

    /// Returns the pending size if it differs from the last one taken.
    pub(crate) fn take(&mut self) -> Option<(u32, u32)> {
        let size = self.pending.take()?;
        if self.last_sent == Some(size) {
            return None;
        }
        self.last_sent = Some(size);
        Some(size)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_to_latest() {
        let mut buffer = ResizeBuffer::new();
        buffer.push(800, 600);
        buffer.push(810, 605);
        buffer.push(820, 610);

        assert_eq!(buffer.take(), Some((820, 610)));
        assert!(buffer.is_empty());
        assert_eq!(buffer.take(), None);
    }

    #[test]
    fn repeated_size_is_not_resent() {
        let mut buffer = ResizeBuffer::new();
        buffer.push(800, 600);
        assert_eq!(buffer.take(), Some((800, 600)));

        buffer.push(800, 600);
        assert_eq!(buffer.take(), None);

        buffer.push(640, 480);
        assert_eq!(buffer.take(), Some((640, 480)));
    }
}
