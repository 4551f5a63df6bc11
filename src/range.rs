//! Compact byte ranges into a scanned buffer.
//!
//! Highlight spans and tag-name positions are stored as `u32` offsets, which
//! covers any buffer an editor would hand to the scanner.

/// Half-open byte range `start..end` into a buffer.
///
/// # Example
/// ```
/// use jsx_indent::Range;
///
/// let text = "<Foo.Bar />";
/// let name = Range::new(1, 8);
/// assert_eq!(name.slice_str(text), Some("Foo.Bar"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

const _: () = assert!(std::mem::size_of::<Range>() == 8);

impl Range {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a range from `usize` offsets.
    ///
    /// Offsets past `u32::MAX` are clamped; buffers that large are never
    /// scanned past the lookback window anyway.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        Self {
            start: clamp_u32(start),
            end: clamp_u32(end),
        }
    }

    /// Shift both ends by `delta` bytes.
    #[inline]
    pub const fn offset_by(self, delta: u32) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    #[inline]
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.start as usize..self.end as usize]
    }

    /// The range as a `&str`, or `None` if it does not fall on char boundaries.
    #[inline]
    pub fn slice_str<'a>(&self, input: &'a str) -> Option<&'a str> {
        input.get(self.start as usize..self.end as usize)
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub const fn start_usize(&self) -> usize {
        self.start as usize
    }

    #[inline]
    pub const fn end_usize(&self) -> usize {
        self.end as usize
    }

    /// Check if this range contains a position.
    #[inline]
    pub const fn contains(&self, pos: u32) -> bool {
        pos >= self.start && pos < self.end
    }
}

#[inline]
fn clamp_u32(v: usize) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

impl From<std::ops::Range<usize>> for Range {
    #[inline]
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::from_usize(r.start, r.end)
    }
}

impl From<Range> for std::ops::Range<usize> {
    #[inline]
    fn from(r: Range) -> Self {
        r.start_usize()..r.end_usize()
    }
}
