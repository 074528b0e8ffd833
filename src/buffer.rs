use std::fmt::{self, Write as _};

use crate::error::{FormatError, Result};

/// Capacity of a rendered line, sentinel included.
pub const LINE_CAPACITY: usize = 32;

// Scratch size for a single numeric operand; "-2147483648" is the longest.
const PAD_CAPACITY: usize = 16;

/// Fixed-capacity, append-only text buffer living on the stack.
///
/// Appends are all-or-nothing: an append that does not fit is rejected with
/// [`FormatError::Overflow`] and leaves the buffer unchanged. The NUL
/// sentinel written by [`OutputBuf::terminate`] occupies one byte of the
/// capacity, so an `OutputBuf<N>` holds at most `N - 1` bytes of finished
/// text.
#[derive(Clone, PartialEq, Eq)]
pub struct OutputBuf<const N: usize = LINE_CAPACITY> {
    bytes: [u8; N],
    len: usize,
    terminated: bool,
}

/// The buffer used for one formatted instruction line.
pub type LineBuf = OutputBuf<LINE_CAPACITY>;

impl<const N: usize> OutputBuf<N> {
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
            terminated: false,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Text length in bytes, sentinel excluded.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn remaining(&self) -> usize {
        N - self.len
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.terminated = false;
    }

    pub fn as_str(&self) -> &str {
        // Only whole `&str`/`char` encodings are ever copied in.
        std::str::from_utf8(&self.bytes[..self.len]).expect("buffer holds whole UTF-8 sequences")
    }

    /// The text followed by its NUL sentinel, once terminated.
    pub fn as_bytes_with_nul(&self) -> Option<&[u8]> {
        self.terminated.then(|| &self.bytes[..=self.len])
    }

    fn reserve(&self, extra: usize) -> Result<()> {
        let needed = self.len + extra;
        if needed > N {
            return Err(FormatError::Overflow {
                capacity: N,
                needed,
            });
        }
        Ok(())
    }

    fn push_bytes(&mut self, src: &[u8]) -> Result<()> {
        self.reserve(src.len())?;
        self.bytes[self.len..self.len + src.len()].copy_from_slice(src);
        self.len += src.len();
        self.terminated = false;
        Ok(())
    }

    pub fn push(&mut self, c: char) -> Result<()> {
        let mut utf8 = [0u8; 4];
        self.push_bytes(c.encode_utf8(&mut utf8).as_bytes())
    }

    pub fn push_str(&mut self, s: &str) -> Result<()> {
        self.push_bytes(s.as_bytes())
    }

    /// Appends `n` as `0x` and two lower-case hex digits.
    pub fn push_u8(&mut self, n: u8) -> Result<()> {
        self.push_fmt(format_args!("0x{n:02x}"))
    }

    /// Appends `n` as `0x` and four lower-case hex digits.
    pub fn push_u16(&mut self, n: u16) -> Result<()> {
        self.push_fmt(format_args!("0x{n:04x}"))
    }

    /// Appends `d` in decimal with an explicit sign, e.g. `+5` or `-3`.
    pub fn push_disp(&mut self, d: i32) -> Result<()> {
        self.push_fmt(format_args!("{d:+}"))
    }

    fn push_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let mut pad = OutputBuf::<PAD_CAPACITY>::new();
        pad.write_fmt(args).map_err(|_| FormatError::Overflow {
            capacity: PAD_CAPACITY,
            needed: PAD_CAPACITY + 1,
        })?;
        self.push_str(pad.as_str())
    }

    /// Writes the NUL sentinel after the text. Appending more text later
    /// overwrites the sentinel and clears the terminated state.
    pub fn terminate(&mut self) -> Result<()> {
        self.reserve(1)?;
        self.bytes[self.len] = 0;
        self.terminated = true;
        Ok(())
    }
}

impl<const N: usize> Default for OutputBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for OutputBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s).map_err(|_| fmt::Error)
    }
}

impl<const N: usize> fmt::Debug for OutputBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputBuf")
            .field("text", &self.as_str())
            .field("capacity", &N)
            .field("terminated", &self.terminated)
            .finish()
    }
}

impl<const N: usize> fmt::Display for OutputBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_appends_are_zero_padded_lower_case() {
        let mut b = LineBuf::new();
        b.push_u8(10).unwrap();
        b.push(' ').unwrap();
        b.push_u16(0x1234).unwrap();
        b.push(' ').unwrap();
        b.push_u16(0xabc).unwrap();
        assert_eq!(b.as_str(), "0x0a 0x1234 0x0abc");
    }

    #[test]
    fn displacement_always_signed() {
        let mut b = LineBuf::new();
        b.push_disp(5).unwrap();
        b.push_disp(-3).unwrap();
        b.push_disp(0).unwrap();
        b.push_disp(-128).unwrap();
        assert_eq!(b.as_str(), "+5-3+0-128");
    }

    #[test]
    fn overflow_is_rejected_without_partial_write() {
        let mut b = OutputBuf::<6>::new();
        b.push_str("ld ").unwrap();
        let err = b.push_u8(0xff).unwrap_err();
        assert_eq!(err, FormatError::Overflow { capacity: 6, needed: 7 });
        assert_eq!(b.as_str(), "ld ");
        b.push_str("abc").unwrap();
        assert_eq!(b.remaining(), 0);
        assert!(b.push('x').is_err());
    }

    #[test]
    fn sentinel_counts_against_capacity() {
        let mut b = OutputBuf::<4>::new();
        b.push_str("nop").unwrap();
        b.terminate().unwrap();
        assert_eq!(b.as_bytes_with_nul(), Some(&b"nop\0"[..]));
        assert_eq!(b.as_str(), "nop");

        let mut full = OutputBuf::<3>::new();
        full.push_str("nop").unwrap();
        assert_eq!(
            full.terminate(),
            Err(FormatError::Overflow { capacity: 3, needed: 4 })
        );
        assert_eq!(full.as_bytes_with_nul(), None);
    }

    #[test]
    fn push_after_terminate_replaces_sentinel() {
        let mut b = LineBuf::new();
        b.push_str("ld").unwrap();
        b.terminate().unwrap();
        b.push_str(" a").unwrap();
        assert!(!b.is_terminated());
        assert_eq!(b.as_str(), "ld a");
    }

    #[test]
    fn clear_resets() {
        let mut b = LineBuf::new();
        b.push_str("halt").unwrap();
        b.terminate().unwrap();
        b.clear();
        assert!(b.is_empty());
        assert!(!b.is_terminated());
        assert_eq!(b.capacity(), LINE_CAPACITY);
    }
}
