use crate::error::WireError;

/// Continuation bit of a varint byte.
pub const MSB: u8 = 0b1000_0000;
/// Mask that drops the continuation bit, leaving the 7 payload bits.
pub const DROP_MSB: u8 = 0b0111_1111;
/// A u64 never needs more than ten 7-bit groups.
pub const MAX_VARINT_LEN: usize = 10;

/// A read cursor over a protobuf wire-format buffer.
///
/// Example usage:
///
/// ```
/// let mut bb = protolens_wire::WireBuffer::new(&[0xAC, 0x02, 0x68, 0x69]);
/// assert_eq!(bb.read_varint(), Ok(300));
/// assert_eq!(bb.read_bytes(2), Ok(&b"hi"[..]));
/// assert!(bb.is_empty());
/// ```
///
pub struct WireBuffer<'a> {
    data: &'a [u8],
    index: usize,
}

impl<'a> WireBuffer<'a> {
    /// Create a new WireBuffer positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> WireBuffer<'a> {
        WireBuffer { data, index: 0 }
    }

    /// Create a new WireBuffer positioned at `index`. An index past the end
    /// behaves like an exhausted buffer.
    pub fn at(data: &'a [u8], index: usize) -> WireBuffer<'a> {
        WireBuffer { data, index }
    }

    /// Retrieves the underlying byte slice.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Retrieves the current index into the underlying byte slice. This starts
    /// off as 0 and ends up as `self.data().len()` when everything has been
    /// read.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.index >= self.data.len()
    }

    /// Looks at the byte under the cursor without consuming it.
    pub fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.index).copied()
    }

    /// Try to read a byte starting at the current index.
    pub fn read_byte(&mut self) -> Result<u8, WireError> {
        match self.peek_byte() {
            Some(value) => {
                self.index += 1;
                Ok(value)
            }
            None => Err(WireError::UnexpectedEof {
                offset: self.index,
                needed: 1,
            }),
        }
    }

    /// Try to read exactly `len` bytes starting at the current index. The
    /// returned slice aliases the underlying buffer.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        let start = self.index.min(self.data.len());
        let available = self.data.len() - start;
        if len > available {
            Err(WireError::UnexpectedEof {
                offset: self.index,
                needed: (len - available) as u64,
            })
        } else {
            let value = &self.data[start..start + len];
            self.index = start + len;
            Ok(value)
        }
    }

    /// Try to read an unsigned varint starting at the current index.
    ///
    /// The first byte holds the least-significant 7 bits; every byte with the
    /// continuation bit set is followed by another group.
    pub fn read_varint(&mut self) -> Result<u64, WireError> {
        let start = self.index;
        let first = self.read_byte()?;
        if first & MSB == 0 {
            return Ok(first as u64);
        }

        let mut result = (first & DROP_MSB) as u64;
        let mut shift = 7;
        for position in 1..MAX_VARINT_LEN {
            let byte = self.read_byte().map_err(|_| WireError::UnexpectedEof {
                offset: start,
                needed: 1,
            })?;
            // The tenth group only has room for bit 63.
            if position == MAX_VARINT_LEN - 1 && byte & DROP_MSB > 1 {
                return Err(WireError::VarintOverflow { offset: start });
            }
            result |= ((byte & DROP_MSB) as u64) << shift;
            if byte & MSB == 0 {
                return Ok(result);
            }
            shift += 7;
        }

        Err(WireError::VarintOverflow { offset: start })
    }
}

#[test]
fn read_byte() {
    let read = |bytes| WireBuffer::new(bytes).read_byte();
    assert_eq!(read(&[]), Err(WireError::UnexpectedEof { offset: 0, needed: 1 }));
    assert_eq!(read(&[0]), Ok(0));
    assert_eq!(read(&[1]), Ok(1));
    assert_eq!(read(&[254]), Ok(254));
    assert_eq!(read(&[255]), Ok(255));
}

#[test]
fn read_bytes() {
    let read = |bytes, len| WireBuffer::new(bytes).read_bytes(len);
    assert_eq!(read(&[], 0), Ok(vec![].as_slice()));
    assert_eq!(read(&[], 1), Err(WireError::UnexpectedEof { offset: 0, needed: 1 }));
    assert_eq!(read(&[0], 0), Ok(vec![].as_slice()));
    assert_eq!(read(&[0], 1), Ok(vec![0].as_slice()));
    assert_eq!(read(&[0], 3), Err(WireError::UnexpectedEof { offset: 0, needed: 2 }));

    let mut bb = WireBuffer::new(&[1, 2, 3, 4, 5]);
    assert_eq!(bb.read_bytes(3), Ok(vec![1, 2, 3].as_slice()));
    assert_eq!(bb.read_bytes(2), Ok(vec![4, 5].as_slice()));
    assert_eq!(bb.read_bytes(1), Err(WireError::UnexpectedEof { offset: 5, needed: 1 }));
}

#[test]
fn read_varint() {
    let read = |bytes| WireBuffer::new(bytes).read_varint();
    assert_eq!(read(&[]), Err(WireError::UnexpectedEof { offset: 0, needed: 1 }));
    assert_eq!(read(&[0]), Ok(0));
    assert_eq!(read(&[1]), Ok(1));
    assert_eq!(read(&[127]), Ok(127));
    assert_eq!(read(&[128]), Err(WireError::UnexpectedEof { offset: 0, needed: 1 }));
    assert_eq!(read(&[128, 0]), Ok(0));
    assert_eq!(read(&[128, 1]), Ok(128));
    assert_eq!(read(&[0xAC, 0x02]), Ok(300));
    assert_eq!(read(&[254, 255, 7]), Ok(131070));
    assert_eq!(read(&[255, 255, 255, 255, 15]), Ok(4294967295));
    assert_eq!(
        read(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]),
        Ok(u64::MAX)
    );
    assert_eq!(
        read(&[0xFF; 11]),
        Err(WireError::VarintOverflow { offset: 0 })
    );
    assert_eq!(
        read(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F]),
        Err(WireError::VarintOverflow { offset: 0 })
    );
    assert_eq!(
        read(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x02]),
        Err(WireError::VarintOverflow { offset: 0 })
    );
    assert_eq!(
        read(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01]),
        Ok(1 << 63)
    );
}

#[test]
fn read_at_offset() {
    let mut bb = WireBuffer::at(&[9, 9, 0x96, 0x01], 2);
    assert_eq!(bb.read_varint(), Ok(150));
    assert_eq!(bb.index(), 4);
    assert!(bb.is_empty());

    let mut past_end = WireBuffer::at(&[1], 4);
    assert!(past_end.is_empty());
    assert_eq!(past_end.read_bytes(0), Ok(vec![].as_slice()));
}
