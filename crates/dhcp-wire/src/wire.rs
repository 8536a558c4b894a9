use crate::error::{DecodeError, EncodeError};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Safely convert a byte slice to a fixed-size array.
/// Returns `DecodeError::TooShort` if the slice is the wrong length.
pub(crate) fn try_into_array<const N: usize>(data: &[u8]) -> Result<[u8; N], DecodeError> {
    data.try_into().map_err(|_| DecodeError::TooShort {
        expected: N,
        actual: data.len(),
    })
}

/// Forward-only big-endian reader over a borrowed buffer.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::TooShort {
                expected: self.pos + n,
                actual: self.data.len(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub(crate) fn rest(&mut self) -> &'a [u8] {
        let out = &self.data[self.pos..];
        self.pos = self.data.len();
        out
    }

    pub(crate) fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        try_into_array(self.take(N)?)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    pub(crate) fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    pub(crate) fn ipv4(&mut self) -> Result<Ipv4Addr, DecodeError> {
        Ok(Ipv4Addr::from(self.array::<4>()?))
    }

    pub(crate) fn ipv6(&mut self) -> Result<Ipv6Addr, DecodeError> {
        Ok(Ipv6Addr::from(self.array::<16>()?))
    }
}

/// Append a DHCPv6-style `code(2) len(2) data` option.
pub(crate) fn put_option16(out: &mut Vec<u8>, code: u16, data: &[u8]) -> Result<(), EncodeError> {
    let len = u16::try_from(data.len()).map_err(|_| EncodeError::OptionTooLong {
        code,
        len: data.len(),
        max: usize::from(u16::MAX),
    })?;
    out.extend_from_slice(&code.to_be_bytes());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(data);
    Ok(())
}

/// Append a DHCPv4-style `code(1) len(1) data` option.
pub(crate) fn put_option8(out: &mut Vec<u8>, code: u8, data: &[u8]) -> Result<(), EncodeError> {
    let len = u8::try_from(data.len()).map_err(|_| EncodeError::OptionTooLong {
        code: u16::from(code),
        len: data.len(),
        max: usize::from(u8::MAX),
    })?;
    out.push(code);
    out.push(len);
    out.extend_from_slice(data);
    Ok(())
}

/// Lowercase hex rendering used by `Display` impls.
pub(crate) fn hex(data: &[u8]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(data.len() * 2);
    for b in data {
        let _ = write!(s, "{b:02x}");
    }
    s
}
