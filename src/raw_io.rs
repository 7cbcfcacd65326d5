//! Raw binary `put` / `get` over anything that can read or write bytes.
//!
//! Values are dumped as their in-memory representation: host endianness,
//! host layout, no framing. Producer and consumer must agree on both.
//!
//! Only [`Pod`] types can travel this way: no padding, no pointers, every bit
//! pattern valid. For contiguous data [`put_slice`] and [`get_slice`] move
//! the whole slice with a single call; [`put_each`] and [`get_each`] work
//! element by element over any iterator. Both produce the same bytes.

use std::io;
use std::mem;

pub use bytemuck::{Pod, Zeroable};

use crate::{RawIoError, Result};

/// Destination of raw bytes.
pub trait Sink {
    /// Write all of `data` or fail.
    fn write(&mut self, data: &[u8]) -> Result<()>;
}

/// Origin of raw bytes.
pub trait Source {
    /// One read call; may transfer fewer bytes than requested.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    fn eof(&self) -> Result<bool>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        (**self).write(data)
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        (**self).read(buffer)
    }

    fn eof(&self) -> Result<bool> {
        (**self).eof()
    }
}

impl Sink for Vec<u8> {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.extend_from_slice(data);
        Ok(())
    }
}

impl Source for &[u8] {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let len = buffer.len().min(self.len());
        let (head, tail) = self.split_at(len);
        buffer[..len].copy_from_slice(head);
        *self = tail;
        Ok(len)
    }

    fn eof(&self) -> Result<bool> {
        Ok(self.is_empty())
    }
}

impl<T: AsRef<[u8]>> Source for io::Cursor<T> {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        io::Read::read(self, buffer).map_err(RawIoError::io("read"))
    }

    fn eof(&self) -> Result<bool> {
        Ok(self.position() >= self.get_ref().as_ref().len() as u64)
    }
}

fn read_exact_once<S: Source + ?Sized>(
    source: &mut S,
    buffer: &mut [u8],
) -> Result<()> {
    if buffer.is_empty() {
        return Ok(());
    }
    let actual = source.read(buffer)?;
    if actual != buffer.len() {
        return Err(RawIoError::ShortRead {
            expected: buffer.len(),
            actual,
        });
    }
    Ok(())
}

/// Write the raw bytes of a single value.
pub fn put<S: Sink + ?Sized, T: Pod>(sink: &mut S, value: &T) -> Result<()> {
    if mem::size_of::<T>() == 0 {
        return Ok(());
    }
    sink.write(bytemuck::bytes_of(value))
}

/// Write every item of `values`, one `put` per item.
pub fn put_each<S, I>(sink: &mut S, values: I) -> Result<()>
where
    S: Sink + ?Sized,
    I: IntoIterator,
    I::Item: Pod,
{
    for value in values {
        put(sink, &value)?;
    }
    Ok(())
}

/// Write a contiguous slice with a single `write` call.
pub fn put_slice<S: Sink + ?Sized, T: Pod>(
    sink: &mut S,
    values: &[T],
) -> Result<()> {
    if mem::size_of_val(values) == 0 {
        return Ok(());
    }
    sink.write(bytemuck::cast_slice(values))
}

/// Read one value into `dest`.
///
/// `dest` is only updated when all of its bytes were available.
pub fn get_into<S: Source + ?Sized, T: Pod>(
    source: &mut S,
    dest: &mut T,
) -> Result<()> {
    *dest = get(source)?;
    Ok(())
}

/// Read one value.
pub fn get<T: Pod, S: Source + ?Sized>(source: &mut S) -> Result<T> {
    let mut value = T::zeroed();
    if mem::size_of::<T>() != 0 {
        read_exact_once(source, bytemuck::bytes_of_mut(&mut value))?;
    }
    Ok(value)
}

/// Fill every item yielded by `dest`, one `get` per item.
pub fn get_each<'a, S, I, T>(source: &mut S, dest: I) -> Result<()>
where
    S: Source + ?Sized,
    I: IntoIterator<Item = &'a mut T>,
    T: Pod + 'a,
{
    for slot in dest {
        get_into(source, slot)?;
    }
    Ok(())
}

/// Fill a contiguous slice with a single `read` call.
///
/// A short read fails the whole call; `dest` may then hold a partial copy.
pub fn get_slice<S: Source + ?Sized, T: Pod>(
    source: &mut S,
    dest: &mut [T],
) -> Result<()> {
    if mem::size_of_val(dest) == 0 {
        return Ok(());
    }
    read_exact_once(source, bytemuck::cast_slice_mut(dest))
}

/// Fill `buffer` completely, issuing as many reads as it takes.
///
/// Only running out of data fails; the error then reports how many bytes
/// were obtained.
pub fn read_full<S: Source + ?Sized>(
    source: &mut S,
    buffer: &mut [u8],
) -> Result<()> {
    let mut filled = 0;
    while filled < buffer.len() {
        let bytes_read = source.read(&mut buffer[filled..])?;
        if bytes_read == 0 {
            return Err(RawIoError::ShortRead {
                expected: buffer.len(),
                actual: filled,
            });
        }
        filled += bytes_read;
    }
    Ok(())
}

/// Read `count` values into a new vector.
pub fn get_vec<T: Pod, S: Source + ?Sized>(
    source: &mut S,
    count: usize,
) -> Result<Vec<T>> {
    let mut values = vec![T::zeroed(); count];
    get_slice(source, &mut values)?;
    Ok(values)
}
