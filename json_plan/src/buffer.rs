//! Output buffer, and a pool for reusing buffers.

use std::{
	fmt, io, mem,
	ops::{Deref, DerefMut},
	str,
};

use parking_lot::{const_mutex, Mutex};

/// Append-only byte buffer which plans write JSON into.
///
/// Just a wrapper around `Vec<u8>`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Buffer {
	bytes: Vec<u8>,
}

impl Buffer {
	/// Create new `Buffer` without allocating.
	/// Memory will be allocated when first value is written.
	pub const fn new() -> Self {
		Self { bytes: Vec::new() }
	}

	/// Create new `Buffer` with pre-allocated capacity of `capacity` bytes.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			bytes: Vec::with_capacity(capacity),
		}
	}

	/// Append bytes.
	#[inline]
	pub fn write(&mut self, bytes: &[u8]) {
		self.bytes.extend_from_slice(bytes);
	}

	/// Append a single byte.
	#[inline]
	pub fn write_byte(&mut self, byte: u8) {
		self.bytes.push(byte);
	}

	/// Append a string.
	#[inline]
	pub fn write_string(&mut self, s: &str) {
		self.write(s.as_bytes());
	}

	/// Get contents as bytes.
	#[inline]
	pub fn as_bytes(&self) -> &[u8] {
		self.bytes.as_slice()
	}

	/// Get contents as a string.
	///
	/// Output is always valid UTF-8 unless a `raw` field injected bytes which are not.
	pub fn as_str(&self) -> Result<&str, str::Utf8Error> {
		str::from_utf8(&self.bytes)
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	#[inline]
	pub fn capacity(&self) -> usize {
		self.bytes.capacity()
	}

	/// Clear contents, retaining allocated memory.
	#[inline]
	pub fn clear(&mut self) {
		self.bytes.clear();
	}

	/// Consume `Buffer` and return contents as a `Vec<u8>`.
	pub fn into_vec(self) -> Vec<u8> {
		self.bytes
	}

	#[inline]
	pub(crate) fn truncate(&mut self, len: usize) {
		self.bytes.truncate(len);
	}

	/// Remove trailing `,` if there is one.
	#[inline]
	pub(crate) fn trim_separator(&mut self) {
		if self.bytes.last() == Some(&b',') {
			self.bytes.pop();
		}
	}
}

impl From<Buffer> for Vec<u8> {
	fn from(buffer: Buffer) -> Self {
		buffer.bytes
	}
}

impl fmt::Debug for Buffer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Buffer")
			.field(&String::from_utf8_lossy(&self.bytes))
			.finish()
	}
}

// Writing to a `Buffer` cannot fail
impl io::Write for Buffer {
	#[inline]
	fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
		Buffer::write(self, bytes);
		Ok(bytes.len())
	}

	#[inline]
	fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
		Buffer::write(self, bytes);
		Ok(())
	}

	#[inline]
	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl fmt::Write for Buffer {
	#[inline]
	fn write_str(&mut self, s: &str) -> fmt::Result {
		self.write_string(s);
		Ok(())
	}
}

/// Global pool used by [`acquire`].
static POOL: BufferPool = BufferPool::new();

/// Acquire a buffer from the global pool.
///
/// Buffer is returned to the pool when the [`PooledBuffer`] is dropped.
pub fn acquire() -> PooledBuffer<'static> {
	POOL.acquire()
}

/// Pool of [`Buffer`]s, so serializing doesn't need to allocate a fresh buffer each time.
///
/// # Limits
///
/// `max_retained` is the maximum number of idle buffers the pool keeps.
/// Buffers released when the pool is full are dropped.
///
/// `max_capacity` is the largest capacity (in bytes) a released buffer may have and still be
/// retained. Stops one huge document pinning a large allocation in the pool forever.
pub struct BufferPool {
	free: Mutex<Vec<Buffer>>,
	max_retained: usize,
	max_capacity: usize,
}

impl BufferPool {
	/// Default maximum number of idle buffers retained.
	pub const DEFAULT_MAX_RETAINED: usize = 64;

	/// Default maximum capacity of a retained buffer.
	pub const DEFAULT_MAX_CAPACITY: usize = 64 * 1024;

	/// Create new pool with default limits.
	pub const fn new() -> Self {
		Self::with_limits(Self::DEFAULT_MAX_RETAINED, Self::DEFAULT_MAX_CAPACITY)
	}

	/// Create new pool with custom limits.
	pub const fn with_limits(max_retained: usize, max_capacity: usize) -> Self {
		Self {
			free: const_mutex(Vec::new()),
			max_retained,
			max_capacity,
		}
	}

	/// Take a buffer from the pool, or create a new one if pool is empty.
	///
	/// Buffer is always empty.
	pub fn acquire(&self) -> PooledBuffer<'_> {
		let buffer = self.free.lock().pop().unwrap_or_default();
		PooledBuffer { buffer, pool: self }
	}

	/// Return a buffer to the pool.
	///
	/// Buffer is cleared. It's dropped instead if it has no allocation, is over capacity limit,
	/// or pool is full.
	pub fn release(&self, mut buffer: Buffer) {
		let capacity = buffer.capacity();
		if capacity == 0 || capacity > self.max_capacity {
			return;
		}

		buffer.clear();
		let mut free = self.free.lock();
		if free.len() < self.max_retained {
			free.push(buffer);
		}
	}

	/// Number of idle buffers currently held.
	pub fn retained(&self) -> usize {
		self.free.lock().len()
	}
}

impl Default for BufferPool {
	fn default() -> Self {
		Self::new()
	}
}

/// A [`Buffer`] borrowed from a [`BufferPool`]. Returned to the pool on drop.
pub struct PooledBuffer<'p> {
	buffer: Buffer,
	pool: &'p BufferPool,
}

impl PooledBuffer<'_> {
	/// Take the buffer out, so it is not returned to the pool.
	pub fn detach(mut self) -> Buffer {
		mem::take(&mut self.buffer)
	}
}

impl Deref for PooledBuffer<'_> {
	type Target = Buffer;

	#[inline]
	fn deref(&self) -> &Buffer {
		&self.buffer
	}
}

impl DerefMut for PooledBuffer<'_> {
	#[inline]
	fn deref_mut(&mut self) -> &mut Buffer {
		&mut self.buffer
	}
}

impl Drop for PooledBuffer<'_> {
	fn drop(&mut self) {
		self.pool.release(mem::take(&mut self.buffer));
	}
}
