//! Bounds-checked view over a caller-owned output buffer.
//!
//! The pointer and length are validated once, in [`DestinationBuffer::from_raw`];
//! all truncation and termination logic works on the validated view.

use std::ffi::c_int;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

/// Borrowed, non-empty byte region that receives null-terminated UTF-8.
///
/// Holds a raw pointer rather than a slice because the caller's memory may be
/// uninitialized; bytes are only ever written, never read.
#[derive(Debug)]
pub struct DestinationBuffer<'a> {
    ptr: NonNull<u8>,
    capacity: usize,
    _borrow: PhantomData<&'a mut [u8]>,
}

impl<'a> DestinationBuffer<'a> {
    /// View over a Rust-owned slice. `None` when the slice is empty.
    pub fn new(bytes: &'a mut [u8]) -> Option<Self> {
        let capacity = bytes.len();
        if capacity == 0 {
            return None;
        }
        Some(Self {
            ptr: NonNull::from(bytes).cast(),
            capacity,
            _borrow: PhantomData,
        })
    }

    /// Validate a foreign pointer and byte length. `None` when the pointer is
    /// null or the length is not positive.
    ///
    /// # Safety
    /// When `ptr` is non-null it must be valid for writes of `len` bytes for
    /// `'a`, and nothing else may access that memory during `'a`.
    #[allow(unsafe_code)]
    pub unsafe fn from_raw(ptr: *mut u8, len: c_int) -> Option<Self> {
        let ptr = NonNull::new(ptr)?;
        let capacity = usize::try_from(len).ok().filter(|&len| len > 0)?;
        Some(Self {
            ptr,
            capacity,
            _borrow: PhantomData,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy `text` as UTF-8, truncated to `capacity - 1` bytes, and
    /// null-terminate it. `None` writes only the terminator.
    ///
    /// Truncation is byte-oriented and may split a multi-byte sequence.
    /// Returns the number of payload bytes, excluding the terminator.
    #[allow(unsafe_code)]
    pub fn write(&mut self, text: Option<&str>) -> usize {
        let payload = text.map(str::as_bytes).unwrap_or_default();
        let written = payload.len().min(self.capacity - 1);
        // SAFETY: `written < capacity`, so the copy and the terminator both
        // stay inside the region validated at construction.
        unsafe {
            ptr::copy_nonoverlapping(payload.as_ptr(), self.ptr.as_ptr(), written);
            self.ptr.as_ptr().add(written).write(0);
        }
        written
    }
}
