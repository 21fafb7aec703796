//! Buffer: an immutable-by-convention, reference-counted byte payload.
//!
//! A `Buffer` is the only kind of value that flows through ports. Cloning a
//! `Buffer` aliases the same backing storage (O(1)); there is no copy-on-write
//! and no implicit clone on mutation — callers must not mutate a `Buffer`
//! after handing it to a port's `set`.

use std::sync::Arc;

use crate::error::{FlowstepError, Result};

/// Shape/format descriptor for a buffer's payload, mirroring the original
/// component architecture's `buffer_info`. Ports never interpret this; only
/// `connect` (for typed ports) and [`compatible`] consult it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferInfo {
    /// Size in bytes of one logical element.
    pub item_size: usize,
    /// A short tag identifying the element format (e.g. `"u8"`, `"f32"`).
    pub format: &'static str,
    /// Element counts per dimension. `[n]` for a flat buffer of `n`
    /// elements.
    pub shape: Vec<usize>,
}

impl BufferInfo {
    fn bytes(len: usize) -> Self {
        BufferInfo {
            item_size: 1,
            format: "u8",
            shape: vec![len],
        }
    }

    /// Total element count implied by `shape`.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }
}

struct Storage {
    bytes: Vec<u8>,
    info: BufferInfo,
}

/// A variable-length byte sequence with shared-ownership copy semantics.
///
/// Two `Buffer`s compare equal iff their contents (and shape/format
/// descriptor) are equal — not iff they alias the same storage. Use
/// `Arc::ptr_eq` on the inner handle (not exposed) if aliasing identity is
/// ever needed; the kernel itself never needs it because [`Port`](crate::port::Port)
/// provides its own identity semantics.
#[derive(Clone)]
pub struct Buffer {
    storage: Arc<Storage>,
}

impl Buffer {
    /// A zero-filled buffer of `len` bytes.
    pub fn new(len: usize) -> Self {
        Self::filled(len, 0)
    }

    /// A buffer of `len` bytes, each set to `fill`.
    pub fn filled(len: usize, fill: u8) -> Self {
        Buffer {
            storage: Arc::new(Storage {
                bytes: vec![fill; len],
                info: BufferInfo::bytes(len),
            }),
        }
    }

    /// Construct a buffer from a byte iterator.
    pub fn from_bytes<I: IntoIterator<Item = u8>>(bytes: I) -> Self {
        let bytes: Vec<u8> = bytes.into_iter().collect();
        let info = BufferInfo::bytes(bytes.len());
        Buffer {
            storage: Arc::new(Storage { bytes, info }),
        }
    }

    /// Construct a buffer carrying an explicit shape/format descriptor, from
    /// raw bytes already laid out for that shape.
    pub fn with_info(bytes: Vec<u8>, info: BufferInfo) -> Self {
        Buffer {
            storage: Arc::new(Storage { bytes, info }),
        }
    }

    /// Number of bytes in the buffer.
    pub fn size(&self) -> usize {
        self.storage.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.bytes.is_empty()
    }

    /// Raw byte view.
    pub fn data(&self) -> &[u8] {
        &self.storage.bytes
    }

    /// The shape/format descriptor.
    pub fn info(&self) -> &BufferInfo {
        &self.storage.info
    }

    /// Single-byte element access.
    ///
    /// Fails with [`FlowstepError::IndexOutOfRange`] if `index >= size()`.
    pub fn get(&self, index: usize) -> Result<u8> {
        self.storage
            .bytes
            .get(index)
            .copied()
            .ok_or(FlowstepError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.storage.info == other.storage.info && self.storage.bytes == other.storage.bytes
    }
}
impl Eq for Buffer {}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("size", &self.size())
            .field("format", &self.storage.info.format)
            .finish()
    }
}

/// Two buffers are compatible for a typed `connect` when their shape/format
/// descriptors match, independent of current content.
pub fn compatible(lhs: &Buffer, rhs: &Buffer) -> bool {
    lhs.storage.info == rhs.storage.info
}

/// An empty buffer with the same shape/format descriptor as `other`, filled
/// with zero bytes.
pub fn zeros_like(other: &Buffer) -> Buffer {
    Buffer::with_info(vec![0u8; other.size()], other.info().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_sizes() {
        let b = Buffer::new(4);
        assert_eq!(b.size(), 4);
        assert_eq!(b.data(), &[0, 0, 0, 0]);
    }

    #[test]
    fn from_bytes_round_trip() {
        let bs = vec![1u8, 2, 3];
        let b = Buffer::from_bytes(bs.clone());
        assert_eq!(b.data(), bs.as_slice());
    }

    #[test]
    fn content_equality_not_identity() {
        let a = Buffer::from_bytes(vec![1, 2, 3]);
        let b = Buffer::from_bytes(vec![1, 2, 3]);
        assert_eq!(a, b);
    }

    #[test]
    fn index_out_of_range() {
        let b = Buffer::new(2);
        assert!(b.get(5).is_err());
        assert!(b.get(1).is_ok());
    }

    #[test]
    fn compatible_checks_shape_not_content() {
        let a = Buffer::new(4);
        let b = Buffer::filled(4, 9);
        assert!(compatible(&a, &b));
        let c = Buffer::new(5);
        assert!(!compatible(&a, &c));
    }

    #[test]
    fn zeros_like_preserves_info() {
        let original = Buffer::filled(4, 7);
        let z = zeros_like(&original);
        assert_eq!(z.size(), original.size());
        assert_eq!(z.info(), original.info());
        assert_eq!(z.data(), &[0, 0, 0, 0]);
    }
}
