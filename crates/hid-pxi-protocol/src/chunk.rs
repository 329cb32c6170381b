//! Splitting an image into objects and objects into payload packets.
//!
//! The image is cut into objects of at most [`OBJECT_SIZE_MAX`] bytes. Each
//! object is created on the device as one unit and then streamed as
//! MTU-sized payload packets; only the last packet of an object may be short.

use crate::checksum::{checksum16, combine};
use core::num::NonZeroUsize;

/// Fixed object size cap. The device also advertises a maximum object size
/// during negotiation, but transfers always use this value.
pub const OBJECT_SIZE_MAX: usize = 4096;

/// One object of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareObject<'a> {
    /// Sequence index, 0-based.
    pub index: usize,
    /// Byte address of the first byte within the image.
    pub address: usize,
    pub data: &'a [u8],
}

impl<'a> FirmwareObject<'a> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn checksum(&self) -> u16 {
        checksum16(self.data)
    }

    /// Payload packets of at most `mtu` bytes, in transmission order.
    pub fn packets(&self, mtu: NonZeroUsize) -> core::slice::Chunks<'a, u8> {
        self.data.chunks(mtu.get())
    }

    /// Number of payload packets for the given MTU.
    pub fn packet_count(&self, mtu: NonZeroUsize) -> usize {
        self.data.len().div_ceil(mtu.get())
    }
}

/// Number of objects an image of `image_len` bytes splits into.
pub fn object_count(image_len: usize) -> usize {
    image_len.div_ceil(OBJECT_SIZE_MAX)
}

/// All objects of `image`, in index order.
pub fn split_objects(image: &[u8]) -> impl ExactSizeIterator<Item = FirmwareObject<'_>> {
    image
        .chunks(OBJECT_SIZE_MAX)
        .enumerate()
        .map(|(index, data)| FirmwareObject {
            index,
            address: index.saturating_mul(OBJECT_SIZE_MAX),
            data,
        })
}

/// Checksum of the first `count` objects, or `None` when the image has fewer.
pub fn prefix_checksum(image: &[u8], count: usize) -> Option<u16> {
    if count > object_count(image.len()) {
        return None;
    }
    Some(
        split_objects(image)
            .take(count)
            .fold(0u16, |acc, object| combine(acc, object.checksum())),
    )
}
