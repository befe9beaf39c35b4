//! Chunked pixel streaming
//!
//! SPI transfers are bounded, so a frame is sent as a series of chunks.
//! Chunks always hold a whole number of pixels: a pixel's two bytes are
//! never split across transfers.

use crate::pixel::{Rgb565, BYTES_PER_PIXEL};

/// Default chunk size in bytes (2048 pixels)
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Errors from [`stream_pixels`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError<E> {
    /// The scratch buffer cannot hold a single pixel
    ChunkTooSmall,
    /// The sink rejected a chunk
    Sink(E),
}

/// Number of chunks needed for `pixels` pixels with a `chunk_size`-byte buffer
pub fn chunk_count(pixels: usize, chunk_size: usize) -> usize {
    let per_chunk = chunk_size / BYTES_PER_PIXEL;
    if per_chunk == 0 {
        return 0;
    }
    pixels.div_ceil(per_chunk)
}

/// Pack pixels to RGB565 and hand them to `sink` chunk by chunk
///
/// `buf` is the scratch buffer; its length (rounded down to even) is the
/// chunk size. The final chunk may be shorter. Returns the number of chunks
/// sent. Stops at the first sink error.
pub fn stream_pixels<I, F, E>(pixels: I, buf: &mut [u8], mut sink: F) -> Result<usize, StreamError<E>>
where
    I: IntoIterator<Item = Rgb565>,
    F: FnMut(&[u8]) -> Result<(), E>,
{
    let capacity = buf.len() - buf.len() % BYTES_PER_PIXEL;
    if capacity == 0 {
        return Err(StreamError::ChunkTooSmall);
    }

    let mut filled = 0;
    let mut chunks = 0;
    for px in pixels {
        let [hi, lo] = px.to_be_bytes();
        buf[filled] = hi;
        buf[filled + 1] = lo;
        filled += BYTES_PER_PIXEL;

        if filled == capacity {
            sink(&buf[..filled]).map_err(StreamError::Sink)?;
            chunks += 1;
            filled = 0;
        }
    }

    if filled > 0 {
        sink(&buf[..filled]).map_err(StreamError::Sink)?;
        chunks += 1;
    }

    Ok(chunks)
}
