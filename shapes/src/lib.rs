//! Shared shape model and wire codec for the sketchrelay transport.
//!
//! This crate owns the wire representation used by both the relay and any
//! drawing client. One message is one drawing operation, framed as a version
//! byte, a big-endian `u32` payload length, and an internally tagged JSON
//! document. Keeping the model and codec in one crate means every peer
//! agrees on the wire format without depending on relay internals.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Wire protocol version stamped on every message.
pub const PROTOCOL_VERSION: u8 = 1;

/// Upper bound on one encoded operation. A frame declaring a larger payload
/// is rejected before any buffer is allocated for it.
pub const MAX_OP_BYTES: u32 = 1024 * 1024;

/// Default relay port.
pub const DEFAULT_PORT: u16 = 12345;

/// Error returned by the framing codec.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Clean end of stream: the peer closed the connection between messages.
    #[error("end of stream")]
    Eof,
    /// The version byte does not match [`PROTOCOL_VERSION`].
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u8),
    /// The declared payload length exceeds [`MAX_OP_BYTES`].
    #[error("frame of {0} bytes exceeds maximum of {MAX_OP_BYTES}")]
    Oversized(u32),
    /// The payload is not a valid shape operation.
    #[error("malformed shape payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Transport failure, including truncation inside a frame.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// MODEL
// =============================================================================

/// RGB color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color { r: 255, g: 0, b: 0 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255 };
}

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Stroke thickness presets offered by the client menu.
pub const THICKNESS_SMALL: u32 = 2;
pub const THICKNESS_MEDIUM: u32 = 5;
pub const THICKNESS_BIG: u32 = 9;

/// One drawing instruction (or the clear sentinel) exchanged over the wire.
///
/// Zero extents are legal: a client may send a shape at drag-start before it
/// has any size. `Clear` carries no geometry and instructs every peer to
/// discard all prior operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeOp {
    Rectangle { x: i32, y: i32, width: u32, height: u32, color: Color, thickness: u32 },
    Oval { x: i32, y: i32, width: u32, height: u32, color: Color, thickness: u32 },
    StraightLine { start: Point, end: Point, color: Color, thickness: u32 },
    Freehand { points: Vec<Point>, color: Color, thickness: u32 },
    Clear,
}

impl ShapeOp {
    /// Start an empty freehand stroke; points are added as the drag proceeds.
    #[must_use]
    pub fn freehand(color: Color, thickness: u32) -> Self {
        Self::Freehand { points: Vec::new(), color, thickness }
    }

    /// Append a point to an in-progress freehand stroke.
    /// Ignored for every other variant.
    pub fn add_point(&mut self, point: Point) {
        if let Self::Freehand { points, .. } = self {
            points.push(point);
        }
    }

    /// Stroke color. `None` for `Clear`, which carries no style.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Rectangle { color, .. }
            | Self::Oval { color, .. }
            | Self::StraightLine { color, .. }
            | Self::Freehand { color, .. } => Some(*color),
            Self::Clear => None,
        }
    }

    /// Stroke thickness. `None` for `Clear`.
    #[must_use]
    pub fn thickness(&self) -> Option<u32> {
        match self {
            Self::Rectangle { thickness, .. }
            | Self::Oval { thickness, .. }
            | Self::StraightLine { thickness, .. }
            | Self::Freehand { thickness, .. } => Some(*thickness),
            Self::Clear => None,
        }
    }

    #[must_use]
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }

    /// Variant name as it appears in the wire tag. Used for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "rectangle",
            Self::Oval { .. } => "oval",
            Self::StraightLine { .. } => "straight_line",
            Self::Freehand { .. } => "freehand",
            Self::Clear => "clear",
        }
    }
}

// =============================================================================
// CODEC
// =============================================================================

/// Encode one operation into a complete wire frame.
///
/// # Errors
///
/// Returns [`WireError::Oversized`] if the encoded payload exceeds
/// [`MAX_OP_BYTES`].
pub fn encode_op(op: &ShapeOp) -> Result<Vec<u8>, WireError> {
    let payload = serde_json::to_vec(op)?;
    let Ok(len) = u32::try_from(payload.len()) else {
        return Err(WireError::Oversized(u32::MAX));
    };
    if len > MAX_OP_BYTES {
        return Err(WireError::Oversized(len));
    }

    let mut out = Vec::with_capacity(5 + payload.len());
    out.push(PROTOCOL_VERSION);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode one operation from a frame payload (version and length already
/// stripped).
///
/// # Errors
///
/// Returns [`WireError::Malformed`] for invalid JSON or an unknown `kind`.
pub fn decode_op(payload: &[u8]) -> Result<ShapeOp, WireError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Write one operation to the stream and flush it.
///
/// # Errors
///
/// Returns [`WireError::Oversized`] for an over-limit payload and
/// [`WireError::Io`] on transport failure.
pub async fn write_op<W: AsyncWrite + Unpin>(writer: &mut W, op: &ShapeOp) -> Result<(), WireError> {
    let frame = encode_op(op)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one operation from the stream.
///
/// # Errors
///
/// Returns [`WireError::Eof`] only for a clean close between messages; end
/// of stream inside a frame is truncation and surfaces as
/// [`WireError::Io`]. Version, size, and payload failures map to
/// [`WireError::UnsupportedVersion`], [`WireError::Oversized`], and
/// [`WireError::Malformed`].
pub async fn read_op<R: AsyncRead + Unpin>(reader: &mut R) -> Result<ShapeOp, WireError> {
    let mut version = [0u8; 1];
    if let Err(e) = reader.read_exact(&mut version).await {
        // EOF before the version byte means the peer closed between frames.
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            return Err(WireError::Eof);
        }
        return Err(WireError::Io(e));
    }
    if version[0] != PROTOCOL_VERSION {
        return Err(WireError::UnsupportedVersion(version[0]));
    }

    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_OP_BYTES {
        return Err(WireError::Oversized(len));
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;
    decode_op(&payload)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
