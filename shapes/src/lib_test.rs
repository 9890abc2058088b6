use super::*;

fn sample_rectangle() -> ShapeOp {
    ShapeOp::Rectangle { x: 10, y: 10, width: 50, height: 50, color: Color::RED, thickness: 2 }
}

fn sample_freehand() -> ShapeOp {
    let mut op = ShapeOp::freehand(Color::BLUE, THICKNESS_MEDIUM);
    op.add_point(Point::new(0, 0));
    op.add_point(Point::new(3, 4));
    op.add_point(Point::new(-7, 12));
    op
}

async fn round_trip(op: &ShapeOp) -> ShapeOp {
    let bytes = encode_op(op).expect("encode should succeed");
    let mut slice: &[u8] = &bytes;
    read_op(&mut slice).await.expect("decode should succeed")
}

#[tokio::test]
async fn rectangle_round_trip_preserves_fields() {
    let op = sample_rectangle();
    assert_eq!(round_trip(&op).await, op);
}

#[tokio::test]
async fn freehand_round_trip_preserves_point_order() {
    let op = sample_freehand();
    let decoded = round_trip(&op).await;
    assert_eq!(decoded, op);
    let ShapeOp::Freehand { points, .. } = decoded else {
        panic!("expected freehand");
    };
    assert_eq!(points, vec![Point::new(0, 0), Point::new(3, 4), Point::new(-7, 12)]);
}

#[tokio::test]
async fn clear_round_trips_without_geometry() {
    let decoded = round_trip(&ShapeOp::Clear).await;
    assert!(decoded.is_clear());
    assert!(decoded.color().is_none());
    assert!(decoded.thickness().is_none());
}

#[tokio::test]
async fn line_with_negative_coordinates_round_trips() {
    let op = ShapeOp::StraightLine {
        start: Point::new(-5, -5),
        end: Point::new(100, 200),
        color: Color::GREEN,
        thickness: THICKNESS_BIG,
    };
    assert_eq!(round_trip(&op).await, op);
}

#[test]
fn encode_op_frames_version_and_length() {
    let bytes = encode_op(&ShapeOp::Clear).expect("encode");
    assert_eq!(bytes[0], PROTOCOL_VERSION);
    let len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
    assert_eq!(len as usize, bytes.len() - 5);
}

#[test]
fn decode_op_rejects_unknown_kind() {
    let err = decode_op(br#"{"kind":"triangle","x":0,"y":0}"#).expect_err("unknown kind");
    assert!(matches!(err, WireError::Malformed(_)));
}

#[test]
fn decode_op_rejects_invalid_json() {
    let err = decode_op(b"not json at all").expect_err("invalid payload");
    assert!(matches!(err, WireError::Malformed(_)));
}

#[tokio::test]
async fn read_op_rejects_unsupported_version() {
    let mut bytes = encode_op(&sample_rectangle()).expect("encode");
    bytes[0] = 99;
    let mut slice: &[u8] = &bytes;
    let err = read_op(&mut slice).await.expect_err("bad version");
    assert!(matches!(err, WireError::UnsupportedVersion(99)));
}

#[tokio::test]
async fn read_op_rejects_oversized_frame_without_reading_payload() {
    let declared = MAX_OP_BYTES + 1;
    let mut bytes = vec![PROTOCOL_VERSION];
    bytes.extend_from_slice(&declared.to_be_bytes());
    let mut slice: &[u8] = &bytes;
    let err = read_op(&mut slice).await.expect_err("oversized");
    assert!(matches!(err, WireError::Oversized(n) if n == declared));
}

#[tokio::test]
async fn read_op_reports_clean_eof_between_frames() {
    let mut slice: &[u8] = &[];
    let err = read_op(&mut slice).await.expect_err("empty stream");
    assert!(matches!(err, WireError::Eof));
}

#[tokio::test]
async fn read_op_treats_truncated_frame_as_transport_error() {
    let bytes = encode_op(&sample_rectangle()).expect("encode");
    let mut slice: &[u8] = &bytes[..bytes.len() - 3];
    let err = read_op(&mut slice).await.expect_err("truncated frame");
    assert!(matches!(err, WireError::Io(_)));
}

#[tokio::test]
async fn read_op_consumes_exactly_one_frame() {
    let mut bytes = encode_op(&sample_rectangle()).expect("encode");
    bytes.extend(encode_op(&ShapeOp::Clear).expect("encode"));
    let mut slice: &[u8] = &bytes;

    let first = read_op(&mut slice).await.expect("first frame");
    assert_eq!(first, sample_rectangle());
    let second = read_op(&mut slice).await.expect("second frame");
    assert!(second.is_clear());
}

#[tokio::test]
async fn write_op_then_read_op_over_duplex_stream() {
    let (mut client, mut server) = tokio::io::duplex(4096);
    let op = sample_freehand();
    write_op(&mut client, &op).await.expect("write");
    let decoded = read_op(&mut server).await.expect("read");
    assert_eq!(decoded, op);
}

#[test]
fn add_point_ignores_non_freehand_variants() {
    let mut op = sample_rectangle();
    op.add_point(Point::new(1, 1));
    assert_eq!(op, sample_rectangle());
}

#[test]
fn zero_extent_shape_is_legal() {
    let op = ShapeOp::Oval { x: 5, y: 5, width: 0, height: 0, color: Color::RED, thickness: THICKNESS_SMALL };
    let bytes = encode_op(&op).expect("zero extent encodes");
    assert_eq!(decode_op(&bytes[5..]).expect("zero extent decodes"), op);
}
