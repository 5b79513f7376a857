//! Definite-length block codec behaviour at the public API.

use awg_scpi::block::{self, MAX_BLOCK_LEN};
use awg_scpi::types::ByteOrder;
use awg_scpi::BlockError;

#[test]
fn test_header_width_matches_length_digits() {
    for len in [0usize, 1, 9, 10, 99, 100, 12_345, 1_000_000] {
        let header = block::header(len).unwrap();
        let digits = len.to_string();
        assert_eq!(header, format!("#{}{}", digits.len(), digits));
    }
}

#[test]
fn test_encode_then_decode_returns_payload_for_all_byte_values() {
    let payload: Vec<u8> = (0u8..=255).collect();
    let encoded = block::encode(&payload).unwrap();
    assert!(encoded.starts_with(b"#3256"));
    assert_eq!(block::decode(&encoded).unwrap(), payload.as_slice());
}

#[test]
fn test_header_describes_payload_offsets() {
    let header = block::parse_header(b"#3100").unwrap();
    assert_eq!(header.digits, 3);
    assert_eq!(header.length, 100);
    assert_eq!(header.data_start(), 5);
    assert_eq!(header.data_end(), 105);
}

#[test]
fn test_payload_bytes_after_declared_length_are_ignored() {
    let mut raw = block::encode(b"abc").unwrap();
    raw.extend_from_slice(b"\n#12zz");
    assert_eq!(block::decode(&raw).unwrap(), b"abc");
}

#[test]
fn test_decoding_reports_total_expected_size() {
    let err = block::decode(b"#210abc").unwrap_err();
    assert_eq!(
        err,
        BlockError::Truncated {
            expected: 14,
            available: 7
        }
    );
    assert_eq!(err.to_string(), "truncated block: expected 14 bytes, got 7");
}

#[test]
fn test_indefinite_blocks_are_rejected() {
    assert!(matches!(
        block::decode(b"#0abcdef\n"),
        Err(BlockError::Malformed(_))
    ));
}

#[test]
fn test_encoding_limit() {
    assert!(block::header(MAX_BLOCK_LEN).is_ok());
    assert!(matches!(
        block::header(MAX_BLOCK_LEN + 1),
        Err(BlockError::Encoding { .. })
    ));
}

#[test]
fn test_sample_conversion_through_a_block() {
    let samples = [0.0f32, 0.25, -1.0, 1.0];
    for order in [ByteOrder::Normal, ByteOrder::Swapped] {
        let encoded = block::encode(&block::f32_to_bytes(&samples, order)).unwrap();
        let payload = block::decode(&encoded).unwrap();
        assert_eq!(block::bytes_to_f32(payload, order).unwrap(), samples);
    }
}

#[test]
fn test_word_order_differs_between_byte_orders() {
    let payload = [0x00, 0x00, 0x00, 0x01];
    assert_eq!(block::bytes_to_u32(&payload, ByteOrder::Normal).unwrap(), vec![1]);
    assert_eq!(
        block::bytes_to_u32(&payload, ByteOrder::Swapped).unwrap(),
        vec![0x0100_0000]
    );
}
