use matrix_battleship::{CodecError, Message, ShotReport};
use proptest::prelude::*;

#[test]
fn bare_formats_decode() {
    assert_eq!(Message::decode("READY:1234"), Ok(Message::Ready { millis: 1234, nonce: None }));
    assert_eq!(Message::decode("READY"), Ok(Message::Ready { millis: 0, nonce: None }));
    assert_eq!(Message::decode("AIM:3,4"), Ok(Message::Aim { x: 3, y: 4 }));
    assert_eq!(Message::decode("SHOT:15,0"), Ok(Message::Shot { x: 15, y: 0, seq: None }));
    assert_eq!(
        Message::decode("RESULT:SINK"),
        Ok(Message::Result { report: ShotReport::Sink, seq: None })
    );
}

#[test]
fn suffixes_decode() {
    assert_eq!(
        Message::decode("READY:77#9001"),
        Ok(Message::Ready { millis: 77, nonce: Some(9001) })
    );
    assert_eq!(Message::decode("SHOT:1,2#7"), Ok(Message::Shot { x: 1, y: 2, seq: Some(7) }));
    assert_eq!(
        Message::decode("RESULT:MISS#7"),
        Ok(Message::Result { report: ShotReport::Miss, seq: Some(7) })
    );
}

#[test]
fn padding_is_ignored() {
    assert_eq!(Message::decode("AIM:1,1\0\0\0"), Ok(Message::Aim { x: 1, y: 1 }));
    assert_eq!(
        Message::decode("  RESULT:HIT\r\n"),
        Ok(Message::Result { report: ShotReport::Hit, seq: None })
    );
}

#[test]
fn garbage_is_rejected() {
    assert_eq!(Message::decode("HELLO"), Err(CodecError::Unrecognized));
    assert_eq!(Message::decode(""), Err(CodecError::Unrecognized));
    assert_eq!(Message::decode("shot:1,2"), Err(CodecError::Unrecognized));
    assert_eq!(Message::decode("SHOT:1"), Err(CodecError::Malformed));
    assert_eq!(Message::decode("SHOT"), Err(CodecError::Malformed));
    assert_eq!(Message::decode("SHOT:a,b"), Err(CodecError::Malformed));
    assert_eq!(Message::decode("RESULT:MAYBE"), Err(CodecError::Malformed));
    assert_eq!(Message::decode("READY:-5"), Err(CodecError::Malformed));
    assert_eq!(Message::decode("SHOT:1,2#x"), Err(CodecError::Malformed));
}

#[test]
fn board_decoding_rejects_off_matrix_coordinates() {
    assert_eq!(Message::decode("SHOT:16,0"), Ok(Message::Shot { x: 16, y: 0, seq: None }));
    assert_eq!(Message::decode_on_board("SHOT:16,0"), Err(CodecError::OutOfBounds { x: 16, y: 0 }));
    assert_eq!(Message::decode_on_board("AIM:-1,3"), Err(CodecError::OutOfBounds { x: -1, y: 3 }));
    assert!(Message::decode_on_board("SHOT:15,15").is_ok());
}

#[test]
fn encoding_matches_wire_format() {
    assert_eq!(Message::Aim { x: 2, y: 9 }.encode(), "AIM:2,9");
    assert_eq!(Message::Shot { x: 2, y: 9, seq: None }.encode(), "SHOT:2,9");
    assert_eq!(Message::Shot { x: 2, y: 9, seq: Some(3) }.encode(), "SHOT:2,9#3");
    assert_eq!(Message::Result { report: ShotReport::Hit, seq: None }.encode(), "RESULT:HIT");
    assert_eq!(Message::Ready { millis: 42, nonce: Some(1) }.encode(), "READY:42#1");
}

fn message() -> impl Strategy<Value = Message> {
    let report = prop_oneof![Just(ShotReport::Miss), Just(ShotReport::Hit), Just(ShotReport::Sink)];
    prop_oneof![
        (any::<u32>(), any::<Option<u32>>()).prop_map(|(millis, nonce)| Message::Ready { millis, nonce }),
        (0i32..16, 0i32..16).prop_map(|(x, y)| Message::Aim { x, y }),
        (0i32..16, 0i32..16, any::<Option<u32>>()).prop_map(|(x, y, seq)| Message::Shot { x, y, seq }),
        (report, any::<Option<u32>>()).prop_map(|(report, seq)| Message::Result { report, seq }),
    ]
}

proptest! {
    #[test]
    fn decode_inverts_encode(msg in message()) {
        prop_assert_eq!(Message::decode_on_board(&msg.encode()), Ok(msg));
    }

    #[test]
    fn decoding_arbitrary_text_never_panics(text in ".{0,64}") {
        let _ = Message::decode(&text);
    }
}
