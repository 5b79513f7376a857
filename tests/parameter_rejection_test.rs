//! Invalid arguments must fail locally: nothing reaches the session and
//! nothing is written to the command log.

use awg_scpi::types::{ByteOrder, Limit, Setting};
use awg_scpi::{Awg, AwgError, CommandLog, MockSession};

fn awg() -> (Awg<MockSession>, MockSession) {
    let mock = MockSession::new();
    let awg = Awg::with_session(mock.clone(), CommandLog::disabled());
    (awg, mock)
}

fn assert_invalid<T: std::fmt::Debug>(result: Result<T, AwgError>) {
    match result {
        Err(AwgError::InvalidParameter(_)) => {}
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}

#[test]
fn test_out_of_range_channels_send_nothing() {
    let (mut awg, mock) = awg();

    assert_invalid(awg.output().set_state(0, true));
    assert_invalid(awg.output().set_state(5, true));
    assert_invalid(awg.voltage().set_amplitude(-1, 0.5));
    assert_invalid(awg.carrier().frequency(9u8));
    assert_invalid(awg.trace().catalog(7));
    assert_invalid(awg.arm().sample_delay(0));

    assert_eq!(mock.transmissions(), 0);
    assert!(awg.log().last_line().is_none());
}

#[test]
fn test_numeric_limits_are_checked_before_sending() {
    let (mut awg, mock) = awg();

    assert_invalid(awg.voltage().set_amplitude(1, 3.5));
    assert_invalid(awg.voltage().set_amplitude(1, f64::NAN));
    assert_invalid(awg.carrier().set_frequency(1, 7.0e9));
    assert_invalid(awg.carrier().set_frequency(1, -1.0));
    assert_invalid(awg.trace().set_loop_count(1, 0u32));
    assert_invalid(awg.sequence().write_entry(16_777_215, [0; 6]));

    assert_eq!(mock.transmissions(), 0);
}

#[test]
fn test_keyword_arguments_bypass_value_checks() {
    let mock = MockSession::new()
        .with_reply(":VOLT1?", "3")
        .with_reply(":CARR1:FREQ?", "2000000000");
    let mut awg = Awg::with_session(mock.clone(), CommandLog::disabled());

    awg.voltage()
        .set_amplitude(1, Setting::limit(Limit::Max))
        .unwrap();
    awg.carrier().set_frequency(1, Setting::Default).unwrap();

    assert_eq!(mock.writes(), vec![":VOLT1 MAX", ":CARR1:FREQ DEF"]);
}

#[test]
fn test_empty_and_malformed_payloads_are_rejected() {
    let (mut awg, mock) = awg();

    assert_invalid(awg.trace().write_samples(1, 1, 0, &[]));
    assert_invalid(awg.trace().write_samples(1, 1, 0, &[0.5, f64::INFINITY]));
    assert_invalid(
        awg.trace()
            .write_samples_block(1, 1, 0, &[], ByteOrder::Normal),
    );
    assert_invalid(awg.trace().set_segment_name(1, 1, &"x".repeat(40)));
    assert_invalid(awg.memory().write_file("", b"data"));

    assert_eq!(mock.transmissions(), 0);
}

#[test]
fn test_commands_without_session_are_not_connected() {
    let mut awg: Awg<MockSession> = Awg::new(CommandLog::disabled());

    assert!(matches!(
        awg.output().set_state(1, true),
        Err(AwgError::NotConnected)
    ));
    assert!(matches!(awg.common().identify(), Err(AwgError::NotConnected)));
    assert!(matches!(
        awg.memory().write_file("C:\\a.bin", b"x"),
        Err(AwgError::NotConnected)
    ));
    assert!(awg.log().last_line().is_none());
}

#[test]
fn test_validation_runs_before_connection_check() {
    let mut awg: Awg<MockSession> = Awg::new(CommandLog::disabled());
    assert_invalid(awg.output().set_state(9, true));
}
