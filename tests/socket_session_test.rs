//! `Awg::open` against a fake instrument listening on a local socket.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use awg_scpi::block;
use awg_scpi::{Awg, AwgConfig, AwgError};
use tempfile::TempDir;

const IDN: &str = "Keysight Technologies,M8190A,MY12345678,5.5.0.0";

/// Answer queries from `replies` until the client hangs up. Returns every
/// line received. `:MMEM:DATA?` is answered with a block.
fn fake_instrument(replies: HashMap<&'static str, &'static str>) -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        serve(stream, &replies)
    });
    (port, handle)
}

fn serve(stream: TcpStream, replies: &HashMap<&'static str, &'static str>) -> Vec<String> {
    let mut writer = stream.try_clone().unwrap();
    let mut reader = BufReader::new(stream);
    let mut seen = Vec::new();
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let command = line.trim_end().to_string();
        if command.starts_with(":MMEM:DATA?") {
            let mut reply = block::encode(b"\x01\x02\n\x03").unwrap();
            reply.push(b'\n');
            writer.write_all(&reply).unwrap();
        } else if let Some(reply) = replies.get(command.as_str()) {
            writer.write_all(format!("{reply}\n").as_bytes()).unwrap();
        }
        seen.push(command);
    }
    seen
}

fn config_for(port: u16, log_dir: &TempDir) -> AwgConfig {
    let mut config = AwgConfig::default();
    config.connection.address = "127.0.0.1".to_string();
    config.connection.port = port;
    config.connection.timeout_ms = 2000;
    config.command_log.directory = log_dir.path().to_path_buf();
    config.command_log.device_name = "bench_awg".to_string();
    config
}

#[test]
fn test_open_identifies_and_logs_session() {
    let (port, handle) = fake_instrument(HashMap::from([
        ("*IDN?", IDN),
        (":OUTP1?", "1"),
        (":VOLT1?", "0.5"),
    ]));
    let log_dir = TempDir::new().unwrap();

    let mut awg = Awg::open(&config_for(port, &log_dir)).unwrap();
    let identity = awg.identity().cloned().unwrap();
    assert_eq!(identity.model, "M8190A");
    assert_eq!(identity.firmware, "5.5.0.0");

    awg.output().set_state(1, true).unwrap();
    let amplitude = awg.voltage().set_amplitude(1, 0.5).unwrap();
    assert_eq!(amplitude.confirmed_as::<f64>(), Some(0.5));

    let file = awg.memory().read_file("C:\\waves\\a.bin").unwrap();
    assert_eq!(file.value.as_ref(), b"\x01\x02\n\x03");

    let log_path = awg.log().path().unwrap().to_path_buf();
    awg.disconnect().unwrap();

    let seen = handle.join().unwrap();
    assert_eq!(
        seen,
        vec![
            "*IDN?",
            ":OUTP1 ON",
            ":OUTP1?",
            ":VOLT1 0.5",
            ":VOLT1?",
            ":MMEM:DATA? \"C:\\waves\\a.bin\"",
        ]
    );

    assert!(log_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("bench_awg_"));
    let log = std::fs::read_to_string(log_path).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 7, "{log}");
    assert!(lines[0].starts_with("Log file created for BENCH_AWG"));
    assert!(lines[1].contains(&format!("TCPIP0::127.0.0.1::{port}::SOCKET")));
    assert!(lines[5].ends_with("Response: 4 bytes read"));
    assert!(lines[6].ends_with("Response: Device disconnected"));
}

#[test]
fn test_open_refused_is_reported_and_logged() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let log_dir = TempDir::new().unwrap();

    let err = Awg::open(&config_for(port, &log_dir)).err();
    assert!(matches!(err, Some(AwgError::Io(_))), "{err:?}");

    let entry = std::fs::read_dir(log_dir.path())
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    let log = std::fs::read_to_string(entry.path()).unwrap();
    let last = log.lines().last().unwrap();
    assert!(last.contains(&format!(
        "SCPI: TCPIP0::127.0.0.1::{port}::SOCKET | Duration : 0.00 ms |"
    )));
}

#[test]
fn test_invalid_config_is_rejected_before_connecting() {
    let log_dir = TempDir::new().unwrap();
    let mut config = config_for(5025, &log_dir);
    config.connection.address = "awg.local".to_string();

    assert!(matches!(Awg::open(&config), Err(AwgError::Config(_))));
    assert_eq!(std::fs::read_dir(log_dir.path()).unwrap().count(), 0);
}
