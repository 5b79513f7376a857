//! VISA resource strings for LAN-attached instruments.

/// VXI-11 instrument resource, the form the AWG advertises by default.
pub fn visa_instr(ip: &str) -> String {
    format!("TCPIP0::{ip}::inst0::INSTR")
}

/// HiSLIP resource.
pub fn hislip(ip: &str) -> String {
    format!("TCPIP0::{ip}::hislip0::INSTR")
}

/// Raw socket resource (SCPI port, usually 5025).
pub fn visa_socket(ip: &str, port: u16) -> String {
    format!("TCPIP0::{ip}::{port}::SOCKET")
}
