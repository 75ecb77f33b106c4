//! Loopback servers shared by the network tests.

use std::io::Write;
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

/// Accepts one connection and writes `payload` a byte at a time, sleeping
/// `interval` between bytes. Returns the listening port.
pub(crate) fn spawn_trickle_server(payload: &'static [u8], interval: Duration) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind trickle server");
    let port = listener.local_addr().expect("addr").port();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            for byte in payload {
                thread::sleep(interval);
                if stream.write_all(&[*byte]).is_err() {
                    break;
                }
            }
        }
    });
    port
}
