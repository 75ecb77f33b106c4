use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use super::error::SmtpVerifyError;
use super::types::SmtpReply;

/// Longest reply line accepted from a server.
const MAX_LINE_LEN: usize = 4096;
/// Most continuation lines accepted in one reply.
const MAX_REPLY_LINES: usize = 128;

pub(crate) struct SmtpSession {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
    peer: SocketAddr,
    /// Budget for one whole reply, however slowly it trickles in.
    command_timeout: Duration,
}

impl SmtpSession {
    pub(crate) fn connect(
        host: &str,
        addrs: &[SocketAddr],
        connect_timeout: Duration,
        command_timeout: Duration,
    ) -> Result<Self, SmtpVerifyError> {
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(addr, connect_timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(command_timeout))?;
                    stream.set_write_timeout(Some(command_timeout))?;
                    let reader = BufReader::new(stream.try_clone()?);
                    return Ok(Self {
                        stream,
                        reader,
                        peer: *addr,
                        command_timeout,
                    });
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(match last_err {
            Some(source) => SmtpVerifyError::Connect {
                host: host.to_string(),
                source,
            },
            None => SmtpVerifyError::NoAddresses {
                host: host.to_string(),
            },
        })
    }

    pub(crate) fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub(crate) fn send_command(&mut self, command: &str) -> Result<(), SmtpVerifyError> {
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        self.stream.write_all(&line)?;
        self.stream.flush()?;
        Ok(())
    }

    /// Reads one (possibly multi-line) reply. The whole reply must arrive
    /// within `command_timeout`.
    pub(crate) fn read_reply(&mut self) -> Result<SmtpReply, SmtpVerifyError> {
        let deadline = Instant::now() + self.command_timeout;
        let mut code = None;
        let mut message_lines = Vec::new();
        loop {
            let raw = self.read_line(deadline)?;
            let line = parse_reply_line(&raw)?;
            match code {
                Some(existing) if existing != line.code => {
                    return Err(SmtpVerifyError::protocol(format!(
                        "inconsistent SMTP reply codes: {} vs {}",
                        existing, line.code
                    )));
                }
                Some(_) => {}
                None => code = Some(line.code),
            }
            message_lines.push(line.text);
            if !line.continuation {
                break;
            }
            if message_lines.len() >= MAX_REPLY_LINES {
                return Err(SmtpVerifyError::protocol("SMTP reply has too many lines"));
            }
        }
        let code = code.ok_or_else(|| SmtpVerifyError::protocol("SMTP reply missing status code"))?;
        Ok(SmtpReply::new(code, message_lines.join("\n")))
    }

    /// One CRLF-terminated line, each socket read bounded by what is left
    /// before `deadline`.
    fn read_line(&mut self, deadline: Instant) -> Result<String, SmtpVerifyError> {
        let mut line = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(SmtpVerifyError::timeout("reply not complete before deadline"));
            }
            self.stream.set_read_timeout(Some(remaining))?;
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                if line.is_empty() {
                    return Err(SmtpVerifyError::protocol(
                        "connection closed while reading reply",
                    ));
                }
                break;
            }
            let (used, done) = match available.iter().position(|b| *b == b'\n') {
                Some(idx) => (idx + 1, true),
                None => (available.len(), false),
            };
            line.extend_from_slice(&available[..used]);
            self.reader.consume(used);
            if line.len() > MAX_LINE_LEN {
                return Err(SmtpVerifyError::protocol("SMTP reply line too long"));
            }
            if done {
                break;
            }
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ReplyLine {
    pub code: u16,
    pub continuation: bool,
    pub text: String,
}

/// Parses one `NNN-text` / `NNN text` reply line, line terminator included
/// or not.
pub(crate) fn parse_reply_line(raw: &str) -> Result<ReplyLine, SmtpVerifyError> {
    let line = raw.trim_end_matches(['\r', '\n']);
    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(SmtpVerifyError::protocol(format!(
            "invalid SMTP reply: '{line}'"
        )));
    }
    let code = line[..3]
        .parse::<u16>()
        .map_err(|_| SmtpVerifyError::protocol(format!("invalid SMTP status code: '{line}'")))?;
    let continuation = bytes.get(3).copied() == Some(b'-');
    let text = line.get(4..).unwrap_or_default().to_string();
    Ok(ReplyLine {
        code,
        continuation,
        text,
    })
}
