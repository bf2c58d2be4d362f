//! Syslog sink writer.
//!
//! # Design Decisions
//! - Construction never fails on connectivity; only a malformed address is an error
//! - Datagrams are `<PRI>line\0` with facility `user`
//! - Every send error is swallowed; a UNIX socket that is not connected is
//!   re-attempted once on the next send, nothing more

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
#[cfg(unix)]
use std::os::unix::net::UnixDatagram;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::logging::record::Severity;
use crate::logging::sink::{SinkError, SinkWriter};

const FACILITY_USER: u8 = 1;

/// Where syslog datagrams are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyslogTarget {
    /// Remote collector over UDP.
    Udp { host: String, port: u16 },
    /// Local socket such as `/dev/log`.
    Unix(PathBuf),
}

impl SyslogTarget {
    /// Parse `host:port` as UDP, anything else as a socket path.
    pub fn parse(address: &str) -> Result<Self, SinkError> {
        match address.split_once(':') {
            Some((host, port)) => {
                let port = port.parse().map_err(|_| SinkError::InvalidSyslogAddress {
                    address: address.to_string(),
                    reason: format!("invalid port {:?}", port),
                })?;
                Ok(SyslogTarget::Udp {
                    host: host.to_string(),
                    port,
                })
            }
            None => Ok(SyslogTarget::Unix(PathBuf::from(address))),
        }
    }
}

/// Syslog priority value for a record.
pub fn priority(severity: Severity) -> u8 {
    let code = match severity {
        Severity::Debug => 7,
        Severity::Info => 6,
        Severity::Warning => 4,
        Severity::Error => 3,
        Severity::Critical => 2,
    };
    FACILITY_USER * 8 + code
}

enum Transport {
    Udp {
        socket: UdpSocket,
        addr: SocketAddr,
    },
    #[cfg(unix)]
    Unix(UnixDatagram),
}

impl Transport {
    fn send(&self, payload: &[u8]) -> io::Result<()> {
        match self {
            Transport::Udp { socket, addr } => socket.send_to(payload, addr).map(|_| ()),
            #[cfg(unix)]
            Transport::Unix(socket) => socket.send(payload).map(|_| ()),
        }
    }
}

/// Best-effort syslog client.
pub struct SyslogWriter {
    target: SyslogTarget,
    transport: Mutex<Option<Transport>>,
}

impl SyslogWriter {
    /// Create a writer. Connection problems leave it unconnected, never failed.
    pub fn new(target: SyslogTarget) -> Self {
        let transport = connect(&target).ok();
        Self {
            target,
            transport: Mutex::new(transport),
        }
    }

    pub fn target(&self) -> &SyslogTarget {
        &self.target
    }

    pub fn is_connected(&self) -> bool {
        self.transport.lock().is_some()
    }
}

fn connect(target: &SyslogTarget) -> io::Result<Transport> {
    match target {
        SyslogTarget::Udp { host, port } => {
            let addr = (host.as_str(), *port)
                .to_socket_addrs()?
                .next()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no address for syslog host"))?;
            let bind: SocketAddr = if addr.is_ipv4() {
                ([0, 0, 0, 0], 0).into()
            } else {
                ([0u16; 8], 0).into()
            };
            Ok(Transport::Udp {
                socket: UdpSocket::bind(bind)?,
                addr,
            })
        }
        #[cfg(unix)]
        SyslogTarget::Unix(path) => {
            let socket = UnixDatagram::unbound()?;
            socket.connect(path)?;
            Ok(Transport::Unix(socket))
        }
        #[cfg(not(unix))]
        SyslogTarget::Unix(_) => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "UNIX syslog sockets are not supported on this platform",
        )),
    }
}

impl SinkWriter for SyslogWriter {
    fn write_line(&self, severity: Severity, line: &str) -> io::Result<()> {
        let payload = format!("<{}>{}\0", priority(severity), line);
        let mut transport = self.transport.lock();

        if transport.is_none() && matches!(self.target, SyslogTarget::Unix(_)) {
            *transport = connect(&self.target).ok();
        }

        let failed = match transport.as_ref() {
            Some(t) => t.send(payload.as_bytes()).is_err(),
            None => false,
        };
        if failed && matches!(self.target, SyslogTarget::Unix(_)) {
            // The daemon may have restarted; reconnect on the next record.
            *transport = None;
        }
        Ok(())
    }

    fn reports_errors(&self) -> bool {
        false
    }
}
