//! Socket-backed transport

use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::timeout;

use super::Transport;
use crate::config::ResolverConfig;
use crate::error::TransportError;
use crate::types::MAX_TCP_SIZE;

/// Real network transport, one socket per exchange
#[derive(Debug, Clone)]
pub struct NetTransport {
    port: u16,
    udp_timeout: Duration,
    tcp_timeout: Duration,
    max_udp_size: usize,
}

impl NetTransport {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            port: config.port,
            udp_timeout: config.udp_timeout(),
            tcp_timeout: config.tcp_timeout(),
            max_udp_size: config.max_udp_size,
        }
    }

    fn server_addr(&self, server: Ipv4Addr) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(server, self.port))
    }
}

#[async_trait]
impl Transport for NetTransport {
    async fn udp_exchange(&self, server: Ipv4Addr, query: &[u8]) -> Result<Vec<u8>, TransportError> {
        let addr = self.server_addr(server);

        let socket = UdpSocket::bind(SocketAddr::from(([0, 0, 0, 0], 0))).await?;
        // Connected socket: datagrams from other sources are dropped by the kernel
        socket.connect(addr).await?;

        let sent = socket.send(query).await?;
        if sent != query.len() {
            return Err(TransportError::ShortWrite {
                sent,
                expected: query.len(),
            });
        }

        let mut buf = vec![0u8; self.max_udp_size];
        let len = timeout(self.udp_timeout, socket.recv(&mut buf)).await??;
        buf.truncate(len);
        Ok(buf)
    }

    async fn tcp_exchange(&self, server: Ipv4Addr, query: &[u8]) -> Result<Vec<u8>, TransportError> {
        if query.len() > MAX_TCP_SIZE {
            return Err(TransportError::MessageTooLarge(query.len()));
        }

        let addr = self.server_addr(server);
        let mut stream = timeout(self.tcp_timeout, TcpStream::connect(addr)).await??;

        let mut framed = Vec::with_capacity(2 + query.len());
        framed.extend_from_slice(&(query.len() as u16).to_be_bytes());
        framed.extend_from_slice(query);

        timeout(self.tcp_timeout, stream.write_all(&framed)).await??;
        timeout(self.tcp_timeout, stream.flush()).await??;

        // Read message length (2 bytes, big-endian)
        let mut len_buf = [0u8; 2];
        timeout(self.tcp_timeout, stream.read_exact(&mut len_buf)).await??;
        let msg_len = usize::from(u16::from_be_bytes(len_buf));

        let mut msg_buf = vec![0u8; msg_len];
        timeout(self.tcp_timeout, stream.read_exact(&mut msg_buf)).await??;
        Ok(msg_buf)
    }
}
