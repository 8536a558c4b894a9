use anyhow::Context;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

const MAX_DATAGRAM: usize = 1500;

/// A UDP socket talking to one server, with a receive deadline.
pub struct Transport {
    socket: UdpSocket,
    server: SocketAddr,
    timeout: Duration,
}

impl Transport {
    /// Binds `local` and targets `server`.
    ///
    /// # Errors
    ///
    /// Returns an error if the local address cannot be bound.
    pub async fn bind(
        local: SocketAddr,
        server: SocketAddr,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind(local)
            .await
            .with_context(|| format!("failed to bind {local}"))?;
        Ok(Self {
            socket,
            server,
            timeout,
        })
    }

    /// The bound local address.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket has no local address.
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Sends one datagram to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the send fails.
    pub async fn send(&self, bytes: &[u8]) -> anyhow::Result<()> {
        self.socket
            .send_to(bytes, self.server)
            .await
            .with_context(|| format!("failed to send to {}", self.server))?;
        debug!(len = bytes.len(), server = %self.server, "sent");
        Ok(())
    }

    /// Waits for the next datagram.
    ///
    /// # Errors
    ///
    /// Returns an error on timeout or socket failure.
    pub async fn recv(&self) -> anyhow::Result<Vec<u8>> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        let (len, from) = tokio::time::timeout(self.timeout, self.socket.recv_from(&mut buf))
            .await
            .with_context(|| format!("no reply within {:?}", self.timeout))??;
        debug!(len, %from, "received");
        buf.truncate(len);
        Ok(buf)
    }
}
