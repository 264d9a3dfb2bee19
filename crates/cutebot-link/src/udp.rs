//! UDP 数据报通道
//!
//! 每个数据报的格式为 `topic` + `0x00` + `payload`。
//! 只接受来自配置对端地址的数据报，其他来源直接丢弃。

use crate::{
    LinkDeviceError, LinkDeviceErrorKind, LinkError, RxChannel, SimChannel, SimPacket,
    SplittableChannel, TxChannel,
};
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;
use tracing::{debug, trace};

/// 单个数据报最大长度
const MAX_DATAGRAM_SIZE: usize = 64 * 1024;

/// topic 与 payload 之间的分隔符
const TOPIC_SEPARATOR: u8 = 0x00;

/// 编码数据报
pub fn encode_datagram(topic: &str, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(topic.len() + 1 + payload.len());
    buf.extend_from_slice(topic.as_bytes());
    buf.push(TOPIC_SEPARATOR);
    buf.extend_from_slice(payload);
    buf
}

/// 解码数据报
pub fn decode_datagram(datagram: &[u8]) -> Result<SimPacket, LinkError> {
    let sep = datagram.iter().position(|&b| b == TOPIC_SEPARATOR).ok_or_else(|| {
        LinkDeviceError::new(LinkDeviceErrorKind::InvalidFrame, "missing topic separator")
    })?;
    let topic = std::str::from_utf8(&datagram[..sep]).map_err(|_| {
        LinkDeviceError::new(LinkDeviceErrorKind::InvalidFrame, "topic is not UTF-8")
    })?;
    Ok(SimPacket::new(topic, &datagram[sep + 1..]))
}

fn map_recv_error(e: std::io::Error) -> LinkError {
    match e.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => LinkError::Timeout,
        _ => LinkError::Io(e),
    }
}

fn apply_timeout(socket: &UdpSocket, timeout: Duration) -> std::io::Result<()> {
    // set_read_timeout 不接受零时长，零超时改用非阻塞模式
    if timeout.is_zero() {
        socket.set_nonblocking(true)
    } else {
        socket.set_nonblocking(false)?;
        socket.set_read_timeout(Some(timeout))
    }
}

fn recv_buffer() -> Box<[u8]> {
    vec![0u8; MAX_DATAGRAM_SIZE].into_boxed_slice()
}

/// 接收一个来自对端的数据报（`buf` 由通道持有并复用）
fn recv_packet(socket: &UdpSocket, peer: SocketAddr, buf: &mut [u8]) -> Result<SimPacket, LinkError> {
    loop {
        let (len, from) = socket.recv_from(buf).map_err(map_recv_error)?;
        if from != peer {
            debug!("Dropping datagram from unexpected peer {}", from);
            continue;
        }
        trace!("Received {} byte datagram from {}", len, from);
        return decode_datagram(&buf[..len]);
    }
}

/// UDP 通道
pub struct UdpChannel {
    socket: UdpSocket,
    peer: SocketAddr,
    rx_buf: Box<[u8]>,
}

impl UdpChannel {
    /// 绑定本地地址并指定对端地址
    pub fn bind(local: impl ToSocketAddrs, peer: impl ToSocketAddrs) -> Result<Self, LinkError> {
        let socket = UdpSocket::bind(local)?;
        let peer = peer.to_socket_addrs()?.next().ok_or_else(|| {
            LinkDeviceError::new(LinkDeviceErrorKind::Backend, "peer address did not resolve")
        })?;
        apply_timeout(&socket, Duration::from_millis(2))?;
        Ok(Self {
            socket,
            peer,
            rx_buf: recv_buffer(),
        })
    }

    /// 本地绑定地址
    pub fn local_addr(&self) -> Result<SocketAddr, LinkError> {
        Ok(self.socket.local_addr()?)
    }

    /// 对端地址
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl SimChannel for UdpChannel {
    fn send(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError> {
        self.socket.send_to(&encode_datagram(topic, payload), self.peer)?;
        Ok(())
    }

    fn receive(&mut self) -> Result<SimPacket, LinkError> {
        recv_packet(&self.socket, self.peer, &mut self.rx_buf)
    }

    fn set_receive_timeout(&mut self, timeout: Duration) {
        if let Err(e) = apply_timeout(&self.socket, timeout) {
            debug!("Failed to apply UDP receive timeout: {}", e);
        }
    }
}

/// 只读半边
pub struct UdpRxChannel {
    socket: UdpSocket,
    peer: SocketAddr,
    rx_buf: Box<[u8]>,
}

impl RxChannel for UdpRxChannel {
    fn receive(&mut self) -> Result<SimPacket, LinkError> {
        recv_packet(&self.socket, self.peer, &mut self.rx_buf)
    }
}

/// 只写半边
pub struct UdpTxChannel {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl TxChannel for UdpTxChannel {
    fn send(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError> {
        self.socket.send_to(&encode_datagram(topic, payload), self.peer)?;
        Ok(())
    }
}

impl SplittableChannel for UdpChannel {
    type Rx = UdpRxChannel;
    type Tx = UdpTxChannel;

    fn split(self) -> Result<(Self::Rx, Self::Tx), LinkError> {
        let tx_socket = self.socket.try_clone()?;
        Ok((
            UdpRxChannel {
                socket: self.socket,
                peer: self.peer,
                rx_buf: self.rx_buf,
            },
            UdpTxChannel {
                socket: tx_socket,
                peer: self.peer,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datagram_framing() {
        let datagram = encode_datagram("robot", br#"{"type":"state"}"#);
        assert_eq!(&datagram[..6], b"robot\0");

        let packet = decode_datagram(&datagram).unwrap();
        assert_eq!(packet.topic, "robot");
        assert_eq!(packet.payload, br#"{"type":"state"}"#);
    }

    #[test]
    fn test_datagram_without_separator() {
        let result = decode_datagram(b"robot");
        match result {
            Err(LinkError::Device(e)) => assert_eq!(e.kind, LinkDeviceErrorKind::InvalidFrame),
            other => panic!("Expected InvalidFrame, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_payload() {
        let packet = decode_datagram(b"robot\0").unwrap();
        assert!(packet.payload.is_empty());
    }

    #[test]
    fn test_udp_loopback() {
        let mut a = UdpChannel::bind("127.0.0.1:0", "127.0.0.1:9").unwrap();
        let a_addr = a.local_addr().unwrap();
        let mut b = UdpChannel::bind("127.0.0.1:0", a_addr).unwrap();
        let b_addr = b.local_addr().unwrap();
        a.peer = b_addr;

        a.send("robot", b"hi").unwrap();
        let packet = b.receive_timeout(Duration::from_millis(500)).unwrap();
        assert_eq!(packet.topic, "robot");
        assert_eq!(packet.payload, b"hi");
    }

    #[test]
    fn test_rx_half_reuses_buffer() {
        let mut a = UdpChannel::bind("127.0.0.1:0", "127.0.0.1:9").unwrap();
        let mut b = UdpChannel::bind("127.0.0.1:0", a.local_addr().unwrap()).unwrap();
        a.peer = b.local_addr().unwrap();
        a.set_receive_timeout(Duration::from_millis(500));

        let buf_ptr = a.rx_buf.as_ptr();
        let (mut rx, _tx) = a.split().unwrap();
        assert_eq!(rx.rx_buf.as_ptr(), buf_ptr);

        b.send("robot", b"a longer payload").unwrap();
        b.send("robot", b"short").unwrap();

        assert_eq!(rx.receive().unwrap().payload, b"a longer payload");
        // 复用缓冲区时只取本次数据报长度，不残留上一次的字节
        assert_eq!(rx.receive().unwrap().payload, b"short");
        assert_eq!(rx.rx_buf.as_ptr(), buf_ptr);
        assert_eq!(rx.rx_buf.len(), MAX_DATAGRAM_SIZE);
    }
}
