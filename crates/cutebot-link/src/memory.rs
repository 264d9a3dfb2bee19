//! 进程内回环通道
//!
//! 基于 crossbeam 无界通道，`pair()` 返回交叉连接的两个端点：
//! 一端写入的数据包由另一端读出。用于测试和把仿真器嵌入同一进程。

use crate::{LinkError, RxChannel, SimChannel, SimPacket, SplittableChannel, TxChannel};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// 默认接收超时
const DEFAULT_RX_TIMEOUT: Duration = Duration::from_millis(2);

/// 进程内通道端点
pub struct MemoryChannel {
    tx: Sender<SimPacket>,
    rx: Receiver<SimPacket>,
    rx_timeout: Duration,
}

impl MemoryChannel {
    /// 创建一对交叉连接的端点
    pub fn pair() -> (MemoryChannel, MemoryChannel) {
        let (a_tx, b_rx) = crossbeam_channel::unbounded();
        let (b_tx, a_rx) = crossbeam_channel::unbounded();
        (
            MemoryChannel {
                tx: a_tx,
                rx: a_rx,
                rx_timeout: DEFAULT_RX_TIMEOUT,
            },
            MemoryChannel {
                tx: b_tx,
                rx: b_rx,
                rx_timeout: DEFAULT_RX_TIMEOUT,
            },
        )
    }

    /// 对端已发送、本端尚未读取的数据包数量
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

fn recv_with_timeout(rx: &Receiver<SimPacket>, timeout: Duration) -> Result<SimPacket, LinkError> {
    if timeout.is_zero() {
        return match rx.try_recv() {
            Ok(packet) => Ok(packet),
            Err(TryRecvError::Empty) => Err(LinkError::Timeout),
            Err(TryRecvError::Disconnected) => Err(LinkError::Closed),
        };
    }
    match rx.recv_timeout(timeout) {
        Ok(packet) => Ok(packet),
        Err(RecvTimeoutError::Timeout) => Err(LinkError::Timeout),
        Err(RecvTimeoutError::Disconnected) => Err(LinkError::Closed),
    }
}

impl SimChannel for MemoryChannel {
    fn send(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError> {
        self.tx.send(SimPacket::new(topic, payload)).map_err(|_| LinkError::Closed)
    }

    fn receive(&mut self) -> Result<SimPacket, LinkError> {
        recv_with_timeout(&self.rx, self.rx_timeout)
    }

    fn set_receive_timeout(&mut self, timeout: Duration) {
        self.rx_timeout = timeout;
    }
}

/// 只读半边
pub struct MemoryRxChannel {
    rx: Receiver<SimPacket>,
    rx_timeout: Duration,
}

impl RxChannel for MemoryRxChannel {
    fn receive(&mut self) -> Result<SimPacket, LinkError> {
        recv_with_timeout(&self.rx, self.rx_timeout)
    }
}

/// 只写半边
pub struct MemoryTxChannel {
    tx: Sender<SimPacket>,
}

impl TxChannel for MemoryTxChannel {
    fn send(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError> {
        self.tx.send(SimPacket::new(topic, payload)).map_err(|_| LinkError::Closed)
    }
}

impl SplittableChannel for MemoryChannel {
    type Rx = MemoryRxChannel;
    type Tx = MemoryTxChannel;

    fn split(self) -> Result<(Self::Rx, Self::Tx), LinkError> {
        Ok((
            MemoryRxChannel {
                rx: self.rx,
                rx_timeout: self.rx_timeout,
            },
            MemoryTxChannel { tx: self.tx },
        ))
    }
}
