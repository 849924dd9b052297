//! Transport layer: newline-delimited JSON over stdio.
//!
//! A spawned reader task turns stdin lines into parsed messages and a writer
//! task drains outgoing messages to stdout, so the server loop only ever
//! touches channels.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error};

use crate::mcp::errors::{McpError, McpResult, TransportError};
use crate::mcp::protocol::{McpMessage, MessageParser};

#[async_trait]
pub trait McpTransport: Send + Sync {
    async fn send(&mut self, message: McpMessage) -> McpResult<()>;
    async fn receive(&mut self) -> McpResult<McpMessage>;
    async fn close(&mut self) -> McpResult<()>;
    fn is_connected(&self) -> bool;
}

pub struct StdioTransport {
    incoming: mpsc::UnboundedReceiver<McpMessage>,
    outgoing: mpsc::UnboundedSender<McpMessage>,
    connected: Arc<RwLock<bool>>,
}

impl StdioTransport {
    pub fn new() -> Self {
        let (incoming_tx, incoming) = mpsc::unbounded_channel();
        let (outgoing, outgoing_rx) = mpsc::unbounded_channel::<McpMessage>();
        let connected = Arc::new(RwLock::new(true));

        Self::spawn_reader(incoming_tx, connected.clone());
        Self::spawn_writer(outgoing_rx, connected.clone());

        Self {
            incoming,
            outgoing,
            connected,
        }
    }

    fn spawn_reader(tx: mpsc::UnboundedSender<McpMessage>, connected: Arc<RwLock<bool>>) {
        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let mut lines = BufReader::new(stdin).lines();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match MessageParser::parse(&line) {
                            Ok(message) => {
                                if tx.send(message).is_err() {
                                    break;
                                }
                            }
                            Err(err) => {
                                debug!(%err, "skipping unparseable input line");
                            }
                        }
                    }
                    Ok(None) => {
                        debug!("stdin closed");
                        break;
                    }
                    Err(err) => {
                        error!(%err, "stdin read failed");
                        break;
                    }
                }
            }
            *connected.write().await = false;
        });
    }

    fn spawn_writer(
        mut rx: mpsc::UnboundedReceiver<McpMessage>,
        connected: Arc<RwLock<bool>>,
    ) {
        tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(message) = rx.recv().await {
                let line = match MessageParser::serialize(&message) {
                    Ok(line) => line,
                    Err(err) => {
                        error!(%err, "failed to serialize outgoing message");
                        continue;
                    }
                };
                if stdout.write_all(line.as_bytes()).await.is_err()
                    || stdout.write_all(b"\n").await.is_err()
                    || stdout.flush().await.is_err()
                {
                    error!("stdout write failed");
                    break;
                }
            }
            *connected.write().await = false;
        });
    }
}

#[async_trait]
impl McpTransport for StdioTransport {
    async fn send(&mut self, message: McpMessage) -> McpResult<()> {
        self.outgoing
            .send(message)
            .map_err(|err| McpError::Transport(TransportError::SendFailed(err.to_string())))
    }

    async fn receive(&mut self) -> McpResult<McpMessage> {
        self.incoming
            .recv()
            .await
            .ok_or(McpError::Transport(TransportError::ConnectionClosed))
    }

    async fn close(&mut self) -> McpResult<()> {
        *self.connected.write().await = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        // Sync check from an async context; a contended lock reads as live.
        self.connected.try_read().map(|c| *c).unwrap_or(true)
    }
}

/// Channel-backed transport for exercising the server loop in tests.
#[cfg(test)]
pub struct ChannelTransport {
    pub incoming: mpsc::UnboundedReceiver<McpMessage>,
    pub outgoing: mpsc::UnboundedSender<McpMessage>,
    connected: bool,
}

#[cfg(test)]
impl ChannelTransport {
    pub fn pair() -> (
        Self,
        mpsc::UnboundedSender<McpMessage>,
        mpsc::UnboundedReceiver<McpMessage>,
    ) {
        let (client_tx, incoming) = mpsc::unbounded_channel();
        let (outgoing, client_rx) = mpsc::unbounded_channel();
        (
            Self {
                incoming,
                outgoing,
                connected: true,
            },
            client_tx,
            client_rx,
        )
    }
}

#[cfg(test)]
#[async_trait]
impl McpTransport for ChannelTransport {
    async fn send(&mut self, message: McpMessage) -> McpResult<()> {
        self.outgoing
            .send(message)
            .map_err(|err| McpError::Transport(TransportError::SendFailed(err.to_string())))
    }

    async fn receive(&mut self) -> McpResult<McpMessage> {
        self.incoming
            .recv()
            .await
            .ok_or(McpError::Transport(TransportError::ConnectionClosed))
    }

    async fn close(&mut self) -> McpResult<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
