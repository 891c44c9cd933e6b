use crate::bus::{Error, Result};

use async_trait::async_trait;
use log::{debug, error, trace, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::{Debug, Display};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::select;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// A message received on the cast message bus.
///
/// The data of the message is either a JSON value, or a string containing the JSON payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BusMessage {
    pub namespace: String,
    #[serde(default)]
    pub data: Value,
}

impl BusMessage {
    /// Parse a bus message from the given line.
    pub fn parse(line: &str) -> Result<Self> {
        let message: Self = serde_json::from_str(line)?;
        if message.namespace.is_empty() {
            return Err(Error::MissingNamespace);
        }

        Ok(message)
    }

    /// Get the raw payload of the message.
    pub fn payload(&self) -> String {
        match &self.data {
            Value::String(value) => value.clone(),
            value => value.to_string(),
        }
    }

    /// Deserialize the data of the message into the given type.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        let value = match &self.data {
            Value::String(value) => serde_json::from_str(value)?,
            value => T::deserialize(value)?,
        };

        Ok(value)
    }
}

/// A message handler is able to process the [BusMessage] of one or more namespaces.
#[async_trait]
pub trait MessageHandler: Debug + Display + Send + Sync {
    /// Check if this handler is able to process messages of the given namespace.
    fn is_supported(&self, namespace: &str) -> bool;

    /// Process the given supported message.
    async fn process(&self, message: BusMessage) -> Result<()>;
}

/// The processor of the message bus which reads newline delimited [BusMessage] lines from
/// the given reader.
///
/// Messages are processed one at a time in the order of arrival.
#[derive(Debug)]
pub struct MessageBusProcessor {
    inner: Arc<InnerProcessor>,
}

impl MessageBusProcessor {
    pub fn new<R>(reader: R, handlers: Vec<Box<dyn MessageHandler>>) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let inner = Arc::new(InnerProcessor {
            handlers,
            cancellation_token: Default::default(),
        });

        let inner_main = inner.clone();
        tokio::spawn(async move {
            inner_main.start(reader).await;
        });

        Self { inner }
    }

    /// Get a future which resolves when the processor is stopped.
    /// The future might immediately resolve if the processor has already stopped.
    pub fn stopped(&self) -> WaitForCancellationFuture<'_> {
        self.inner.cancellation_token.cancelled()
    }

    /// Stop the processor from processing any new messages.
    pub fn stop(&self) {
        self.inner.cancellation_token.cancel();
    }
}

impl Drop for MessageBusProcessor {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug)]
struct InnerProcessor {
    handlers: Vec<Box<dyn MessageHandler>>,
    cancellation_token: CancellationToken,
}

impl InnerProcessor {
    async fn start<R>(&self, reader: R)
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();

        loop {
            select! {
                _ = self.cancellation_token.cancelled() => break,
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if let Err(e) = self.handle_line(line.as_str()).await {
                            warn!("Message bus processor failed to process message, {}", e);
                        }
                    }
                    Ok(None) => {
                        debug!("Message bus reached the end of the input");
                        break;
                    }
                    Err(e) => {
                        error!("Message bus failed to read input, {}", e);
                        break;
                    }
                },
            }
        }

        self.cancellation_token.cancel();
        debug!("Message bus processor main loop ended");
    }

    async fn handle_line(&self, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        trace!("Message bus received {}", line);
        let message = BusMessage::parse(line)?;
        let handler = self
            .handlers
            .iter()
            .find(|e| e.is_supported(message.namespace.as_str()))
            .ok_or(Error::UnsupportedNamespace(message.namespace.clone()))?;

        if let Err(e) = handler.process(message).await {
            error!("Message handler {} encountered an error, {}", handler, e);
        }

        Ok(())
    }
}
