//! Background-thread sink
//!
//! Moves the actual write off the calling thread. Records are handed to a
//! worker over a bounded channel; when the channel is full the caller waits.
//! [`Sink::sync`] returns once every record queued before it has been written
//! and the inner sink flushed.

use super::Sink;
use crate::core::{LoggerError, Result};
use crossbeam_channel::{bounded, Sender};
use std::sync::Arc;
use std::thread;

enum Message {
    Record(Vec<u8>),
    Sync(Sender<Result<()>>),
}

pub struct AsyncSink {
    sender: Option<Sender<Message>>,
    handle: Option<thread::JoinHandle<()>>,
    inner_name: String,
}

impl AsyncSink {
    pub fn new(inner: Arc<dyn Sink>, buffer_size: usize) -> Result<Self> {
        let (sender, receiver) = bounded::<Message>(buffer_size.max(1));
        let inner_name = format!("async({})", inner.name());

        let handle = thread::Builder::new()
            .name("kvlog-async-sink".to_string())
            .spawn(move || {
                for message in receiver.iter() {
                    match message {
                        Message::Record(buf) => {
                            if let Err(e) = inner.write_all(&buf) {
                                eprintln!("[LOGGER ERROR] Async sink write failed: {}", e);
                            }
                        }
                        Message::Sync(ack) => {
                            let _ = ack.send(inner.sync());
                        }
                    }
                }
                if let Err(e) = inner.sync() {
                    eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
                }
            })
            .map_err(|e| LoggerError::io_operation("starting async sink", "cannot spawn worker", e))?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
            inner_name,
        })
    }

    fn send(&self, message: Message) -> Result<()> {
        self.sender
            .as_ref()
            .ok_or(LoggerError::SinkClosed)?
            .send(message)
            .map_err(|_| LoggerError::SinkClosed)
    }
}

impl Sink for AsyncSink {
    fn write_all(&self, buf: &[u8]) -> Result<()> {
        self.send(Message::Record(buf.to_vec()))
    }

    fn sync(&self) -> Result<()> {
        let (ack, done) = bounded(1);
        self.send(Message::Sync(ack))?;
        done.recv().map_err(|_| LoggerError::SinkClosed)?
    }

    fn name(&self) -> &str {
        &self.inner_name
    }
}

impl Drop for AsyncSink {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain what is queued and exit.
        drop(self.sender.take());
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.join() {
                eprintln!("[LOGGER ERROR] Async sink worker panicked during shutdown: {:?}", e);
            }
        }
    }
}
