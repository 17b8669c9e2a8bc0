//! WebSocket feed connector.
//!
//! Each connection attempt runs in its own task: it opens the socket with
//! `tokio-tungstenite`, forwards every text payload to the client, and
//! reports the connection lifecycle as [`FeedEvent`]s.

use futures_util::StreamExt;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info};
use url::Url;

use super::{Connector, FeedEvent, FeedSender};

/// Opens WebSocket connections to the metrics endpoint.
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    url: Url,
    target: String,
}

impl WebSocketConnector {
    pub fn new(url: Url) -> Self {
        let target = url.to_string();
        Self { url, target }
    }

}

/// What to do with one inbound frame.
#[derive(Debug, PartialEq)]
enum Inbound {
    Deliver(FeedEvent),
    Skip,
    Close,
}

fn inbound(message: Message) -> Inbound {
    match message {
        Message::Text(text) => Inbound::Deliver(FeedEvent::Message(text)),
        Message::Binary(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Inbound::Deliver(FeedEvent::Message(text)),
            Err(e) => Inbound::Deliver(FeedEvent::Malformed(format!("binary frame: {}", e))),
        },
        Message::Close(frame) => {
            debug!(?frame, "metrics feed sent close frame");
            Inbound::Close
        }
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Inbound::Skip,
    }
}

impl Connector for WebSocketConnector {
    /// Spawn a connection task.
    ///
    /// Must be called from within a tokio runtime.
    fn connect(&self, events: FeedSender) {
        let url = self.url.clone();

        tokio::spawn(async move {
            info!(%url, "connecting to metrics feed");

            let mut stream = match tokio_tungstenite::connect_async(url.as_str()).await {
                Ok((stream, response)) => {
                    info!(%url, status = %response.status(), "metrics feed connected");
                    let _ = events.send(FeedEvent::Opened);
                    stream
                }
                Err(e) => {
                    let _ = events.send(FeedEvent::Error(format!("connect failed: {}", e)));
                    let _ = events.send(FeedEvent::Closed);
                    return;
                }
            };

            while let Some(frame) = stream.next().await {
                let event = match frame.map(inbound) {
                    Ok(Inbound::Deliver(event)) => event,
                    Ok(Inbound::Skip) => continue,
                    Ok(Inbound::Close) => break,
                    Err(e) => {
                        let _ = events.send(FeedEvent::Error(format!("read error: {}", e)));
                        break;
                    }
                };

                if events.send(event).is_err() {
                    // Client dropped; nobody is listening any more.
                    return;
                }
            }

            let _ = events.send(FeedEvent::Closed);
        });
    }

    fn target(&self) -> &str {
        &self.target
    }
}
