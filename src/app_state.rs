use std::sync::mpsc::{Receiver, Sender};

use reelrows_core::{FetchError, FetchTicket, MediaItem};

/// Results posted by background tasks; drained on the UI thread each frame.
#[derive(Debug)]
pub enum Msg {
    FeedLoaded {
        ticket: FetchTicket,
        result: Result<Vec<MediaItem>, FetchError>,
    },
    CoverDecoded {
        url: String,
        rgba: Vec<u8>,
        w: u32,
        h: u32,
    },
    CoverFailed {
        url: String,
        error: String,
    },
}

pub fn drain(rx: &Receiver<Msg>) -> Vec<Msg> {
    let mut messages = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        messages.push(msg);
    }
    messages
}

pub fn channel() -> (Sender<Msg>, Receiver<Msg>) {
    std::sync::mpsc::channel()
}
