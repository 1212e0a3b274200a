//! Three independently-cursored slide queues behind one store.
//!
//! The exploratory, audience and deck channels are structurally identical,
//! so the queue/cursor logic is written once on [`Channel`] and dispatched
//! by [`ChannelKind`] — the three copies cannot drift apart.
//!
//! Cursor invariant: `0 <= cursor <= max(0, len - 1)`. An empty channel
//! keeps cursor 0 and has no current slide. `take` and `remove` never
//! panic on an empty channel; they return `None` / no-op.

use std::collections::VecDeque;

use crate::config::ChannelConfig;
use crate::slide::Slide;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ChannelKind
// ---------------------------------------------------------------------------

/// Which of the three slide queues an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Generated suggestions — capacity-bounded, oldest evicted.
    Exploratory,
    /// Slides answering audience questions.
    Audience,
    /// Slides extracted from an uploaded deck.
    Deck,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 3] = [
        ChannelKind::Exploratory,
        ChannelKind::Audience,
        ChannelKind::Deck,
    ];

    /// Short label for logging and status displays.
    pub fn label(&self) -> &'static str {
        match self {
            ChannelKind::Exploratory => "exploratory",
            ChannelKind::Audience => "audience",
            ChannelKind::Deck => "deck",
        }
    }

    fn index(self) -> usize {
        match self {
            ChannelKind::Exploratory => 0,
            ChannelKind::Audience => 1,
            ChannelKind::Deck => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Direction / ChannelInfo
// ---------------------------------------------------------------------------

/// Cursor movement for [`ChannelStore::navigate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Snapshot of one channel's navigation state, exposed to the presentation
/// surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelInfo {
    pub total: usize,
    pub cursor: usize,
    pub can_go_prev: bool,
    pub can_go_next: bool,
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// One ordered slide queue with a read cursor.
#[derive(Debug, Default)]
struct Channel {
    queue: VecDeque<Slide>,
    cursor: usize,
}

impl Channel {
    /// Append a slide; with `capacity` set, evict from the front once the
    /// bound is exceeded, keeping the cursor on the same slide when possible.
    fn append(&mut self, slide: Slide, capacity: Option<usize>) {
        self.queue.push_back(slide);
        if let Some(cap) = capacity {
            while self.queue.len() > cap {
                self.queue.pop_front();
                self.cursor = self.cursor.saturating_sub(1);
            }
        }
        self.clamp();
    }

    fn navigate(&mut self, direction: Direction) {
        match direction {
            Direction::Prev => self.cursor = self.cursor.saturating_sub(1),
            Direction::Next => {
                if self.cursor + 1 < self.queue.len() {
                    self.cursor += 1;
                }
            }
        }
    }

    fn peek(&self) -> Option<&Slide> {
        self.queue.get(self.cursor)
    }

    fn info(&self) -> ChannelInfo {
        ChannelInfo {
            total: self.queue.len(),
            cursor: self.cursor,
            can_go_prev: self.cursor > 0,
            can_go_next: self.cursor + 1 < self.queue.len(),
        }
    }

    /// Remove and return the slide at the cursor, clamping afterward.
    fn take(&mut self) -> Option<Slide> {
        let taken = self.queue.remove(self.cursor);
        self.clamp();
        taken
    }

    /// Remove by id regardless of cursor position, clamping afterward.
    fn remove(&mut self, id: Uuid) -> Option<Slide> {
        let pos = self.queue.iter().position(|s| s.id == id)?;
        let removed = self.queue.remove(pos);
        if pos < self.cursor {
            self.cursor -= 1;
        }
        self.clamp();
        removed
    }

    fn reset(&mut self) {
        self.queue.clear();
        self.cursor = 0;
    }

    fn clamp(&mut self) {
        let max = self.queue.len().saturating_sub(1);
        if self.cursor > max {
            self.cursor = max;
        }
    }
}

// ---------------------------------------------------------------------------
// ChannelStore
// ---------------------------------------------------------------------------

/// Holds the three channels; every operation takes a [`ChannelKind`] tag.
#[derive(Debug)]
pub struct ChannelStore {
    channels: [Channel; 3],
    exploratory_capacity: usize,
}

impl ChannelStore {
    pub fn new(config: &ChannelConfig) -> Self {
        Self {
            channels: Default::default(),
            exploratory_capacity: config.exploratory_capacity,
        }
    }

    pub fn append(&mut self, kind: ChannelKind, slide: Slide) {
        let capacity = match kind {
            ChannelKind::Exploratory => Some(self.exploratory_capacity),
            _ => None,
        };
        log::debug!(
            "channel {}: append {} ({:?})",
            kind.label(),
            slide.id,
            slide.headline
        );
        self.channels[kind.index()].append(slide, capacity);
    }

    pub fn navigate(&mut self, kind: ChannelKind, direction: Direction) {
        self.channels[kind.index()].navigate(direction);
    }

    /// The slide under the cursor, or `None` for an empty channel.
    pub fn peek_current(&self, kind: ChannelKind) -> Option<&Slide> {
        self.channels[kind.index()].peek()
    }

    pub fn info(&self, kind: ChannelKind) -> ChannelInfo {
        self.channels[kind.index()].info()
    }

    /// Consume the slide at the cursor. Empty channel: `None`, cursor stays 0.
    pub fn take(&mut self, kind: ChannelKind) -> Option<Slide> {
        self.channels[kind.index()].take()
    }

    /// Remove a slide by id. Unknown id: no-op returning `None`.
    pub fn remove(&mut self, kind: ChannelKind, id: Uuid) -> Option<Slide> {
        self.channels[kind.index()].remove(id)
    }

    pub fn reset(&mut self, kind: ChannelKind) {
        self.channels[kind.index()].reset();
    }

    pub fn reset_all(&mut self) {
        for channel in &mut self.channels {
            channel.reset();
        }
    }

    /// Iterate a channel's queue front-to-back (for context summaries).
    pub fn iter(&self, kind: ChannelKind) -> impl Iterator<Item = &Slide> {
        self.channels[kind.index()].queue.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
