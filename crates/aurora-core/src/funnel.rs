//! Funnel stage tracker.
//!
//! Two independent boards keyed by contact id:
//! - **recency** (`observe`): phase recomputed from "hours since last message" on every call.
//! - **conversation** (`observe_message`): message counter with a monotone phase.
//!
//! Every mutation publishes the full, insertion-ordered snapshot of the touched board on a
//! broadcast channel. Entries are never removed.

use crate::error::AuroraResult;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;
/// Conversation-board messages needed before promotion to [`FunnelPhase::Engaged`].
pub const ENGAGED_AFTER_MESSAGES: u32 = 3;

static PAID_CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)fanvue|link|enlace|donde\s*comprar|el\s*link|la\s*link|pasar.*link|pásame|pásalo|send.*link|give.*link|where.*(buy|subscribe|see\s*more)|subscribe|onlyfans|only\s*fans",
    )
    .unwrap_or_else(|e| panic!("invalid paid-content pattern: {}", e))
});

/// True when the message asks for links, subscriptions, or where to buy content.
pub fn asks_for_paid_content(text: &str) -> bool {
    PAID_CONTENT.is_match(text)
}

/// Funnel phase, serialized as its number (1..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FunnelPhase {
    #[default]
    Opening = 1,
    Engaged = 2,
    Closing = 3,
}

impl FunnelPhase {
    /// Recency rule: > 24h ⇒ 3, > 1h ⇒ 2, otherwise 1.
    pub fn from_hours(hours_ago: f64) -> Self {
        if hours_ago > 24.0 {
            FunnelPhase::Closing
        } else if hours_ago > 1.0 {
            FunnelPhase::Engaged
        } else {
            FunnelPhase::Opening
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

impl From<FunnelPhase> for u8 {
    fn from(p: FunnelPhase) -> u8 {
        p as u8
    }
}

impl TryFrom<u8> for FunnelPhase {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(FunnelPhase::Opening),
            2 => Ok(FunnelPhase::Engaged),
            3 => Ok(FunnelPhase::Closing),
            other => Err(format!("funnel phase out of range: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelEntry {
    pub contact_id: String,
    pub display_name: String,
    pub last_message: String,
    pub phase: FunnelPhase,
    pub message_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_ago: Option<f64>,
    pub last_seen: DateTime<Utc>,
}

impl FunnelEntry {
    fn new(contact_id: &str) -> Self {
        Self {
            contact_id: contact_id.to_string(),
            display_name: contact_id.to_string(),
            last_message: String::new(),
            phase: FunnelPhase::Opening,
            message_count: 0,
            hours_ago: None,
            last_seen: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelFeed {
    Recency,
    Conversation,
}

impl FunnelFeed {
    /// SSE event name for this board.
    pub fn event_name(&self) -> &'static str {
        match self {
            FunnelFeed::Recency => "funnel",
            FunnelFeed::Conversation => "conversation_funnel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelSnapshot {
    pub feed: FunnelFeed,
    pub entries: Vec<FunnelEntry>,
}

/// Both boards at once (`GET /api/funnel`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelBoards {
    pub funnel: Vec<FunnelEntry>,
    pub conversation_funnel: Vec<FunnelEntry>,
}

/// One row of the externally maintained pending re-engagement list.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingContact {
    pub username: String,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub hours_ago: f64,
}

/// Parses the pending list (`[{username, preview, hours_ago}]`).
pub fn load_pending_rows(json: &str) -> AuroraResult<Vec<PendingContact>> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Debug, Default)]
struct Board {
    entries: Vec<FunnelEntry>,
    index: HashMap<String, usize>,
}

impl Board {
    fn entry(&mut self, contact_id: &str) -> &mut FunnelEntry {
        let i = match self.index.get(contact_id) {
            Some(&i) => i,
            None => {
                self.entries.push(FunnelEntry::new(contact_id));
                let i = self.entries.len() - 1;
                self.index.insert(contact_id.to_string(), i);
                i
            }
        };
        &mut self.entries[i]
    }
}

#[derive(Debug, Default)]
struct Boards {
    recency: Board,
    conversation: Board,
}

pub struct FunnelTracker {
    boards: Mutex<Boards>,
    tx: broadcast::Sender<FunnelSnapshot>,
}

impl Default for FunnelTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FunnelTracker {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            boards: Mutex::new(Boards::default()),
            tx,
        }
    }

    /// Receives every snapshot published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<FunnelSnapshot> {
        self.tx.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Boards> {
        self.boards.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, snapshot: FunnelSnapshot) -> FunnelSnapshot {
        // No subscribers is not an error.
        let _ = self.tx.send(snapshot.clone());
        snapshot
    }

    /// Recency feed. Phase is recomputed from `hours_ago` on every call and may go down.
    pub fn observe(
        &self,
        contact_id: &str,
        display_name: Option<&str>,
        preview: &str,
        hours_ago: f64,
    ) -> FunnelSnapshot {
        let snapshot = {
            let mut boards = self.lock();
            let e = boards.recency.entry(contact_id);
            if let Some(name) = display_name.map(str::trim).filter(|n| !n.is_empty()) {
                e.display_name = name.to_string();
            }
            e.last_message = preview.to_string();
            e.hours_ago = Some(hours_ago);
            e.phase = FunnelPhase::from_hours(hours_ago);
            e.last_seen = Utc::now();
            tracing::debug!(
                "[funnel] {} → phase {} ({}h)",
                contact_id,
                e.phase.number(),
                hours_ago
            );
            FunnelSnapshot {
                feed: FunnelFeed::Recency,
                entries: boards.recency.entries.clone(),
            }
        };
        self.publish(snapshot)
    }

    /// Conversation feed. Counts messages; paid-content requests jump to phase 3, otherwise
    /// the third message promotes to phase 2. Never demotes.
    pub fn observe_message(
        &self,
        contact_id: &str,
        display_name: Option<&str>,
        body: &str,
        asked_for_paid_content: bool,
    ) -> FunnelSnapshot {
        let snapshot = {
            let mut boards = self.lock();
            let e = boards.conversation.entry(contact_id);
            if let Some(name) = display_name.map(str::trim).filter(|n| !n.is_empty()) {
                e.display_name = name.to_string();
            }
            e.message_count = e.message_count.saturating_add(1);
            e.last_message = body.to_string();
            e.last_seen = Utc::now();
            let target = if asked_for_paid_content {
                FunnelPhase::Closing
            } else if e.message_count >= ENGAGED_AFTER_MESSAGES {
                FunnelPhase::Engaged
            } else {
                FunnelPhase::Opening
            };
            if target > e.phase {
                tracing::info!(
                    "[funnel] {} promoted {} → {}",
                    contact_id,
                    e.phase.number(),
                    target.number()
                );
                e.phase = target;
            }
            FunnelSnapshot {
                feed: FunnelFeed::Conversation,
                entries: boards.conversation.entries.clone(),
            }
        };
        self.publish(snapshot)
    }

    pub fn snapshot(&self, feed: FunnelFeed) -> FunnelSnapshot {
        let boards = self.lock();
        let board = match feed {
            FunnelFeed::Recency => &boards.recency,
            FunnelFeed::Conversation => &boards.conversation,
        };
        FunnelSnapshot {
            feed,
            entries: board.entries.clone(),
        }
    }

    pub fn boards(&self) -> FunnelBoards {
        let boards = self.lock();
        FunnelBoards {
            funnel: boards.recency.entries.clone(),
            conversation_funnel: boards.conversation.entries.clone(),
        }
    }

    /// Feeds every row of the pending list JSON into [`observe`](Self::observe).
    /// A missing file is a no-op returning 0.
    pub fn load_pending_file(&self, path: &Path) -> AuroraResult<usize> {
        if !path.exists() {
            return Ok(0);
        }
        let rows = load_pending_rows(&std::fs::read_to_string(path)?)?;
        for row in &rows {
            self.observe(&row.username, None, &row.preview, row.hours_ago);
        }
        Ok(rows.len())
    }
}
