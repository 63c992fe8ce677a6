//! Caller-owned cache of resolved timeline drafts.
//!
//! Entries are keyed by a SHA-256 fingerprint of the owning note and every
//! note it links to, so any content change in either misses the cache.
//! Holding the cache behind `&mut` keeps concurrent callers on separate
//! instances.

use std::collections::{HashMap, VecDeque};

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

use crate::grammar::linked_event_ids;
use crate::links::NoteIndex;
use crate::models::{Note, Timeline};
use crate::timeline::{assemble, draft, TimelineDraft};

pub const DEFAULT_CAPACITY: usize = 64;

struct CachedDraft {
    owner: String,
    linked: Vec<String>,
    draft: TimelineDraft,
}

pub struct ParseCache {
    capacity: usize,
    entries: HashMap<String, CachedDraft>,
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Fingerprint of a note plus the current content of every note it links to.
pub fn fingerprint(note: &Note, linked: &[String], index: &NoteIndex<'_>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(note.id.as_bytes());
    hasher.update([0u8]);
    hasher.update(note.content.as_bytes());
    for id in linked {
        hasher.update([1u8]);
        hasher.update(id.as_bytes());
        hasher.update([0u8]);
        match index.get(id) {
            Some(linked_note) => hasher.update(linked_note.content.as_bytes()),
            None => hasher.update([2u8]),
        }
    }
    hex::encode(hasher.finalize())
}

impl ParseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Cached draft for `note`, parsing and resolving it on a miss.
    pub fn draft(&mut self, note: &Note, index: &NoteIndex<'_>) -> TimelineDraft {
        let linked = linked_event_ids(&note.content);
        let key = fingerprint(note, &linked, index);
        if let Some(cached) = self.entries.get(&key) {
            self.hits += 1;
            log::debug!("event=parse_cache_hit id={}", note.id);
            return cached.draft.clone();
        }
        self.misses += 1;
        let fresh = draft(note, index);
        self.insert(
            key,
            CachedDraft {
                owner: note.id.clone(),
                linked,
                draft: fresh.clone(),
            },
        );
        fresh
    }

    /// Assembled timeline for `note`, reusing a cached draft when possible.
    pub fn timeline(&mut self, note: &Note, index: &NoteIndex<'_>, today: NaiveDate) -> Timeline {
        let draft = self.draft(note, index);
        assemble(&draft, today)
    }

    fn insert(&mut self, key: String, entry: CachedDraft) {
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else { break };
            if self.entries.remove(&oldest).is_some() {
                log::debug!("event=parse_cache_evict key={oldest}");
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, entry);
    }

    /// Drop every entry owned by or linking to `note_id`. Returns how many
    /// entries were removed.
    pub fn invalidate(&mut self, note_id: &str) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, e| e.owner != note_id && !e.linked.iter().any(|id| id == note_id));
        let entries = &self.entries;
        self.order.retain(|key| entries.contains_key(key));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
