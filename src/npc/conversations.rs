//! Scripted NPC-to-NPC conversation table.
//!
//! Pairs are stored under one canonical ordering and looked up symmetrically:
//! exactly one orientation of an unordered id pair resolves, and that
//! orientation decides who opens the exchange.
use bevy::prelude::*;

use crate::npc::components::NpcId;

/// One scripted back-and-forth: the opener's line and the reply.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub opener: String,
    pub reply: String,
}

impl Exchange {
    fn new(opener: &str, reply: &str) -> Self {
        Self {
            opener: opener.to_string(),
            reply: reply.to_string(),
        }
    }
}

#[derive(Debug)]
struct ConversationPair {
    opener: NpcId,
    responder: NpcId,
    exchanges: Vec<Exchange>,
    cursor: usize,
}

/// Resource holding every scripted pair, with symmetric lookup as the only
/// access path.
#[derive(Resource, Debug)]
pub struct ConversationScript {
    pairs: Vec<ConversationPair>,
}

impl Default for ConversationScript {
    fn default() -> Self {
        Self::village_script()
    }
}

impl ConversationScript {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// The shipped village script. The dragon has no entries on purpose.
    pub fn village_script() -> Self {
        let mut script = Self::new();
        script.add_pair(
            NpcId::WIZARD,
            NpcId::BLACKSMITH,
            vec![
                Exchange::new("The stars foretell a hero...", "Aye, about time."),
                Exchange::new(
                    "Any omens in your forge fire, Brunhild?",
                    "Only sparks. Omens are your trade.",
                ),
            ],
        );
        script.add_pair(
            NpcId::HERBALIST,
            NpcId::GUARD,
            vec![
                Exchange::new(
                    "You look pale, captain. Nettle tea?",
                    "I'd sooner drink boot water.",
                ),
                Exchange::new(
                    "The eastern ridge smells of sulfur again.",
                    "Then nobody patrols the eastern ridge.",
                ),
            ],
        );
        script.add_pair(
            NpcId::WIZARD,
            NpcId::HERBALIST,
            vec![Exchange::new(
                "Your moonpetal stock, is it fresh?",
                "Picked at dawn, as you insisted.",
            )],
        );
        script.add_pair(
            NpcId::BLACKSMITH,
            NpcId::GUARD,
            vec![Exchange::new(
                "That blade of yours needs a new edge.",
                "It needs a new arm behind it, more like.",
            )],
        );
        script
    }

    pub fn add_pair(&mut self, opener: NpcId, responder: NpcId, exchanges: Vec<Exchange>) {
        self.pairs.push(ConversationPair {
            opener,
            responder,
            exchanges,
            cursor: 0,
        });
    }

    /// Whether a scripted pair exists for the unordered id pair.
    pub fn has_pair(&self, a: NpcId, b: NpcId) -> bool {
        self.find(a, b).is_some()
    }

    fn find(&self, a: NpcId, b: NpcId) -> Option<usize> {
        self.pairs
            .iter()
            .position(|pair| {
                (pair.opener == a && pair.responder == b)
                    || (pair.opener == b && pair.responder == a)
            })
    }

    /// Resolves the unordered pair, returning `(opener, responder, exchange)`
    /// and advancing the pair's wrapping cursor. Empty or unknown pairs yield
    /// `None`, which callers treat as an ordinary non-match.
    pub fn take_exchange(&mut self, a: NpcId, b: NpcId) -> Option<(NpcId, NpcId, Exchange)> {
        let index = self.find(a, b)?;
        let pair = &mut self.pairs[index];
        if pair.exchanges.is_empty() {
            return None;
        }

        let exchange = pair.exchanges[pair.cursor].clone();
        pair.cursor = (pair.cursor + 1) % pair.exchanges.len();
        Some((pair.opener, pair.responder, exchange))
    }
}
