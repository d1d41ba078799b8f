//! Generation tokens for superseding in-flight precomputations.
//!
//! Each client session gets a monotonically increasing generation. A
//! precompute takes a token before it starts and checks it before
//! returning; if a newer precompute began for the same session meanwhile,
//! the stale result is dropped.

use std::collections::HashMap;

use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationToken {
    session: String,
    generation: u64,
}

impl GenerationToken {
    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct Generations {
    next: u64,
    latest: HashMap<String, u64>,
}

#[derive(Debug, Default)]
pub struct PrecomputeSequencer {
    generations: Mutex<Generations>,
}

impl PrecomputeSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation for `session`, superseding any earlier one.
    /// The generation is assigned under the lock, so insertion order
    /// always matches generation order.
    pub async fn begin(&self, session: &str) -> GenerationToken {
        let mut generations = self.generations.lock().await;
        generations.next += 1;
        let generation = generations.next;
        generations.latest.insert(session.to_string(), generation);

        GenerationToken {
            session: session.to_string(),
            generation,
        }
    }

    /// True while no newer generation exists for the token's session
    pub async fn is_current(&self, token: &GenerationToken) -> bool {
        self.generations.lock().await.latest.get(&token.session) == Some(&token.generation)
    }

    /// Forget the session if the token is still its latest generation.
    /// A superseded token leaves the newer entry alone.
    pub async fn finish(&self, token: &GenerationToken) {
        let mut generations = self.generations.lock().await;
        if generations.latest.get(&token.session) == Some(&token.generation) {
            generations.latest.remove(&token.session);
        }
    }

    /// Sessions with a precompute still in flight
    pub async fn active_sessions(&self) -> usize {
        self.generations.lock().await.latest.len()
    }
}
