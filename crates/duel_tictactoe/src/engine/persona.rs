//! Display names for AI opponents.

use rand::Rng;
use rand::seq::IndexedRandom;

const AI_NAMES: [&str; 10] = [
    "Ada", "Babbage", "Boole", "Dijkstra", "Hopper", "Knuth", "Lovelace", "Neumann", "Shannon",
    "Turing",
];

/// Picks a name for a computer opponent.
pub fn random_ai_name<R: Rng>(rng: &mut R) -> &'static str {
    AI_NAMES.choose(rng).copied().unwrap_or(AI_NAMES[0])
}
