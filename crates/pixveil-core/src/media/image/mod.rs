pub mod adaptive;
mod bit_queue;

pub use adaptive::{embed, extract, EmbeddingPlan, SlotWalk};
