pub mod interleave;
pub mod priority;
pub mod sm2;
pub mod suggestions;

pub use sm2::{update_sm2, update_sm2_at, Sm2Result, Sm2State};
pub use suggestions::{suggest, SuggestionOptions};
