pub mod card;
pub mod review;

pub use card::{Card, CardKind};
pub use review::ReviewQuality;
