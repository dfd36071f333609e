pub mod enums;
pub mod error;
pub mod positions;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use enums::Side;
pub use error::CoreError;
pub use positions::{OpenPosition, PairQuote};
pub use series::{PriceHistory, PricePoint};
