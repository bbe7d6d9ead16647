pub mod calculations;
pub mod detect;
pub mod entry;
pub mod models;
pub mod state;

pub use detect::{DetectError, EnvTimeZone, FixedTimeZone, TimeZoneProvider, detect_country};
pub use entry::EntryBuffer;
pub use models::*;
pub use state::{TipCalculatorState, TipSnapshot, TipStateError};
