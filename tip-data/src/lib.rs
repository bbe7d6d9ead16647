//! Country reference data for the tip calculator.

mod loader;

pub use loader::{CountryLoader, CountryLoaderError, CountryRecord};
