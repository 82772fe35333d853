pub mod mechtallion;

pub use mechtallion::{DEFAULT_TIMEOUT, MechtallionScraper, run_with_budget};
