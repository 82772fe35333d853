//! Scrape the Мечталлион prize table from nloto.ru and write it to CSV or XLSX.

pub mod browser;
pub mod config;
pub mod error;
pub mod export;
pub mod html;
pub mod models;
pub mod prize_finder;
pub mod scrapers;
pub mod traits;

pub use error::ScrapeError;
pub use prize_finder::{PrizeFinder, RunSummary};
