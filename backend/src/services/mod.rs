pub mod analyzer;
pub mod classifier;
pub mod export;
pub mod fetcher;
pub mod insights;
pub mod strategies;
pub mod suggestions;
