pub mod color;
pub mod embedding;
pub mod ingestion;
pub mod intent;
pub mod providers;
pub mod recommend;
pub mod scoring;
