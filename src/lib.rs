//! Wardrobe catalog and outfit recommendation engine.
//!
//! The engine keeps a catalog of garments, ingests captured photos through
//! a sequential background pipeline, learns from pairwise like/dislike
//! feedback, and ranks outfit candidates for a free-text occasion.
//!
//! [`Wardrobe`] is the entry point; open one over a [`db::Storage`]
//! substrate and a set of [`services::providers::Collaborators`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use wardrobe_engine::db::FileStorage;
//! use wardrobe_engine::services::providers::Collaborators;
//! use wardrobe_engine::{Config, Wardrobe};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let storage = Arc::new(FileStorage::new(&config.data_dir));
//! let (wardrobe, worker) = Wardrobe::open(storage, Collaborators::default(), config).await?;
//!
//! let outfit = wardrobe.recommend("casual lunch with friends", None).await?;
//! println!("{:?}", outfit.map(|o| o.reason));
//!
//! worker.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod wardrobe;

pub use config::{init_tracing, Config};
pub use error::{AppError, AppResult};
pub use wardrobe::{Wardrobe, WardrobeEvent};
