//! Data layer: core types, loading, filtering, and queries.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file, drop incomplete rows, normalize names → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset   │  Vec<Restaurant>, province index (read-only)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐     ┌──────┐
//!   │  filter   │ ──▶ │query │  option lists, top-N counts, distances (geo)
//!   └──────────┘     └──────┘
//!                        │
//!                        ▼
//!                    ┌──────┐
//!                    │hexbin│  map density cells
//!                    └──────┘
//! ```

pub mod filter;
pub mod geo;
pub mod hexbin;
pub mod loader;
pub mod model;
pub mod query;
