//! Core library for pokedex
//!
//! This crate implements the **Functional Core** of the pokedex application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`pokedex_core`** (this crate): Pure transformation functions with zero I/O
//! - **`pokedex`**: HTTP transport, request caching and the terminal UI (the Imperative Shell)
//!
//! All functions in this crate are pure: the same input always produces the
//! same output, and they can be tested with fixture data, no mocking required.
//!
//! # Module Organization
//!
//! - [`catalog`]: PokeAPI response models, id extraction and response shaping
//! - [`query`]: Cache keys identifying each fetch
//! - [`aggregate`]: Multi-type intersection, client-side pagination and result reconciliation
//! - [`session`]: Selection, page and sticky-total state of a browse session
//! - [`output`]: Serializable result output shared by every presentation
//!
//! # Example Usage
//!
//! ```rust
//! use pokedex_core::aggregate::compute_intersection;
//! use pokedex_core::catalog::{FacetItems, Item};
//!
//! let per_type = vec![
//!     FacetItems { facet: 10, items: vec![Item::new("charizard", Some(6)), Item::new("charmander", Some(4))] },
//!     FacetItems { facet: 3, items: vec![Item::new("charizard", Some(6)), Item::new("pidgey", Some(16))] },
//! ];
//!
//! let both = compute_intersection(&[10, 3], &per_type);
//! assert_eq!(both, vec![Item::new("charizard", Some(6))]);
//! ```

pub mod aggregate;
pub mod catalog;
pub mod output;
pub mod query;
pub mod session;
