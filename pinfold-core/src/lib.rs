//! # Pinfold Core
//!
//! Acquisition and materialization engine for pin photo albums: given a
//! persisted geographic pin, the engine queries a photo-search service for
//! images taken near the pin, picks a pseudo-random result page so repeated
//! fetches stay varied, and materializes the results into the pin's persisted
//! photo collection using a placeholder-then-fill strategy, publishing an
//! album event after every incremental change so a UI can refresh as photos
//! arrive.
//!
//! Durability, reverse geocoding, and the HTTP transport sit behind ports
//! ([`store::PinStore`], [`geocode::ReverseGeocoder`],
//! [`search::SearchClient`], [`fetch::ImageFetcher`]); the engine owns only
//! the orchestration and its state-consistency rules.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Acquisition coordinator, the engine's public entry point
pub mod coordinator;

/// Error types and error handling utilities
pub mod error;

/// Album change events and the in-process event bus
pub mod events;

/// Image byte download port and HTTP implementation
pub mod fetch;

/// Reverse-geocoding port
pub mod geocode;

/// Placeholder-then-fill photo materialization
pub mod materialize;

/// Photo-search port, Flickr client, and random page selection
pub mod search;

/// Pin-photo store port and in-memory reference implementation
pub mod store;

pub use coordinator::AlbumCoordinator;
pub use error::{AlbumError, Result};
pub use events::{AlbumEvent, AlbumEventPublisher, InProcAlbumEventBus};
