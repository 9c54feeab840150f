//! # Masonry Gallery
//!
//! A headless photo gallery: pages of photos are fetched from an
//! Unsplash-compatible API, accumulated in display order, and arranged in a
//! multi-column masonry grid. Browsing, text search, pull-to-refresh, and
//! infinite scroll are modelled as presenter operations so any front end
//! (or the bundled CLI) can drive them.
//!
//! # Architecture
//!
//! ```text
//!  gestures ──▶ GalleryPresenter ──▶ GalleryController ──▶ PhotoApi (HTTP)
//!                    │    ▲                  │
//!                    │    └── GalleryEvent ──┘
//!                    ▼
//!              MasonryLayout ◀── GridHeightEstimator
//! ```
//!
//! The presenter owns the data controller and the layout. Fetch results
//! flow back as data-changed events which the presenter drains on its own
//! task before rebuilding the grid.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`layout`] | Masonry layout engine and rectangle math |
//! | [`gallery`] | Paged fetching, search state, in-flight guard |
//! | [`presenter`] | Gesture handling, height estimation, grid cells |
//! | [`api`] | `PhotoApi` trait and the reqwest implementation |
//! | [`types`] | Photo records decoded from API responses |
//! | [`floating_label`] | Floating-label text input state machine |
//! | [`config`] | `config.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Round-robin columns
//!
//! Items are dealt into columns 0, 1, 2, 0, 1, 2, ... rather than into the
//! shortest column. With the fixed-rows height estimator every item is the
//! same height, so the two strategies agree; round-robin keeps each item's
//! column predictable from its index alone.
//!
//! ## Drop, don't queue
//!
//! Only one fetch may be outstanding. Scroll events fire continuously near
//! the bottom of the grid, and queueing them would request several pages
//! for a single gesture. A second attempt returns
//! [`FetchOutcome::Busy`](gallery::FetchOutcome::Busy) instead.
//!
//! ## Explicit outcomes
//!
//! Fetch failures are logged and leave the gallery in its last good state,
//! but they are also returned to the caller so a front end can surface them.

pub mod api;
pub mod config;
pub mod floating_label;
pub mod gallery;
pub mod layout;
pub mod output;
pub mod presenter;
pub mod types;
