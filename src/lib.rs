//! Asset selection state and photo-edit undo for image picker/editor front ends.
//!
//! # Examples
//!
//! Classifying and selecting assets with [`core::selection::SelectionController`]:
//! ```
//! use std::path::PathBuf;
//!
//! use pickkit::{config::PickerOptions, core::selection::SelectionController};
//!
//! let mut picker = SelectionController::new(PickerOptions::default());
//! picker.insert(PathBuf::from("/photos/beach.jpg")).expect("insert");
//! picker.insert(PathBuf::from("/photos/clip.mov")).expect("insert");
//!
//! assert!(picker.toggle("/photos/beach.jpg").expect("toggle"));
//! assert_eq!(picker.get("/photos/beach.jpg").unwrap().selected_num(), Some(1));
//!
//! // Videos are not selectable by default.
//! assert!(picker.get("/photos/clip.mov").unwrap().is_disabled());
//! ```
//!
//! Single-slot undo with [`persist::cache::EditCache`]:
//! ```
//! use pickkit::{persist::{cache::EditCache, MemoryStorage}, types::Bitmap};
//!
//! let mut cache = EditCache::new("pen", MemoryStorage::new(), false);
//! cache.write(Bitmap::new(4, 4));
//! assert!(cache.has_snapshot());
//! assert!(cache.read(true).is_some());
//! assert!(!cache.has_snapshot());
//! ```
#![deny(missing_docs)]

/// Picker and editor options.
pub mod config;
/// Asset state machine and selection bookkeeping.
pub mod core;
/// Pen and mosaic edit sessions.
pub mod edit;
/// Disable rules and rule-chain evaluation.
pub mod engine;
/// Typed fetches against the platform asset library.
pub mod fetch;
/// Undo snapshot cache and its storage backends.
pub mod persist;
/// Resource capability interface.
pub mod resource;
/// Background pixelation delivery and the HUD loop.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;
