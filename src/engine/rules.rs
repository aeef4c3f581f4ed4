use std::fmt;

use crate::{
    config::SelectOptions,
    core::asset::{AssetInfo, format_duration},
    types::MediaType,
};

/// Policy predicate that can exclude an asset from selection.
///
/// Rules are pure: the outcome depends only on the asset attributes and the
/// rule's own configuration.
pub trait DisableRule: Send + Sync {
    /// Stable name, recorded with the disabled state.
    fn identifier(&self) -> &str;

    /// True when `asset` must not be selectable.
    fn is_disabled(&self, asset: &AssetInfo<'_>) -> bool;

    /// Text shown to the user when they tap a disabled asset.
    fn disabled_message(&self, asset: &AssetInfo<'_>) -> String {
        format!("{} is not selectable ({})", asset.identifier, self.identifier())
    }
}

/// Rejects videos outside `[min, max]` seconds. Photos always pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoDurationRule {
    /// Shortest accepted length, in seconds.
    pub min: f64,
    /// Longest accepted length, in seconds.
    pub max: f64,
}

impl VideoDurationRule {
    /// Rule accepting videos between `min` and `max` seconds inclusive.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl DisableRule for VideoDurationRule {
    fn identifier(&self) -> &str {
        "video_duration"
    }

    fn is_disabled(&self, asset: &AssetInfo<'_>) -> bool {
        asset.media_type == MediaType::Video && (asset.duration < self.min || asset.duration > self.max)
    }

    fn disabled_message(&self, asset: &AssetInfo<'_>) -> String {
        if asset.duration < self.min {
            format!("Please select a video longer than {}", format_duration(self.min))
        } else {
            format!("Please select a video shorter than {}", format_duration(self.max))
        }
    }
}

/// Rejects media types the session does not select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaTypeRule {
    /// Media types that stay selectable.
    pub allowed: SelectOptions,
}

impl DisableRule for MediaTypeRule {
    fn identifier(&self) -> &str {
        "media_type"
    }

    fn is_disabled(&self, asset: &AssetInfo<'_>) -> bool {
        !self.allowed.allows(asset.media_type)
    }

    fn disabled_message(&self, asset: &AssetInfo<'_>) -> String {
        format!("{} items cannot be selected", asset.media_type)
    }
}

/// Rejects resources larger than `max_bytes`. Unknown sizes pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSizeRule {
    /// Largest accepted size.
    pub max_bytes: u64,
}

impl DisableRule for FileSizeRule {
    fn identifier(&self) -> &str {
        "file_size"
    }

    fn is_disabled(&self, asset: &AssetInfo<'_>) -> bool {
        asset.byte_size.is_some_and(|size| size > self.max_bytes)
    }

    fn disabled_message(&self, _asset: &AssetInfo<'_>) -> String {
        format!("Please select a file smaller than {} bytes", self.max_bytes)
    }
}

/// Host-supplied rule backed by a closure.
pub struct PredicateRule<F> {
    identifier: String,
    predicate: F,
}

impl<F> PredicateRule<F>
where
    F: Fn(&AssetInfo<'_>) -> bool + Send + Sync,
{
    /// Rule named `identifier` that disables assets matching `predicate`.
    pub fn new(identifier: impl Into<String>, predicate: F) -> Self {
        Self {
            identifier: identifier.into(),
            predicate,
        }
    }
}

impl<F> DisableRule for PredicateRule<F>
where
    F: Fn(&AssetInfo<'_>) -> bool + Send + Sync,
{
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn is_disabled(&self, asset: &AssetInfo<'_>) -> bool {
        (self.predicate)(asset)
    }
}

impl<F> fmt::Debug for PredicateRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRule").field("identifier", &self.identifier).finish()
    }
}
