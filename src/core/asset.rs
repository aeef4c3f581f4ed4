use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use hashbrown::HashMap;

use crate::{
    config::SelectOptions,
    engine::rules::DisableRule,
    resource::ResourceIdentifiable,
    types::{AssetIdx, Bitmap, ImageKey, MediaType},
};

use super::selection::SelectionError;

/// Index reserved for the synthetic "take photo" cell.
pub const CAMERA_ITEM_IDX: AssetIdx = -1;

/// Lifecycle state of an asset within one picking session.
#[derive(Clone)]
pub enum AssetState {
    /// Disable rules have not run yet.
    Unchecked,
    /// Selectable and not selected.
    Normal,
    /// Selected by the user.
    Selected,
    /// Excluded by the carried rule. Absorbing.
    Disabled(Arc<dyn DisableRule>),
}

impl AssetState {
    /// Rule that disabled the asset, if any.
    pub fn disabled_by(&self) -> Option<&Arc<dyn DisableRule>> {
        match self {
            AssetState::Disabled(rule) => Some(rule),
            _ => None,
        }
    }
}

/// Compares the state tag only: every `Disabled(_)` equals every other.
impl PartialEq for AssetState {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl Eq for AssetState {}

impl fmt::Debug for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetState::Unchecked => f.write_str("Unchecked"),
            AssetState::Normal => f.write_str("Normal"),
            AssetState::Selected => f.write_str("Selected"),
            AssetState::Disabled(rule) => f.debug_tuple("Disabled").field(&rule.identifier()).finish(),
        }
    }
}

/// Read-only attribute view handed to disable rules.
#[derive(Debug, Clone, Copy)]
pub struct AssetInfo<'a> {
    /// Resource identifier.
    pub identifier: &'a str,
    /// Classified media type.
    pub media_type: MediaType,
    /// Playback length in seconds; `0.0` for stills.
    pub duration: f64,
    /// Original file size, when known.
    pub byte_size: Option<u64>,
}

/// A media-library resource plus picker/editor-local state.
pub struct Asset<R> {
    resource: R,
    media_type: MediaType,
    idx: AssetIdx,
    state: AssetState,
    selected_num: Option<usize>,
    images: HashMap<ImageKey, Bitmap>,
    video_ready: bool,
}

impl<R: ResourceIdentifiable> Asset<R> {
    /// Wraps `resource` with an explicit media type.
    pub fn new(resource: R, media_type: MediaType) -> Self {
        Self {
            resource,
            media_type,
            idx: 0,
            state: AssetState::Unchecked,
            selected_num: None,
            images: HashMap::new(),
            video_ready: false,
        }
    }

    /// Wraps the `idx`-th resource of an album, classifying it against `options`.
    pub fn from_resource(idx: AssetIdx, resource: R, options: &SelectOptions) -> Self {
        let media_type = MediaType::classify(&resource, options);
        let mut asset = Self::new(resource, media_type);
        asset.idx = idx;
        asset
    }

    /// Stable identifier of the wrapped resource.
    pub fn identifier(&self) -> &str {
        self.resource.identifier()
    }

    /// Wrapped library resource.
    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Media type fixed at construction.
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Position in the enumerated album.
    pub fn idx(&self) -> AssetIdx {
        self.idx
    }

    /// True for the synthetic camera cell.
    pub fn is_camera(&self) -> bool {
        self.idx == CAMERA_ITEM_IDX
    }

    /// Playback length in seconds; `0.0` for stills.
    pub fn duration(&self) -> f64 {
        self.resource.duration()
    }

    /// Duration as `MM:SS`; minutes are not capped at 59.
    pub fn duration_description(&self) -> String {
        format_duration(self.duration())
    }

    /// Attributes disable rules are evaluated against.
    pub fn info(&self) -> AssetInfo<'_> {
        AssetInfo {
            identifier: self.resource.identifier(),
            media_type: self.media_type,
            duration: self.resource.duration(),
            byte_size: self.resource.byte_size(),
        }
    }
}

impl<R> Asset<R> {
    /// Current lifecycle state.
    pub fn state(&self) -> &AssetState {
        &self.state
    }

    /// True until the disable rules have run.
    pub fn is_unchecked(&self) -> bool {
        matches!(self.state, AssetState::Unchecked)
    }

    /// True while selected.
    pub fn is_selected(&self) -> bool {
        matches!(self.state, AssetState::Selected)
    }

    /// True once a rule has disabled the asset.
    pub fn is_disabled(&self) -> bool {
        matches!(self.state, AssetState::Disabled(_))
    }

    /// 1-based selection order; `None` unless selected.
    pub fn selected_num(&self) -> Option<usize> {
        self.selected_num
    }

    /// Flips between `Normal` and `Selected` and returns the new selection flag.
    ///
    /// Deselecting clears the selection number; selecting leaves it unset
    /// until the owning collection assigns one.
    pub fn toggle_selected(&mut self) -> Result<bool, SelectionError> {
        match self.state {
            AssetState::Normal => {
                self.state = AssetState::Selected;
                Ok(true)
            }
            AssetState::Selected => {
                self.state = AssetState::Normal;
                self.selected_num = None;
                Ok(false)
            }
            AssetState::Unchecked => Err(SelectionError::Unchecked),
            AssetState::Disabled(ref rule) => Err(SelectionError::Disabled(rule.identifier().to_string())),
        }
    }

    /// Stores the number assigned by the owning collection. Ignored unless selected.
    pub fn assign_selected_num(&mut self, num: usize) {
        if self.is_selected() {
            self.selected_num = Some(num);
        }
    }

    pub(crate) fn classify(&mut self, state: AssetState) {
        debug_assert!(self.is_unchecked());
        self.state = state;
    }

    /// Stores `bitmap` under `key`, replacing any previous variant.
    pub fn set_image(&mut self, key: ImageKey, bitmap: Bitmap) {
        self.images.insert(key, bitmap);
    }

    /// Variant stored under `key`.
    pub fn image(&self, key: ImageKey) -> Option<&Bitmap> {
        self.images.get(&key)
    }

    /// Drops the bitmap stored under `key`.
    pub fn remove_image(&mut self, key: ImageKey) -> Option<Bitmap> {
        self.images.remove(&key)
    }

    /// Image to display: output, then edited, then initial.
    pub fn current_image(&self) -> Option<&Bitmap> {
        [ImageKey::Output, ImageKey::Edited, ImageKey::Initial]
            .iter()
            .find_map(|key| self.images.get(key))
    }

    /// Marks the video bytes as downloaded.
    pub fn mark_video_ready(&mut self) {
        self.video_ready = true;
    }

    /// True once the video bytes are downloaded.
    pub fn is_video_ready(&self) -> bool {
        self.video_ready
    }
}

impl<R: ResourceIdentifiable> Asset<R> {
    /// Photos are ready once any bitmap is loaded; videos once their bytes are downloaded.
    pub fn is_ready(&self) -> bool {
        if self.media_type.is_video() {
            self.video_ready
        } else {
            self.current_image().is_some()
        }
    }
}

impl<R: ResourceIdentifiable> PartialEq for Asset<R> {
    fn eq(&self, other: &Self) -> bool {
        self.identifier() == other.identifier()
    }
}

impl<R: ResourceIdentifiable> Eq for Asset<R> {}

impl<R: ResourceIdentifiable> Hash for Asset<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier().hash(state);
    }
}

impl<R: ResourceIdentifiable> fmt::Debug for Asset<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("identifier", &self.identifier())
            .field("media_type", &self.media_type)
            .field("state", &self.state)
            .field("selected_num", &self.selected_num)
            .finish()
    }
}

impl<R: ResourceIdentifiable> fmt::Display for Asset<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Asset> {} mediaType={}", self.identifier(), self.media_type)?;
        match self.current_image() {
            Some(image) => write!(f, " image={}x{}", image.width(), image.height()),
            None => f.write_str(" image=none"),
        }
    }
}

/// Formats whole seconds as zero-padded `MM:SS`.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 { seconds as u64 } else { 0 };
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_minutes_exceed_an_hour() {
        assert_eq!(format_duration(3605.0), "60:05");
        assert_eq!(format_duration(59.9), "00:59");
        assert_eq!(format_duration(-3.0), "00:00");
        assert_eq!(format_duration(f64::NAN), "00:00");
    }
}
