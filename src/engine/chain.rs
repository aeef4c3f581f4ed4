use std::sync::Arc;

use tracing::debug;

use crate::{
    config::PickerOptions,
    core::asset::{Asset, AssetState},
    resource::ResourceIdentifiable,
};

use super::rules::{DisableRule, FileSizeRule, MediaTypeRule, VideoDurationRule};

/// Ordered disable rules. The first rule that matches wins.
#[derive(Clone, Default)]
pub struct RuleChain {
    rules: Vec<Arc<dyn DisableRule>>,
}

impl RuleChain {
    /// Empty chain; every asset evaluates to `Normal`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default chain for `options`: media type, video duration, then file size.
    pub fn from_options(options: &PickerOptions) -> Self {
        let mut chain = Self::new()
            .with(MediaTypeRule {
                allowed: options.select_options,
            })
            .with(VideoDurationRule::new(options.min_video_duration, options.max_video_duration));
        if let Some(max_bytes) = options.max_file_bytes {
            chain.push(FileSizeRule { max_bytes });
        }
        chain
    }

    /// Appends `rule`, builder style.
    pub fn with(mut self, rule: impl DisableRule + 'static) -> Self {
        self.push(rule);
        self
    }

    /// Appends `rule`.
    pub fn push(&mut self, rule: impl DisableRule + 'static) {
        self.rules.push(Arc::new(rule));
    }

    /// Appends a rule shared with other chains.
    pub fn push_shared(&mut self, rule: Arc<dyn DisableRule>) {
        self.rules.push(rule);
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the chain has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule identifiers in evaluation order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.identifier())
    }

    /// Classifies an unchecked asset as `Normal` or `Disabled(rule)`.
    ///
    /// Already-classified assets are left untouched, so repeated calls are
    /// no-ops. Rules after the first match are not evaluated.
    pub fn evaluate<'a, R: ResourceIdentifiable>(&self, asset: &'a mut Asset<R>) -> &'a AssetState {
        if !asset.is_unchecked() {
            return asset.state();
        }

        let info = asset.info();
        let hit = self.rules.iter().find(|rule| rule.is_disabled(&info)).cloned();
        let state = match hit {
            Some(rule) => {
                debug!(identifier = %info.identifier, rule = rule.identifier(), "asset disabled");
                AssetState::Disabled(rule)
            }
            None => AssetState::Normal,
        };

        asset.classify(state);
        asset.state()
    }
}

impl std::fmt::Debug for RuleChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.identifiers()).finish()
    }
}
