use hashbrown::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    config::PickerOptions,
    engine::chain::RuleChain,
    resource::ResourceIdentifiable,
    types::AssetIdx,
};

use super::asset::{Asset, AssetState};

/// Rejected selection or insertion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// No asset with this identifier belongs to the session.
    #[error("asset {0} is not part of this session")]
    MissingAsset(String),
    /// An asset with this identifier was already inserted.
    #[error("asset {0} is already part of this session")]
    AlreadyExists(String),
    /// The asset has not been classified yet.
    #[error("disable rules have not been evaluated for this asset")]
    Unchecked,
    /// The asset is disabled by the named rule.
    #[error("asset is disabled by rule `{0}`")]
    Disabled(String),
    /// Selecting would exceed the configured limit.
    #[error("selection limit of {0} reached")]
    LimitReached(usize),
}

/// Owns the assets of one picking session and the order in which they were selected.
///
/// The controller is the single writer of asset state; the selection order
/// it keeps is the source of every asset's `selected_num`.
#[derive(Debug)]
pub struct SelectionController<R: ResourceIdentifiable> {
    options: PickerOptions,
    rules: RuleChain,
    assets: Vec<Asset<R>>,
    pos: HashMap<String, usize>,
    selected: Vec<String>,
}

impl<R: ResourceIdentifiable> SelectionController<R> {
    /// Builds a controller using the default rule chain for `options`.
    pub fn new(options: PickerOptions) -> Self {
        let rules = RuleChain::from_options(&options);
        Self::with_rules(options, rules)
    }

    /// Builds a controller evaluating `rules` instead of the default chain.
    pub fn with_rules(options: PickerOptions, rules: RuleChain) -> Self {
        Self {
            options,
            rules,
            assets: Vec::new(),
            pos: HashMap::new(),
            selected: Vec::new(),
        }
    }

    /// Options the session was created with.
    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    /// Rule chain run on insertion.
    pub fn rules(&self) -> &RuleChain {
        &self.rules
    }

    /// Wraps and classifies `resource`, appending it at the next album index.
    pub fn insert(&mut self, resource: R) -> Result<&Asset<R>, SelectionError> {
        let idx = self.assets.len() as AssetIdx;
        let asset = Asset::from_resource(idx, resource, &self.options.select_options);
        self.insert_asset(asset)
    }

    /// Adds an already-built asset, running the rule chain if it is still unchecked.
    pub fn insert_asset(&mut self, mut asset: Asset<R>) -> Result<&Asset<R>, SelectionError> {
        let id = asset.identifier().to_string();
        if self.pos.contains_key(&id) {
            return Err(SelectionError::AlreadyExists(id));
        }

        self.rules.evaluate(&mut asset);
        let at = self.assets.len();
        self.pos.insert(id, at);
        self.assets.push(asset);
        Ok(&self.assets[at])
    }

    /// Inserts every resource, skipping duplicates. Returns how many were added.
    pub fn extend<I: IntoIterator<Item = R>>(&mut self, resources: I) -> usize {
        let mut added = 0;
        for resource in resources {
            match self.insert(resource) {
                Ok(_) => added += 1,
                Err(err) => debug!(%err, "skipping resource"),
            }
        }
        added
    }

    /// Asset with identifier `id`.
    pub fn get(&self, id: &str) -> Option<&Asset<R>> {
        self.pos.get(id).map(|&at| &self.assets[at])
    }

    /// Mutable access for image and readiness updates.
    ///
    /// Selection state must go through [`Self::toggle`] so numbering stays consistent.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Asset<R>> {
        let at = *self.pos.get(id)?;
        Some(&mut self.assets[at])
    }

    /// Assets in insertion order.
    pub fn assets(&self) -> &[Asset<R>] {
        &self.assets
    }

    /// Number of assets in the session.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// True when the session holds no assets.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Selected assets in selection order.
    pub fn selected(&self) -> Vec<&Asset<R>> {
        self.selected.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Identifiers of the selected assets, in selection order.
    pub fn selected_ids(&self) -> &[String] {
        &self.selected
    }

    /// Number of selected assets.
    pub fn selected_len(&self) -> usize {
        self.selected.len()
    }

    /// True when no further asset may be selected.
    pub fn is_limit_reached(&self) -> bool {
        self.selected.len() >= self.options.select_limit
    }

    /// Message for the rule that disabled `id`, if it is disabled.
    pub fn disabled_message(&self, id: &str) -> Option<String> {
        let asset = self.get(id)?;
        let rule = asset.state().disabled_by()?;
        Some(rule.disabled_message(&asset.info()))
    }

    /// Toggles selection of `id` and returns the new selection flag.
    ///
    /// Selecting assigns the next number; deselecting renumbers the assets
    /// selected after it so numbers stay contiguous from 1.
    pub fn toggle(&mut self, id: &str) -> Result<bool, SelectionError> {
        let at = *self
            .pos
            .get(id)
            .ok_or_else(|| SelectionError::MissingAsset(id.to_string()))?;

        if matches!(self.assets[at].state(), AssetState::Normal) && self.is_limit_reached() {
            return Err(SelectionError::LimitReached(self.options.select_limit));
        }

        let selected = self.assets[at].toggle_selected()?;
        if selected {
            self.selected.push(id.to_string());
            self.assets[at].assign_selected_num(self.selected.len());
        } else {
            self.selected.retain(|sel| sel != id);
            self.renumber();
        }

        info!(identifier = %id, selected, count = self.selected.len(), "selection toggled");
        Ok(selected)
    }

    /// Deselects everything.
    pub fn clear_selection(&mut self) {
        for id in std::mem::take(&mut self.selected) {
            if let Some(&at) = self.pos.get(&id) {
                if let Err(err) = self.assets[at].toggle_selected() {
                    debug!(identifier = %id, %err, "asset left selected state unchanged");
                }
            }
        }
    }

    fn renumber(&mut self) {
        for (n, id) in self.selected.iter().enumerate() {
            if let Some(&at) = self.pos.get(id) {
                self.assets[at].assign_selected_num(n + 1);
            }
        }
    }
}
