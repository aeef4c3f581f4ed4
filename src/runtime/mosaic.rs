use std::fmt;

use hashbrown::HashMap;
use tokio::{runtime::Handle, sync::mpsc};
use tracing::debug;

use crate::{
    edit::{
        content::{EditorContent, MosaicOutcome},
        host::EditorHost,
        mosaic::pixelate,
    },
    persist::{SnapshotStorage, file::FileStorage},
    types::Bitmap,
};

/// Non-owning handle to an editor held by an [`EditorRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(u64);

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "content-{}", self.0)
    }
}

/// Pixelation result travelling back to the interaction side.
#[derive(Debug)]
pub struct MosaicDelivery {
    /// Editor the result belongs to.
    pub content: ContentId,
    /// Setup generation the result was built for.
    pub generation: u64,
    /// Pixelated photo; `None` when pixelation failed.
    pub image: Option<Bitmap>,
}

/// Owns every live editor and is the only consumer of pixelation results.
///
/// Workers hold a [`ContentId`], never the editor. A result is applied only
/// if its editor is still registered when the result is pumped; lookup and
/// install happen in one call on the interaction side.
pub struct EditorRegistry<H: EditorHost, S: SnapshotStorage = FileStorage> {
    contents: HashMap<ContentId, EditorContent<H, S>>,
    next_id: u64,
    in_flight: usize,
    runtime: Handle,
    tx: mpsc::UnboundedSender<MosaicDelivery>,
    rx: mpsc::UnboundedReceiver<MosaicDelivery>,
}

impl<H: EditorHost, S: SnapshotStorage> EditorRegistry<H, S> {
    /// Registry that runs pixelation on `runtime`'s blocking pool.
    pub fn new(runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            contents: HashMap::new(),
            next_id: 1,
            in_flight: 0,
            runtime,
            tx,
            rx,
        }
    }

    /// Registers `content` and returns its handle.
    pub fn insert(&mut self, content: EditorContent<H, S>) -> ContentId {
        let id = ContentId(self.next_id);
        self.next_id += 1;
        self.contents.insert(id, content);
        id
    }

    /// Editor behind `id`, if still registered.
    pub fn get(&self, id: ContentId) -> Option<&EditorContent<H, S>> {
        self.contents.get(&id)
    }

    /// Mutable editor behind `id`, if still registered.
    pub fn get_mut(&mut self, id: ContentId) -> Option<&mut EditorContent<H, S>> {
        self.contents.get_mut(&id)
    }

    /// True while `id` is registered.
    pub fn contains(&self, id: ContentId) -> bool {
        self.contents.contains_key(&id)
    }

    /// Number of live editors.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// True when no editor is registered.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Tears an editor down. Results still in flight for it will be dropped.
    pub fn remove(&mut self, id: ContentId) -> Option<EditorContent<H, S>> {
        self.contents.remove(&id)
    }

    /// Starts building the mosaic for `id` on a worker. Returns false for unknown ids.
    pub fn setup_mosaic(&mut self, id: ContentId) -> bool {
        let Some(content) = self.contents.get_mut(&id) else {
            return false;
        };
        let job = content.prepare_mosaic();
        let tx = self.tx.clone();
        self.in_flight += 1;
        self.runtime.spawn_blocking(move || {
            let image = pixelate(&job.image, job.level);
            let _ = tx.send(MosaicDelivery {
                content: id,
                generation: job.generation,
                image,
            });
        });
        true
    }

    /// Applies every result that has already arrived, without waiting.
    pub fn pump(&mut self) -> Vec<(ContentId, MosaicOutcome)> {
        let mut applied = Vec::new();
        while let Ok(delivery) = self.rx.try_recv() {
            let content = delivery.content;
            applied.push((content, self.deliver(delivery)));
        }
        applied
    }

    /// Pixelation jobs started but not yet pumped.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Waits for the next result and applies it. Returns `None` at once when
    /// no job is in flight.
    pub async fn pump_next(&mut self) -> Option<(ContentId, MosaicOutcome)> {
        if self.in_flight == 0 {
            return None;
        }
        let delivery = self.rx.recv().await?;
        let content = delivery.content;
        Some((content, self.deliver(delivery)))
    }

    fn deliver(&mut self, delivery: MosaicDelivery) -> MosaicOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        match self.contents.get_mut(&delivery.content) {
            Some(content) => content.install_mosaic(delivery.generation, delivery.image),
            None => {
                debug!(content = %delivery.content, "mosaic result for torn-down editor dropped");
                MosaicOutcome::HostGone
            }
        }
    }
}
