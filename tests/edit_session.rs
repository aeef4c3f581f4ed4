use std::sync::{Arc, Mutex};

use pickkit::{
    config::{CacheConfig, EditorOptions, MosaicStyle},
    edit::{
        content::{EditorContent, MosaicOutcome},
        host::{EditEvent, EditKind, EditorHost, OverlayKind, Surface},
        mosaic::pixelate,
    },
    persist::MemoryStorage,
    types::{Bitmap, Point, Size},
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Screenshot(Surface),
    Displayed(Bitmap),
    PenLayer(Option<Bitmap>),
    InsertBelow(OverlayKind, OverlayKind),
    Interactive(OverlayKind, bool),
    Hidden(OverlayKind, bool),
    Annotations(bool),
    Notify(EditEvent),
}

/// Records every host call; screenshots return the queued bitmap.
#[derive(Clone, Default)]
struct FakeHost {
    calls: Arc<Mutex<Vec<Call>>>,
    next_shot: Arc<Mutex<Option<Bitmap>>>,
}

impl FakeHost {
    fn queue_shot(&self, shot: Bitmap) {
        *self.next_shot.lock().unwrap() = Some(shot);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<EditEvent> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Notify(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl EditorHost for FakeHost {
    fn screenshot(&mut self, surface: Surface, _size: Size) -> Option<Bitmap> {
        self.calls.lock().unwrap().push(Call::Screenshot(surface));
        self.next_shot.lock().unwrap().take()
    }

    fn set_displayed_image(&mut self, image: &Bitmap) {
        self.calls.lock().unwrap().push(Call::Displayed(image.clone()));
    }

    fn set_pen_layer_image(&mut self, image: Option<&Bitmap>) {
        self.calls.lock().unwrap().push(Call::PenLayer(image.cloned()));
    }

    fn insert_overlay_below(&mut self, overlay: OverlayKind, below: OverlayKind) {
        self.calls.lock().unwrap().push(Call::InsertBelow(overlay, below));
    }

    fn set_overlay_interactive(&mut self, overlay: OverlayKind, interactive: bool) {
        self.calls.lock().unwrap().push(Call::Interactive(overlay, interactive));
    }

    fn set_overlay_hidden(&mut self, overlay: OverlayKind, hidden: bool) {
        self.calls.lock().unwrap().push(Call::Hidden(overlay, hidden));
    }

    fn set_annotations_hidden(&mut self, hidden: bool) {
        self.calls.lock().unwrap().push(Call::Annotations(hidden));
    }

    fn zoom_scale(&self) -> f32 {
        2.0
    }

    fn notify(&mut self, event: EditEvent) {
        self.calls.lock().unwrap().push(Call::Notify(event));
    }
}

fn photo() -> Bitmap {
    Bitmap::from_fn(8, 8, |x, y| image::Rgba([(x * 30) as u8, (y * 30) as u8, 0, 255]))
}

fn solid(v: u8) -> Bitmap {
    Bitmap::from_pixel(8, 8, image::Rgba([v, v, v, 255]))
}

fn options() -> EditorOptions {
    EditorOptions {
        mosaic_level: 4,
        mosaic_styles: vec![MosaicStyle::Pixelated, MosaicStyle::Solid { rgba: [0, 0, 0, 255] }],
        ..EditorOptions::default()
    }
}

fn session(host: &FakeHost) -> EditorContent<FakeHost, MemoryStorage> {
    EditorContent::with_storage(host.clone(), photo(), options(), MemoryStorage::new(), MemoryStorage::new())
}

fn with_mosaic(host: &FakeHost) -> EditorContent<FakeHost, MemoryStorage> {
    let mut content = session(host);
    let job = content.prepare_mosaic();
    let pixelated = pixelate(&job.image, job.level);
    assert_eq!(content.install_mosaic(job.generation, pixelated), MosaicOutcome::Installed);
    content
}

fn draw_pen(content: &mut EditorContent<FakeHost, MemoryStorage>) {
    assert!(content.pen_begin(Point::new(2.0, 2.0)));
    content.pen_move(Point::new(4.0, 6.0));
    content.pen_end();
}

fn draw_mosaic(content: &mut EditorContent<FakeHost, MemoryStorage>) {
    assert!(content.mosaic_begin(Point::new(1.0, 1.0)));
    content.mosaic_move(Point::new(5.0, 5.0));
    content.mosaic_end();
}

#[test]
fn opening_shows_photo_and_disables_pen_touches() {
    let host = FakeHost::default();
    let content = session(&host);

    assert_eq!(
        host.calls(),
        vec![
            Call::Displayed(photo()),
            Call::Interactive(OverlayKind::PenCanvas, false),
        ]
    );
    assert_eq!(content.displayed_image(), &photo());
    assert!(!content.pen_can_undo());
    assert!(!content.mosaic_can_undo());
}

#[test]
fn pen_requires_the_pen_tool() {
    let host = FakeHost::default();
    let mut content = session(&host);
    assert!(!content.pen_begin(Point::new(1.0, 1.0)));

    content.select_tool(Some(EditKind::Pen));
    assert!(content.pen_begin(Point::new(4.0, 4.0)));
    // Touch points are mapped back through the zoom scale.
    assert_eq!(content.canvas().strokes()[0].points[0], Point::new(2.0, 2.0));
}

#[test]
fn pen_end_commits_layer_and_enables_undo() {
    let host = FakeHost::default();
    let mut content = session(&host);
    content.select_tool(Some(EditKind::Pen));
    host.clear();

    host.queue_shot(solid(200));
    draw_pen(&mut content);

    assert!(content.pen_can_undo());
    assert_eq!(content.canvas().last_pen_image(), Some(&solid(200)));
    assert!(content.canvas().strokes().is_empty());
    assert_eq!(
        host.calls(),
        vec![
            Call::Notify(EditEvent::StrokeBegan(EditKind::Pen)),
            Call::Screenshot(Surface::PenLayer),
            Call::PenLayer(Some(solid(200))),
            Call::Notify(EditEvent::StrokeEnded(EditKind::Pen)),
        ]
    );
}

#[test]
fn pen_undo_clears_layer_once() {
    let host = FakeHost::default();
    let mut content = session(&host);
    content.select_tool(Some(EditKind::Pen));
    host.queue_shot(solid(200));
    draw_pen(&mut content);
    host.clear();

    assert!(content.pen_undo());
    assert!(!content.pen_can_undo());
    assert_eq!(content.canvas().last_pen_image(), None);
    assert_eq!(
        host.calls(),
        vec![Call::PenLayer(None), Call::Notify(EditEvent::Undone(EditKind::Pen))]
    );

    host.clear();
    assert!(!content.pen_undo());
    assert!(host.calls().is_empty());
}

#[test]
fn failed_pen_capture_records_nothing() {
    let host = FakeHost::default();
    let mut content = session(&host);
    content.select_tool(Some(EditKind::Pen));

    draw_pen(&mut content);
    assert!(!content.pen_can_undo());
    assert!(content.canvas().strokes().is_empty());
    assert_eq!(host.events().last(), Some(&EditEvent::StrokeEnded(EditKind::Pen)));
}

#[test]
fn mosaic_install_inserts_overlay_below_pen() {
    let host = FakeHost::default();
    let mut content = session(&host);
    host.clear();

    let job = content.prepare_mosaic();
    assert_eq!(job.level, 4);
    let outcome = content.install_mosaic(job.generation, pixelate(&job.image, job.level));

    assert_eq!(outcome, MosaicOutcome::Installed);
    assert!(content.mosaic().is_some());
    assert_eq!(
        host.calls(),
        vec![
            Call::InsertBelow(OverlayKind::Mosaic, OverlayKind::PenCanvas),
            Call::Interactive(OverlayKind::Mosaic, false),
            Call::Notify(EditEvent::MosaicReady),
        ]
    );
}

#[test]
fn mosaic_install_is_interactive_when_tool_active() {
    let host = FakeHost::default();
    let mut content = session(&host);
    content.select_tool(Some(EditKind::Mosaic));
    host.clear();

    let job = content.prepare_mosaic();
    content.install_mosaic(job.generation, pixelate(&job.image, job.level));
    assert!(host.calls().contains(&Call::Interactive(OverlayKind::Mosaic, true)));
}

#[test]
fn superseded_mosaic_result_is_stale() {
    let host = FakeHost::default();
    let mut content = session(&host);

    let first = content.prepare_mosaic();
    let second = content.prepare_mosaic();
    assert_eq!(
        content.install_mosaic(first.generation, pixelate(&first.image, first.level)),
        MosaicOutcome::Stale
    );
    assert!(content.mosaic().is_none());
    assert_eq!(
        content.install_mosaic(second.generation, pixelate(&second.image, second.level)),
        MosaicOutcome::Installed
    );
}

#[test]
fn missing_pixelation_leaves_mosaic_unavailable() {
    let host = FakeHost::default();
    let mut content = session(&host);
    host.clear();

    let job = content.prepare_mosaic();
    assert_eq!(content.install_mosaic(job.generation, None), MosaicOutcome::Unavailable);
    assert!(content.mosaic().is_none());
    assert!(host.calls().is_empty());

    content.select_tool(Some(EditKind::Mosaic));
    assert!(!content.mosaic_begin(Point::new(1.0, 1.0)));
}

#[test]
fn mosaic_end_captures_without_pen_or_annotations() {
    let host = FakeHost::default();
    let mut content = with_mosaic(&host);
    content.select_tool(Some(EditKind::Mosaic));
    host.clear();

    host.queue_shot(solid(50));
    draw_mosaic(&mut content);

    assert_eq!(
        host.calls(),
        vec![
            Call::Notify(EditEvent::StrokeBegan(EditKind::Mosaic)),
            Call::Hidden(OverlayKind::PenCanvas, true),
            Call::Annotations(true),
            Call::Screenshot(Surface::Photo),
            Call::Hidden(OverlayKind::PenCanvas, false),
            Call::Annotations(false),
            Call::Displayed(solid(50)),
            Call::Notify(EditEvent::StrokeEnded(EditKind::Mosaic)),
        ]
    );
    assert_eq!(content.displayed_image(), &solid(50));
    assert!(content.mosaic_can_undo());
    assert!(content.mosaic().unwrap().paths().is_empty());
}

#[test]
fn mosaic_undo_restores_base_photo() {
    let host = FakeHost::default();
    let mut content = with_mosaic(&host);
    content.select_tool(Some(EditKind::Mosaic));
    host.queue_shot(solid(50));
    draw_mosaic(&mut content);
    host.clear();

    assert!(content.mosaic_undo());
    assert_eq!(content.displayed_image(), &photo());
    assert!(!content.mosaic_can_undo());
    assert_eq!(
        host.calls(),
        vec![Call::Displayed(photo()), Call::Notify(EditEvent::Undone(EditKind::Mosaic))]
    );
    assert!(!content.mosaic_undo());
}

#[test]
fn style_switch_shows_latest_committed_mosaic() {
    let host = FakeHost::default();
    let mut content = with_mosaic(&host);
    content.select_tool(Some(EditKind::Mosaic));

    content.set_mosaic_image(1);
    assert_eq!(content.displayed_image(), &photo());
    assert_eq!(content.mosaic().unwrap().current_idx(), 1);
    assert_eq!(content.mosaic().unwrap().cover(), &solid(0));

    host.queue_shot(solid(50));
    draw_mosaic(&mut content);
    content.set_mosaic_image(0);
    assert_eq!(content.displayed_image(), &solid(50));
    // Non-destructive: the edit is still undoable.
    assert!(content.mosaic_can_undo());
}

#[test]
fn rebuild_keeps_selected_style() {
    let host = FakeHost::default();
    let mut content = with_mosaic(&host);
    content.set_mosaic_image(1);

    let job = content.prepare_mosaic();
    content.install_mosaic(job.generation, pixelate(&job.image, job.level));
    assert_eq!(content.mosaic().unwrap().current_idx(), 1);
}

#[test]
fn pen_and_mosaic_undo_are_independent() {
    let host = FakeHost::default();
    let mut content = with_mosaic(&host);

    content.select_tool(Some(EditKind::Pen));
    host.queue_shot(solid(10));
    draw_pen(&mut content);

    content.select_tool(Some(EditKind::Mosaic));
    host.queue_shot(solid(20));
    draw_mosaic(&mut content);

    assert!(content.pen_undo());
    assert!(content.mosaic_can_undo());
    assert_eq!(content.displayed_image(), &solid(20));
}

fn rooted_options(root: &std::path::Path) -> EditorOptions {
    EditorOptions {
        cache: CacheConfig {
            root: Some(root.to_path_buf()),
            keep_in_memory: false,
        },
        ..options()
    }
}

#[test]
fn file_backed_session_removes_scratch_files() {
    let dir = tempfile::tempdir().unwrap();
    let host = FakeHost::default();

    let mut content = EditorContent::open(host.clone(), photo(), rooted_options(dir.path())).unwrap();
    let scratch = content.scratch_dir().unwrap().to_path_buf();
    assert_eq!(scratch.parent(), Some(dir.path()));

    content.select_tool(Some(EditKind::Pen));
    host.queue_shot(solid(200));
    assert!(content.pen_begin(Point::new(1.0, 1.0)));
    content.pen_end();
    assert!(scratch.join("pen.png").is_file());

    drop(content);
    assert!(!scratch.exists());
    // A caller-provided root is left in place.
    assert!(dir.path().is_dir());
}

#[test]
fn sessions_sharing_a_root_keep_separate_undo() {
    let dir = tempfile::tempdir().unwrap();
    let first_host = FakeHost::default();
    let second_host = FakeHost::default();

    let mut first = EditorContent::open(first_host.clone(), photo(), rooted_options(dir.path())).unwrap();
    first.select_tool(Some(EditKind::Pen));
    first_host.queue_shot(solid(10));
    assert!(first.pen_begin(Point::new(1.0, 1.0)));
    first.pen_end();
    assert!(first.pen_can_undo());

    let mut second = EditorContent::open(second_host.clone(), photo(), rooted_options(dir.path())).unwrap();
    assert_ne!(first.scratch_dir(), second.scratch_dir());
    assert!(first.pen_can_undo());
    assert!(!second.pen_can_undo());

    second.select_tool(Some(EditKind::Pen));
    second_host.queue_shot(solid(20));
    assert!(second.pen_begin(Point::new(2.0, 2.0)));
    second.pen_end();

    drop(second);
    assert!(first.pen_can_undo());
    assert!(first.pen_undo());
}
