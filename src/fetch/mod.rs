//! Typed fetches against the platform asset library.
//!
//! Every fetch returns a [`FetchRequest`] immediately: a request id usable for
//! cancellation plus a one-shot completion that resolves exactly once.
//! Requests of the wrong media kind never reach the library; they resolve at
//! once with [`FetchError::InvalidMediaType`] and carry request id `0`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

use crate::{
    core::asset::Asset,
    resource::ResourceIdentifiable,
    types::{RequestId, ResourceKind},
};

/// Request id handed out for requests rejected before reaching the library.
pub const REJECTED_REQUEST_ID: RequestId = 0;

/// Failure of a single fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The requested fetch kind does not match the asset's media type.
    #[error("invalid media type for this request")]
    InvalidMediaType,
    /// The library returned data that could not be used.
    #[error("invalid data returned by the asset library")]
    InvalidData,
    /// The request was cancelled or its completion dropped.
    #[error("request cancelled")]
    Cancelled,
    /// Any other library failure.
    #[error("asset library error: {0}")]
    Library(String),
}

/// Which rendition of the asset to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssetVersion {
    /// Latest rendition, including edits made in the platform photo app.
    #[default]
    Current,
    /// Unedited original.
    Original,
}

/// Export quality for video file requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportPreset {
    /// Copy the original stream without re-encoding.
    #[default]
    Passthrough,
    /// Highest re-encoded quality.
    Highest,
    /// Medium re-encoded quality.
    Medium,
    /// Low re-encoded quality.
    Low,
}

/// Options for [`Asset::fetch_photo_data`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhotoDataFetchOptions {
    /// Rendition to fetch.
    pub version: AssetVersion,
    /// Allow downloading from cloud storage.
    pub network_access_allowed: bool,
}

/// Options for [`Asset::fetch_photo_url`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhotoUrlFetchOptions {
    /// Rendition to fetch.
    pub version: AssetVersion,
    /// Allow downloading from cloud storage.
    pub network_access_allowed: bool,
    /// File name to write; the library picks one when `None`.
    pub file_name: Option<String>,
}

/// Options for [`Asset::fetch_video`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoFetchOptions {
    /// Rendition to fetch.
    pub version: AssetVersion,
    /// Allow downloading from cloud storage.
    pub network_access_allowed: bool,
}

/// Options for [`Asset::fetch_video_url`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoUrlFetchOptions {
    /// Rendition to fetch.
    pub version: AssetVersion,
    /// Allow downloading from cloud storage.
    pub network_access_allowed: bool,
    /// Export quality.
    pub export_preset: ExportPreset,
}

/// Raw photo bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoData {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Uniform type identifier reported by the library, if any.
    pub uniform_type: Option<String>,
}

/// Playable video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoItem {
    /// Location the player should open.
    pub url: PathBuf,
    /// Playback length in seconds.
    pub duration: f64,
}

/// Pending or completed library request.
#[derive(Debug)]
pub struct FetchRequest<T> {
    id: RequestId,
    rx: oneshot::Receiver<Result<T, FetchError>>,
}

/// Sending half of a [`FetchRequest`]. Consumed on completion, so it fires at most once.
#[derive(Debug)]
pub struct Completion<T> {
    tx: oneshot::Sender<Result<T, FetchError>>,
}

impl<T> FetchRequest<T> {
    /// New in-flight request and the completion the library resolves later.
    pub fn pending(id: RequestId) -> (Self, Completion<T>) {
        let (tx, rx) = oneshot::channel();
        (Self { id, rx }, Completion { tx })
    }

    /// Request that is already complete.
    pub fn resolved(id: RequestId, result: Result<T, FetchError>) -> Self {
        let (request, completion) = Self::pending(id);
        completion.complete(result);
        request
    }

    /// Request rejected without reaching the library.
    pub fn rejected(err: FetchError) -> Self {
        Self::resolved(REJECTED_REQUEST_ID, Err(err))
    }

    /// Library request id; `0` for rejected requests.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Waits for the completion. A dropped completion reads as [`FetchError::Cancelled`].
    pub async fn result(self) -> Result<T, FetchError> {
        self.rx.await.map_err(|_| FetchError::Cancelled)?
    }

    /// Non-blocking poll; `None` while the request is still in flight.
    pub fn try_result(&mut self) -> Option<Result<T, FetchError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(FetchError::Cancelled)),
        }
    }
}

impl<T> Completion<T> {
    /// Delivers the result. A request dropped by its caller is ignored.
    pub fn complete(self, result: Result<T, FetchError>) {
        let _ = self.tx.send(result);
    }
}

/// Platform asset library.
pub trait AssetLibrary<R: ResourceIdentifiable> {
    /// Requests the original photo bytes.
    fn request_photo_data(&self, resource: &R, options: &PhotoDataFetchOptions) -> FetchRequest<PhotoData>;
    /// Requests the photo written to a file.
    fn request_photo_url(&self, resource: &R, options: &PhotoUrlFetchOptions) -> FetchRequest<PathBuf>;
    /// Requests a playable video.
    fn request_video(&self, resource: &R, options: &VideoFetchOptions) -> FetchRequest<VideoItem>;
    /// Requests the video exported to a file.
    fn request_video_url(&self, resource: &R, options: &VideoUrlFetchOptions) -> FetchRequest<PathBuf>;
    /// Cancels an in-flight request. Unknown ids are ignored.
    fn cancel(&self, id: RequestId);
}

impl<R: ResourceIdentifiable> Asset<R> {
    /// Fetches original photo bytes. Photos, GIFs, and live photos only.
    pub fn fetch_photo_data<L: AssetLibrary<R> + ?Sized>(
        &self,
        library: &L,
        options: &PhotoDataFetchOptions,
    ) -> FetchRequest<PhotoData> {
        if !self.expect_kind(ResourceKind::Image) {
            return FetchRequest::rejected(FetchError::InvalidMediaType);
        }
        library.request_photo_data(self.resource(), options)
    }

    /// Fetches the original photo as a file. Photos and GIFs only.
    pub fn fetch_photo_url<L: AssetLibrary<R> + ?Sized>(
        &self,
        library: &L,
        options: &PhotoUrlFetchOptions,
    ) -> FetchRequest<PathBuf> {
        if !self.expect_kind(ResourceKind::Image) {
            return FetchRequest::rejected(FetchError::InvalidMediaType);
        }
        library.request_photo_url(self.resource(), options)
    }

    /// Fetches a playable video. Videos only.
    pub fn fetch_video<L: AssetLibrary<R> + ?Sized>(
        &self,
        library: &L,
        options: &VideoFetchOptions,
    ) -> FetchRequest<VideoItem> {
        if !self.expect_kind(ResourceKind::Video) {
            return FetchRequest::rejected(FetchError::InvalidMediaType);
        }
        library.request_video(self.resource(), options)
    }

    /// Exports the video to a file for transfer. Videos only.
    pub fn fetch_video_url<L: AssetLibrary<R> + ?Sized>(
        &self,
        library: &L,
        options: &VideoUrlFetchOptions,
    ) -> FetchRequest<PathBuf> {
        if !self.expect_kind(ResourceKind::Video) {
            return FetchRequest::rejected(FetchError::InvalidMediaType);
        }
        library.request_video_url(self.resource(), options)
    }

    fn expect_kind(&self, kind: ResourceKind) -> bool {
        let actual = self.resource().kind();
        if actual != kind {
            debug!(identifier = %self.identifier(), ?actual, ?kind, "fetch rejected: media type mismatch");
            return false;
        }
        true
    }
}
