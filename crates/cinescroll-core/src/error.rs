//! Error type shared by the camera engine.

/// Errors produced while loading assets or resolving navigation requests.
///
/// None of these escape the per-tick path: the engine falls back to a
/// synthetic path or ignores the request and logs.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("animation clip has no position or rotation track")]
    NoTracks,
    #[error("camera rig contains no animation clips")]
    NoClips,
    #[error("chapter index {index} out of range (active chapters: {len})")]
    ChapterIndexOutOfRange { index: usize, len: usize },
    #[error("unknown chapter: {0}")]
    UnknownChapter(String),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
