use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::models::job::InputReference;

/// Response from `POST /api/videos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoUpload {
    pub video_id: String,
    pub stored_path: String,
    pub duration: f64,
    pub fps: f64,
}

impl VideoUpload {
    pub fn reference(&self) -> InputReference {
        InputReference::video(&self.video_id)
    }
}

/// Request body for `POST /api/skeletons`. The `data` value is forwarded
/// opaquely; the backend extracts frame counts from whichever skeleton
/// format it recognizes.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SkeletonUploadRequest {
    #[garde(length(min = 1, max = 255))]
    pub filename: String,

    #[garde(skip)]
    pub data: serde_json::Value,
}

/// Response from `POST /api/skeletons`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletonUpload {
    pub skeleton_id: String,
    pub stored_path: String,
    pub frame_count: u64,
    pub fps: f64,
}

impl SkeletonUpload {
    pub fn reference(&self) -> InputReference {
        InputReference::skeleton(&self.skeleton_id)
    }
}
