pub mod job;
pub mod prediction;
pub mod upload;

pub use job::{InputKind, InputReference, Job, JobStatus, JobStatusPayload};
pub use prediction::{
    BatchResultsPayload, JobResultsPayload, Prediction, PredictionPayload, ResultMetadata,
};
pub use upload::{SkeletonUpload, SkeletonUploadRequest, VideoUpload};
