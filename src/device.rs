//! Capture devices: the still camera and the speech transcriber.
//!
//! Both are exclusive resources. Each is only touched through a guard
//! ([`CameraStream`], [`Recording`]) that releases the device when dropped,
//! whichever way the caller leaves.

mod camera;
mod speech;

pub use camera::{
    CAMERA_ERROR, Camera, CameraStream, CameraView, FileCamera, capture_still, split_data_uri,
    to_data_uri,
};
pub use speech::{LineTranscriber, NoSpeech, Recording, Transcriber, record};

/// Errors from acquiring or reading a capture device.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("device unavailable: {0}")]
    Unavailable(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
