//! Still camera: acquire a stream, snapshot a frame, release.

use std::fs;
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;

use super::DeviceError;

/// Shown when the camera can't be acquired.
pub const CAMERA_ERROR: &str = "Unable to access camera. Please check permissions.";

/// JPEG quality for snapshots, on the encoder's 1–100 scale.
const JPEG_QUALITY: u8 = 80;

/// A source of still frames.
pub trait Camera {
    /// Acquires the device.
    fn open(&mut self) -> Result<(), DeviceError>;

    /// Grabs the current frame. Only valid between `open` and `close`.
    fn snapshot(&mut self) -> Result<DynamicImage, DeviceError>;

    /// Releases the device. Must be safe to call more than once.
    fn close(&mut self);
}

/// An open camera. Closes it on drop.
pub struct CameraStream<'a, C: Camera + ?Sized> {
    camera: &'a mut C,
}

impl<'a, C: Camera + ?Sized> CameraStream<'a, C> {
    pub fn open(camera: &'a mut C) -> Result<Self, DeviceError> {
        camera.open()?;
        log::debug!("camera stream acquired");
        Ok(Self { camera })
    }

    pub fn snapshot(&mut self) -> Result<DynamicImage, DeviceError> {
        self.camera.snapshot()
    }
}

impl<C: Camera + ?Sized> Drop for CameraStream<'_, C> {
    fn drop(&mut self) {
        self.camera.close();
        log::debug!("camera stream released");
    }
}

/// Opens the camera, takes one JPEG snapshot, and releases the camera.
///
/// Returns the image as a `data:image/jpeg;base64,...` URI.
pub fn capture_still<C: Camera + ?Sized>(camera: &mut C) -> Result<String, DeviceError> {
    let mut stream = CameraStream::open(camera)?;
    let frame = stream.snapshot()?;
    let jpeg = encode_jpeg(&frame)?;
    Ok(to_data_uri("image/jpeg", &jpeg))
}

fn encode_jpeg(frame: &DynamicImage) -> Result<Vec<u8>, DeviceError> {
    let mut bytes = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
        // JPEG has no alpha channel.
        encoder.encode_image(&frame.to_rgb8())?;
    }
    Ok(bytes)
}

pub fn to_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Splits `data:<mime>;base64,<data>` into its MIME type and payload.
pub fn split_data_uri(uri: &str) -> Option<(&str, &str)> {
    let (header, data) = uri.strip_prefix("data:")?.split_once(',')?;
    let mime_type = header.strip_suffix(";base64")?;
    if mime_type.is_empty() {
        return None;
    }
    Some((mime_type, data))
}

/// The capture overlay: tries the camera, remembers why it failed, retries.
#[derive(Debug, Default)]
pub struct CameraView {
    error: Option<String>,
}

impl CameraView {
    pub fn new() -> Self {
        Self::default()
    }

    /// The message to show with a retry control, if acquisition failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The shutter is disabled while an error is showing.
    pub fn can_capture(&self) -> bool {
        self.error.is_none()
    }

    /// Takes a snapshot. On failure the error is recorded and `None` returned.
    pub fn capture<C: Camera + ?Sized>(&mut self, camera: &mut C) -> Option<String> {
        match capture_still(camera) {
            Ok(image) => {
                self.error = None;
                Some(image)
            }
            Err(e) => {
                log::warn!("camera capture failed: {e}");
                self.error = Some(format!("{CAMERA_ERROR} ({e})"));
                None
            }
        }
    }

    /// Clears the error and tries again.
    pub fn retry<C: Camera + ?Sized>(&mut self, camera: &mut C) -> Option<String> {
        self.error = None;
        self.capture(camera)
    }
}

/// A camera whose frames come from an image file on disk.
#[derive(Debug)]
pub struct FileCamera {
    path: PathBuf,
    open: bool,
}

impl FileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            open: false,
        }
    }
}

impl Camera for FileCamera {
    fn open(&mut self) -> Result<(), DeviceError> {
        let meta = fs::metadata(&self.path).map_err(|e| {
            DeviceError::Unavailable(format!("{}: {e}", self.path.display()))
        })?;
        if !meta.is_file() {
            return Err(DeviceError::Unavailable(format!(
                "{} is not a file",
                self.path.display()
            )));
        }
        self.open = true;
        Ok(())
    }

    fn snapshot(&mut self) -> Result<DynamicImage, DeviceError> {
        if !self.open {
            return Err(DeviceError::Unavailable("camera is not open".to_string()));
        }
        Ok(image::open(&self.path)?)
    }

    fn close(&mut self) {
        self.open = false;
    }
}
