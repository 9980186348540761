//! Speech transcription: continuous capture producing cumulative text.

use std::io::BufRead;

use crate::model::CaptureSession;

use super::DeviceError;

/// A continuous speech-to-text source.
///
/// Every transcript it yields is the whole utterance so far, not a delta.
pub trait Transcriber {
    /// Whether the host can transcribe at all.
    fn is_available(&self) -> bool {
        true
    }

    fn start(&mut self) -> Result<(), DeviceError>;

    /// Blocks for the next cumulative transcript. `None` once capture ends.
    fn next_transcript(&mut self) -> Option<String>;

    /// Stops capture. Must be safe to call more than once.
    fn stop(&mut self);
}

/// A running transcription. Stops it on drop.
pub struct Recording<'a, T: Transcriber + ?Sized> {
    transcriber: &'a mut T,
}

impl<'a, T: Transcriber + ?Sized> Recording<'a, T> {
    pub fn start(transcriber: &'a mut T) -> Result<Self, DeviceError> {
        transcriber.start()?;
        log::debug!("speech capture started");
        Ok(Self { transcriber })
    }

    pub fn next_transcript(&mut self) -> Option<String> {
        self.transcriber.next_transcript()
    }
}

impl<T: Transcriber + ?Sized> Drop for Recording<'_, T> {
    fn drop(&mut self) {
        self.transcriber.stop();
        log::debug!("speech capture stopped");
    }
}

/// Runs one recording pass into `session`.
///
/// Clears the draft text, then replaces it with each transcript as it
/// arrives. Returns when the transcriber stops producing text. An
/// unavailable transcriber leaves the session untouched.
pub fn record<T: Transcriber + ?Sized>(
    session: &mut CaptureSession,
    transcriber: &mut T,
) -> Result<(), DeviceError> {
    if !transcriber.is_available() {
        log::info!("speech capture unavailable, no transcript");
        return Ok(());
    }

    let mut recording = Recording::start(transcriber)?;
    session.start_recording();
    while let Some(transcript) = recording.next_transcript() {
        session.apply_transcript(transcript);
    }
    drop(recording);
    session.stop_recording();
    Ok(())
}

/// Treats each input line as one spoken phrase.
///
/// A blank line or end of input stops capture.
pub struct LineTranscriber<R> {
    reader: R,
    heard: Vec<String>,
    listening: bool,
}

impl<R: BufRead> LineTranscriber<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            heard: Vec::new(),
            listening: false,
        }
    }
}

impl<R: BufRead> Transcriber for LineTranscriber<R> {
    fn start(&mut self) -> Result<(), DeviceError> {
        self.heard.clear();
        self.listening = true;
        Ok(())
    }

    fn next_transcript(&mut self) -> Option<String> {
        if !self.listening {
            return None;
        }
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(e) => {
                log::warn!("speech input failed: {e}");
                return None;
            }
        }
        let phrase = line.trim();
        if phrase.is_empty() {
            return None;
        }
        self.heard.push(phrase.to_string());
        Some(self.heard.join(" "))
    }

    fn stop(&mut self) {
        self.listening = false;
    }
}

/// A host without speech capture.
#[derive(Debug, Default)]
pub struct NoSpeech;

impl Transcriber for NoSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<(), DeviceError> {
        Err(DeviceError::Unavailable("speech recognition".to_string()))
    }

    fn next_transcript(&mut self) -> Option<String> {
        None
    }

    fn stop(&mut self) {}
}
