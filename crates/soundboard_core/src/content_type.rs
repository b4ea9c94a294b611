//! Accepted audio content types.

use soundboard_error::{SoundError, SoundErrorKind};
use strum::IntoEnumIterator;

/// Audio MIME types the soundboard accepts for upload.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum AudioContentType {
    /// MP3 audio
    #[display("audio/mpeg")]
    Mpeg,
    /// WAV audio
    #[display("audio/wav")]
    Wav,
    /// Ogg audio
    #[display("audio/ogg")]
    Ogg,
    /// FLAC audio
    #[display("audio/flac")]
    Flac,
    /// AAC audio
    #[display("audio/aac")]
    Aac,
    /// MPEG-4 audio
    #[display("audio/mp4")]
    Mp4,
}

impl AudioContentType {
    /// MIME string sent to the blob store.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioContentType::Mpeg => "audio/mpeg",
            AudioContentType::Wav => "audio/wav",
            AudioContentType::Ogg => "audio/ogg",
            AudioContentType::Flac => "audio/flac",
            AudioContentType::Aac => "audio/aac",
            AudioContentType::Mp4 => "audio/mp4",
        }
    }

    /// Guess the content type from a file extension (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use soundboard_core::AudioContentType;
    ///
    /// assert_eq!(AudioContentType::from_extension("MP3"), Some(AudioContentType::Mpeg));
    /// assert_eq!(AudioContentType::from_extension("txt"), None);
    /// ```
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "mp3" => Some(AudioContentType::Mpeg),
            "wav" => Some(AudioContentType::Wav),
            "ogg" | "oga" => Some(AudioContentType::Ogg),
            "flac" => Some(AudioContentType::Flac),
            "aac" => Some(AudioContentType::Aac),
            "m4a" | "mp4" => Some(AudioContentType::Mp4),
            _ => None,
        }
    }
}

impl std::str::FromStr for AudioContentType {
    type Err = SoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Parameters such as "; codecs=..." are not part of the type
        let essence = s.split(';').next().unwrap_or(s).trim();
        AudioContentType::iter()
            .find(|content_type| content_type.as_str().eq_ignore_ascii_case(essence))
            .ok_or_else(|| SoundError::new(SoundErrorKind::InvalidContentType(s.to_string())))
    }
}
