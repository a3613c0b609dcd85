//! Declared media types accepted by the decoder.
//!
//! | Declared type | Container hint |
//! |---------------|----------------|
//! | `audio/wav`   | `wav`  |
//! | `audio/mp3`   | `mp3`  |
//! | `audio/mpeg`  | `mp3`  |
//! | `audio/ogg`   | `ogg`  |
//! | `audio/flac`  | `flac` |
//! | `audio/x-m4a` | `m4a`  |
//! | `audio/m4a`   | `m4a`  |
//!
//! Anything else is rejected before a decode is attempted.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::pipeline::ConversionError;

/// The declared type is not in the supported set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported media type: {0:?}")]
pub struct UnsupportedMediaType(pub String);

impl From<UnsupportedMediaType> for ConversionError {
    fn from(e: UnsupportedMediaType) -> Self {
        ConversionError::UnsupportedFormat(e.0)
    }
}

/// A supported declared media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Wav,
    Mp3,
    Mpeg,
    Ogg,
    Flac,
    XM4a,
    M4a,
}

impl MediaType {
    /// Every supported type, in declaration order.
    pub const ALL: [MediaType; 7] = [
        MediaType::Wav,
        MediaType::Mp3,
        MediaType::Mpeg,
        MediaType::Ogg,
        MediaType::Flac,
        MediaType::XM4a,
        MediaType::M4a,
    ];

    /// Canonical MIME string, e.g. `"audio/mpeg"`.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Wav => "audio/wav",
            MediaType::Mp3 => "audio/mp3",
            MediaType::Mpeg => "audio/mpeg",
            MediaType::Ogg => "audio/ogg",
            MediaType::Flac => "audio/flac",
            MediaType::XM4a => "audio/x-m4a",
            MediaType::M4a => "audio/m4a",
        }
    }

    /// File extension handed to the container probe as a hint.
    pub fn extension(self) -> &'static str {
        match self {
            MediaType::Wav => "wav",
            MediaType::Mp3 | MediaType::Mpeg => "mp3",
            MediaType::Ogg => "ogg",
            MediaType::Flac => "flac",
            MediaType::XM4a | MediaType::M4a => "m4a",
        }
    }

    /// Media type a file with extension `ext` declares, the way a browser
    /// would report it.  Case-insensitive.
    ///
    /// ```rust
    /// use audio_to_hex::decode::MediaType;
    ///
    /// assert_eq!(MediaType::from_extension("MP3"), Some(MediaType::Mpeg));
    /// assert_eq!(MediaType::from_extension("txt"), None);
    /// ```
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Some(MediaType::Wav),
            "mp3" => Some(MediaType::Mpeg),
            "ogg" | "oga" => Some(MediaType::Ogg),
            "flac" => Some(MediaType::Flac),
            "m4a" => Some(MediaType::XM4a),
            _ => None,
        }
    }

    /// Parse a declared type.
    ///
    /// Case-insensitive; MIME parameters (`; codecs=…`) are ignored and the
    /// bare subtype (`"flac"`) is accepted.
    ///
    /// ```rust
    /// use audio_to_hex::decode::MediaType;
    ///
    /// assert_eq!(MediaType::parse("Audio/X-M4A").unwrap(), MediaType::XM4a);
    /// assert_eq!(MediaType::parse("audio/ogg; codecs=vorbis").unwrap(), MediaType::Ogg);
    /// assert!(MediaType::parse("video/mp4").is_err());
    /// ```
    pub fn parse(declared: &str) -> Result<Self, UnsupportedMediaType> {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        let subtype = match essence.split_once('/') {
            Some(("audio", sub)) => sub,
            Some(_) => return Err(UnsupportedMediaType(declared.to_string())),
            None => essence.as_str(),
        };

        match subtype {
            "wav" => Ok(MediaType::Wav),
            "mp3" => Ok(MediaType::Mp3),
            "mpeg" => Ok(MediaType::Mpeg),
            "ogg" => Ok(MediaType::Ogg),
            "flac" => Ok(MediaType::Flac),
            "x-m4a" => Ok(MediaType::XM4a),
            "m4a" => Ok(MediaType::M4a),
            _ => Err(UnsupportedMediaType(declared.to_string())),
        }
    }
}

impl FromStr for MediaType {
    type Err = UnsupportedMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_supported_type_round_trips() {
        for ty in MediaType::ALL {
            assert_eq!(MediaType::parse(ty.as_str()).unwrap(), ty);
            assert_eq!(ty.to_string(), ty.as_str());
        }
    }

    #[test]
    fn bare_subtypes_are_accepted() {
        assert_eq!("wav".parse::<MediaType>().unwrap(), MediaType::Wav);
        assert_eq!("mpeg".parse::<MediaType>().unwrap(), MediaType::Mpeg);
        assert_eq!("m4a".parse::<MediaType>().unwrap(), MediaType::M4a);
    }

    #[test]
    fn unsupported_types_are_rejected() {
        for declared in [
            "",
            "audio/aac",
            "audio/webm",
            "video/ogg",
            "application/octet-stream",
            "text/plain",
            "audio/",
        ] {
            let err = MediaType::parse(declared).unwrap_err();
            assert_eq!(err.0, declared);
        }
    }

    #[test]
    fn rejection_maps_to_unsupported_format() {
        let err: ConversionError = MediaType::parse("audio/aac").unwrap_err().into();
        assert_eq!(err, ConversionError::UnsupportedFormat("audio/aac".into()));
    }

    #[test]
    fn aliases_share_a_container_hint() {
        assert_eq!(MediaType::Mp3.extension(), MediaType::Mpeg.extension());
        assert_eq!(MediaType::M4a.extension(), MediaType::XM4a.extension());
    }

    #[test]
    fn extension_lookup() {
        assert_eq!(MediaType::from_extension("wav"), Some(MediaType::Wav));
        assert_eq!(MediaType::from_extension("Flac"), Some(MediaType::Flac));
        assert_eq!(MediaType::from_extension("m4a"), Some(MediaType::XM4a));
        assert_eq!(MediaType::from_extension("aac"), None);
        assert_eq!(MediaType::from_extension(""), None);
    }
}
