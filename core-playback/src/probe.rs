//! # Source Probe
//!
//! Symphonia-based validation of audio sources. The probe opens a source,
//! detects its container and codec, and reports the stream parameters the
//! playback layer needs (most importantly the duration). It does not keep the
//! reader around; rendering is the backend's concern.

use crate::error::{PlaybackError, Result};
use bridge_traits::playback::AudioSource;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use symphonia::core::codecs::CodecType;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Codec identifiers the probe recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCodec {
    Mp3,
    Aac,
    Flac,
    Vorbis,
    Opus,
    Wav,
    Alac,
    /// Codec is unknown or not mapped to a dedicated variant.
    Unknown,
}

/// Stream parameters resolved by probing a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceProbe {
    /// Detected source codec.
    pub codec: AudioCodec,
    /// Total stream duration, when the container reports one.
    pub duration: Option<Duration>,
    /// Sample rate in hertz.
    pub sample_rate: u32,
    /// Number of audio channels.
    pub channels: u16,
}

impl SourceProbe {
    /// Open and probe a source.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::SourceError`] when the source cannot be opened
    /// - [`PlaybackError::InvalidFormat`] when no container/track is recognized
    /// - [`PlaybackError::UnsupportedCodec`] when the codec is not mapped
    pub fn probe(source: &AudioSource) -> Result<Self> {
        let (media_source, hint, source_info) = open_media_source(source)?;
        let stream = MediaSourceStream::new(media_source, Default::default());

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                stream,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| {
                PlaybackError::InvalidFormat(format!(
                    "Failed to probe format of {}: {}",
                    source_info, e
                ))
            })?;

        let reader = probed.format;

        // First track with a real codec; containers may carry data tracks.
        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| {
                PlaybackError::InvalidFormat(format!("No audio tracks in {}", source_info))
            })?;

        let codec = detect_codec(track.codec_params.codec);
        if codec == AudioCodec::Unknown {
            return Err(PlaybackError::UnsupportedCodec(format!(
                "Unrecognized codec in {}",
                source_info
            )));
        }

        let sample_rate = track.codec_params.sample_rate.ok_or_else(|| {
            PlaybackError::InvalidFormat(format!("Missing sample rate in {}", source_info))
        })?;

        // Channel count may be absent until first decode for some codecs.
        let channels = track
            .codec_params
            .channels
            .map(|ch| ch.count() as u16)
            .unwrap_or(2);

        let duration = track
            .codec_params
            .n_frames
            .map(|frames| Duration::from_secs_f64(frames as f64 / sample_rate as f64));

        debug!(
            ?codec,
            sample_rate,
            channels,
            ?duration,
            source = source_info,
            "Probed source"
        );

        Ok(Self {
            codec,
            duration,
            sample_rate,
            channels,
        })
    }
}

fn open_media_source(source: &AudioSource) -> Result<(Box<dyn MediaSource>, Hint, String)> {
    match source {
        AudioSource::LocalFile { path } => {
            let file = std::fs::File::open(path).map_err(|e| {
                PlaybackError::SourceError(format!("Failed to open {}: {}", path.display(), e))
            })?;
            Ok((
                Box::new(file) as Box<dyn MediaSource>,
                hint_from_path(path),
                path.display().to_string(),
            ))
        }
        AudioSource::MemoryBuffer { data } => {
            let cursor = Cursor::new(data.to_vec());
            Ok((
                Box::new(cursor) as Box<dyn MediaSource>,
                Hint::new(),
                format!("memory buffer ({} bytes)", data.len()),
            ))
        }
    }
}

/// Extension-based probe hint; speeds up and disambiguates format detection.
fn hint_from_path(path: &Path) -> Hint {
    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }
    hint
}

fn detect_codec(codec_type: CodecType) -> AudioCodec {
    use symphonia::core::codecs::*;

    if codec_type == CODEC_TYPE_MP3 {
        AudioCodec::Mp3
    } else if codec_type == CODEC_TYPE_AAC {
        AudioCodec::Aac
    } else if codec_type == CODEC_TYPE_FLAC {
        AudioCodec::Flac
    } else if codec_type == CODEC_TYPE_VORBIS {
        AudioCodec::Vorbis
    } else if codec_type == CODEC_TYPE_OPUS {
        AudioCodec::Opus
    } else if codec_type == CODEC_TYPE_ALAC {
        AudioCodec::Alac
    } else if codec_type == CODEC_TYPE_PCM_S16LE
        || codec_type == CODEC_TYPE_PCM_S16BE
        || codec_type == CODEC_TYPE_PCM_S24LE
        || codec_type == CODEC_TYPE_PCM_S24BE
        || codec_type == CODEC_TYPE_PCM_S32LE
        || codec_type == CODEC_TYPE_PCM_S32BE
        || codec_type == CODEC_TYPE_PCM_F32LE
        || codec_type == CODEC_TYPE_PCM_F32BE
        || codec_type == CODEC_TYPE_PCM_F64LE
        || codec_type == CODEC_TYPE_PCM_F64BE
    {
        AudioCodec::Wav
    } else {
        warn!("Unknown codec type: {:?}", codec_type);
        AudioCodec::Unknown
    }
}
