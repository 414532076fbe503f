//! Conditional payload compression for outbound requests.
//!
//! The codec decides three things for every payload: whether to compress at
//! all (algorithm `None` and sub-threshold payloads pass through untouched),
//! which algorithm to use, and which `Content-Encoding` label the transport
//! must attach. Deflate output is always zlib-wrapped (RFC 1950); the
//! service's decompressor rejects raw deflate streams.
//!
//! Algorithm availability is build-dependent: Brotli is only compiled in
//! behind the `brotli` cargo feature. Callers must consult
//! [`CompressionAlgorithm::is_supported`] (the codec does so itself and
//! refuses rather than silently sending uncompressed bytes).

use std::borrow::Cow;
use std::fmt;
use std::io::Write;

use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use thiserror::Error;

/// Default size below which payloads are never compressed.
///
/// Matches a typical ethernet MTU; anything smaller fits one frame anyway
/// and the encoder overhead outweighs the savings.
pub const DEFAULT_MINIMUM_SIZE_BYTES: usize = 1400;

/// Compression algorithms the transport can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionAlgorithm {
    /// No compression; payloads pass through unchanged
    None,
    /// Gzip framing (RFC 1952)
    Gzip,
    /// Zlib-wrapped deflate (RFC 1950)
    Deflate,
    /// Brotli; only available with the `brotli` cargo feature
    Brotli,
}

impl CompressionAlgorithm {
    /// `Content-Encoding` label for this algorithm, if it produces one.
    pub fn content_encoding(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Gzip => Some("gzip"),
            Self::Deflate => Some("deflate"),
            Self::Brotli => Some("br"),
        }
    }

    /// Whether this build can actually encode with this algorithm.
    pub fn is_supported(&self) -> bool {
        match self {
            Self::None | Self::Gzip | Self::Deflate => true,
            Self::Brotli => cfg!(feature = "brotli"),
        }
    }
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_encoding().unwrap_or("none"))
    }
}

/// Compression configuration captured once per client.
#[derive(Debug, Clone)]
pub struct CompressionOptions {
    /// Algorithm applied to outbound bodies
    pub algorithm: CompressionAlgorithm,

    /// Bodies smaller than this many bytes are sent uncompressed
    pub minimum_size_bytes: usize,

    /// Whether the HTTP layer should transparently decompress responses
    pub decompress_responses: bool,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            algorithm: CompressionAlgorithm::None,
            minimum_size_bytes: DEFAULT_MINIMUM_SIZE_BYTES,
            decompress_responses: false,
        }
    }
}

impl CompressionOptions {
    /// Options for the given algorithm with the default threshold.
    pub fn new(algorithm: CompressionAlgorithm) -> Self {
        Self { algorithm, ..Self::default() }
    }

    /// Set the minimum body size that gets compressed.
    pub fn minimum_size_bytes(mut self, bytes: usize) -> Self {
        self.minimum_size_bytes = bytes;
        self
    }

    /// Enable or disable transparent response decompression.
    pub fn decompress_responses(mut self, enabled: bool) -> Self {
        self.decompress_responses = enabled;
        self
    }
}

/// Errors raised by the codec.
#[derive(Debug, Error)]
pub enum CompressionError {
    /// The configured algorithm is not compiled into this build
    #[error("compression algorithm '{0}' is not supported in this build")]
    Unsupported(CompressionAlgorithm),

    /// The encoder failed mid-stream
    #[error("encoding failed: {0}")]
    Encode(std::io::Error),

    /// The decoder failed mid-stream
    #[error("decoding failed: {0}")]
    Decode(std::io::Error),
}

/// Pure byte-transform layer applied to outbound request bodies.
#[derive(Debug, Clone)]
pub struct CompressionCodec {
    options: CompressionOptions,
}

impl CompressionCodec {
    /// Create a codec with the given options.
    pub fn new(options: CompressionOptions) -> Self {
        Self { options }
    }

    /// The options this codec was built with.
    pub fn options(&self) -> &CompressionOptions {
        &self.options
    }

    /// Conditionally compress a payload.
    ///
    /// Returns the bytes to send plus the `Content-Encoding` label to attach,
    /// or the borrowed payload and no label when compression does not apply.
    /// An algorithm that is configured but unavailable in this build fails
    /// fast regardless of payload size; it never silently downgrades to
    /// uncompressed.
    pub fn apply<'a>(
        &self,
        payload: &'a [u8],
    ) -> Result<(Cow<'a, [u8]>, Option<&'static str>), CompressionError> {
        let algorithm = self.options.algorithm;

        if algorithm == CompressionAlgorithm::None {
            return Ok((Cow::Borrowed(payload), None));
        }
        if !algorithm.is_supported() {
            return Err(CompressionError::Unsupported(algorithm));
        }
        if payload.len() < self.options.minimum_size_bytes {
            return Ok((Cow::Borrowed(payload), None));
        }

        let compressed = self.compress(payload)?;
        Ok((Cow::Owned(compressed), algorithm.content_encoding()))
    }

    /// Compress unconditionally with the configured algorithm.
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        match self.options.algorithm {
            CompressionAlgorithm::None => Ok(data.to_vec()),
            CompressionAlgorithm::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data).map_err(CompressionError::Encode)?;
                encoder.finish().map_err(CompressionError::Encode)
            }
            CompressionAlgorithm::Deflate => {
                // ZlibEncoder emits the RFC 1950 wrapper the service requires.
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data).map_err(CompressionError::Encode)?;
                encoder.finish().map_err(CompressionError::Encode)
            }
            #[cfg(feature = "brotli")]
            CompressionAlgorithm::Brotli => {
                let mut compressed = Vec::new();
                let mut encoder = brotli::CompressorWriter::new(&mut compressed, 4096, 5, 22);
                encoder.write_all(data).map_err(CompressionError::Encode)?;
                // The stream is finalized when the writer drops.
                drop(encoder);
                Ok(compressed)
            }
            #[cfg(not(feature = "brotli"))]
            CompressionAlgorithm::Brotli => {
                Err(CompressionError::Unsupported(CompressionAlgorithm::Brotli))
            }
        }
    }

    /// Decompress data produced by the configured algorithm.
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        use std::io::Read;

        match self.options.algorithm {
            CompressionAlgorithm::None => Ok(data.to_vec()),
            CompressionAlgorithm::Gzip => {
                let mut decoder = flate2::read::GzDecoder::new(data);
                let mut decompressed = Vec::new();
                decoder.read_to_end(&mut decompressed).map_err(CompressionError::Decode)?;
                Ok(decompressed)
            }
            CompressionAlgorithm::Deflate => {
                let mut decoder = flate2::read::ZlibDecoder::new(data);
                let mut decompressed = Vec::new();
                decoder.read_to_end(&mut decompressed).map_err(CompressionError::Decode)?;
                Ok(decompressed)
            }
            #[cfg(feature = "brotli")]
            CompressionAlgorithm::Brotli => {
                let mut decoder = brotli::Decompressor::new(data, 4096);
                let mut decompressed = Vec::new();
                decoder.read_to_end(&mut decompressed).map_err(CompressionError::Decode)?;
                Ok(decompressed)
            }
            #[cfg(not(feature = "brotli"))]
            CompressionAlgorithm::Brotli => {
                Err(CompressionError::Unsupported(CompressionAlgorithm::Brotli))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for compression.
    use super::*;

    fn codec(algorithm: CompressionAlgorithm) -> CompressionCodec {
        CompressionCodec::new(CompressionOptions::new(algorithm))
    }

    /// Validates `CompressionCodec::apply` behavior for the algorithm none
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms the payload is returned unchanged for any size.
    /// - Confirms no encoding label is produced.
    #[test]
    fn test_none_is_identity_for_any_size() {
        let codec = codec(CompressionAlgorithm::None);

        for payload in [&b""[..], &b"tiny"[..], &vec![7u8; 10_000][..]] {
            let (out, label) = codec.apply(payload).unwrap();
            assert_eq!(out.as_ref(), payload);
            assert!(label.is_none());
        }
    }

    /// Validates `CompressionCodec::apply` behavior for the below threshold
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms sub-threshold payloads pass through borrowed and unlabeled.
    #[test]
    fn test_below_threshold_passes_through() {
        let codec = codec(CompressionAlgorithm::Gzip);
        let payload = vec![0u8; DEFAULT_MINIMUM_SIZE_BYTES - 1];

        let (out, label) = codec.apply(&payload).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.as_ref(), payload.as_slice());
        assert!(label.is_none());
    }

    /// Validates `CompressionCodec::apply` behavior at the exact threshold.
    ///
    /// Assertions:
    /// - Confirms a payload of exactly `minimum_size_bytes` is compressed.
    #[test]
    fn test_at_threshold_compresses() {
        let codec = codec(CompressionAlgorithm::Gzip);
        let payload = vec![0u8; DEFAULT_MINIMUM_SIZE_BYTES];

        let (out, label) = codec.apply(&payload).unwrap();
        assert_eq!(label, Some("gzip"));
        assert!(out.len() < payload.len());
    }

    /// Validates `CompressionCodec::apply` behavior for the gzip round trip
    /// scenario: 1500 zero bytes with the default 1400 threshold.
    ///
    /// Assertions:
    /// - Confirms the label is `gzip` and the output is smaller than 1500.
    /// - Confirms decompression restores the original bytes.
    #[test]
    fn test_gzip_round_trip_1500_zero_bytes() {
        let codec = codec(CompressionAlgorithm::Gzip);
        let payload = vec![0u8; 1500];

        let (out, label) = codec.apply(&payload).unwrap();
        assert_eq!(label, Some("gzip"));
        assert!(out.len() < 1500);

        let restored = codec.decompress(&out).unwrap();
        assert_eq!(restored, payload);
    }

    /// Validates `CompressionCodec::apply` behavior for the deflate framing
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms the label is `deflate`.
    /// - Confirms the output starts with the zlib (RFC 1950) header byte.
    /// - Confirms decompression restores the original bytes.
    #[test]
    fn test_deflate_is_zlib_wrapped() {
        let codec = codec(CompressionAlgorithm::Deflate);
        let payload = b"the quick brown fox jumps over the lazy dog ".repeat(64);

        let (out, label) = codec.apply(&payload).unwrap();
        assert_eq!(label, Some("deflate"));
        // 0x78 is the CMF byte of every zlib stream with a 32K window.
        assert_eq!(out[0], 0x78);

        let restored = codec.decompress(&out).unwrap();
        assert_eq!(restored, payload);
    }

    /// Validates `CompressionAlgorithm::is_supported` for the always-on
    /// algorithms.
    #[test]
    fn test_flate_algorithms_always_supported() {
        assert!(CompressionAlgorithm::None.is_supported());
        assert!(CompressionAlgorithm::Gzip.is_supported());
        assert!(CompressionAlgorithm::Deflate.is_supported());
    }

    /// Validates `CompressionCodec::apply` behavior when brotli is not
    /// compiled in.
    ///
    /// Assertions:
    /// - Confirms the unsupported error fires even for sub-threshold payloads
    ///   (never a silent downgrade).
    #[cfg(not(feature = "brotli"))]
    #[test]
    fn test_brotli_unsupported_fails_fast() {
        assert!(!CompressionAlgorithm::Brotli.is_supported());

        let codec = codec(CompressionAlgorithm::Brotli);
        for payload in [&b"tiny"[..], &vec![0u8; 4096][..]] {
            let result = codec.apply(payload);
            assert!(matches!(result, Err(CompressionError::Unsupported(_))));
        }
    }

    /// Validates `CompressionCodec::apply` behavior with brotli compiled in.
    #[cfg(feature = "brotli")]
    #[test]
    fn test_brotli_round_trip() {
        assert!(CompressionAlgorithm::Brotli.is_supported());

        let codec = codec(CompressionAlgorithm::Brotli);
        let payload = vec![42u8; 8192];

        let (out, label) = codec.apply(&payload).unwrap();
        assert_eq!(label, Some("br"));
        assert!(out.len() < payload.len());

        let restored = codec.decompress(&out).unwrap();
        assert_eq!(restored, payload);
    }

    /// Validates the content-encoding labels for every algorithm.
    #[test]
    fn test_content_encoding_labels() {
        assert_eq!(CompressionAlgorithm::None.content_encoding(), None);
        assert_eq!(CompressionAlgorithm::Gzip.content_encoding(), Some("gzip"));
        assert_eq!(CompressionAlgorithm::Deflate.content_encoding(), Some("deflate"));
        assert_eq!(CompressionAlgorithm::Brotli.content_encoding(), Some("br"));
    }

    /// Validates `CompressionOptions` defaults.
    #[test]
    fn test_default_options() {
        let options = CompressionOptions::default();
        assert_eq!(options.algorithm, CompressionAlgorithm::None);
        assert_eq!(options.minimum_size_bytes, 1400);
        assert!(!options.decompress_responses);
    }

    /// Validates cross-algorithm decompression fails rather than producing
    /// garbage.
    #[test]
    fn test_cross_algorithm_decompression_fails() {
        let gzip = codec(CompressionAlgorithm::Gzip);
        let deflate = codec(CompressionAlgorithm::Deflate);
        let payload = vec![1u8; 2048];

        let (out, _) = gzip.apply(&payload).unwrap();
        let result = deflate.decompress(&out);
        assert!(matches!(result, Err(CompressionError::Decode(_))));
    }
}
