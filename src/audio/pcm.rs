//! Linear PCM conversions and level metering

/// Convert a float sample to PCM16.
///
/// The sample is clamped to [-1, 1]; negative values scale by 32768, the rest
/// by 32767, and the result truncates toward zero.
pub fn sample_to_pcm16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Inverse of [`sample_to_pcm16`]
pub fn pcm16_to_sample(value: i16) -> f32 {
    if value < 0 {
        value as f32 / 32768.0
    } else {
        value as f32 / 32767.0
    }
}

/// Convert float samples to PCM16
pub fn to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples.iter().map(|&s| sample_to_pcm16(s)).collect()
}

/// Serialize PCM16 samples as little-endian bytes
pub fn pcm16_to_le_bytes(pcm: &[i16]) -> Vec<u8> {
    pcm.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Parse little-endian PCM16 bytes, returning `None` on an odd byte count
pub fn pcm16_from_le_bytes(bytes: &[u8]) -> Option<Vec<i16>> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect(),
    )
}

/// Mean absolute amplitude scaled to a 0-100 meter value
pub fn level_percent(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s.clamp(-1.0, 1.0).abs()).sum();
    let mean = sum / samples.len() as f32;
    (mean * 200.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm16_boundaries() {
        assert_eq!(sample_to_pcm16(1.0), 32767);
        assert_eq!(sample_to_pcm16(-1.0), -32768);
        assert_eq!(sample_to_pcm16(0.0), 0);
        assert_eq!(sample_to_pcm16(1.5), 32767);
        assert_eq!(sample_to_pcm16(-3.0), -32768);
    }

    #[test]
    fn test_pcm16_truncates_toward_zero() {
        assert_eq!(sample_to_pcm16(0.5), 16383);
        assert_eq!(sample_to_pcm16(-0.5), -16384);
    }

    #[test]
    fn test_le_bytes() {
        let bytes = pcm16_to_le_bytes(&[1, -2, 32767]);
        assert_eq!(bytes, vec![0x01, 0x00, 0xFE, 0xFF, 0xFF, 0x7F]);
        assert_eq!(pcm16_from_le_bytes(&bytes), Some(vec![1, -2, 32767]));
        assert_eq!(pcm16_from_le_bytes(&[0x01, 0x00, 0x02]), None);
    }

    #[test]
    fn test_pcm16_to_sample_extremes() {
        assert_eq!(pcm16_to_sample(-32768), -1.0);
        assert_eq!(pcm16_to_sample(32767), 1.0);
        assert_eq!(pcm16_to_sample(0), 0.0);
    }

    #[test]
    fn test_level_percent() {
        assert_eq!(level_percent(&[]), 0.0);
        assert_eq!(level_percent(&[0.0; 16]), 0.0);
        // mean 0.25 -> 50
        assert!((level_percent(&[0.25, -0.25, 0.25, -0.25]) - 50.0).abs() < 1e-4);
        // capped
        assert_eq!(level_percent(&[0.9, -0.9]), 100.0);
    }
}
