use smallvec::SmallVec;

/// Type aliases for small collections that avoid allocations
pub type SmallAudioVec = SmallVec<[AudioCue; 8]>;

/// Positional audio cue emitted by the simulation and relayed to clients
#[derive(Debug, Clone, PartialEq)]
pub struct AudioCue {
    pub sound: &'static str,
    pub x: f64,
    pub y: f64,
}

impl AudioCue {
    pub fn new(sound: &'static str, x: f64, y: f64) -> Self {
        Self { sound, x, y }
    }
}

/// Pre-allocated buffer for packet serialization
pub struct PacketBuffer {
    buffer: Vec<u8>,
}

impl PacketBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn extend_from_slice(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }
}

impl Default for PacketBuffer {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_vec_creation() {
        let mut cues: SmallAudioVec = SmallVec::new();
        cues.push(AudioCue::new("pew", 1.0, 2.0));
        cues.push(AudioCue::new("ding", 3.0, 4.0));
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].sound, "pew");
    }

    #[test]
    fn test_packet_buffer() {
        let mut buf = PacketBuffer::new(512);
        buf.extend_from_slice(b"snapshot");
        assert_eq!(buf.as_slice(), b"snapshot");
        buf.clear();
        assert!(buf.as_slice().is_empty());
    }
}
