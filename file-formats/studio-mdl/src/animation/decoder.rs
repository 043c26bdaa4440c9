//! Run-length animation channel decoding
//!
//! Each animated channel is stored as a sequence of runs. A run header
//! declares `(valid, total)` byte counts followed by `valid` little-endian
//! i16 delta values; the run covers `total` frames, with frames past
//! `valid` repeating the last delta (a hold span). Truncated or corrupt
//! streams clamp to the last decodable value and hold it, so damaged
//! third-party content degrades instead of failing the viewer.

use crate::chunks::bone::Dof;

/// Size of one per-bone channel offset record: six u16 offsets
const ANIM_RECORD_SIZE: usize = 12;
/// Size of one run header: `valid` and `total` bytes
const RUN_HEADER_SIZE: usize = 2;

/// Borrowed view of one bone's one channel's compressed stream
#[derive(Debug, Clone, Copy)]
pub struct ChannelStream<'a> {
    data: &'a [u8],
}

impl<'a> ChannelStream<'a> {
    /// Wrap a byte slice beginning at the stream's first run header
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn run_header(&self, pos: usize) -> Option<(usize, usize)> {
        let valid = *self.data.get(pos)? as usize;
        let total = *self.data.get(pos + 1)? as usize;
        Some((valid, total))
    }

    fn run_value(&self, run_pos: usize, index: usize) -> Option<i16> {
        let value_pos = run_pos + RUN_HEADER_SIZE + index * 2;
        let lo = *self.data.get(value_pos)?;
        let hi = *self.data.get(value_pos + 1)?;
        Some(i16::from_le_bytes([lo, hi]))
    }

    /// Decode the delta that applies at `frame`
    pub fn value_at(&self, frame: u32) -> i16 {
        self.value_pair(frame).0
    }

    /// Decode the deltas at `frame` and `frame + 1` in a single scan.
    ///
    /// The second value may come from within the same run, from the run's
    /// hold span (repeating the first value), or from the first delta of
    /// the following run. A frame index beyond the stream's declared span
    /// clamps to the last decodable value.
    pub fn value_pair(&self, frame: u32) -> (i16, i16) {
        let mut k = frame as usize;
        let mut pos = 0usize;
        // Last successfully decoded delta, held when the stream runs short
        let mut hold = 0i16;

        loop {
            let Some((valid, total)) = self.run_header(pos) else {
                return (hold, hold);
            };
            if total == 0 {
                // A zero-span run can never cover the target frame
                return (hold, hold);
            }
            if total > k {
                return self.decode_in_run(pos, valid, total, k, hold);
            }
            if let Some(v) = self.last_present(pos, valid) {
                hold = v;
            }
            k -= total;
            pos += RUN_HEADER_SIZE + valid * 2;
        }
    }

    /// Highest-indexed delta of a run that is actually present in the
    /// buffer, for clamping truncated runs
    fn last_present(&self, pos: usize, valid: usize) -> Option<i16> {
        let available = self.data.len().saturating_sub(pos + RUN_HEADER_SIZE) / 2;
        let n = valid.min(available);
        if n == 0 {
            None
        } else {
            self.run_value(pos, n - 1)
        }
    }

    fn decode_in_run(
        &self,
        pos: usize,
        valid: usize,
        total: usize,
        k: usize,
        hold: i16,
    ) -> (i16, i16) {
        let first = if valid > k {
            self.run_value(pos, k)
        } else if valid > 0 {
            // Inside the hold span: repeat the run's last delta
            self.run_value(pos, valid - 1)
        } else {
            None
        };
        let first = first
            .or_else(|| self.last_present(pos, valid))
            .unwrap_or(hold);

        let second = if valid > k + 1 {
            self.run_value(pos, k + 1).unwrap_or(first)
        } else if total > k + 1 {
            // Next frame still inside this run's hold span
            first
        } else {
            // Next frame starts the following run
            let next = pos + RUN_HEADER_SIZE + valid * 2;
            match self.run_header(next) {
                Some((next_valid, next_total)) if next_valid > 0 && next_total > 0 => {
                    self.run_value(next, 0).unwrap_or(first)
                }
                _ => first,
            }
        };

        (first, second)
    }
}

/// Locator for a sequence's animation blocks within a group buffer.
///
/// The block table is laid out `[blend][bone]`, each entry holding six u16
/// channel offsets relative to the entry itself; a zero offset marks a
/// constant channel.
#[derive(Debug, Clone, Copy)]
pub struct AnimBlocks<'a> {
    buffer: &'a [u8],
    base: usize,
    num_bones: usize,
}

impl<'a> AnimBlocks<'a> {
    /// Address a sequence's blocks inside its group buffer
    pub fn new(buffer: &'a [u8], anim_offset: usize, num_bones: usize) -> Self {
        Self {
            buffer,
            base: anim_offset,
            num_bones,
        }
    }

    /// The compressed stream for one (blend, bone, channel), or `None`
    /// when the channel is constant or the offset record is out of bounds
    pub fn channel(&self, blend: usize, bone: usize, dof: Dof) -> Option<ChannelStream<'a>> {
        let record = self.base + (blend * self.num_bones + bone) * ANIM_RECORD_SIZE;
        let offset_pos = record + dof.index() * 2;
        let lo = *self.buffer.get(offset_pos)?;
        let hi = *self.buffer.get(offset_pos + 1)?;
        let offset = u16::from_le_bytes([lo, hi]) as usize;
        if offset == 0 {
            return None;
        }
        self.buffer
            .get(record + offset..)
            .map(ChannelStream::new)
    }
}
