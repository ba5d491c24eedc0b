//! The record log engine.
//!
//! A [`LogHandle`] owns the flash medium, the region bounds and the cursor.
//! Records fill the region strictly left to right. Appending a record
//! tombstones the previous one, so at most one record is `Valid` at a time and
//! every record before it is `Invalid`. Space is reclaimed only by erasing the
//! whole region.

use std::iter::FusedIterator;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::logging::Hex;
use crate::medium::{Medium, MediumError};
use crate::record::{
    self, Entry, RecordState, PAYLOAD_QUANTA, RECORD_SIZE, STATE_INVALID, STATE_VALID,
};
use crate::region::{locate, Geometry, Location, Region};

/// Handle to a record log on a single flash region.
///
/// All mutating operations take `&mut self`; the log has exactly one writer.
#[derive(Debug)]
pub struct LogHandle<M> {
    medium: M,
    region: Region,
    cursor: usize,
}

impl<M: Medium> LogHandle<M> {
    /// Open the log in the region reported by `geometry`.
    ///
    /// Scans the region for the current record. If there is none, the region
    /// is erased and the log starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the geometry is unusable or the medium fails.
    pub fn open(medium: M, geometry: &impl Geometry) -> Result<Self> {
        let region = Region::from_geometry(geometry)?;
        Self::with_region(medium, region)
    }

    /// Open the log in an already validated region.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium fails during the startup scan.
    pub fn with_region(mut medium: M, region: Region) -> Result<Self> {
        let Location { cursor, erased, .. } = locate(&region, &mut medium)?;
        info!(
            slot = cursor,
            address = %Hex(region.slot_address(cursor)),
            erased,
            "Opened log"
        );
        Ok(Self {
            medium,
            region,
            cursor,
        })
    }

    /// The region this log occupies.
    #[must_use]
    pub fn region(&self) -> Region {
        self.region
    }

    /// Slot index of the cursor.
    #[must_use]
    pub fn cursor_slot(&self) -> usize {
        self.cursor
    }

    /// Physical address of the cursor.
    #[must_use]
    pub fn cursor_address(&self) -> u32 {
        self.region.slot_address(self.cursor)
    }

    /// Borrow the underlying medium.
    #[must_use]
    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Mutably borrow the underlying medium.
    ///
    /// Writing through this bypasses the log's bookkeeping.
    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    /// Consume the handle and return the medium.
    #[must_use]
    pub fn into_medium(self) -> M {
        self.medium
    }

    /// Append `payload` as the new current record.
    ///
    /// The previous current record, if any, is tombstoned first. The payload
    /// quanta are programmed next, and the new record's state is committed as
    /// `Valid` last, so a record interrupted mid-write never reads as valid.
    ///
    /// # Errors
    ///
    /// - [`Error::PayloadTooLong`] or [`Error::PayloadContainsNul`] if the
    ///   payload cannot be stored. Nothing is written.
    /// - [`Error::RegionCorrupted`] if the cursor slot holds an unknown state.
    /// - [`Error::RegionFull`] if no slot remains after the current record.
    ///   Nothing is written.
    /// - [`Error::Medium`] if a write fails or does not verify.
    pub fn append(&mut self, payload: &str) -> Result<()> {
        let quanta = record::encode_payload(payload)?;

        let state = self.read_state(self.cursor)?;
        match state {
            Ok(RecordState::Uninitialized) => {}
            Ok(RecordState::Valid) => {
                let next = self.cursor + 1;
                if next >= self.region.capacity() {
                    return Err(Error::RegionFull {
                        capacity: self.region.capacity(),
                    });
                }
                self.program(self.region.state_address(self.cursor), STATE_INVALID)?;
                debug!(slot = self.cursor, "Tombstoned record");
                self.cursor = next;
            }
            Ok(RecordState::Invalid) | Err(_) => {
                return Err(self.corrupted(self.cursor, state_word(state)));
            }
        }

        for (index, &quantum) in quanta.iter().enumerate() {
            self.program(self.region.payload_address(self.cursor, index), quantum)?;
        }
        self.program(self.region.state_address(self.cursor), STATE_VALID)?;

        info!(
            slot = self.cursor,
            address = %Hex(self.cursor_address()),
            bytes = quanta.len() - 1,
            "Appended record"
        );
        Ok(())
    }

    /// Read back every record from the region base up to the cursor.
    ///
    /// The returned iterator yields tombstoned records and then the current
    /// one, in write order. It stops with [`Error::RegionCorrupted`] at the
    /// first slot whose state is neither `Valid` nor `Invalid`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LogEmpty`] if nothing has been written since the last
    /// erase, or a medium error if the base slot cannot be read.
    pub fn replay(&self) -> Result<Replay<'_, M>> {
        if self.cursor == 0
            && self.read_state(0)? == Ok(RecordState::Uninitialized)
        {
            return Err(Error::LogEmpty);
        }
        Ok(Replay {
            log: self,
            next: 0,
            done: false,
        })
    }

    /// Collect the full replay into a vector.
    ///
    /// # Errors
    ///
    /// Returns the first error [`LogHandle::replay`] or its iterator reports.
    pub fn entries(&self) -> Result<Vec<Entry>> {
        self.replay()?.collect()
    }

    /// The current record's payload, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor slot is corrupted or unreadable.
    pub fn current(&self) -> Result<Option<String>> {
        match self.read_state(self.cursor)? {
            Ok(RecordState::Valid) => Ok(Some(self.read_payload(self.cursor)?)),
            Ok(RecordState::Uninitialized) => Ok(None),
            state => Err(self.corrupted(self.cursor, state_word(state))),
        }
    }

    /// Erase the whole region and move the cursor back to its base.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot erase.
    pub fn erase(&mut self) -> Result<()> {
        self.medium.erase(self.region.base())?;
        self.medium.wait_ready();
        self.cursor = 0;
        info!(
            address = %Hex(self.region.base()),
            size = self.region.size(),
            "Erased region"
        );
        Ok(())
    }

    /// Summarize the region and its occupancy.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor slot cannot be read.
    pub fn status(&self) -> Result<LogStatus> {
        let head = self.read_state(self.cursor)?;
        let used_slots = match head {
            Ok(RecordState::Uninitialized) => self.cursor,
            _ => self.cursor + 1,
        };
        let capacity = self.region.capacity();
        Ok(LogStatus {
            region_base: self.region.base(),
            region_size: self.region.size(),
            record_size: RECORD_SIZE,
            capacity,
            cursor_slot: self.cursor,
            cursor_address: self.cursor_address(),
            used_slots,
            free_slots: capacity.saturating_sub(used_slots),
            head_state: head.ok(),
            head_word: state_word(head),
        })
    }

    /// Program one quantum, wait for the medium, then verify it.
    fn program(&mut self, address: u32, value: u32) -> Result<()> {
        self.medium.write_quantum(address, value)?;
        self.medium.wait_ready();
        let actual = self.medium.read_quantum(address)?;
        if actual != value {
            warn!(
                address = %Hex(address),
                expected = %Hex(value),
                actual = %Hex(actual),
                "Write verify failed"
            );
            return Err(MediumError::WriteVerify {
                address,
                expected: value,
                actual,
            }
            .into());
        }
        Ok(())
    }

    /// Read a slot's state. The inner `Err` carries an unrecognized word.
    fn read_state(&self, slot: usize) -> Result<std::result::Result<RecordState, u32>> {
        let word = self
            .medium
            .read_quantum(self.region.state_address(slot))?;
        Ok(RecordState::from_word(word).ok_or(word))
    }

    fn read_payload(&self, slot: usize) -> Result<String> {
        let quanta = (0..PAYLOAD_QUANTA)
            .map(|index| {
                self.medium
                    .read_quantum(self.region.payload_address(slot, index))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(record::decode_payload(&quanta))
    }

    fn corrupted(&self, slot: usize, state: u32) -> Error {
        warn!(
            slot,
            address = %Hex(self.region.slot_address(slot)),
            state = %Hex(state),
            "Corrupted record"
        );
        Error::RegionCorrupted {
            slot,
            address: self.region.slot_address(slot),
            state,
        }
    }
}

fn state_word(state: std::result::Result<RecordState, u32>) -> u32 {
    match state {
        Ok(state) => state.word(),
        Err(word) => word,
    }
}

/// Iterator over the records of a log, oldest first.
///
/// Created by [`LogHandle::replay`]. Each call re-reads the medium; after an
/// error the iterator is exhausted.
#[derive(Debug)]
pub struct Replay<'a, M> {
    log: &'a LogHandle<M>,
    next: usize,
    done: bool,
}

impl<M: Medium> Iterator for Replay<'_, M> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next > self.log.cursor {
            return None;
        }
        let slot = self.next;
        self.next += 1;

        let entry = self.log.read_state(slot).and_then(|state| match state {
            Ok(state) if state.is_committed() => Ok(Entry {
                slot,
                state,
                payload: self.log.read_payload(slot)?,
            }),
            state => Err(self.log.corrupted(slot, state_word(state))),
        });

        if entry.is_err() {
            self.done = true;
        }
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        (0, Some((self.log.cursor + 1).saturating_sub(self.next)))
    }
}

impl<M: Medium> FusedIterator for Replay<'_, M> {}

/// Occupancy summary of a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogStatus {
    /// First address of the region.
    pub region_base: u32,
    /// Region size in bytes.
    pub region_size: u32,
    /// Size of one record slot.
    pub record_size: u32,
    /// Number of record slots in the region.
    pub capacity: usize,
    /// Slot index of the cursor.
    pub cursor_slot: usize,
    /// Physical address of the cursor.
    pub cursor_address: u32,
    /// Slots holding a committed or tombstoned record.
    pub used_slots: usize,
    /// Slots still available before the region must be erased.
    pub free_slots: usize,
    /// State of the cursor slot, `None` if its state word is unrecognized.
    pub head_state: Option<RecordState>,
    /// Raw state word of the cursor slot.
    pub head_word: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use crate::medium::{RamMedium, ERASED_WORD};
    use crate::record::MAX_PAYLOAD_LEN;
    use crate::region::FixedRegion;

    const BASE: u32 = 0x7F000;

    fn open_log(slots: u32) -> LogHandle<RamMedium> {
        init_test_logging();
        let size = slots * RECORD_SIZE;
        let medium = RamMedium::new(BASE, size);
        LogHandle::open(medium, &FixedRegion { base: BASE, size }).unwrap()
    }

    fn replayed(log: &LogHandle<RamMedium>) -> Vec<(RecordState, String)> {
        log.entries()
            .unwrap()
            .into_iter()
            .map(|e| (e.state, e.payload))
            .collect()
    }

    /// Medium that remembers every quantum write in issue order.
    #[derive(Debug)]
    struct RecordingMedium {
        inner: RamMedium,
        writes: Vec<(u32, u32)>,
    }

    impl Medium for RecordingMedium {
        fn read_quantum(&self, address: u32) -> crate::medium::Result<u32> {
            self.inner.read_quantum(address)
        }

        fn write_quantum(&mut self, address: u32, value: u32) -> crate::medium::Result<()> {
            self.writes.push((address, value));
            self.inner.write_quantum(address, value)
        }

        fn erase(&mut self, address: u32) -> crate::medium::Result<()> {
            self.inner.erase(address)
        }

        fn is_busy(&self) -> bool {
            self.inner.is_busy()
        }
    }

    #[test]
    fn test_open_blank_region() {
        let log = open_log(16);
        assert_eq!(log.cursor_slot(), 0);
        assert_eq!(log.cursor_address(), BASE);
        assert_eq!(log.region().capacity(), 16);
    }

    #[test]
    fn test_append_then_replay() {
        let mut log = open_log(16);
        log.append("21").unwrap();
        assert_eq!(replayed(&log), vec![(RecordState::Valid, "21".to_string())]);
        assert_eq!(log.cursor_slot(), 0);
    }

    #[test]
    fn test_append_max_length_payload() {
        let mut log = open_log(4);
        let payload = "z".repeat(MAX_PAYLOAD_LEN);
        log.append(&payload).unwrap();
        assert_eq!(log.current().unwrap(), Some(payload));
    }

    #[test]
    fn test_append_empty_payload() {
        let mut log = open_log(4);
        log.append("").unwrap();
        assert_eq!(replayed(&log), vec![(RecordState::Valid, String::new())]);
    }

    #[test]
    fn test_append_tombstones_previous() {
        let mut log = open_log(16);
        log.append("21").unwrap();
        log.append("22").unwrap();

        assert_eq!(log.cursor_slot(), 1);
        assert_eq!(
            replayed(&log),
            vec![
                (RecordState::Invalid, "21".to_string()),
                (RecordState::Valid, "22".to_string()),
            ]
        );
    }

    #[test]
    fn test_append_write_order() {
        init_test_logging();
        let size = 4 * RECORD_SIZE;
        let medium = RecordingMedium {
            inner: RamMedium::new(BASE, size),
            writes: Vec::new(),
        };
        let mut log = LogHandle::open(medium, &FixedRegion { base: BASE, size }).unwrap();

        log.append("21").unwrap();
        assert_eq!(
            log.medium().writes,
            vec![
                (BASE + 4, u32::from(b'2')),
                (BASE + 8, u32::from(b'1')),
                (BASE + 12, 0),
                (BASE, STATE_VALID),
            ]
        );

        log.medium_mut().writes.clear();
        log.append("22").unwrap();
        let next = BASE + RECORD_SIZE;
        assert_eq!(
            log.medium().writes,
            vec![
                (BASE, STATE_INVALID),
                (next + 4, u32::from(b'2')),
                (next + 8, u32::from(b'2')),
                (next + 12, 0),
                (next, STATE_VALID),
            ]
        );
    }

    #[test]
    fn test_append_many_preserves_order() {
        let mut log = open_log(16);
        for i in 0..10 {
            log.append(&format!("reading-{i}")).unwrap();
        }

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 10);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.slot, i);
            assert_eq!(entry.payload, format!("reading-{i}"));
            let expected = if i == 9 {
                RecordState::Valid
            } else {
                RecordState::Invalid
            };
            assert_eq!(entry.state, expected);
        }
    }

    #[test]
    fn test_fill_entire_region() {
        let mut log = open_log(16);
        for i in 0..16 {
            log.append(&i.to_string()).unwrap();
        }
        assert_eq!(log.cursor_slot(), 15);
        assert!(matches!(
            log.append("16"),
            Err(Error::RegionFull { capacity: 16 })
        ));
    }

    #[test]
    fn test_payload_too_long_changes_nothing() {
        let mut log = open_log(4);
        log.append("first").unwrap();
        let before = log.medium().as_bytes().to_vec();
        let writes = log.medium().write_count();

        let result = log.append(&"x".repeat(MAX_PAYLOAD_LEN + 1));
        assert!(matches!(
            result,
            Err(Error::PayloadTooLong { len: 63, max: 62 })
        ));
        assert_eq!(log.cursor_slot(), 0);
        assert_eq!(log.medium().as_bytes(), before.as_slice());
        assert_eq!(log.medium().write_count(), writes);
    }

    #[test]
    fn test_payload_with_nul_is_rejected() {
        let mut log = open_log(4);
        assert!(matches!(
            log.append("a\0b"),
            Err(Error::PayloadContainsNul { position: 1 })
        ));
        assert!(log.replay().unwrap_err().is_empty_log());
    }

    #[test]
    fn test_region_full_after_two_records() {
        let mut log = open_log(2);
        log.append("21").unwrap();
        log.append("22").unwrap();
        let before = log.medium().as_bytes().to_vec();

        let err = log.append("23").unwrap_err();
        assert!(matches!(err, Error::RegionFull { capacity: 2 }));
        assert!(err.requires_erase());
        assert_eq!(log.medium().as_bytes(), before.as_slice());
        assert_eq!(
            replayed(&log),
            vec![
                (RecordState::Invalid, "21".to_string()),
                (RecordState::Valid, "22".to_string()),
            ]
        );
    }

    #[test]
    fn test_region_with_partial_trailing_space() {
        // 600 bytes hold two whole records; the tail is never used.
        init_test_logging();
        let medium = RamMedium::new(BASE, 600);
        let mut log = LogHandle::open(medium, &FixedRegion { base: BASE, size: 600 }).unwrap();
        log.append("a").unwrap();
        log.append("b").unwrap();
        assert!(matches!(log.append("c"), Err(Error::RegionFull { .. })));
    }

    #[test]
    fn test_erase_empties_log() {
        let mut log = open_log(4);
        log.append("21").unwrap();
        log.append("22").unwrap();

        log.erase().unwrap();
        assert_eq!(log.cursor_slot(), 0);
        assert_eq!(log.cursor_address(), BASE);
        assert!(matches!(log.replay(), Err(Error::LogEmpty)));
        assert!(log.medium().as_bytes().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_append_after_erase_starts_at_base() {
        let mut log = open_log(2);
        log.append("21").unwrap();
        log.append("22").unwrap();
        log.erase().unwrap();

        log.append("23").unwrap();
        assert_eq!(log.cursor_slot(), 0);
        assert_eq!(replayed(&log), vec![(RecordState::Valid, "23".to_string())]);
    }

    #[test]
    fn test_replay_on_empty_log() {
        let log = open_log(4);
        let err = log.replay().unwrap_err();
        assert!(err.is_empty_log());
        assert!(matches!(log.entries(), Err(Error::LogEmpty)));
    }

    #[test]
    fn test_replay_is_restartable() {
        let mut log = open_log(4);
        log.append("a").unwrap();
        log.append("b").unwrap();

        let first: Vec<_> = log.replay().unwrap().collect();
        let second: Vec<_> = log.replay().unwrap().collect();
        assert_eq!(first.len(), 2);
        assert_eq!(
            first.into_iter().map(Result::unwrap).collect::<Vec<_>>(),
            second.into_iter().map(Result::unwrap).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_replay_stops_at_corrupted_cursor_slot() {
        let mut log = open_log(4);
        log.append("21").unwrap();
        log.append("22").unwrap();
        log.append("23").unwrap();

        // Clear bits of the current record's state word.
        let address = log.region().state_address(2);
        log.medium_mut().write_quantum(address, 0x0000_5AA5).unwrap();

        let mut replay = log.replay().unwrap();
        assert_eq!(replay.next().unwrap().unwrap().payload, "21");
        assert_eq!(replay.next().unwrap().unwrap().payload, "22");
        let err = replay.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::RegionCorrupted {
                slot: 2,
                state: 0x0000_5AA5,
                ..
            }
        ));
        assert!(replay.next().is_none());
    }

    #[test]
    fn test_replay_stops_at_corrupted_middle_slot() {
        let mut log = open_log(4);
        log.append("21").unwrap();
        log.append("22").unwrap();
        log.append("23").unwrap();

        let address = log.region().state_address(1);
        log.medium_mut().write_quantum(address, 0).unwrap();

        let items: Vec<_> = log.replay().unwrap().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().payload, "21");
        assert!(matches!(
            items[1],
            Err(Error::RegionCorrupted { slot: 1, .. })
        ));
        assert!(matches!(
            log.entries(),
            Err(Error::RegionCorrupted { slot: 1, .. })
        ));
    }

    #[test]
    fn test_replay_corrupted_base_is_not_empty() {
        let mut log = open_log(4);
        log.medium_mut().write_quantum(BASE, 0x0BAD_0BAD).unwrap();

        let mut replay = log.replay().unwrap();
        assert!(matches!(
            replay.next(),
            Some(Err(Error::RegionCorrupted { slot: 0, .. }))
        ));
    }

    #[test]
    fn test_append_on_corrupted_cursor() {
        let mut log = open_log(4);
        log.append("21").unwrap();
        log.medium_mut().write_quantum(BASE, 0x0000_0005).unwrap();

        let err = log.append("22").unwrap_err();
        assert!(matches!(
            err,
            Error::RegionCorrupted {
                slot: 0,
                address: BASE,
                state: 0x0000_0005
            }
        ));
        assert!(err.requires_erase());

        log.erase().unwrap();
        log.append("22").unwrap();
        assert_eq!(replayed(&log), vec![(RecordState::Valid, "22".to_string())]);
    }

    #[test]
    fn test_append_on_tombstoned_cursor_is_corruption() {
        let mut log = open_log(4);
        log.append("21").unwrap();
        log.medium_mut().write_quantum(BASE, STATE_INVALID).unwrap();

        assert!(matches!(
            log.append("22"),
            Err(Error::RegionCorrupted { slot: 0, .. })
        ));
    }

    #[test]
    fn test_write_verify_detects_dirty_slot() {
        let mut log = open_log(4);
        log.append("21").unwrap();
        // Dirty the next slot's first payload quantum behind the log's back.
        let address = log.region().payload_address(1, 0);
        log.medium_mut().write_quantum(address, 0).unwrap();

        let err = log.append("22").unwrap_err();
        assert!(matches!(
            err,
            Error::Medium(MediumError::WriteVerify { expected: 0x32, actual: 0, .. })
        ));
    }

    #[test]
    fn test_append_waits_for_busy_medium() {
        init_test_logging();
        let size = 4 * RECORD_SIZE;
        let medium = RamMedium::new(BASE, size).with_write_latency(3);
        let mut log = LogHandle::open(medium, &FixedRegion { base: BASE, size }).unwrap();

        log.append("21").unwrap();
        log.append("22").unwrap();
        assert_eq!(log.entries().unwrap().len(), 2);
        // "21" + terminator + state, then tombstone + "22" + terminator + state.
        assert_eq!(log.medium().write_count(), 4 + 5);
    }

    #[test]
    fn test_reopen_resumes_at_current_record() {
        let mut log = open_log(4);
        log.append("21").unwrap();
        log.append("22").unwrap();
        let medium = log.into_medium();

        let size = 4 * RECORD_SIZE;
        let log = LogHandle::open(medium, &FixedRegion { base: BASE, size }).unwrap();
        assert_eq!(log.cursor_slot(), 1);
        assert_eq!(log.current().unwrap(), Some("22".to_string()));
        assert_eq!(log.medium().erase_count(), 1);
    }

    #[test]
    fn test_current() {
        let mut log = open_log(4);
        assert_eq!(log.current().unwrap(), None);
        log.append("21").unwrap();
        log.append("22").unwrap();
        assert_eq!(log.current().unwrap(), Some("22".to_string()));
    }

    #[test]
    fn test_status() {
        let mut log = open_log(16);
        let status = log.status().unwrap();
        assert_eq!(status.capacity, 16);
        assert_eq!(status.used_slots, 0);
        assert_eq!(status.free_slots, 16);
        assert_eq!(status.head_state, Some(RecordState::Uninitialized));
        assert_eq!(status.head_word, ERASED_WORD);

        log.append("21").unwrap();
        log.append("22").unwrap();
        let status = log.status().unwrap();
        assert_eq!(status.region_base, BASE);
        assert_eq!(status.region_size, 4096);
        assert_eq!(status.record_size, 256);
        assert_eq!(status.cursor_slot, 1);
        assert_eq!(status.cursor_address, BASE + 256);
        assert_eq!(status.used_slots, 2);
        assert_eq!(status.free_slots, 14);
        assert_eq!(status.head_state, Some(RecordState::Valid));
    }

    #[test]
    fn test_status_serializes() {
        let log = open_log(2);
        let json = serde_json::to_string(&log.status().unwrap()).unwrap();
        assert!(json.contains("\"capacity\":2"));
        assert!(json.contains("\"head_state\":\"uninitialized\""));
    }

    #[test]
    fn test_replay_size_hint() {
        let mut log = open_log(4);
        log.append("a").unwrap();
        log.append("b").unwrap();
        let replay = log.replay().unwrap();
        assert_eq!(replay.size_hint(), (0, Some(2)));
    }
}
