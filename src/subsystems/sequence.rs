//! Sequencer table (`:STABle`).
//!
//! Each table entry is six 32-bit control words. Entries are written one at a
//! time as ASCII and read back either as ASCII or as a binary block.

use std::time::Duration;

use super::{join, parse_list, subsystem};
use crate::block;
use crate::dispatcher::{Rejected, SetOutcome, Timed};
use crate::error::AwgResult;
use crate::session::Session;
use crate::types::{on_off, AdvancementMode, ByteOrder, Setting};
use crate::validation;

/// Control words per sequence table entry.
pub const ENTRY_WORDS: usize = 6;

/// Highest sequence table index.
pub const MAX_ENTRY_INDEX: u32 = 16_777_214;

subsystem! {
    /// `:STAB` subsystem.
    SequenceTable
}

impl<S: Session> SequenceTable<'_, S> {
    /// `:STAB:RES`: clear every entry.
    pub fn reset(&mut self) -> AwgResult<Duration> {
        self.d.write(":STAB:RES", "Sequence table reset")
    }

    /// `:STAB:DATA <index>,<w1>,...,<w6>`
    pub fn write_entry(&mut self, index: u32, words: [u32; ENTRY_WORDS]) -> AwgResult<Duration> {
        validation::is_in_range("sequence index", index, 0..=MAX_ENTRY_INDEX).rejected()?;
        self.d.write(
            &format!(":STAB:DATA {index},{}", join(&words)),
            "Entry written",
        )
    }

    /// `:STAB:DATA? <index>,<length>`: `length` words starting at `index`.
    pub fn read_words(&mut self, index: u32, length: u32) -> AwgResult<Timed<Vec<u32>>> {
        check_span(index, length).rejected()?;
        let command = format!(":STAB:DATA? {index},{length}");
        self.d
            .query(&command)?
            .try_map(|reply| parse_list(&command, &reply))
    }

    /// `:STAB:DATA:BLOC? <index>,<length>`: same as [`SequenceTable::read_words`]
    /// but transferred as a binary block in `order`.
    pub fn read_words_block(
        &mut self,
        index: u32,
        length: u32,
        order: ByteOrder,
    ) -> AwgResult<Timed<Vec<u32>>> {
        check_span(index, length).rejected()?;
        self.d
            .query_block(&format!(":STAB:DATA:BLOC? {index},{length}"))?
            .try_map(|payload| Ok(block::bytes_to_u32(&payload, order)?))
    }

    /// `:STAB:SEQ:SEL`: entry where sequence playback starts.
    pub fn set_sequence_start(&mut self, index: impl Into<Setting<u32>>) -> AwgResult<SetOutcome> {
        let index = index.into();
        index.reject_default(":STAB:SEQ:SEL").rejected()?;
        index
            .check(|i| validation::is_in_range("sequence index", *i, 0..=MAX_ENTRY_INDEX))
            .rejected()?;
        self.d.set_value(":STAB:SEQ:SEL", index)
    }

    /// `:STAB:SEQ:SEL?`
    pub fn sequence_start(&mut self) -> AwgResult<Timed<u32>> {
        self.d.query_as(":STAB:SEQ:SEL?")
    }

    /// `:STAB:SEQ:STAT?`: execution state and current entry, bit-encoded.
    pub fn sequence_state(&mut self) -> AwgResult<Timed<u32>> {
        self.d.query_as(":STAB:SEQ:STAT?")
    }

    /// `:STAB:DYN`: dynamic sequence selection.
    pub fn set_dynamic(&mut self, enabled: bool) -> AwgResult<SetOutcome> {
        self.d.set_value(":STAB:DYN", on_off(enabled))
    }

    /// `:STAB:DYN?`
    pub fn dynamic(&mut self) -> AwgResult<Timed<bool>> {
        self.d.query_bool(":STAB:DYN?")
    }

    /// `:STAB:DYN:SEL`: entry to play next in dynamic mode. Has no query form.
    pub fn select_dynamic_entry(&mut self, index: u32) -> AwgResult<Duration> {
        validation::is_in_range("sequence index", index, 0..=MAX_ENTRY_INDEX).rejected()?;
        self.d
            .write(&format!(":STAB:DYN:SEL {index}"), "Dynamic entry selected")
    }

    /// `:STAB:SCEN:SEL`: entry where scenario playback starts.
    pub fn set_scenario_start(&mut self, index: impl Into<Setting<u32>>) -> AwgResult<SetOutcome> {
        let index = index.into();
        index.reject_default(":STAB:SCEN:SEL").rejected()?;
        index
            .check(|i| validation::is_in_range("sequence index", *i, 0..=MAX_ENTRY_INDEX))
            .rejected()?;
        self.d.set_value(":STAB:SCEN:SEL", index)
    }

    /// `:STAB:SCEN:SEL?`
    pub fn scenario_start(&mut self) -> AwgResult<Timed<u32>> {
        self.d.query_as(":STAB:SCEN:SEL?")
    }

    /// `:STAB:SCEN:ADV`
    pub fn set_scenario_advance(&mut self, mode: AdvancementMode) -> AwgResult<SetOutcome> {
        self.d.set_value(":STAB:SCEN:ADV", mode)
    }

    /// `:STAB:SCEN:ADV?`
    pub fn scenario_advance(&mut self) -> AwgResult<Timed<AdvancementMode>> {
        self.d.query_as(":STAB:SCEN:ADV?")
    }

    /// `:STAB:SCEN:COUN`: scenario loop count, 1 to 4G-1.
    pub fn set_scenario_loop_count(
        &mut self,
        count: impl Into<Setting<u32>>,
    ) -> AwgResult<SetOutcome> {
        let count = count.into();
        count.reject_default(":STAB:SCEN:COUN").rejected()?;
        count
            .check(|c| validation::is_in_range("loop count", *c, 1..=u32::MAX))
            .rejected()?;
        self.d.set_value(":STAB:SCEN:COUN", count)
    }

    /// `:STAB:SCEN:COUN?`
    pub fn scenario_loop_count(&mut self) -> AwgResult<Timed<u32>> {
        self.d.query_as(":STAB:SCEN:COUN?")
    }
}

fn check_span(index: u32, length: u32) -> AwgResult<()> {
    validation::is_in_range("sequence index", index, 0..=MAX_ENTRY_INDEX)?;
    validation::is_in_range("word count", length, 1..=u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MockSession;
    use crate::subsystems::mock_dispatcher;
    use crate::types::Limit;

    #[test]
    fn entry_is_written_as_ascii_words() {
        let mock = MockSession::new();
        let mut d = mock_dispatcher(&mock);
        let mut stab = SequenceTable::new(&mut d);
        stab.write_entry(0, [0x1000_0000, 1, 0, 1, 0, 0xFFFF_FFFF])
            .unwrap();
        assert_eq!(
            mock.writes(),
            vec![":STAB:DATA 0,268435456,1,0,1,0,4294967295"]
        );
        assert!(stab.write_entry(MAX_ENTRY_INDEX + 1, [0; 6]).is_err());
    }

    #[test]
    fn words_read_as_ascii_and_block() {
        let mock = MockSession::new().with_reply(":STAB:DATA? 0,6", "1,2,3,4,5,6");
        mock.push_raw_reply(b"#18\x00\x00\x00\x01\x00\x00\x00\x02\n".to_vec());
        let mut d = mock_dispatcher(&mock);
        let mut stab = SequenceTable::new(&mut d);

        assert_eq!(stab.read_words(0, 6).unwrap().value, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(
            stab.read_words_block(0, 2, ByteOrder::Normal).unwrap().value,
            vec![1, 2]
        );
        assert!(stab.read_words(0, 0).is_err());
    }

    #[test]
    fn scenario_loop_count_must_be_positive() {
        let mock = MockSession::new();
        let mut d = mock_dispatcher(&mock).with_confirm_sets(false);
        let mut stab = SequenceTable::new(&mut d);
        assert!(stab.set_scenario_loop_count(0u32).is_err());
        stab.set_scenario_loop_count(Setting::limit(Limit::Max))
            .unwrap();
        stab.set_scenario_loop_count(3u32).unwrap();
        assert_eq!(
            mock.writes(),
            vec![":STAB:SCEN:COUN MAX", ":STAB:SCEN:COUN 3"]
        );
    }
}
