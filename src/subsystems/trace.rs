//! Waveform memory (`:TRACe<ch>`).
//!
//! Segments are defined per channel, filled either with ASCII sample lists,
//! binary blocks or by importing a file already on the instrument, and then
//! selected for playback.

use std::str::FromStr;
use std::time::Duration;

use super::{join, non_empty, parse_list, subsystem};
use crate::block;
use crate::dispatcher::{Rejected, SetOutcome, Timed};
use crate::error::{AwgError, AwgResult};
use crate::session::Session;
use crate::types::{
    on_off, quoted, AdvancementMode, ByteOrder, Channel, ImportDataType, ImportFileType, IntoChannel,
    Limit, MemoryMode, Padding, ResampleMode, Setting,
};
use crate::validation;

/// Longest segment name the instrument stores.
pub const MAX_NAME_LEN: usize = 32;

/// Longest segment comment the instrument stores.
pub const MAX_COMMENT_LEN: usize = 256;

/// One `(id, length)` pair of a `:TRAC:CAT?` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentInfo {
    /// Segment id
    pub id: u32,
    /// Length in samples
    pub length: u64,
}

impl SegmentInfo {
    /// Parse a `:TRAC:CAT?` reply. The instrument answers `0,0` when no
    /// segment is defined; that pair is dropped.
    pub fn parse_catalog(command: &str, reply: &str) -> AwgResult<Vec<SegmentInfo>> {
        let values: Vec<u64> = parse_list(command, reply)?;
        if values.len() % 2 != 0 {
            return Err(AwgError::unexpected(command, reply));
        }
        values
            .chunks_exact(2)
            .filter(|pair| pair[0] != 0 || pair[1] != 0)
            .map(|pair| {
                let id = u32::try_from(pair[0]).map_err(|_| AwgError::unexpected(command, reply))?;
                Ok(SegmentInfo {
                    id,
                    length: pair[1],
                })
            })
            .collect()
    }
}

/// Parsed `:TRAC:FREE?` reply, in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInfo {
    /// Free waveform memory
    pub available: u64,
    /// Memory occupied by defined segments
    pub in_use: u64,
    /// Largest contiguous free block
    pub contiguous: u64,
}

impl FromStr for MemoryInfo {
    type Err = AwgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<u64> = parse_list(":TRAC:FREE?", s)?;
        match values.as_slice() {
            [available, in_use, contiguous] => Ok(MemoryInfo {
                available: *available,
                in_use: *in_use,
                contiguous: *contiguous,
            }),
            _ => Err(AwgError::unexpected(":TRAC:FREE?", s)),
        }
    }
}

/// Arguments of `:TRAC<ch>:IMP`.
///
/// ```
/// use awg_scpi::subsystems::WaveformImport;
/// use awg_scpi::types::{ImportDataType, ImportFileType, Padding};
///
/// let import = WaveformImport::new(1, "C:\\waves\\chirp.bin", ImportFileType::Bin, ImportDataType::Both)
///     .markers(true)
///     .padding(Padding::Fill)
///     .init_value(128);
/// assert_eq!(
///     import.arguments().unwrap(),
///     "1,\"C:\\waves\\chirp.bin\",BIN,BOTH,ON,FILL,128"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformImport {
    segment: u32,
    path: String,
    file_type: ImportFileType,
    data_type: ImportDataType,
    markers: bool,
    padding: Option<Padding>,
    init_value: Option<i32>,
    ignore_header: Option<bool>,
}

impl WaveformImport {
    /// Import `path` into `segment` with markers off and no padding.
    pub fn new(
        segment: u32,
        path: impl Into<String>,
        file_type: ImportFileType,
        data_type: ImportDataType,
    ) -> Self {
        Self {
            segment,
            path: path.into(),
            file_type,
            data_type,
            markers: false,
            padding: None,
            init_value: None,
            ignore_header: None,
        }
    }

    /// Import marker bits from the file.
    pub fn markers(mut self, enabled: bool) -> Self {
        self.markers = enabled;
        self
    }

    /// How to pad a file shorter than the segment.
    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Fill value used with [`Padding::Fill`] (default 0).
    pub fn init_value(mut self, value: i32) -> Self {
        self.init_value = Some(value);
        self
    }

    /// Ignore header parameters stored in the file. Sent with [`Padding::Fill`] only.
    pub fn ignore_header(mut self, ignore: bool) -> Self {
        self.ignore_header = Some(ignore);
        self
    }

    /// Argument list after the command header.
    pub fn arguments(&self) -> AwgResult<String> {
        validation::is_in_range("segment id", self.segment, 1..=u32::MAX)?;
        validation::is_valid_path(&self.path)?;

        let mut args = format!(
            "{},{},{},{},{}",
            self.segment,
            quoted(&self.path),
            self.file_type,
            self.data_type,
            on_off(self.markers)
        );
        if let Some(padding) = self.padding {
            args.push_str(&format!(",{padding}"));
            if padding == Padding::Fill {
                args.push_str(&format!(",{}", self.init_value.unwrap_or(0)));
                if let Some(ignore) = self.ignore_header {
                    args.push_str(&format!(",{}", u8::from(ignore)));
                }
            }
        }
        Ok(args)
    }
}

subsystem! {
    /// `:TRAC` subsystem.
    Trace
}

impl<S: Session> Trace<'_, S> {
    fn channel(channel: impl IntoChannel) -> AwgResult<Channel> {
        channel.into_channel().rejected()
    }

    /// `:TRAC<ch>:MMOD`: internal or extended waveform memory.
    pub fn set_memory_mode(
        &mut self,
        channel: impl IntoChannel,
        mode: MemoryMode,
    ) -> AwgResult<SetOutcome> {
        let ch = Self::channel(channel)?;
        self.d.set_value(&format!(":TRAC{ch}:MMOD"), mode)
    }

    /// `:TRAC<ch>:MMOD?`
    pub fn memory_mode(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<MemoryMode>> {
        let ch = Self::channel(channel)?;
        self.d.query_as(&format!(":TRAC{ch}:MMOD?"))
    }

    /// `:TRAC<ch>:DEF <id>,<length>[,<init>]`
    pub fn define_segment(
        &mut self,
        channel: impl IntoChannel,
        segment: u32,
        length: u64,
        init_value: Option<i32>,
    ) -> AwgResult<Duration> {
        let ch = Self::channel(channel)?;
        check_segment(segment).rejected()?;
        check_length(length).rejected()?;
        let command = match init_value {
            Some(init) => format!(":TRAC{ch}:DEF {segment},{length},{init}"),
            None => format!(":TRAC{ch}:DEF {segment},{length}"),
        };
        self.d.write(&command, "Segment defined")
    }

    /// `:TRAC<ch>:DEF:NEW? <length>[,<init>]`: define a segment and return its id.
    pub fn define_new_segment(
        &mut self,
        channel: impl IntoChannel,
        length: u64,
        init_value: Option<i32>,
    ) -> AwgResult<Timed<u32>> {
        let ch = Self::channel(channel)?;
        check_length(length).rejected()?;
        let command = match init_value {
            Some(init) => format!(":TRAC{ch}:DEF:NEW? {length},{init}"),
            None => format!(":TRAC{ch}:DEF:NEW? {length}"),
        };
        self.d.query_as(&command)
    }

    /// `:TRAC<ch>:DEF:WONL <id>,<length>[,<init>]`: write-only segment,
    /// which cannot be read back but loads faster.
    pub fn define_write_only_segment(
        &mut self,
        channel: impl IntoChannel,
        segment: u32,
        length: u64,
        init_value: Option<i32>,
    ) -> AwgResult<Duration> {
        let ch = Self::channel(channel)?;
        check_segment(segment).rejected()?;
        check_length(length).rejected()?;
        let command = match init_value {
            Some(init) => format!(":TRAC{ch}:DEF:WONL {segment},{length},{init}"),
            None => format!(":TRAC{ch}:DEF:WONL {segment},{length}"),
        };
        self.d.write(&command, "Write-only segment defined")
    }

    /// `:TRAC<ch>:DEF:WONL:NEW? <length>[,<init>]`
    pub fn define_new_write_only_segment(
        &mut self,
        channel: impl IntoChannel,
        length: u64,
        init_value: Option<i32>,
    ) -> AwgResult<Timed<u32>> {
        let ch = Self::channel(channel)?;
        check_length(length).rejected()?;
        let command = match init_value {
            Some(init) => format!(":TRAC{ch}:DEF:WONL:NEW? {length},{init}"),
            None => format!(":TRAC{ch}:DEF:WONL:NEW? {length}"),
        };
        self.d.query_as(&command)
    }

    /// `:TRAC<ch>:DATA <id>,<offset>,<s1>,...`: write samples as ASCII.
    pub fn write_samples(
        &mut self,
        channel: impl IntoChannel,
        segment: u32,
        offset: u64,
        samples: &[f64],
    ) -> AwgResult<Duration> {
        let ch = Self::channel(channel)?;
        check_segment(segment).rejected()?;
        non_empty("samples", samples).rejected()?;
        samples
            .iter()
            .try_for_each(|s| validation::is_finite("sample", *s))
            .rejected()?;
        let command = format!(":TRAC{ch}:DATA {segment},{offset},{}", join(samples));
        self.d
            .write(&command, &format!("{} samples written", samples.len()))
    }

    /// `:TRAC<ch>:DATA <id>,<offset>,<block>`: write a pre-encoded binary payload.
    pub fn write_block(
        &mut self,
        channel: impl IntoChannel,
        segment: u32,
        offset: u64,
        payload: &[u8],
    ) -> AwgResult<Duration> {
        let ch = Self::channel(channel)?;
        check_segment(segment).rejected()?;
        self.d
            .write_block(&format!(":TRAC{ch}:DATA {segment},{offset},"), payload)
    }

    /// Write 32-bit float samples as a binary block in `order`, which must
    /// match the instrument's `:FORM:BORD` setting.
    pub fn write_samples_block(
        &mut self,
        channel: impl IntoChannel,
        segment: u32,
        offset: u64,
        samples: &[f32],
        order: ByteOrder,
    ) -> AwgResult<Duration> {
        non_empty("samples", samples).rejected()?;
        let payload = block::f32_to_bytes(samples, order);
        self.write_block(channel, segment, offset, &payload)
    }

    /// `:TRAC<ch>:DATA? <id>,<offset>,<length>`: read samples as ASCII.
    pub fn read_samples(
        &mut self,
        channel: impl IntoChannel,
        segment: u32,
        offset: u64,
        length: u64,
    ) -> AwgResult<Timed<Vec<f64>>> {
        let ch = Self::channel(channel)?;
        check_segment(segment).rejected()?;
        check_length(length).rejected()?;
        let command = format!(":TRAC{ch}:DATA? {segment},{offset},{length}");
        self.d
            .query(&command)?
            .try_map(|reply| parse_list(&command, &reply))
    }

    /// `:TRAC<ch>:DATA:BLOC? <id>,<offset>,<length>`: read samples as a
    /// binary block of 32-bit floats in `order`.
    pub fn read_samples_block(
        &mut self,
        channel: impl IntoChannel,
        segment: u32,
        offset: u64,
        length: u64,
        order: ByteOrder,
    ) -> AwgResult<Timed<Vec<f32>>> {
        let ch = Self::channel(channel)?;
        check_segment(segment).rejected()?;
        check_length(length).rejected()?;
        self.d
            .query_block(&format!(":TRAC{ch}:DATA:BLOC? {segment},{offset},{length}"))?
            .try_map(|payload| Ok(block::bytes_to_f32(&payload, order)?))
    }

    /// `:TRAC<ch>:IMP ...`: import a file stored on the instrument.
    pub fn import(
        &mut self,
        channel: impl IntoChannel,
        import: &WaveformImport,
    ) -> AwgResult<Duration> {
        let ch = Self::channel(channel)?;
        let args = import.arguments().rejected()?;
        self.d
            .write(&format!(":TRAC{ch}:IMP {args}"), "Waveform imported")
    }

    /// `:TRAC<ch>:IMP:RES`: how imported data is resampled.
    pub fn set_import_resample(
        &mut self,
        channel: impl IntoChannel,
        mode: ResampleMode,
    ) -> AwgResult<SetOutcome> {
        let ch = Self::channel(channel)?;
        self.d.set_value(&format!(":TRAC{ch}:IMP:RES"), mode)
    }

    /// `:TRAC<ch>:IMP:RES?`
    pub fn import_resample(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<ResampleMode>> {
        let ch = Self::channel(channel)?;
        self.d.query_as(&format!(":TRAC{ch}:IMP:RES?"))
    }

    /// `:TRAC<ch>:IMP:RES:WLEN`: target length used by `KWL` resampling.
    pub fn set_import_resample_length(
        &mut self,
        channel: impl IntoChannel,
        length: u64,
    ) -> AwgResult<SetOutcome> {
        let ch = Self::channel(channel)?;
        check_length(length).rejected()?;
        self.d
            .set_value(&format!(":TRAC{ch}:IMP:RES:WLEN"), length)
    }

    /// `:TRAC<ch>:IMP:RES:WLEN?`
    pub fn import_resample_length(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<u64>> {
        let ch = Self::channel(channel)?;
        self.d.query_as(&format!(":TRAC{ch}:IMP:RES:WLEN?"))
    }

    /// `:TRAC<ch>:IMP:SCAL`: scale imported data to the full DAC range.
    pub fn set_import_scaling(
        &mut self,
        channel: impl IntoChannel,
        enabled: bool,
    ) -> AwgResult<SetOutcome> {
        let ch = Self::channel(channel)?;
        self.d
            .set_value(&format!(":TRAC{ch}:IMP:SCAL"), on_off(enabled))
    }

    /// `:TRAC<ch>:IMP:SCAL?`
    pub fn import_scaling(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<bool>> {
        let ch = Self::channel(channel)?;
        self.d.query_bool(&format!(":TRAC{ch}:IMP:SCAL?"))
    }

    /// `:TRAC<ch>:DEL <id>`
    pub fn delete_segment(&mut self, channel: impl IntoChannel, segment: u32) -> AwgResult<Duration> {
        let ch = Self::channel(channel)?;
        check_segment(segment).rejected()?;
        self.d
            .write(&format!(":TRAC{ch}:DEL {segment}"), "Segment deleted")
    }

    /// `:TRAC<ch>:DEL:ALL`
    pub fn delete_all_segments(&mut self, channel: impl IntoChannel) -> AwgResult<Duration> {
        let ch = Self::channel(channel)?;
        self.d
            .write(&format!(":TRAC{ch}:DEL:ALL"), "All segments deleted")
    }

    /// `:TRAC<ch>:CAT?`: defined segments and their lengths.
    pub fn catalog(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<Vec<SegmentInfo>>> {
        let ch = Self::channel(channel)?;
        let command = format!(":TRAC{ch}:CAT?");
        self.d
            .query(&command)?
            .try_map(|reply| SegmentInfo::parse_catalog(&command, &reply))
    }

    /// `:TRAC<ch>:FREE?`
    pub fn free_memory(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<MemoryInfo>> {
        let ch = Self::channel(channel)?;
        self.d.query_as(&format!(":TRAC{ch}:FREE?"))
    }

    /// `:TRAC<ch>:NAME <id>,"<name>"`, at most [`MAX_NAME_LEN`] characters.
    pub fn set_segment_name(
        &mut self,
        channel: impl IntoChannel,
        segment: u32,
        name: &str,
    ) -> AwgResult<SetOutcome> {
        let ch = Self::channel(channel)?;
        check_segment(segment).rejected()?;
        validation::max_chars("segment name", name, MAX_NAME_LEN).rejected()?;
        self.d.set(
            &format!(":TRAC{ch}:NAME {segment},{}", quoted(name)),
            &format!(":TRAC{ch}:NAME? {segment}"),
        )
    }

    /// `:TRAC<ch>:NAME? <id>`
    pub fn segment_name(&mut self, channel: impl IntoChannel, segment: u32) -> AwgResult<Timed<String>> {
        let ch = Self::channel(channel)?;
        check_segment(segment).rejected()?;
        Ok(self
            .d
            .query(&format!(":TRAC{ch}:NAME? {segment}"))?
            .map(|reply| unquote(&reply)))
    }

    /// `:TRAC<ch>:COMM <id>,"<comment>"`, at most [`MAX_COMMENT_LEN`] characters.
    pub fn set_segment_comment(
        &mut self,
        channel: impl IntoChannel,
        segment: u32,
        comment: &str,
    ) -> AwgResult<SetOutcome> {
        let ch = Self::channel(channel)?;
        check_segment(segment).rejected()?;
        validation::max_chars("segment comment", comment, MAX_COMMENT_LEN).rejected()?;
        self.d.set(
            &format!(":TRAC{ch}:COMM {segment},{}", quoted(comment)),
            &format!(":TRAC{ch}:COMM? {segment}"),
        )
    }

    /// `:TRAC<ch>:COMM? <id>`
    pub fn segment_comment(
        &mut self,
        channel: impl IntoChannel,
        segment: u32,
    ) -> AwgResult<Timed<String>> {
        let ch = Self::channel(channel)?;
        check_segment(segment).rejected()?;
        Ok(self
            .d
            .query(&format!(":TRAC{ch}:COMM? {segment}"))?
            .map(|reply| unquote(&reply)))
    }

    /// `:TRAC<ch>:SEL <id>`: segment played in arbitrary mode.
    pub fn select_segment(&mut self, channel: impl IntoChannel, segment: u32) -> AwgResult<SetOutcome> {
        let ch = Self::channel(channel)?;
        check_segment(segment).rejected()?;
        self.d.set_value(&format!(":TRAC{ch}:SEL"), segment)
    }

    /// `:TRAC<ch>:SEL?`
    pub fn selected_segment(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<u32>> {
        let ch = Self::channel(channel)?;
        self.d.query_as(&format!(":TRAC{ch}:SEL?"))
    }

    /// `:TRAC<ch>:ADV`: segment advancement mode.
    pub fn set_advancement(
        &mut self,
        channel: impl IntoChannel,
        mode: AdvancementMode,
    ) -> AwgResult<SetOutcome> {
        let ch = Self::channel(channel)?;
        self.d.set_value(&format!(":TRAC{ch}:ADV"), mode)
    }

    /// `:TRAC<ch>:ADV?`
    pub fn advancement(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<AdvancementMode>> {
        let ch = Self::channel(channel)?;
        self.d.query_as(&format!(":TRAC{ch}:ADV?"))
    }

    /// `:TRAC<ch>:COUN`: segment loop count, 1 to 4G-1.
    pub fn set_loop_count(
        &mut self,
        channel: impl IntoChannel,
        count: impl Into<Setting<u32>>,
    ) -> AwgResult<SetOutcome> {
        let ch = Self::channel(channel)?;
        let header = format!(":TRAC{ch}:COUN");
        let count = count.into();
        count.reject_default(&header).rejected()?;
        count
            .check(|c| validation::is_in_range("loop count", *c, 1..=u32::MAX))
            .rejected()?;
        self.d.set_value(&header, count)
    }

    /// `:TRAC<ch>:COUN?`
    pub fn loop_count(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<u32>> {
        let ch = Self::channel(channel)?;
        self.d.query_as(&format!(":TRAC{ch}:COUN?"))
    }

    /// `:TRAC<ch>:COUN? MIN|MAX`
    pub fn loop_count_limit(
        &mut self,
        channel: impl IntoChannel,
        limit: Limit,
    ) -> AwgResult<Timed<u32>> {
        let ch = Self::channel(channel)?;
        self.d.query_as(&format!(":TRAC{ch}:COUN? {limit}"))
    }

    /// `:TRAC<ch>:MARK`: marker output.
    pub fn set_markers(&mut self, channel: impl IntoChannel, enabled: bool) -> AwgResult<SetOutcome> {
        let ch = Self::channel(channel)?;
        self.d
            .set_value(&format!(":TRAC{ch}:MARK"), on_off(enabled))
    }

    /// `:TRAC<ch>:MARK?`
    pub fn markers(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<bool>> {
        let ch = Self::channel(channel)?;
        self.d.query_bool(&format!(":TRAC{ch}:MARK?"))
    }
}

fn check_segment(segment: u32) -> AwgResult<()> {
    validation::is_in_range("segment id", segment, 1..=u32::MAX)
}

fn check_length(length: u64) -> AwgResult<()> {
    validation::is_in_range("segment length", length, 1..=u64::MAX)
}

fn unquote(reply: &str) -> String {
    reply.trim().trim_matches('"').replace("\"\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MockSession;
    use crate::subsystems::mock_dispatcher;

    #[test]
    fn catalog_drops_empty_pair() {
        assert!(SegmentInfo::parse_catalog(":TRAC1:CAT?", "0,0").unwrap().is_empty());
        let segs = SegmentInfo::parse_catalog(":TRAC1:CAT?", "1,4096,2,640").unwrap();
        assert_eq!(
            segs,
            vec![
                SegmentInfo { id: 1, length: 4096 },
                SegmentInfo { id: 2, length: 640 }
            ]
        );
        assert!(SegmentInfo::parse_catalog(":TRAC1:CAT?", "1,4096,2").is_err());
    }

    #[test]
    fn free_memory_triplet() {
        let info: MemoryInfo = "2147483648,4096,2147479552".parse().unwrap();
        assert_eq!(info.in_use, 4096);
        assert!("1,2".parse::<MemoryInfo>().is_err());
    }

    #[test]
    fn import_options_only_follow_fill() {
        let base = WaveformImport::new(3, "w.csv", ImportFileType::Csv, ImportDataType::IOnly);
        assert_eq!(base.arguments().unwrap(), "3,\"w.csv\",CSV,IONL,OFF");

        let alen = base
            .clone()
            .padding(Padding::AutoLength)
            .init_value(5)
            .ignore_header(true);
        assert_eq!(alen.arguments().unwrap(), "3,\"w.csv\",CSV,IONL,OFF,ALEN");

        let fill = base.padding(Padding::Fill).ignore_header(true);
        assert_eq!(fill.arguments().unwrap(), "3,\"w.csv\",CSV,IONL,OFF,FILL,0,1");

        assert!(WaveformImport::new(0, "w.csv", ImportFileType::Csv, ImportDataType::Both)
            .arguments()
            .is_err());
    }

    #[test]
    fn ascii_samples_and_definitions() {
        let mock = MockSession::new();
        let mut d = mock_dispatcher(&mock);
        let mut trace = Trace::new(&mut d);

        trace.define_segment(1, 1, 640, None).unwrap();
        trace.define_segment(1, 2, 640, Some(0)).unwrap();
        trace.write_samples(1, 1, 0, &[0.0, 0.5, -0.5]).unwrap();
        assert!(trace.write_samples(1, 1, 0, &[]).is_err());
        assert!(trace.define_segment(1, 0, 640, None).is_err());
        assert_eq!(
            mock.writes(),
            vec![
                ":TRAC1:DEF 1,640",
                ":TRAC1:DEF 2,640,0",
                ":TRAC1:DATA 1,0,0,0.5,-0.5"
            ]
        );
    }

    #[test]
    fn float_block_round_trip() {
        let mock = MockSession::new();
        let mut d = mock_dispatcher(&mock);
        let mut trace = Trace::new(&mut d);

        trace
            .write_samples_block(2, 1, 0, &[1.0, -1.0], ByteOrder::Swapped)
            .unwrap();
        let sent = &mock.raw_writes()[0];
        assert!(sent.starts_with(b":TRAC2:DATA 1,0,#18"));
        assert!(sent.ends_with(b"\n"));

        let mut reply = b"#18".to_vec();
        reply.extend(block::f32_to_bytes(&[1.0, -1.0], ByteOrder::Swapped));
        reply.push(b'\n');
        mock.push_raw_reply(reply);
        let samples = trace
            .read_samples_block(2, 1, 0, 2, ByteOrder::Swapped)
            .unwrap();
        assert_eq!(samples.value, vec![1.0, -1.0]);
    }

    #[test]
    fn name_length_is_limited() {
        let mock = MockSession::new().with_reply(":TRAC1:NAME? 1", "\"chirp\"");
        let mut d = mock_dispatcher(&mock);
        let mut trace = Trace::new(&mut d);

        assert!(trace.set_segment_name(1, 1, &"x".repeat(33)).is_err());
        assert!(trace
            .set_segment_comment(1, 1, &"y".repeat(257))
            .is_err());
        assert_eq!(mock.transmissions(), 0);

        let outcome = trace.set_segment_name(1, 1, "chirp").unwrap();
        assert_eq!(outcome.confirmed.as_deref(), Some("\"chirp\""));
        assert_eq!(trace.segment_name(1, 1).unwrap().value, "chirp");
    }

    #[test]
    fn loop_count_and_limit_query() {
        let mock = MockSession::new().with_reply(":TRAC3:COUN? MAX", "4294967295");
        let mut d = mock_dispatcher(&mock).with_confirm_sets(false);
        let mut trace = Trace::new(&mut d);

        assert!(trace.set_loop_count(3, 0u32).is_err());
        trace.set_loop_count(3, 10u32).unwrap();
        assert_eq!(
            trace.loop_count_limit(3, Limit::Max).unwrap().value,
            u32::MAX
        );
        assert_eq!(mock.writes(), vec![":TRAC3:COUN 10"]);
    }
}
