//! Telemetry stream identifiers and their configured rates

/// Logical telemetry stream.
///
/// Discriminants double as indices into per-stream tables and follow the
/// order in which streams are evaluated each batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataStream {
    /// SYS_STATUS
    ExtendedStatus = 0,
    /// RC_CHANNELS_RAW
    RcChannels = 1,
    /// GPS_RAW_INT, GLOBAL_POSITION_INT, GPS_GLOBAL_ORIGIN
    Position = 2,
    /// ATTITUDE
    Extra1 = 3,
    /// VFR_HUD, HEARTBEAT
    Extra2 = 4,
    /// BATTERY_STATUS, SCALED_PRESSURE, STATUSTEXT
    Extra3 = 5,
}

/// Number of telemetry streams
pub const STREAM_COUNT: usize = 6;

impl DataStream {
    /// All streams in evaluation order
    pub const ALL: [DataStream; STREAM_COUNT] = [
        DataStream::ExtendedStatus,
        DataStream::RcChannels,
        DataStream::Position,
        DataStream::Extra1,
        DataStream::Extra2,
        DataStream::Extra3,
    ];

    /// Table index of this stream
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short name used in log output
    pub const fn name(self) -> &'static str {
        match self {
            DataStream::ExtendedStatus => "EXTENDED_STATUS",
            DataStream::RcChannels => "RC_CHANNELS",
            DataStream::Position => "POSITION",
            DataStream::Extra1 => "EXTRA1",
            DataStream::Extra2 => "EXTRA2",
            DataStream::Extra3 => "EXTRA3",
        }
    }
}

/// Configured rate per stream in Hz (0 disables the stream)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRates {
    pub extended_status: u8,
    pub rc_channels: u8,
    pub position: u8,
    pub extra1: u8,
    pub extra2: u8,
    pub extra3: u8,
}

impl Default for StreamRates {
    fn default() -> Self {
        Self {
            extended_status: 2,
            rc_channels: 5,
            position: 2,
            extra1: 10,
            extra2: 2,
            extra3: 1,
        }
    }
}

impl StreamRates {
    /// Every stream disabled
    pub const fn disabled() -> Self {
        Self {
            extended_status: 0,
            rc_channels: 0,
            position: 0,
            extra1: 0,
            extra2: 0,
            extra3: 0,
        }
    }

    /// Rate configured for `stream`
    pub const fn rate(&self, stream: DataStream) -> u8 {
        match stream {
            DataStream::ExtendedStatus => self.extended_status,
            DataStream::RcChannels => self.rc_channels,
            DataStream::Position => self.position,
            DataStream::Extra1 => self.extra1,
            DataStream::Extra2 => self.extra2,
            DataStream::Extra3 => self.extra3,
        }
    }

    /// Replace the rate of a single stream
    pub fn set_rate(&mut self, stream: DataStream, rate_hz: u8) {
        let slot = match stream {
            DataStream::ExtendedStatus => &mut self.extended_status,
            DataStream::RcChannels => &mut self.rc_channels,
            DataStream::Position => &mut self.position,
            DataStream::Extra1 => &mut self.extra1,
            DataStream::Extra2 => &mut self.extra2,
            DataStream::Extra3 => &mut self.extra3,
        };
        *slot = rate_hz;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_indices() {
        for (i, stream) in DataStream::ALL.iter().enumerate() {
            assert_eq!(stream.index(), i);
        }
    }

    #[test]
    fn test_default_rates() {
        let rates = StreamRates::default();
        assert_eq!(rates.rate(DataStream::ExtendedStatus), 2);
        assert_eq!(rates.rate(DataStream::RcChannels), 5);
        assert_eq!(rates.rate(DataStream::Position), 2);
        assert_eq!(rates.rate(DataStream::Extra1), 10);
        assert_eq!(rates.rate(DataStream::Extra2), 2);
        assert_eq!(rates.rate(DataStream::Extra3), 1);
    }

    #[test]
    fn test_set_rate() {
        let mut rates = StreamRates::disabled();
        rates.set_rate(DataStream::Position, 7);
        assert_eq!(rates.rate(DataStream::Position), 7);
        assert_eq!(rates.rate(DataStream::Extra1), 0);
    }
}
