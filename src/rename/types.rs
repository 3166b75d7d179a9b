/// Destination filename pattern for the episode-number part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingScheme {
    /// `S01E03`
    SxxEyy,
    /// `s01e03`
    LowerSxxEyy,
    /// `103`
    Xyy,
    /// `03`
    Yy,
    /// `1x03`
    #[default]
    XxYy,
}

impl NamingScheme {
    /// Scheme names are case-significant (`SXXEYY` vs `sXXeYY`);
    /// anything unrecognized falls back to the `XxYY` default.
    pub fn parse(s: &str) -> Self {
        match s {
            "SXXEYY" => Self::SxxEyy,
            "sXXeYY" => Self::LowerSxxEyy,
            "XYY" => Self::Xyy,
            "YY" => Self::Yy,
            _ => Self::XxYy,
        }
    }
}

/// How a matched episode span is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultiEpisodeMode {
    /// `S01E01-E02`, `1x01-02`
    #[default]
    Range,
    /// `S01E01E02`, `1x01x02`
    Join,
}

impl MultiEpisodeMode {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("join") {
            Self::Join
        } else {
            Self::Range
        }
    }
}

/// Formatter inputs that hold for a whole run
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    pub scheme: NamingScheme,
    /// Episode digit count; 0 means the default of 2
    pub pad: usize,
    pub multi: MultiEpisodeMode,
}
