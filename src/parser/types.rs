/// Season/episode tokens extracted from a media file basename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    /// Crude show-name guess; the planner prefers the directory-derived
    /// name, so this is only a fallback hint
    pub show: String,
    pub season: u32,
    pub episode: u32,
    /// End of a multi-episode span; 0 means a single episode
    pub episode2: u32,
    pub ext: String,
    pub raw: String,
}

impl ParsedFile {
    pub fn is_range(&self) -> bool {
        self.episode2 > 0
    }
}
