mod formatter;
mod types;

pub use formatter::{format_episode_name, sanitize_title};
pub use types::{FormatOptions, MultiEpisodeMode, NamingScheme};
