use crate::config::Config;
use crate::rename::{MultiEpisodeMode, NamingScheme};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tvrn")]
#[command(author, version, about, long_about = None)]
#[command(about = "Rename TV episode files using TheTVDB metadata")]
pub struct Args {
    /// Season directory to process (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Naming scheme: SXXEYY, sXXeYY, XYY, YY or XxYY
    #[arg(long, value_name = "SCHEME")]
    pub scheme: Option<String>,

    /// Episode number digit count
    #[arg(long, value_name = "N")]
    pub pad: Option<usize>,

    /// Episode ordering: aired, abs, alt or altdvd
    #[arg(long, value_name = "ORDER")]
    pub order: Option<String>,

    /// Metadata language (two-letter code)
    #[arg(long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Multi-episode rendering: range or join
    #[arg(long, value_name = "MODE")]
    pub multi: Option<String>,

    /// Override the season inferred from the directory name
    #[arg(long, value_name = "N")]
    pub season: Option<u32>,

    /// Treat the target as a series root and process its season directories
    #[arg(long)]
    pub series: bool,

    /// Show per-file season/episode details in the preview
    #[arg(long)]
    pub detailed: bool,

    /// Bypass the response cache for this run
    #[arg(long)]
    pub no_cache: bool,

    /// Apply without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Lay the flags over the environment-derived configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(scheme) = &self.scheme {
            config.scheme = NamingScheme::parse(scheme);
        }
        if let Some(pad) = self.pad {
            config.pad = pad;
        }
        if let Some(order) = &self.order {
            config.order = order.clone();
        }
        if let Some(lang) = &self.lang {
            config.lang = lang.clone();
        }
        if let Some(multi) = &self.multi {
            config.multi = MultiEpisodeMode::parse(multi);
        }
        if self.yes {
            // -y answers the prompt, so strictness no longer matters
            config.strict_confirm = false;
        }
    }

    pub fn target(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
