use super::types::{FormatOptions, MultiEpisodeMode, NamingScheme};

/// Render a destination basename from episode numbers, title and
/// extension. Pure: equal inputs always produce equal output.
///
/// Examples (pad 2):
///   XxYY, single        -> `1x03 - Our Mrs. Reynolds.mkv`
///   XxYY, range         -> `1x01-02.mkv`
///   SXXEYY, single      -> `S01E03 - Our Mrs. Reynolds.mkv`
///   SXXEYY, join        -> `S01E01E02.mkv`
pub fn format_episode_name(
    opts: &FormatOptions,
    season: u32,
    episode: u32,
    episode2: u32,
    title: &str,
    ext: &str,
) -> String {
    let pad = if opts.pad == 0 { 2 } else { opts.pad };

    let mut numbers = episode_token(opts.scheme, pad, season, episode);

    if episode2 > episode {
        match opts.multi {
            MultiEpisodeMode::Range => {
                numbers.push('-');
                numbers.push_str(&range_end_token(opts.scheme, pad, episode2));
            }
            MultiEpisodeMode::Join => {
                numbers.push_str(&join_token(opts.scheme, pad, episode2));
            }
        }
        // Spans never carry a title
        return format!("{}.{}", numbers, ext);
    }

    let title = sanitize_title(title);
    if title.is_empty() {
        format!("{}.{}", numbers, ext)
    } else {
        format!("{} - {}.{}", numbers, title, ext)
    }
}

fn episode_token(scheme: NamingScheme, pad: usize, season: u32, episode: u32) -> String {
    match scheme {
        // Season is always exactly 2 digits; pad governs the episode only
        NamingScheme::SxxEyy => format!("S{:02}E{:0pad$}", season, episode, pad = pad),
        NamingScheme::LowerSxxEyy => format!("s{:02}e{:0pad$}", season, episode, pad = pad),
        NamingScheme::Xyy => format!("{}{:0pad$}", season, episode, pad = pad),
        NamingScheme::Yy => format!("{:0pad$}", episode, pad = pad),
        NamingScheme::XxYy => format!("{}x{:0pad$}", season, episode, pad = pad),
    }
}

fn range_end_token(scheme: NamingScheme, pad: usize, episode: u32) -> String {
    match scheme {
        NamingScheme::SxxEyy => format!("E{:0pad$}", episode, pad = pad),
        NamingScheme::LowerSxxEyy => format!("e{:0pad$}", episode, pad = pad),
        _ => format!("{:0pad$}", episode, pad = pad),
    }
}

fn join_token(scheme: NamingScheme, pad: usize, episode: u32) -> String {
    match scheme {
        NamingScheme::SxxEyy => format!("E{:0pad$}", episode, pad = pad),
        NamingScheme::LowerSxxEyy => format!("e{:0pad$}", episode, pad = pad),
        _ => format!("x{:0pad$}", episode, pad = pad),
    }
}

/// Strip or substitute characters that are illegal on common
/// filesystems, collapse runs of whitespace, and trim the edges.
pub fn sanitize_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '/' | '\\' | '|' => out.push('-'),
            ':' => out.push_str(" -"),
            '*' | '?' => {}
            '"' => out.push('\''),
            '<' => out.push('('),
            '>' => out.push(')'),
            '\n' | '\r' | '\t' => out.push(' '),
            _ => out.push(c),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_filename;

    fn opts(scheme: NamingScheme, pad: usize, multi: MultiEpisodeMode) -> FormatOptions {
        FormatOptions { scheme, pad, multi }
    }

    #[test]
    fn test_single_episode_schemes() {
        let cases = [
            (NamingScheme::SxxEyy, "S01E03 - Title.mkv"),
            (NamingScheme::LowerSxxEyy, "s01e03 - Title.mkv"),
            (NamingScheme::Xyy, "103 - Title.mkv"),
            (NamingScheme::Yy, "03 - Title.mkv"),
            (NamingScheme::XxYy, "1x03 - Title.mkv"),
        ];

        for (scheme, expected) in cases {
            let o = opts(scheme, 2, MultiEpisodeMode::Range);
            assert_eq!(format_episode_name(&o, 1, 3, 0, "Title", "mkv"), expected);
        }
    }

    #[test]
    fn test_no_title_omits_suffix() {
        let o = opts(NamingScheme::XxYy, 2, MultiEpisodeMode::Range);
        assert_eq!(format_episode_name(&o, 1, 3, 0, "", "mkv"), "1x03.mkv");
        // Titles that sanitize to nothing behave the same
        assert_eq!(format_episode_name(&o, 1, 3, 0, "??", "mkv"), "1x03.mkv");
    }

    #[test]
    fn test_multi_episode_range() {
        let o = opts(NamingScheme::SxxEyy, 2, MultiEpisodeMode::Range);
        assert_eq!(
            format_episode_name(&o, 1, 1, 2, "ignored", "mkv"),
            "S01E01-E02.mkv"
        );

        let o = opts(NamingScheme::XxYy, 2, MultiEpisodeMode::Range);
        assert_eq!(format_episode_name(&o, 1, 1, 2, "", "mkv"), "1x01-02.mkv");

        let o = opts(NamingScheme::LowerSxxEyy, 2, MultiEpisodeMode::Range);
        assert_eq!(format_episode_name(&o, 1, 1, 2, "", "mkv"), "s01e01-e02.mkv");
    }

    #[test]
    fn test_multi_episode_join() {
        let o = opts(NamingScheme::SxxEyy, 2, MultiEpisodeMode::Join);
        assert_eq!(
            format_episode_name(&o, 1, 1, 2, "ignored", "mkv"),
            "S01E01E02.mkv"
        );

        let o = opts(NamingScheme::XxYy, 2, MultiEpisodeMode::Join);
        assert_eq!(format_episode_name(&o, 1, 1, 2, "", "mkv"), "1x01x02.mkv");
    }

    #[test]
    fn test_multi_episode_never_carries_title() {
        let o = opts(NamingScheme::XxYy, 2, MultiEpisodeMode::Range);
        let name = format_episode_name(&o, 1, 1, 2, "Part One + Part Two", "mkv");
        assert_eq!(name, "1x01-02.mkv");
    }

    #[test]
    fn test_pad_zero_defaults_to_two() {
        let o = opts(NamingScheme::XxYy, 0, MultiEpisodeMode::Range);
        assert_eq!(format_episode_name(&o, 1, 3, 0, "", "mkv"), "1x03.mkv");
    }

    #[test]
    fn test_pad_governs_episode_not_season() {
        let o = opts(NamingScheme::SxxEyy, 3, MultiEpisodeMode::Range);
        assert_eq!(format_episode_name(&o, 1, 3, 0, "", "mkv"), "S01E003.mkv");
    }

    #[test]
    fn test_title_sanitization_mapping() {
        assert_eq!(sanitize_title("Who: Goes There"), "Who - Goes There");
        assert_eq!(sanitize_title("a/b\\c|d"), "a-b-c-d");
        assert_eq!(sanitize_title("wait*what?"), "waitwhat");
        assert_eq!(sanitize_title(r#"say "hi""#), "say 'hi'");
        assert_eq!(sanitize_title("<tag>"), "(tag)");
        assert_eq!(sanitize_title("  spaced   out  "), "spaced out");
        assert_eq!(sanitize_title("line\nbreak"), "line break");
    }

    #[test]
    fn test_sanitized_name_has_no_illegal_chars() {
        let o = opts(NamingScheme::XxYy, 2, MultiEpisodeMode::Range);
        let name = format_episode_name(&o, 1, 3, 0, r#"a:b*c?d"e<f>g|h/i"#, "mkv");

        for c in ['\\', '/', ':', '*', '?', '"', '<', '>', '|'] {
            assert!(!name.contains(c), "illegal char {:?} in {:?}", c, name);
        }
    }

    #[test]
    fn test_formatting_deterministic_and_reparseable() {
        let schemes = [
            NamingScheme::SxxEyy,
            NamingScheme::LowerSxxEyy,
            NamingScheme::XxYy,
        ];
        for scheme in schemes {
            for (season, episode, episode2) in [(1, 1, 0), (2, 13, 0), (10, 7, 0), (1, 1, 2), (3, 7, 8)] {
                let o = opts(scheme, 2, MultiEpisodeMode::Range);
                let a = format_episode_name(&o, season, episode, episode2, "T", "mkv");
                let b = format_episode_name(&o, season, episode, episode2, "T", "mkv");
                assert_eq!(a, b);

                // A formatted name parses back to the same numbers
                let parsed = parse_filename(&a, None, None).unwrap();
                assert_eq!(parsed.season, season);
                assert_eq!(parsed.episode, episode);
                assert_eq!(parsed.episode2, episode2);
            }
        }
    }
}
