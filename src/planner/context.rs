use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

// "Season 1", "season 01", "s2", "Specials"
static SEASON_DIR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:s(?:eason)?\s*0*(\d+)|specials)$").unwrap());

// Trailing "(2002)" year marker on a series directory name
static YEAR_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\((\d{4})\)\s*$").unwrap());

/// Series identity and season scope inferred from directory naming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirContext {
    pub series_name: String,
    /// `None` for a specials directory or when no convention matched
    pub season_hint: Option<u32>,
    pub year_hint: Option<u32>,
}

/// Whether a basename follows the "Season N"/"Specials" convention.
/// Series-mode discovery and context inference share this so any
/// directory one of them recognizes, the other does too.
pub fn is_season_dir(name: &str) -> bool {
    SEASON_DIR_REGEX.is_match(name)
}

/// Derive the series name and season from the target directory's
/// basename and its parent, per the "Season N"/"Specials" convention.
pub fn infer_context(root: &Path) -> DirContext {
    let base = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let parent = root
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let (mut series_name, season_hint) = match SEASON_DIR_REGEX.captures(&base) {
        Some(captures) => {
            let season = captures.get(1).and_then(|m| m.as_str().parse().ok());
            (parent, season)
        }
        None => (base, None),
    };

    let mut year_hint = None;
    if let Some(captures) = YEAR_SUFFIX_REGEX.captures(&series_name) {
        year_hint = captures.get(1).and_then(|m| m.as_str().parse().ok());
        let stripped_len = captures.get(0).map(|m| m.start()).unwrap_or(0);
        series_name.truncate(stripped_len);
        series_name = series_name.trim().to_string();
    }

    DirContext {
        series_name,
        season_hint,
        year_hint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_season_directory_uses_parent_name() {
        let ctx = infer_context(&PathBuf::from("/media/Firefly (2002)/Season 01"));

        assert_eq!(ctx.series_name, "Firefly");
        assert_eq!(ctx.season_hint, Some(1));
        assert_eq!(ctx.year_hint, Some(2002));
    }

    #[test]
    fn test_short_season_forms() {
        let ctx = infer_context(&PathBuf::from("/media/Show/s2"));
        assert_eq!(ctx.season_hint, Some(2));
        assert_eq!(ctx.series_name, "Show");

        let ctx = infer_context(&PathBuf::from("/media/Show/season12"));
        assert_eq!(ctx.season_hint, Some(12));
    }

    #[test]
    fn test_specials_directory_has_no_season_filter() {
        let ctx = infer_context(&PathBuf::from("/media/Firefly/Specials"));

        assert_eq!(ctx.series_name, "Firefly");
        assert_eq!(ctx.season_hint, None);
    }

    #[test]
    fn test_plain_directory_is_its_own_series() {
        let ctx = infer_context(&PathBuf::from("/media/Firefly"));

        assert_eq!(ctx.series_name, "Firefly");
        assert_eq!(ctx.season_hint, None);
        assert_eq!(ctx.year_hint, None);
    }

    #[test]
    fn test_year_hint_stripped_from_lookup_name() {
        let ctx = infer_context(&PathBuf::from("/media/Battlestar Galactica (2003)"));

        assert_eq!(ctx.series_name, "Battlestar Galactica");
        assert_eq!(ctx.year_hint, Some(2003));
    }

    #[test]
    fn test_season_dir_recognition_matches_inference() {
        for name in ["Season 01", "season 1", "s2", "season01", "Specials", "specials"] {
            assert!(is_season_dir(name), "{:?} should be recognized", name);
        }
        for name in ["extras", "Firefly", "Season", "s"] {
            assert!(!is_season_dir(name), "{:?} should not be recognized", name);
        }
    }

    #[test]
    fn test_parenthesized_non_year_kept() {
        let ctx = infer_context(&PathBuf::from("/media/Show (UK)"));

        assert_eq!(ctx.series_name, "Show (UK)");
        assert_eq!(ctx.year_hint, None);
    }
}
