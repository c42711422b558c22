use std::path::Path;

/// Internal language tags mapped to Judge0 numeric language ids.
pub const LANGUAGES: &[(&str, u32)] = &[
    ("c", 50),
    ("cpp", 54),
    ("java", 62),
    ("python3", 71),
    ("python", 71),
    ("pypy3", 73),
    ("javascript", 63),
    ("csharp", 51),
    ("go", 60),
    ("rust", 73),
];

pub fn language_id(tag: &str) -> Option<u32> {
    LANGUAGES
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, id)| *id)
}

pub fn supported_languages() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|(name, _)| *name)
}

/// Guess a language tag from a source file name, e.g. `main.py` -> `python3`.
pub fn from_path(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    let tag = match ext {
        "c" => "c",
        "cc" | "cpp" | "cxx" => "cpp",
        "java" => "java",
        "py" => "python3",
        "js" | "mjs" => "javascript",
        "cs" => "csharp",
        "go" => "go",
        "rs" => "rust",
        _ => return None,
    };
    Some(tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn every_tag_has_an_id() {
        for (tag, _) in LANGUAGES {
            assert!(language_id(tag).is_some(), "no id for {tag}");
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(language_id("cobol"), None);
        assert_eq!(language_id(""), None);
        assert_eq!(language_id("Python3"), None);
    }

    #[test]
    fn supported_languages_matches_catalog() {
        let tags: Vec<_> = supported_languages().collect();
        assert_eq!(tags.len(), LANGUAGES.len());
        assert!(tags.contains(&"python3"));
        assert!(tags.contains(&"rust"));
    }

    #[test]
    fn infers_tag_from_extension() {
        assert_eq!(from_path(&PathBuf::from("main.py")).as_deref(), Some("python3"));
        assert_eq!(from_path(&PathBuf::from("a/b/sol.cc")).as_deref(), Some("cpp"));
        assert_eq!(from_path(&PathBuf::from("x.rs")).as_deref(), Some("rust"));
        assert_eq!(from_path(&PathBuf::from("Makefile")), None);
        assert_eq!(from_path(&PathBuf::from("notes.txt")), None);
    }
}
