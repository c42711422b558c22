use std::{
    collections::HashMap,
    env, fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(default_config_path())
    }

    /// Defaults, overlaid with `key=value` lines from the rc file, overlaid
    /// with environment variables (which take precedence).
    pub fn load_from(config_path: PathBuf) -> Self {
        let mut map = default_map();

        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.parse::<f64>().ok())
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "JUDGE_API_URL",
        "JUDGE_API_KEY",
        "REQUEST_TIMEOUT",
        "POLL_INTERVAL_MS",
        "MAX_POLLS",
        "CPU_TIME_LIMIT",
        "WALL_TIME_LIMIT",
        "DEFAULT_LANGUAGE",
    ];

    KEYS.contains(&k) || k.starts_with("JRUN_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("jrun").join(".jrunrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Poll tuning
    m.insert("REQUEST_TIMEOUT".into(), "60".into());
    m.insert("POLL_INTERVAL_MS".into(), "1000".into());
    m.insert("MAX_POLLS".into(), "60".into());

    // Submission resource limits (seconds)
    m.insert("CPU_TIME_LIMIT".into(), "10".into());
    m.insert("WALL_TIME_LIMIT".into(), "15".into());

    m.insert("DEFAULT_LANGUAGE".into(), "python3".into());

    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_present_without_a_file() {
        let cfg = Config::load_from(PathBuf::from("/nonexistent/.jrunrc"));
        assert_eq!(cfg.get_u64("MAX_POLLS"), Some(60));
        assert_eq!(cfg.get_u64("POLL_INTERVAL_MS"), Some(1000));
        assert_eq!(cfg.get_f64("CPU_TIME_LIMIT"), Some(10.0));
        assert_eq!(cfg.get_f64("WALL_TIME_LIMIT"), Some(15.0));
        assert_eq!(cfg.get("DEFAULT_LANGUAGE").as_deref(), Some("python3"));
    }

    #[test]
    fn rc_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".jrunrc");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "# poll faster").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "MAX_POLLS = 30").unwrap();
        writeln!(f, "JUDGE_API_URL=http://judge.local:2358").unwrap();

        let cfg = Config::load_from(path);
        assert_eq!(cfg.get_u64("MAX_POLLS"), Some(30));
        assert_eq!(
            cfg.get("JUDGE_API_URL").as_deref(),
            Some("http://judge.local:2358")
        );
        // untouched defaults survive
        assert_eq!(cfg.get_u64("POLL_INTERVAL_MS"), Some(1000));
    }

    #[test]
    fn unparsable_numbers_fall_through_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".jrunrc");
        fs::write(&path, "MAX_POLLS=plenty\n").unwrap();

        let cfg = Config::load_from(path);
        assert_eq!(cfg.get_u64("MAX_POLLS"), None);
    }
}
