use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use directories::BaseDirs;

use crate::language::Toolchain;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let config_path = default_config_path();
        let mut cfg = Self::from_file(&config_path);

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                cfg.inner.insert(k, v);
            }
        }

        cfg
    }

    /// Defaults overlaid with the `KEY=VALUE` lines of `path`, without the environment.
    pub fn from_file(path: &Path) -> Self {
        let mut map = default_map();

        if path.exists() {
            if let Ok(file) = fs::File::open(path) {
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

        Self { inner: map, config_path: path.to_path_buf() }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    /// CLI flags land here, after file and environment.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).filter(|v| !v.is_empty()).map(PathBuf::from)
    }

    pub fn report_path(&self) -> PathBuf {
        self.get_path("SNIPCHECK_REPORT_PATH")
            .unwrap_or_else(|| PathBuf::from("report.json"))
    }

    /// `None` means a fresh temporary directory per run.
    pub fn work_dir(&self) -> Option<PathBuf> {
        self.get_path("SNIPCHECK_WORK_DIR")
    }

    /// `0` or unset disables the limit.
    pub fn exec_timeout(&self) -> Option<Duration> {
        self.get_u64("SNIPCHECK_EXEC_TIMEOUT")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn skip_install(&self) -> bool {
        self.get_bool("SNIPCHECK_SKIP_INSTALL")
    }

    pub fn toolchain(&self) -> Toolchain {
        let get = |key: &str, fallback: &str| self.get(key).unwrap_or_else(|| fallback.to_string());
        Toolchain {
            python: get("SNIPCHECK_PYTHON", "python3"),
            node: get("SNIPCHECK_NODE", "node"),
            javac: get("SNIPCHECK_JAVAC", "javac"),
            java: get("SNIPCHECK_JAVA", "java"),
            cc: get("SNIPCHECK_CC", "gcc"),
            cxx: get("SNIPCHECK_CXX", "g++"),
            pip: get("SNIPCHECK_PIP", "pip"),
            npm: get("SNIPCHECK_NPM", "npm"),
        }
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "SNIPCHECK_PYTHON",
        "SNIPCHECK_NODE",
        "SNIPCHECK_JAVAC",
        "SNIPCHECK_JAVA",
        "SNIPCHECK_CC",
        "SNIPCHECK_CXX",
        "SNIPCHECK_PIP",
        "SNIPCHECK_NPM",
        "SNIPCHECK_REPORT_PATH",
        "SNIPCHECK_WORK_DIR",
        "SNIPCHECK_EXEC_TIMEOUT",
        "SNIPCHECK_SKIP_INSTALL",
        "SNIPCHECK_MODE",
    ];

    // Accept unknown SNIPCHECK_* keys for forward-compat
    KEYS.contains(&k) || k.starts_with("SNIPCHECK_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("snipcheck").join(".snipcheckrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Toolchains
    m.insert("SNIPCHECK_PYTHON".into(), "python3".into());
    m.insert("SNIPCHECK_NODE".into(), "node".into());
    m.insert("SNIPCHECK_JAVAC".into(), "javac".into());
    m.insert("SNIPCHECK_JAVA".into(), "java".into());
    m.insert("SNIPCHECK_CC".into(), "gcc".into());
    m.insert("SNIPCHECK_CXX".into(), "g++".into());
    m.insert("SNIPCHECK_PIP".into(), "pip".into());
    m.insert("SNIPCHECK_NPM".into(), "npm".into());

    // Paths
    m.insert("SNIPCHECK_REPORT_PATH".into(), "report.json".into());

    // Numbers
    m.insert("SNIPCHECK_EXEC_TIMEOUT".into(), "0".into());

    // Bools as strings
    m.insert("SNIPCHECK_SKIP_INSTALL".into(), "false".into());

    m.insert("SNIPCHECK_MODE".into(), "expected".into());

    m
}
