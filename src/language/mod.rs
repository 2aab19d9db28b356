//! Language registry: supported languages, file extensions, and typed invocations.

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    sync::OnceLock,
};

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    Java,
    C,
    Cpp,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Python,
        Language::JavaScript,
        Language::Java,
        Language::C,
        Language::Cpp,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::JavaScript => "js",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
        }
    }

    /// File name a block's source is written to inside its own directory.
    ///
    /// Java sources are named after their first public class so `javac` accepts them.
    pub fn source_file_name(self, source: &str) -> String {
        match self {
            Language::Java => format!("{}.java", java_class_name(source)),
            other => format!("snippet.{}", other.extension()),
        }
    }

    /// Build the typed invocation for a materialized source file.
    pub fn invocation(self, toolchain: &Toolchain, file: &SourceFile) -> Invocation {
        match self {
            Language::Python => Invocation::Hosted {
                interpreter: toolchain.python.clone(),
            },
            Language::JavaScript => Invocation::Interpreted {
                run: CommandLine::new(&toolchain.node).arg(&file.path),
            },
            Language::Java => Invocation::CompileThenRun {
                compile: CommandLine::new(&toolchain.javac)
                    .arg("-d")
                    .arg(&file.dir)
                    .arg(&file.path),
                run: CommandLine::new(&toolchain.java)
                    .arg("-cp")
                    .arg(&file.dir)
                    .arg(&file.class_name),
            },
            Language::C | Language::Cpp => {
                let compiler = if self == Language::C { &toolchain.cc } else { &toolchain.cxx };
                Invocation::CompileThenRun {
                    compile: CommandLine::new(compiler)
                        .arg(&file.path)
                        .arg("-o")
                        .arg(&file.artifact),
                    run: CommandLine::new(&file.artifact),
                }
            }
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "python3" | "py" => Ok(Language::Python),
            "javascript" | "js" | "node" => Ok(Language::JavaScript),
            "java" => Ok(Language::Java),
            "c" => Ok(Language::C),
            "cpp" | "c++" | "cc" => Ok(Language::Cpp),
            _ => Err(Error::UnsupportedLanguage(s.trim().to_string())),
        }
    }
}

/// Look up a language identifier (case-insensitive, trimmed).
pub fn resolve(identifier: &str) -> Result<Language> {
    identifier.parse()
}

/// Executables used to run and install for each language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub python: String,
    pub node: String,
    pub javac: String,
    pub java: String,
    pub cc: String,
    pub cxx: String,
    pub pip: String,
    pub npm: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            python: "python3".into(),
            node: "node".into(),
            javac: "javac".into(),
            java: "java".into(),
            cc: "gcc".into(),
            cxx: "g++".into(),
            pip: "pip".into(),
            npm: "npm".into(),
        }
    }
}

/// A code block written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub dir: PathBuf,
    pub path: PathBuf,
    /// Compiled artifact for C/C++.
    pub artifact: PathBuf,
    /// Entry class for Java; the file stem otherwise.
    pub class_name: String,
}

impl SourceFile {
    pub fn new(dir: &Path, file_name: &str) -> Self {
        let path = dir.join(file_name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snippet".to_string());
        let artifact = dir.join(format!("{}{}", stem, std::env::consts::EXE_SUFFIX));
        Self {
            dir: dir.to_path_buf(),
            path,
            artifact,
            class_name: stem,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for a in &self.args {
            write!(f, " {}", a.to_string_lossy())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Run inside the hosted interpreter with in-memory stdout and scripted `input()`.
    Hosted { interpreter: String },
    Interpreted { run: CommandLine },
    /// `run` only executes when `compile` exits successfully.
    CompileThenRun { compile: CommandLine, run: CommandLine },
}

fn java_class_name(source: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"public\s+(?:(?:final|abstract|static)\s+)*class\s+([A-Za-z_$][A-Za-z0-9_$]*)")
            .expect("valid class regex")
    });
    re.captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "Main".to_string())
}
