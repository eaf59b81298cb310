//! Target implementation language for a run.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    #[value(name = "javascript")]
    JavaScript,
    Go,
    #[serde(rename = "html-css", alias = "html")]
    #[value(name = "html-css", alias = "html")]
    HtmlCss,
    Ruby,
    #[value(name = "typescript")]
    TypeScript,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::Python,
        Language::JavaScript,
        Language::Go,
        Language::HtmlCss,
        Language::Ruby,
        Language::TypeScript,
    ];

    /// Name shown to the model and the user
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::Go => "Go",
            Language::HtmlCss => "HTML/CSS",
            Language::Ruby => "Ruby",
            Language::TypeScript => "TypeScript",
        }
    }

    /// Info string for fenced code blocks
    pub fn fence_tag(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Go => "go",
            Language::HtmlCss => "html",
            Language::Ruby => "ruby",
            Language::TypeScript => "typescript",
        }
    }

    /// A typical entry-point file, used as an example in the manager prompt
    pub fn example_file(&self) -> &'static str {
        match self {
            Language::Python => "main.py",
            Language::JavaScript => "index.js",
            Language::Go => "main.go",
            Language::HtmlCss => "index.html",
            Language::Ruby => "main.rb",
            Language::TypeScript => "index.ts",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
