//! Prompt System - Role templates, overrides and rendering
//!
//! Every role renders two templates: `<role>.system` (the role instruction) and
//! `<role>.user` (the task payload). Built-in defaults live in [`templates`];
//! a prompts directory may override any of them.

mod loader;
mod render;
pub mod templates;

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::roles::Role;

pub use loader::PromptLoader;
pub use render::PromptRenderer;

/// A rendered system instruction and user payload for one inference call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePrompt {
    pub system: String,
    pub user: String,
}

/// The complete set of role templates used by a run.
pub struct PromptSet {
    renderer: PromptRenderer,
}

impl PromptSet {
    /// Templates compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let mut renderer = PromptRenderer::new();
        for (name, template) in templates::BUILTIN_TEMPLATES {
            renderer.register_template(name, template)?;
        }
        Ok(Self { renderer })
    }

    /// Built-in templates, with any `<name>.md` file in `dir` taking precedence.
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let loader = PromptLoader::new(dir);
        let present = loader.names()?;
        for name in &present {
            if !templates::BUILTIN_TEMPLATES.iter().any(|(known, _)| *known == name.as_str()) {
                log::warn!("Ignoring unknown prompt template {}/{}.md", dir.display(), name);
            }
        }

        let mut renderer = PromptRenderer::new();
        for (name, builtin) in templates::BUILTIN_TEMPLATES {
            match loader.read_override(name)? {
                Some(custom) => {
                    log::info!("Using prompt override {}/{}.md", dir.display(), name);
                    renderer.register_template(name, &custom)?;
                }
                None => renderer.register_template(name, builtin)?,
            }
        }

        Ok(Self { renderer })
    }

    /// Render the system instruction and user payload for a role.
    pub fn render<T: Serialize>(&self, role: Role, context: &T) -> Result<RolePrompt> {
        Ok(RolePrompt {
            system: self.renderer.render_named(&format!("{}.system", role), context)?,
            user: self.renderer.render_named(&format!("{}.user", role), context)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_planner_prompt() {
        let prompts = PromptSet::builtin().unwrap();
        let prompt = prompts
            .render(Role::Planner, &serde_json::json!({ "request": "build a hello-world CLI" }))
            .unwrap();

        assert!(prompt.system.contains("directives"));
        assert!(prompt.user.contains("build a hello-world CLI"));
    }

    #[test]
    fn test_builtin_worker_prompt_fences_current_content() {
        let prompts = PromptSet::builtin().unwrap();
        let context = serde_json::json!({
            "language": "Python",
            "checklist": "- [ ] `main.py` prints hello world",
            "task": "`main.py` prints hello world",
            "artifact": "main.py",
            "fence_tag": "python",
            "current_content": "print('hi')",
        });
        let prompt = prompts.render(Role::Worker, &context).unwrap();

        assert!(prompt.system.contains("**Python** engineer"));
        assert!(prompt.user.contains("```python\nprint('hi')\n```"));
        assert!(prompt.user.contains("## Target file: `main.py`"));
    }

    #[test]
    fn test_overrides_replace_only_named_templates() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("planner.system.md"), "Custom planner for {{request}}").unwrap();
        fs::write(dir.path().join("unrelated.md"), "ignored").unwrap();

        let prompts = PromptSet::with_overrides(dir.path()).unwrap();
        let prompt = prompts
            .render(Role::Planner, &serde_json::json!({ "request": "a todo app" }))
            .unwrap();

        assert_eq!(prompt.system, "Custom planner for a todo app");
        assert!(prompt.user.contains("a todo app"));
        assert!(prompt.user.starts_with("Development request"));
    }

    #[test]
    fn test_overrides_missing_dir_is_error() {
        let result = PromptSet::with_overrides(Path::new("/nonexistent/prompts"));
        assert!(result.is_err());
    }
}
