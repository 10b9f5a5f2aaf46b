//! Prompt templates for ragprep.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    /// Prompts for restructuring a transcript into a RAG source document.
    pub structure: StructurePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// Prompts for transcript restructuring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructurePrompts {
    pub system: String,
    pub user: String,
}

impl Default for StructurePrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a knowledge-base curator. Your mission is to adapt raw video transcripts into high-quality RAG (Retrieval-Augmented Generation) source documents.

You always produce strict Markdown with this structure, in order:

1. A title line: # RAG Source: <document title>

2. A metadata block:
## Document Metadata
- **ID:** [create a short ID, e.g. LIVE-00X]
- **Transcription Date:** <provided>
- **Event Date:** <provided>
- **Main Subject:** [2-3 central themes]
- **Target Audience:** [who this content serves]
- **Key Terminology:** [5-7 comma-separated keywords]

3. Thematic sections. Split the text into logical sections using:
### [Section Title]
**Tags:** #[Tag1] #[Tag2]
[Structured content, cleaned of speech fillers, focused on principles and strategies]

Critical rules:
- Keep the content deep; do not over-summarize.
- Remove speech redundancies (repeated greetings, noise, filler).
- Preserve the speaker's terminology exactly as written in the transcript."#
                .to_string(),

            user: r#"Adapt this video transcript into a RAG source document.

Document title: {{title}}
Transcription date: {{current_date}}
Event date: {{event_date}}
Original file: {{filename}}

CONTENT:
{{transcript}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let structure_path = custom_path.join("structure.toml");
            if structure_path.exists() {
                let content = std::fs::read_to_string(&structure_path)?;
                prompts.structure = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
