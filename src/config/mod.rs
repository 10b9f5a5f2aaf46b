//! Configuration management for ragprep.

mod prompts;
mod settings;

pub use prompts::{Prompts, StructurePrompts};
pub use settings::{
    AdapterSettings, BatchSettings, GeneralSettings, PromptSettings, RulesSettings, Settings,
};
