//! Narrative generator adapters.

mod template;

pub use template::{friendly_name, TemplateNarrator, DECISION_SUPPORT_CAVEAT};
