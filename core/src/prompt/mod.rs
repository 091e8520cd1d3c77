//! Variable resolution and prompt assembly.

mod builder;
mod resolver;
mod template;

pub use builder::{build_prompt, placeholders, unresolved_placeholders};
pub use resolver::{
    resolve_binding, resolve_variables, PlaceholderKind, Resolution, ResolvedVars,
    EMPTY_PLACEHOLDER, NOT_GENERATED_PLACEHOLDER,
};
pub use template::{load_template, template_path};
