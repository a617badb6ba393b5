/// Templates module for embedded YAML templates

/// Get the default gitdeploy.yaml template content
/// The template is embedded at compile time using include_str! macro
pub fn get_config_template() -> &'static str {
    include_str!("../../templates/gitdeploy.yaml")
}

/// Template replacement functionality
pub struct TemplateProcessor;

impl TemplateProcessor {
    /// Create a new template processor
    pub fn new() -> Self {
        Self
    }

    /// Replace `{{key}}` placeholders with the given values.
    /// Unknown placeholders are left in place.
    pub fn process(&self, template: &str, replacements: &[(&str, &str)]) -> String {
        replacements
            .iter()
            .fold(template.to_string(), |acc, (key, value)| {
                acc.replace(&format!("{{{{{}}}}}", key), value)
            })
    }

    /// Render the default gitdeploy.yaml for the given remote and branch.
    /// Both placeholders sit inside single-quoted YAML scalars.
    pub fn render_config(&self, remote_url: &str, branch: &str) -> String {
        let remote_url = single_quoted_content(remote_url);
        let branch = single_quoted_content(branch);
        self.process(
            get_config_template(),
            &[("remote_url", remote_url.as_str()), ("branch", branch.as_str())],
        )
    }
}

/// Body of a single-quoted YAML scalar; `'` is the only character to escape
fn single_quoted_content(value: &str) -> String {
    value.replace('\'', "''")
}

impl Default for TemplateProcessor {
    fn default() -> Self {
        Self::new()
    }
}
