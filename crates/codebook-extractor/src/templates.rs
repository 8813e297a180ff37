//! Ordered free-text regex templates

use crate::config::TextTemplate;
use crate::error::ExtractorError;
use regex::Regex;

/// A raw (name, description) pair captured by a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TemplateMatch<'t> {
    pub template: &'t str,
    pub name: String,
    pub description: String,
    pub min_description: usize,
    pub max_description: usize,
}

#[derive(Debug, Clone)]
struct CompiledTemplate {
    template: TextTemplate,
    regex: Regex,
    name_group: usize,
    description_group: usize,
}

/// Templates compiled once and applied in configuration order
#[derive(Debug, Clone)]
pub(crate) struct TemplateSet {
    templates: Vec<CompiledTemplate>,
}

impl TemplateSet {
    /// Compile every template, failing on the first invalid one
    pub fn compile(templates: &[TextTemplate]) -> Result<Self, ExtractorError> {
        let templates = templates
            .iter()
            .map(compile_template)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { templates })
    }

    /// Apply templates in order; each yields its matches in text order
    pub fn apply<'s>(&'s self, text: &str) -> Vec<TemplateMatch<'s>> {
        let mut matches = Vec::new();
        for compiled in &self.templates {
            for caps in compiled.regex.captures_iter(text) {
                let (Some(name), Some(description)) =
                    (caps.get(compiled.name_group), caps.get(compiled.description_group))
                else {
                    continue;
                };
                matches.push(TemplateMatch {
                    template: &compiled.template.name,
                    name: name.as_str().to_string(),
                    description: description.as_str().to_string(),
                    min_description: compiled.template.min_description,
                    max_description: compiled.template.max_description,
                });
            }
        }
        matches
    }

    /// Number of compiled templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }
}

fn compile_template(template: &TextTemplate) -> Result<CompiledTemplate, ExtractorError> {
    let regex = Regex::new(&template.pattern).map_err(|e| ExtractorError::Template {
        name: template.name.clone(),
        reason: e.to_string(),
    })?;

    let named = |group: &str| regex.capture_names().position(|n| n == Some(group));
    let (name_group, description_group) = match (named("name"), named("description")) {
        (Some(name), Some(description)) => (name, description),
        _ if regex.captures_len() >= 3 => (1, 2),
        _ => {
            return Err(ExtractorError::Template {
                name: template.name.clone(),
                reason: "pattern needs a name and a description capture group".to_string(),
            })
        }
    };

    Ok(CompiledTemplate {
        template: template.clone(),
        regex,
        name_group,
        description_group,
    })
}
