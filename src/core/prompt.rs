use crate::core::OutputFormat;
use crate::utils::error::{MenuAgentError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-001";

const DATA_MENU_TEMPLATE: &str = r#"
You are acting as a helpful AI assistant named Walt that can answer
questions about the food available on the menu at Walt's Burgers.

Answer this customer's question, in a concise and helpful manner,
as long as it is about food on the menu or something harmless like sports.
Use the tools available to answer food and menu questions.
DO NOT INVENT ITEMS NOT ON THE MENU.

Question:
{{question}} ?
"#;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap())
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    pub name: String,
    pub model: String,
    pub template: String,
    pub input_variables: Vec<String>,
    pub tools: Vec<String>,
    pub output_format: OutputFormat,
}

impl PromptTemplate {
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        let template = template.into();
        let input_variables = placeholders(&template);
        Self {
            name: name.into(),
            model: model.into(),
            template,
            input_variables,
            tools: Vec::new(),
            output_format: OutputFormat::Text,
        }
    }

    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.tools = tools;
        self
    }

    /// The `dataMenu` prompt answering customer questions about the menu.
    pub fn data_menu(model: impl Into<String>) -> Self {
        Self::new("dataMenu", model, DATA_MENU_TEMPLATE)
            .with_tools(vec![crate::core::tools::MENU_TOOL_NAME.to_string()])
    }

    /// Same tools and model as `data_menu`, instruction text read from a file.
    pub fn data_menu_from_file<P: AsRef<Path>>(model: impl Into<String>, path: P) -> Result<Self> {
        let template = std::fs::read_to_string(&path).map_err(|e| MenuAgentError::PromptError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;

        let prompt = Self::data_menu(model);
        let prompt = Self {
            input_variables: placeholders(&template),
            template,
            ..prompt
        };

        // The flow only ever supplies the question.
        if prompt.input_variables != ["question"] {
            return Err(MenuAgentError::PromptError {
                message: format!(
                    "template {} must use exactly one placeholder, {{{{question}}}}, found [{}]",
                    path.as_ref().display(),
                    prompt.input_variables.join(", ")
                ),
            });
        }
        Ok(prompt)
    }

    pub fn render(&self, vars: &HashMap<&str, &str>) -> Result<String> {
        if let Some(missing) = self
            .input_variables
            .iter()
            .find(|name| !vars.contains_key(name.as_str()))
        {
            return Err(MenuAgentError::PromptError {
                message: format!("prompt '{}' is missing input '{}'", self.name, missing),
            });
        }

        let rendered = placeholder_regex().replace_all(&self.template, |caps: &regex::Captures| {
            vars.get(&caps[1]).copied().unwrap_or_default().to_string()
        });
        Ok(rendered.into_owned())
    }

    pub fn render_question(&self, question: &str) -> Result<String> {
        self.render(&HashMap::from([("question", question)]))
    }
}

fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in placeholder_regex().captures_iter(template) {
        let name = caps[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
