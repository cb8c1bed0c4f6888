use crate::core::prompt::PromptTemplate;
use crate::core::tools::ToolRegistry;
use crate::core::{
    AnswerOutput, CompletionClient, CompletionRequest, GenerationSettings, Message, Part,
    QuestionInput,
};
use crate::utils::error::{MenuAgentError, Result};

pub const FLOW_NAME: &str = "menuQuestion";
pub const DEFAULT_MAX_TOOL_TURNS: usize = 5;

/// Answers one customer question with a single prompt execution.
pub struct MenuQuestionFlow<C: CompletionClient> {
    client: C,
    prompt: PromptTemplate,
    tools: ToolRegistry,
    generation: GenerationSettings,
    max_tool_turns: usize,
}

impl<C: CompletionClient> MenuQuestionFlow<C> {
    pub fn new(client: C, prompt: PromptTemplate, tools: ToolRegistry) -> Result<Self> {
        // Fail at startup rather than on the first request.
        tools.declarations_for(&prompt.tools)?;

        Ok(Self {
            client,
            prompt,
            tools,
            generation: GenerationSettings::default(),
            max_tool_turns: DEFAULT_MAX_TOOL_TURNS,
        })
    }

    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_max_tool_turns(mut self, max_tool_turns: usize) -> Self {
        self.max_tool_turns = max_tool_turns;
        self
    }

    pub fn prompt(&self) -> &PromptTemplate {
        &self.prompt
    }

    pub async fn run(&self, input: QuestionInput) -> Result<AnswerOutput> {
        let rendered = self.prompt.render_question(&input.question)?;

        let mut request = CompletionRequest {
            model: self.prompt.model.clone(),
            messages: vec![Message::user(rendered)],
            tools: self.tools.declarations_for(&self.prompt.tools)?,
            output_format: self.prompt.output_format,
            generation: self.generation.clone(),
        };

        let mut turn = 0;
        loop {
            let response = self.client.generate(&request).await?;
            let tool_requests = response.tool_requests();

            if tool_requests.is_empty() {
                tracing::debug!(
                    "Flow '{}' finished after {} tool turn(s), finish reason {:?}",
                    FLOW_NAME,
                    turn,
                    response.finish_reason
                );
                return Ok(AnswerOutput {
                    answer: response.text(),
                });
            }

            if turn >= self.max_tool_turns {
                return Err(MenuAgentError::ToolLoopExceeded {
                    max_turns: self.max_tool_turns,
                });
            }
            turn += 1;

            let mut tool_parts = Vec::with_capacity(tool_requests.len());
            for call in tool_requests {
                // Only tools the prompt declared are callable.
                if !self.prompt.tools.contains(&call.name) {
                    return Err(MenuAgentError::UnknownToolError { name: call.name });
                }
                let output = self.tools.invoke(&call.name, call.input).await?;
                tool_parts.push(Part::ToolResponse {
                    name: call.name,
                    output,
                });
            }

            request.messages.push(response.message);
            request.messages.push(Message::tool(tool_parts));
        }
    }
}
