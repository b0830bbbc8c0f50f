use super::llm_repository::LlmRepository;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

const MAX_OUTPUT_TOKENS: u32 = 100;

/// OpenAI chat completions implementation of the LLM repository
pub struct OpenAiLlmRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiLlmRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl LlmRepository for OpenAiLlmRepository {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, String> {
        let system_message = ChatCompletionRequestSystemMessageArgs::default()
            .content(system)
            .build()
            .map_err(|e| format!("Invalid system message: {}", e))?;
        let user_message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| format!("Invalid user message: {}", e))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .max_tokens(MAX_OUTPUT_TOKENS)
            .messages([system_message.into(), user_message.into()])
            .build()
            .map_err(|e| format!("Invalid chat request: {}", e))?;

        tracing::debug!(
            model = %self.model,
            prompt_length = prompt.len(),
            "Calling OpenAI chat completions API"
        );

        let response = self.client.chat().create(request).await.map_err(|e| {
            tracing::error!(error = %e, model = %self.model, "OpenAI chat completion failed");
            format!("OpenAI chat error: {}", e)
        })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| "OpenAI response contained no text".to_string())
    }

    fn provider(&self) -> &'static str {
        "openai"
    }
}
