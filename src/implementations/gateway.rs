use std::sync::Arc;

use log::{ debug, error, info, warn };

use crate::config::MigrationOptions;
use crate::implementations::java_syntax;
use crate::models::conversation::{ ChatMessage, ExpectedOutput, GenerationRequest, Role };
use crate::traits::oracle::TextOracle;

const CONTENT_TRUNCATED: &str = "...\n[Content truncated due to length]";

/// Wraps the oracle with prompt budgeting, reply extraction and stricter retries.
///
/// A query never fails hard: running out of attempts yields `None` and the
/// caller chooses what to do next.
pub struct OracleGateway {
    oracle: Arc<dyn TextOracle>,
    max_prompt_chars: usize,
    max_attempts: usize,
}

impl OracleGateway {
    pub fn new(oracle: Arc<dyn TextOracle>, options: &MigrationOptions) -> Self {
        Self::with_limits(oracle, options.max_prompt_chars, options.gateway_attempts)
    }

    pub fn with_limits(oracle: Arc<dyn TextOracle>, max_prompt_chars: usize, max_attempts: usize) -> Self {
        Self {
            oracle,
            max_prompt_chars,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn model(&self) -> &str {
        self.oracle.model()
    }

    /// Ask for one artifact. Returns the extracted text, or `None` when every attempt
    /// failed or produced an unusable reply.
    pub async fn query(&self, prompt: &str, system_instructions: &str, expected: &ExpectedOutput) -> Option<String> {
        let mut conversation: Vec<ChatMessage> = Vec::new();
        let mut rejected: Option<String> = None;

        for attempt_index in 0..self.max_attempts {
            let primary_instruction = if attempt_index == 0 {
                self.prepare_prompt(prompt)
            } else {
                self.prepare_prompt(&strict_prompt(prompt, expected))
            };
            let request = GenerationRequest {
                primary_instruction,
                system_instructions: system_instructions.to_string(),
                attempt_index,
            };

            conversation = next_conversation(conversation, rejected.take(), &request, expected);
            debug!(
                "Oracle attempt {}/{} with {} messages ({} prompt characters)",
                attempt_index + 1,
                self.max_attempts,
                conversation.len(),
                request.primary_instruction.len()
            );

            let reply = match self.oracle.generate(&conversation).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!("Oracle call failed on attempt {}/{}: {}", attempt_index + 1, self.max_attempts, e);
                    continue;
                }
            };
            debug!("Oracle reply length: {} characters", reply.len());

            match extract(&reply, expected) {
                Some(text) => {
                    info!("Oracle produced {} on attempt {}", expected.describe(), attempt_index + 1);
                    return Some(text);
                }
                None => {
                    warn!(
                        "Oracle reply rejected on attempt {}/{}; retrying with stricter instructions",
                        attempt_index + 1,
                        self.max_attempts
                    );
                    rejected = Some(reply);
                }
            }
        }

        error!("No usable oracle reply after {} attempts", self.max_attempts);
        None
    }

    /// Keep the prompt inside the character budget
    pub fn prepare_prompt(&self, prompt: &str) -> String {
        if prompt.len() <= self.max_prompt_chars {
            return prompt.to_string();
        }

        warn!(
            "Prompt too long ({} characters, limit {}); condensing",
            prompt.len(),
            self.max_prompt_chars
        );

        match condense_prompt(prompt) {
            Some(condensed) =>
                java_syntax::truncate_with_marker(&condensed, self.max_prompt_chars, CONTENT_TRUNCATED),
            None => java_syntax::truncate_with_marker(prompt, self.max_prompt_chars, CONTENT_TRUNCATED),
        }
    }
}

/// Replace the first fenced code block with its skeleton, keeping the prose around it
fn condense_prompt(prompt: &str) -> Option<String> {
    let open = prompt.find("```")?;
    let after_open = &prompt[open + 3..];
    let body_start = after_open.find('\n')? + 1;
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    let language = after_open[..body_start].trim();

    let before = &prompt[..open];
    let code = &body[..close];
    let after = &body[close + 3..];

    Some(
        format!(
            "{}```{}\n{}\n```{}\n\nNote: the code above was condensed to fit the request size limit. \
             Reconstruct the full implementation from the structure shown.",
            before,
            language,
            java_syntax::condense_java(code),
            after
        )
    )
}

fn strict_prompt(prompt: &str, expected: &ExpectedOutput) -> String {
    format!(
        "{}\n\nIMPORTANT: Respond with ONLY {}. Do not include any explanations, apologies, \
         commentary or markdown outside a single code block.",
        prompt,
        expected.describe()
    )
}

fn corrective_instruction(expected: &ExpectedOutput) -> String {
    format!(
        "Your previous response could not be used. It must contain ONLY {}, with no explanatory text.",
        expected.describe()
    )
}

/// Conversation for the next attempt, built from the previous one by value.
///
/// The previous prompt turn is dropped, the rejected reply and a corrective
/// instruction are appended, then the new prompt.
fn next_conversation(
    previous: Vec<ChatMessage>,
    rejected: Option<String>,
    request: &GenerationRequest,
    expected: &ExpectedOutput
) -> Vec<ChatMessage> {
    if previous.is_empty() {
        return vec![
            ChatMessage::system(request.system_instructions.clone()),
            ChatMessage::user(request.primary_instruction.clone())
        ];
    }

    let mut next = previous;
    if let Some(last_user) = next.iter().rposition(|m| m.role == Role::User) {
        next.remove(last_user);
    }
    if let Some(reply) = rejected {
        next.push(ChatMessage::assistant(reply));
    }
    next.push(
        ChatMessage::user(
            format!("{}\n\n{}", corrective_instruction(expected), request.primary_instruction)
        )
    );
    next
}

/// Pull the usable artifact out of a raw oracle reply
pub fn extract(reply: &str, expected: &ExpectedOutput) -> Option<String> {
    if reply.trim().is_empty() {
        return None;
    }
    if java_syntax::starts_with_explanation(reply) {
        warn!("Reply opens with explanatory text; rejecting");
        return None;
    }

    match expected {
        ExpectedOutput::Json => {
            let text = match java_syntax::extract_first_fence(reply) {
                Some(block) => block.body,
                None => reply.trim().to_string(),
            };
            Some(text)
        }
        ExpectedOutput::Code(language) => extract_code(reply, language),
    }
}

fn extract_code(reply: &str, language: &str) -> Option<String> {
    let is_java = language.eq_ignore_ascii_case("java");

    if let Some(block) = java_syntax::extract_first_fence(reply) {
        if !block.language.eq_ignore_ascii_case(language) {
            debug!("Using fenced block tagged '{}'", block.language);
            return Some(block.body);
        }
        let cleaned = java_syntax::strip_explanatory_lines(&block.body);
        if is_java && !java_syntax::has_type_declaration(&cleaned) {
            warn!("Java block contains no type declaration; rejecting");
            return None;
        }
        return Some(cleaned.trim().to_string());
    }

    let declares_public_type =
        reply.contains("public class") || reply.contains("public interface") || reply.contains("public enum");
    if is_java && declares_public_type && java_syntax::has_type_declaration(reply) {
        return Some(reply.trim().to_string());
    }

    if java_syntax::contains_explanation(reply) {
        warn!("Unfenced reply contains explanatory text; rejecting");
        return None;
    }

    Some(reply.trim().to_string())
}
