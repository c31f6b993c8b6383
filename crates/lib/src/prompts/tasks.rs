//! # Default Task Prompts
//!
//! This module contains the default, hardcoded prompt templates for the MCQ generation task.
//! These are loaded programmatically and can be overridden by `config.yml` or `prompt.yml`.

// --- MCQ Generation ---
pub const MCQ_GENERATION_SYSTEM_PROMPT: &str = r#"You are an intelligent and structured MCQ (Multiple Choice Question) generator. Follow the requested output format exactly and respond in plain text only."#;

/// Placeholders: `{num_questions}`, `{difficulty}`, `{text}`
pub const MCQ_GENERATION_USER_PROMPT: &str = r#"Your task is to read the given educational content and create exactly {num_questions} multiple-choice questions (MCQs) that meet the following guidelines. The questions should have a difficulty level of {difficulty}.

1. Format:
Question: <your question>
Options:
A. <option A>
B. <option B>
C. <option C>
D. <option D>
Answer: <Correct Option Letter>
Explanation: <Short explanation of the correct answer>
Difficulty: <Easy / Medium / Hard>
Topic: <Main concept or subject>

Repeat this format for each of the {num_questions} questions.

2. Guidelines:
- Use only information from the provided content.
- Avoid vague or trivial questions.
- Distractors must be plausible but incorrect.
- The output should be plain text. Do not use any markdown formatting.

=== INPUT START ===
{text}
=== INPUT END ==="#;
