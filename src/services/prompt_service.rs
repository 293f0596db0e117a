//! Prompt 构建服务
//!
//! 负责系统指令、用户 prompt 以及输出结构约束的构建

use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// 系统指令
pub const SYSTEM_INSTRUCTION: &str = r#"You are "LegalLens," an expert Consumer Protection AI Lawyer.

**MISSION:**
Analyze the provided text to protect the user from predatory terms.

**SCORING RUBRIC (Safety Score 1-10):**
* 10: Open source, perfectly safe.
* 7-9: Standard, fair terms.
* 4-6: Big Tech standard (forced arbitration, tracking).
* 1-3: Predatory (selling data, AI training on user content, no refunds).

**INSTRUCTIONS:**
1. If the text is NOT a legal document (e.g., login page, blog), return "is_legal_doc": false.
2. If it IS legal, fill the fields.
3. For 'red_flags', look for: AI Training Rights, Class Action Waivers, Data Selling."#;

/// 发送给模型的最大文本长度（字符数）
pub const MAX_TEXT_CHARS: usize = 30_000;

/// 分析结果的输出结构约束（Gemini OpenAPI 子集）
static RESPONSE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "is_legal_doc": { "type": "BOOLEAN" },
            "safety_score": { "type": "INTEGER" },
            "summary": { "type": "STRING" },
            "red_flags": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["is_legal_doc", "safety_score", "summary", "red_flags"],
        "propertyOrdering": ["is_legal_doc", "safety_score", "summary", "red_flags"]
    })
});

/// Prompt 服务
pub struct PromptService;

impl PromptService {
    /// 创建新的 Prompt 服务
    pub fn new() -> Self {
        Self
    }

    /// 构建分析 prompt，文本超出部分被截断
    pub fn build_prompt(&self, url: &str, text: &str) -> String {
        let truncated = Self::truncate_text(text, MAX_TEXT_CHARS);
        format!("Analyze this text from {}:\n\n{}", url, truncated)
    }

    /// 系统指令
    pub fn system_instruction(&self) -> &'static str {
        SYSTEM_INSTRUCTION
    }

    /// 输出结构约束
    pub fn response_schema(&self) -> &'static Value {
        &RESPONSE_SCHEMA
    }

    /// 按字符截断，不会切断多字节字符
    pub fn truncate_text(text: &str, max_chars: usize) -> &str {
        match text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => &text[..byte_idx],
            None => text,
        }
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(PromptService::truncate_text("hello", 10), "hello");
        assert_eq!(PromptService::truncate_text("hello", 5), "hello");
        assert_eq!(PromptService::truncate_text("hello", 3), "hel");
        assert_eq!(PromptService::truncate_text("", 3), "");
        // 多字节字符按字符计数
        assert_eq!(PromptService::truncate_text("条款与条件", 2), "条款");
    }

    #[test]
    fn test_build_prompt_format() {
        let prompt = PromptService::new().build_prompt("https://example.com/tos", "Terms apply.");
        assert_eq!(
            prompt,
            "Analyze this text from https://example.com/tos:\n\nTerms apply."
        );
    }

    #[test]
    fn test_build_prompt_truncates_long_text() {
        let text = format!("{}{}", "a".repeat(MAX_TEXT_CHARS), "TAIL");
        let prompt = PromptService::new().build_prompt("u", &text);
        let body = prompt.strip_prefix("Analyze this text from u:\n\n").unwrap();
        assert_eq!(body.chars().count(), MAX_TEXT_CHARS);
        assert!(!prompt.contains("TAIL"));
    }

    #[test]
    fn test_build_prompt_truncates_multibyte_text() {
        let text = "é".repeat(MAX_TEXT_CHARS + 10);
        let prompt = PromptService::new().build_prompt("u", &text);
        let body = prompt.strip_prefix("Analyze this text from u:\n\n").unwrap();
        assert_eq!(body.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_response_schema_fields() {
        let schema = PromptService::new().response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["is_legal_doc"]["type"], "BOOLEAN");
        assert_eq!(schema["properties"]["safety_score"]["type"], "INTEGER");
        assert_eq!(schema["properties"]["summary"]["type"], "STRING");
        assert_eq!(schema["properties"]["red_flags"]["items"]["type"], "STRING");
        assert_eq!(schema["required"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_system_instruction_mentions_rubric() {
        let instruction = PromptService::new().system_instruction();
        assert!(instruction.contains("LegalLens"));
        assert!(instruction.contains("AI Training Rights"));
        assert!(instruction.contains("\"is_legal_doc\": false"));
    }
}
