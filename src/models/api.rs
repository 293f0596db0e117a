//! REST API 请求/响应模型

use serde::{Deserialize, Serialize};

/// 页面分析请求
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    /// 页面地址
    pub url: String,
    /// 页面文本，由服务端负责截断
    pub text: String,
}

/// 模型返回的分析结果
///
/// 仅用于校验模型输出，响应体原样转发模型文本。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub is_legal_doc: bool,
    /// 1-10，服务端不强制范围
    pub safety_score: i64,
    pub summary: String,
    pub red_flags: Vec<String>,
}

impl AnalysisResult {
    /// 解析模型输出的 JSON 文本
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_legal_result() {
        let raw = r#"{
            "is_legal_doc": true,
            "safety_score": 3,
            "summary": "Grants broad AI training rights.",
            "red_flags": ["AI Training Rights", "Class Action Waiver"]
        }"#;
        let result = AnalysisResult::parse(raw).unwrap();
        assert!(result.is_legal_doc);
        assert_eq!(result.safety_score, 3);
        assert_eq!(result.red_flags.len(), 2);
    }

    #[test]
    fn test_score_range_not_enforced() {
        let raw = r#"{"is_legal_doc":true,"safety_score":42,"summary":"","red_flags":[]}"#;
        assert_eq!(AnalysisResult::parse(raw).unwrap().safety_score, 42);
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(AnalysisResult::parse(r#"{"is_legal_doc":"yes"}"#).is_err());
        assert!(AnalysisResult::parse(r#"{"is_legal_doc":true,"safety_score":5.5,"summary":"","red_flags":[]}"#).is_err());
        assert!(AnalysisResult::parse("not json").is_err());
    }

    #[test]
    fn test_request_requires_both_fields() {
        assert!(serde_json::from_str::<AnalysisRequest>(r#"{"url":"https://a.b"}"#).is_err());
        let req: AnalysisRequest =
            serde_json::from_str(r#"{"url":"https://a.b","text":"hi"}"#).unwrap();
        assert_eq!(req.text, "hi");
    }
}
