//! API URL 构建工具

/// 修复 base_url
///
/// - 移除末尾斜杠
/// - 修复双斜杠（保留协议部分）
pub fn fix_base_url(base_url: &str) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();

    // 修复双斜杠（跳过协议部分）
    if let Some(pos) = url.find("://") {
        let (protocol, rest) = url.split_at(pos + 3);
        let fixed_rest = rest.replace("//", "/");
        url = format!("{}{}", protocol, fixed_rest);
    }

    url
}

/// 构建 Gemini generateContent 端点
///
/// `model` 可以带或不带 `models/` 前缀。
pub fn build_gemini_endpoint(base_url: &str, model: &str) -> String {
    let url = fix_base_url(base_url);
    let model = model.trim_start_matches("models/");

    let root = if url.ends_with("/v1beta") || url.ends_with("/v1") {
        url
    } else {
        format!("{}/v1beta", url)
    };

    format!("{}/models/{}:generateContent", root, model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_base_url() {
        assert_eq!(
            fix_base_url("https://generativelanguage.googleapis.com/"),
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(
            fix_base_url("https://generativelanguage.googleapis.com//v1beta"),
            "https://generativelanguage.googleapis.com/v1beta"
        );
    }

    #[test]
    fn test_build_gemini_endpoint() {
        let expected =
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";
        assert_eq!(
            build_gemini_endpoint("https://generativelanguage.googleapis.com", "gemini-2.5-flash"),
            expected
        );
        assert_eq!(
            build_gemini_endpoint("https://generativelanguage.googleapis.com/v1beta/", "gemini-2.5-flash"),
            expected
        );
        assert_eq!(
            build_gemini_endpoint("https://generativelanguage.googleapis.com", "models/gemini-2.5-flash"),
            expected
        );
        assert_eq!(
            build_gemini_endpoint("http://127.0.0.1:9000/v1", "gemini-pro"),
            "http://127.0.0.1:9000/v1/models/gemini-pro:generateContent"
        );
    }
}
