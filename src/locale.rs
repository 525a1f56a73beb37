//! Deployment language.
//!
//! Every piece of text the user sees, plus the instruction sent to the
//! provider, comes from the [`Strings`] table of the configured language.

use serde::{Deserialize, Serialize};

/// Language the form and the instruction prompt are written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Vietnamese.
    #[default]
    Vi,
    /// English.
    En,
}

/// Fixed UI strings and instruction text for one language.
#[derive(Debug, PartialEq, Eq)]
pub struct Strings {
    pub app_title: &'static str,
    pub input_title: &'static str,
    pub input_required: &'static str,
    pub button_label: &'static str,
    pub button_busy_label: &'static str,
    pub loading_text: &'static str,
    pub result_heading: &'static str,
    pub error_label: &'static str,
    pub error_message: &'static str,
    pub error_hint: &'static str,
    pub key_help: &'static str,
    pub instruction: &'static str,
}

static VI: Strings = Strings {
    app_title: " Đơn Giản Hóa Văn Bản ",
    input_title: " Đoạn văn ",
    input_required: " Vui lòng điền vào trường này ",
    button_label: "Đơn Giản Hóa",
    button_busy_label: "Đang xử lý...",
    loading_text: "Đang đơn giản hóa văn bản của bạn...",
    result_heading: "Phiên bản đơn giản hóa",
    error_label: "Lỗi:",
    error_message: "Ôi! Đã xảy ra lỗi trong quá trình đơn giản hóa văn bản.",
    error_hint: "Vui lòng kiểm tra console để biết thêm chi tiết và thử lại.",
    key_help: "Enter: đơn giản hóa · Esc: thoát",
    instruction: "Hãy đơn giản hóa đoạn văn sau cho mọi người đều hiểu. \
        Chia nhỏ các câu phức tạp, thay thế các thuật ngữ chuyên ngành bằng những từ đơn giản hơn \
        và đảm bảo giữ nguyên ý nghĩa ban đầu. \
        Không thêm bất kỳ cụm từ giới thiệu hoặc kết luận nào như \"Đây là văn bản đã được đơn giản hóa\". \
        Chỉ cần cung cấp trực tiếp văn bản đã được đơn giản hóa.",
};

static EN: Strings = Strings {
    app_title: " Text Simplifier ",
    input_title: " Paragraph ",
    input_required: " Please fill out this field ",
    button_label: "Simplify",
    button_busy_label: "Processing...",
    loading_text: "Simplifying your text...",
    result_heading: "Simplified version",
    error_label: "Error:",
    error_message: "An error occurred while simplifying the text.",
    error_hint: "Please check the console for details and try again.",
    key_help: "Enter: simplify · Esc: quit",
    instruction: "Simplify the following passage so that anyone can understand it. \
        Split complex sentences into shorter ones, replace technical jargon with plain words, \
        and make sure the original meaning is preserved. \
        Do not add any introductory or closing phrases such as \"Here is the simplified text\". \
        Return only the simplified text.",
};

impl Language {
    /// The string table for this language.
    pub fn strings(self) -> &'static Strings {
        match self {
            Language::Vi => &VI,
            Language::En => &EN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_vietnamese() {
        assert_eq!(Language::default(), Language::Vi);
        assert!(Language::default().strings().instruction.starts_with("Hãy đơn giản hóa"));
    }

    #[test]
    fn test_english_strings() {
        let strings = Language::En.strings();
        assert_eq!(strings.button_label, "Simplify");
        assert!(strings.instruction.ends_with("Return only the simplified text."));
    }

    #[test]
    fn test_language_deserialization() {
        #[derive(Deserialize)]
        struct Wrapper {
            language: Language,
        }
        let parsed: Wrapper = toml::from_str(r#"language = "en""#).unwrap();
        assert_eq!(parsed.language, Language::En);
    }
}
