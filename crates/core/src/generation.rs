//! Novel generation request and prompt construction.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Shown to the user whenever generation fails, whatever the cause.
pub const GENERATION_FAILED_MESSAGE: &str = "소설 생성에 실패했습니다";

/// Target length of the generated story, in characters.
pub const TARGET_LENGTH_CHARS: usize = 20_000;

#[derive(Debug, Clone, Deserialize)]
pub struct NovelRequest {
    pub title: String,
    pub genre: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub themes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovelResponse {
    pub content: String,
}

impl NovelRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::Validation("제목을 입력해주세요.".into()));
        }
        if self.genre.trim().is_empty() {
            return Err(CoreError::Validation("장르를 선택해주세요.".into()));
        }
        Ok(())
    }

    /// Build the single user message sent to the completion endpoint.
    pub fn build_prompt(&self) -> String {
        let prompt = self.prompt.trim();
        let mut out = format!(
            "제목: {}\n장르: {}\n테마: {}\n추가 프롬프트: {}\n\n",
            self.title.trim(),
            self.genre.trim(),
            self.themes.join(", "),
            prompt,
        );
        out.push_str(&format!(
            "위 정보를 바탕으로 {TARGET_LENGTH_CHARS}자 분량의 한국어 단편소설을 써주세요.\n"
        ));
        out.push_str(
            "작품의 특징:\n\
             1. 제목과 장르, 테마에 어울리는 스토리라인\n\
             2. 기승전결이 있는 구조\n\
             3. 생생한 묘사와 캐릭터 표현\n\
             4. 자연스러운 대화문 (큰따옴표로 처리)\n\
             5. 적절한 단락 구분\n",
        );
        if !prompt.is_empty() {
            out.push_str(&format!("\n추가 요구사항: {prompt}\n"));
        }
        out
    }
}
