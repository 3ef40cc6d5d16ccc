//! Character persona orchestration.
//!
//! One chat completion designs the persona (structured JSON output), one
//! image generation renders the avatar. The greeting is never taken from the
//! model: it is rebuilt server-side with the particle helper so its grammar
//! and wording stay fixed.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::character::hangul;
use crate::character::openai::OpenAiClient;
use crate::config::OpenAiConfig;
use crate::error::UpstreamError;

const PERSONA_TEMPERATURE: f32 = 0.7;

/// Generated character payload returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub character_name: String,
    pub description: String,
    pub speech_style: String,
    pub first_message: String,
    pub image_prompt: String,
    pub avatar_data_url: String,
}

/// Stateless character generator.
pub struct CharacterGenerator {
    config: OpenAiConfig,
}

impl CharacterGenerator {
    pub fn new(config: OpenAiConfig) -> Self {
        Self { config }
    }

    /// Generate a persona and avatar for the given name and concept.
    ///
    /// The text call strictly precedes the image call because the image
    /// prompt comes from the text result.
    pub async fn generate(
        &self,
        assistant_name: &str,
        character_description: &str,
    ) -> Result<CharacterProfile, UpstreamError> {
        let api_key = self
            .config
            .api_key
            .clone()
            .ok_or(UpstreamError::MissingApiKey)?;
        let client = OpenAiClient::new(api_key);

        info!(name = assistant_name, "Generating character persona");
        let content = client
            .chat_json(
                &self.config.text_model,
                PERSONA_TEMPERATURE,
                &persona_system_prompt(assistant_name, character_description),
                "JSON으로만 출력해.",
            )
            .await?;

        let persona = parse_persona(&content, assistant_name)?;

        info!(name = %persona.character_name, "Generating avatar image");
        let b64 = client
            .generate_image_b64(&self.config.image_model, &persona.image_prompt)
            .await?;

        let first_message = hangul::greeting(&persona.character_name);

        Ok(CharacterProfile {
            first_message,
            avatar_data_url: png_data_url(&b64),
            character_name: persona.character_name,
            description: persona.description,
            speech_style: persona.speech_style,
            image_prompt: persona.image_prompt,
        })
    }
}

/// Persona-design instruction for the text model. The concept text is an
/// appearance/mood description; speech style and coaching style derive from it.
fn persona_system_prompt(name: &str, concept: &str) -> String {
    format!(
        "너는 한국어 서비스 'KeepGoing'의 수행비서 캐릭터를 설계한다.\n\n\
         사용자가 입력한 캐릭터 설명은 \"외형 + 분위기 컨셉\"이다.\n\
         그 컨셉을 바탕으로 말투, 성격, 코칭 스타일도 함께 도출한다.\n\n\
         규칙:\n\
         - 캐릭터 컨셉을 말투에 반영한다.\n\
         - 하지만 항상 \"사용자의 성공을 돕는 수행비서\" 역할을 유지한다.\n\
         - 동물이라도 짖거나 의성어를 쓰지 않는다.\n\
         - 유치한 말투 금지.\n\
         - 존댓말 또는 부드러운 반말 중 하나로 일관성 있게 유지.\n\n\
         입력:\n\
         - 비서 이름: {name}\n\
         - 캐릭터 컨셉: {concept}\n\n\
         반드시 JSON만 출력한다. 다른 텍스트 금지.\n\n\
         포함해야 할 키:\n\
         - character_name (string)\n\
         - description (외형 + 성격 + 분위기 2~4문장)\n\
         - speech_style (한 줄 말투 가이드)\n\
         - image_prompt (이미지 생성용 프롬프트)"
    )
}

/// Parsed persona fields from the model output.
#[derive(Debug)]
struct Persona {
    character_name: String,
    description: String,
    speech_style: String,
    image_prompt: String,
}

/// Keys are only conventionally guaranteed, so every expected field is an
/// `Option` and a missing one is an upstream error — never an unchecked
/// lookup. `character_name` alone falls back to the requested name.
#[derive(Deserialize)]
struct PersonaRaw {
    character_name: Option<String>,
    description: Option<String>,
    speech_style: Option<String>,
    image_prompt: Option<String>,
}

fn parse_persona(content: &str, fallback_name: &str) -> Result<Persona, UpstreamError> {
    let raw: PersonaRaw = serde_json::from_str(content)
        .map_err(|e| UpstreamError::InvalidResponse(format!("persona is not JSON: {e}")))?;

    let require = |field: Option<String>, key: &str| {
        field
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| UpstreamError::InvalidResponse(format!("persona missing key {key:?}")))
    };

    Ok(Persona {
        character_name: raw
            .character_name
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| fallback_name.to_string()),
        description: require(raw.description, "description")?,
        speech_style: require(raw.speech_style, "speech_style")?,
        image_prompt: require(raw.image_prompt, "image_prompt")?,
    })
}

fn png_data_url(b64: &str) -> String {
    format!("data:image/png;base64,{b64}")
}
