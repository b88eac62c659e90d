use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;

/// Everything the report prompt is built from.
///
/// The builder is a pure function of this struct: identical inputs produce a
/// byte-identical prompt, so synthesized reports are reproducible and
/// testable without a live provider.
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `ko` or `en`; anything else falls back to English.
    pub locale: String,
    pub intake: Vec<IntakeEntry>,
    pub conditions: Vec<ConditionEntry>,
}

/// Intake record projected down to what the coach needs to see.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeEntry {
    pub time: String,
    pub level: String,
}

/// Condition record projected down to what the coach needs to see.
#[derive(Debug, Clone, Serialize)]
pub struct ConditionEntry {
    pub date: String,
    pub condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Build the coaching prompt for one synthesis window.
pub fn build_report_prompt(input: &ReportInput) -> Result<String> {
    let intake_json = serde_json::to_string_pretty(&input.intake)?;
    let condition_json = serde_json::to_string_pretty(&input.conditions)?;

    let template = if input.locale == "ko" {
        REPORT_PROMPT_KO
    } else {
        REPORT_PROMPT_EN
    };

    Ok(template
        .replace("{{START_DATE}}", &input.start_date.format("%Y-%m-%d").to_string())
        .replace("{{END_DATE}}", &input.end_date.format("%Y-%m-%d").to_string())
        .replace("{{INTAKE_COUNT}}", &input.intake.len().to_string())
        .replace("{{INTAKE_DATA}}", &intake_json)
        .replace("{{CONDITION_COUNT}}", &input.conditions.len().to_string())
        .replace("{{CONDITION_DATA}}", &condition_json))
}

const REPORT_PROMPT_KO: &str = r#"당신은 사용자의 물 섭취 패턴과 컨디션을 분석하여 공감적이고 부드러운 어조로 인사이트를 제공하는 "워터로그 AI 코치"입니다.

**분석 기간**: {{START_DATE}} ~ {{END_DATE}}

**사용자 데이터**:
1. **물 섭취 기록 ({{INTAKE_COUNT}}건)**:
{{INTAKE_DATA}}

2. **컨디션 기록 ({{CONDITION_COUNT}}건)**:
{{CONDITION_DATA}}

**작성 가이드라인**:
1. **톤앤매너**: 평가하거나 가르치려 들지 마세요. 친구처럼 공감하고 격려하는 부드러운 말투를 사용하세요. ("~했어요", "~인 것 같아요" 등)
2. **부정적 표현 금지**: "실패", "부족", "안 마셨다", "못했다" 같은 단어 대신 "아쉬움이 남지만", "잠시 쉬어갔지만" 등으로 순화하세요.
3. **구조**:
   - **관찰**: 팩트 기반으로 패턴을 발견해주세요. (예: "오후 3시쯤 되면 물을 자주 드시는군요!")
   - **연결**: 물 섭취와 컨디션 사이의 관계가 보이면 언급해주세요. (관계가 없으면 억지로 연결하지 마세요)
   - **제안**: 부담스럽지 않은 작은 팁을 하나만 주세요.
4. **길이**: 전체 내용은 300자 내외로 간결하게 작성하세요. 핵심만 전달하세요.
"#;

const REPORT_PROMPT_EN: &str = r#"You are the "WaterLog AI coach": you analyze a user's water-intake pattern and daily condition and offer insights in an empathetic, gentle voice.

**Analysis window**: {{START_DATE}} ~ {{END_DATE}}

**User data**:
1. **Water intake log ({{INTAKE_COUNT}} entries)**:
{{INTAKE_DATA}}

2. **Condition log ({{CONDITION_COUNT}} entries)**:
{{CONDITION_DATA}}

**Writing guidelines**:
1. **Tone**: never grade or lecture. Speak like a supportive friend, warm and encouraging.
2. **No negative vocabulary**: avoid words like "failure", "lack", "didn't drink", "couldn't"; soften to phrasings like "there was a quiet stretch" instead.
3. **Structure**:
   - **Observation**: point out a fact-based pattern. (e.g. "you tend to reach for water around 3pm!")
   - **Correlation**: mention a link between intake and condition only if one is actually visible; never force it.
   - **Suggestion**: offer exactly one small, low-pressure tip.
4. **Length**: keep the whole text around 300 characters; deliver only the essentials.
"#;
