use crate::core::classifier::TaskCategory;

pub const CODING_MODEL: &str = "deepseek/deepseek-r1-0528:free";
pub const RESEARCH_MODEL: &str = "meta-llama/llama-4-maverick:free";
pub const GENERAL_MODEL: &str = "mistralai/mistral-7b-instruct:free";

const PRESENCE_PENALTY: f32 = 0.1;
const FREQUENCY_PENALTY: f32 = 0.1;
const TOP_P: f32 = 0.95;

/// Static generation settings for one task category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelProfile {
    pub model: &'static str,
    pub system_prompt: &'static str,
    pub temperature: f32,
    pub max_tokens: u32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    pub top_p: f32,
}

static CODING_PROFILE: ModelProfile = ModelProfile {
    model: CODING_MODEL,
    system_prompt: "You are a helpful programming assistant. Provide clear, well-documented code examples with explanations.",
    temperature: 0.3,
    max_tokens: 1000,
    presence_penalty: PRESENCE_PENALTY,
    frequency_penalty: FREQUENCY_PENALTY,
    top_p: TOP_P,
};

static RESEARCH_PROFILE: ModelProfile = ModelProfile {
    model: RESEARCH_MODEL,
    system_prompt: "You are a research assistant. Provide detailed, well-researched responses with citations and explanations.",
    temperature: 0.5,
    max_tokens: 800,
    presence_penalty: PRESENCE_PENALTY,
    frequency_penalty: FREQUENCY_PENALTY,
    top_p: TOP_P,
};

static GENERAL_PROFILE: ModelProfile = ModelProfile {
    model: GENERAL_MODEL,
    system_prompt: "You are a helpful assistant. Provide clear and concise responses.",
    temperature: 0.7,
    max_tokens: 500,
    presence_penalty: PRESENCE_PENALTY,
    frequency_penalty: FREQUENCY_PENALTY,
    top_p: TOP_P,
};

pub fn select_model(category: TaskCategory) -> &'static ModelProfile {
    match category {
        TaskCategory::Coding => &CODING_PROFILE,
        TaskCategory::Research => &RESEARCH_PROFILE,
        TaskCategory::General => &GENERAL_PROFILE,
    }
}

/// Human-friendly label for a model id; unknown ids are shown verbatim.
pub fn model_display_name(model_id: &str) -> &str {
    match model_id {
        CODING_MODEL => "Deepseek",
        RESEARCH_MODEL => "Llama 4 Maverick",
        GENERAL_MODEL => "Mistral",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::classify;

    #[test]
    fn selection_is_stable_per_category() {
        for category in TaskCategory::ALL {
            assert_eq!(select_model(category), select_model(category));
        }
    }

    #[test]
    fn profiles_are_distinct_but_share_sampling_penalties() {
        let coding = select_model(TaskCategory::Coding);
        let research = select_model(TaskCategory::Research);
        let general = select_model(TaskCategory::General);

        assert_ne!(coding.system_prompt, research.system_prompt);
        assert_ne!(research.system_prompt, general.system_prompt);

        for profile in [coding, research, general] {
            assert_eq!(profile.presence_penalty, 0.1);
            assert_eq!(profile.frequency_penalty, 0.1);
            assert_eq!(profile.top_p, 0.95);
        }
    }

    #[test]
    fn coding_request_routes_to_deepseek() {
        let profile = select_model(classify("implement a binary search in sorted array"));
        assert_eq!(profile.model, "deepseek/deepseek-r1-0528:free");
        assert_eq!(profile.temperature, 0.3);
        assert_eq!(profile.max_tokens, 1000);
    }

    #[test]
    fn small_talk_routes_to_mistral() {
        let profile = select_model(classify("hello, how are you"));
        assert_eq!(profile.model, "mistralai/mistral-7b-instruct:free");
        assert_eq!(profile.temperature, 0.7);
        assert_eq!(profile.max_tokens, 500);
    }

    #[test]
    fn research_profile_values() {
        let profile = select_model(TaskCategory::Research);
        assert_eq!(profile.model, "meta-llama/llama-4-maverick:free");
        assert_eq!(profile.temperature, 0.5);
        assert_eq!(profile.max_tokens, 800);
    }

    #[test]
    fn display_names_fall_back_to_id() {
        assert_eq!(model_display_name(CODING_MODEL), "Deepseek");
        assert_eq!(model_display_name(RESEARCH_MODEL), "Llama 4 Maverick");
        assert_eq!(model_display_name(GENERAL_MODEL), "Mistral");
        assert_eq!(model_display_name("openai/gpt-4o"), "openai/gpt-4o");
    }
}
