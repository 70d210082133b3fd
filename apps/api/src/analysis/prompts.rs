// Prompt template for the D.E.E.P. coaching analysis.
// The JSON schema at the end is advisory; the extractor still checks the shape.

/// Analysis prompt template. Replace `{profile_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert in workforce development and AI-augmented learning strategies. Analyze the following LinkedIn profile and provide personalized guidance based on Pearson's D.E.E.P. Learning Framework.

The D.E.E.P. Framework consists of:

1. **DIAGNOSE**: Define task augmentation plans by understanding how AI will reshape specific roles and tasks
   - Conduct task-based analysis
   - Identify expert enthusiasts
   - Build augmentation squads
   - Identify and roll out use cases

2. **EMBED**: Instill effective learning seamlessly in the flow of work
   - Create and maintain a culture of learning
   - Embed learning in the flow of work
   - Enable social learning
   - Emphasize durable skills

3. **EVALUATE**: Measure progress toward an AI-augmented workforce
   - Build usable skills data infrastructure
   - Invest in ambient methods of skills assessment
   - Use AI to measure and personalize learning
   - Test and develop skills in authentic conditions

4. **PRIORITIZE**: Position learning as a strategic investment
   - Redefine L&D as capability curators
   - Prioritize investments around skills, not roles
   - Build a measurable skills ecosystem
   - Incentivize continuous, iterative learning

Based on this LinkedIn profile, provide:
1. A brief profile summary (name if available, current role, industry, years of experience estimate)
2. For EACH of the 4 D.E.E.P. pillars, provide:
   - 2-3 specific, actionable recommendations tailored to this person's background
   - Focus on practical steps they can take given their role and industry

LinkedIn Profile:
{profile_text}

Respond in this exact JSON format:
{
  "profileSummary": {
    "name": "Person's name or 'Professional'",
    "currentRole": "Their current job title",
    "industry": "Their industry",
    "experience": "Brief experience summary"
  },
  "diagnose": {
    "summary": "One sentence overview for this pillar",
    "recommendations": ["Recommendation 1", "Recommendation 2", "Recommendation 3"]
  },
  "embed": {
    "summary": "One sentence overview for this pillar",
    "recommendations": ["Recommendation 1", "Recommendation 2", "Recommendation 3"]
  },
  "evaluate": {
    "summary": "One sentence overview for this pillar",
    "recommendations": ["Recommendation 1", "Recommendation 2", "Recommendation 3"]
  },
  "prioritize": {
    "summary": "One sentence overview for this pillar",
    "recommendations": ["Recommendation 1", "Recommendation 2", "Recommendation 3"]
  }
}"#;

const PROFILE_PLACEHOLDER: &str = "{profile_text}";

/// Renders the analysis prompt around `profile_text`.
///
/// The text is inserted verbatim; length checks happen before this is called.
pub fn build_analysis_prompt(profile_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replacen(PROFILE_PLACEHOLDER, profile_text, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::Pillar;

    const PROFILE: &str = "Jane Doe\nDirector of Talent Development at Acme Corp\nHealthcare";

    #[test]
    fn test_prompt_embeds_profile_text_verbatim() {
        let prompt = build_analysis_prompt(PROFILE);
        assert!(prompt.contains("LinkedIn Profile:\nJane Doe\nDirector of Talent Development"));
        assert!(!prompt.contains(PROFILE_PLACEHOLDER));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_analysis_prompt(PROFILE), build_analysis_prompt(PROFILE));
    }

    #[test]
    fn test_prompt_names_every_pillar_in_schema() {
        let prompt = build_analysis_prompt(PROFILE);
        assert!(prompt.contains("\"profileSummary\""));
        for pillar in Pillar::ALL {
            assert!(
                prompt.contains(&format!("\"{}\": {{", pillar.key())),
                "schema is missing {pillar}"
            );
            assert!(prompt.contains(&format!("**{}**", pillar.key().to_uppercase())));
        }
    }

    #[test]
    fn test_placeholder_inside_profile_is_not_expanded_again() {
        let prompt = build_analysis_prompt("my notes mention {profile_text} literally");
        assert!(prompt.contains("my notes mention {profile_text} literally"));
        assert_eq!(prompt.matches("{profile_text}").count(), 1);
    }

    #[test]
    fn test_schema_follows_profile_text() {
        let prompt = build_analysis_prompt(PROFILE);
        let profile_at = prompt.find(PROFILE).unwrap();
        let schema_at = prompt.find("Respond in this exact JSON format:").unwrap();
        assert!(profile_at < schema_at);
    }
}
