use serde::{Deserialize, Serialize};
use serde_json::Number;

/// The fixed-shape ATS review returned to callers.
///
/// Decoding goes through `RawAnalysis`, so every key must be present, list
/// items must be strings, and `atsScore` must be an integer in 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawAnalysis")]
pub struct AnalysisResult {
    pub ats_score: u8,
    pub strengths: Vec<String>,
    pub weak_areas: Vec<String>,
    pub missing_skills: Vec<String>,
    pub project_gaps: Vec<String>,
    pub quick_fixes: Vec<String>,
    pub one_line_verdict: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    ats_score: Number,
    strengths: Vec<String>,
    weak_areas: Vec<String>,
    missing_skills: Vec<String>,
    project_gaps: Vec<String>,
    quick_fixes: Vec<String>,
    one_line_verdict: String,
}

impl TryFrom<RawAnalysis> for AnalysisResult {
    type Error = String;

    fn try_from(raw: RawAnalysis) -> Result<Self, Self::Error> {
        Ok(AnalysisResult {
            ats_score: ats_score_from(&raw.ats_score)?,
            strengths: raw.strengths,
            weak_areas: raw.weak_areas,
            missing_skills: raw.missing_skills,
            project_gaps: raw.project_gaps,
            quick_fixes: raw.quick_fixes,
            one_line_verdict: raw.one_line_verdict,
        })
    }
}

/// Accepts `72` and `72.0`, rejects `72.5` and anything outside 0..=100.
fn ats_score_from(n: &Number) -> Result<u8, String> {
    let score = match n.as_u64() {
        Some(v) => v as f64,
        None => n
            .as_f64()
            .filter(|v| v.fract() == 0.0)
            .ok_or_else(|| format!("atsScore must be an integer, got {n}"))?,
    };
    if !(0.0..=100.0).contains(&score) {
        return Err(format!("atsScore must be between 0 and 100, got {n}"));
    }
    Ok(score as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> serde_json::Value {
        json!({
            "atsScore": 64,
            "strengths": ["Clear project descriptions"],
            "weakAreas": ["No metrics"],
            "missingSkills": ["Docker"],
            "projectGaps": ["No deployed project link"],
            "quickFixes": ["Add a GitHub link"],
            "oneLineVerdict": "Promising fresher resume that needs proof of work."
        })
    }

    #[test]
    fn test_valid_value_decodes() {
        let result: AnalysisResult = serde_json::from_value(valid()).unwrap();
        assert_eq!(result.ats_score, 64);
        assert_eq!(result.missing_skills, vec!["Docker"]);
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let result: AnalysisResult = serde_json::from_value(valid()).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, valid());
    }

    #[test]
    fn test_integral_float_score_accepted() {
        let mut v = valid();
        v["atsScore"] = json!(80.0);
        let result: AnalysisResult = serde_json::from_value(v).unwrap();
        assert_eq!(result.ats_score, 80);
    }

    #[test]
    fn test_fractional_score_rejected() {
        let mut v = valid();
        v["atsScore"] = json!(80.5);
        assert!(serde_json::from_value::<AnalysisResult>(v).is_err());
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        for bad in [json!(101), json!(-1), json!(250.0)] {
            let mut v = valid();
            v["atsScore"] = bad;
            assert!(serde_json::from_value::<AnalysisResult>(v).is_err());
        }
    }

    #[test]
    fn test_string_score_rejected() {
        let mut v = valid();
        v["atsScore"] = json!("70");
        assert!(serde_json::from_value::<AnalysisResult>(v).is_err());
    }

    #[test]
    fn test_missing_key_rejected() {
        let mut v = valid();
        v.as_object_mut().unwrap().remove("quickFixes");
        assert!(serde_json::from_value::<AnalysisResult>(v).is_err());
    }

    #[test]
    fn test_non_string_list_item_rejected() {
        let mut v = valid();
        v["strengths"] = json!(["ok", 3]);
        assert!(serde_json::from_value::<AnalysisResult>(v).is_err());
    }

    #[test]
    fn test_empty_lists_allowed() {
        let mut v = valid();
        v["projectGaps"] = json!([]);
        let result: AnalysisResult = serde_json::from_value(v).unwrap();
        assert!(result.project_gaps.is_empty());
    }
}
