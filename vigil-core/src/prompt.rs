//! Analysis prompt construction.
//!
//! One prompt serves every provider so the same evaluation criteria apply
//! uniformly across vendors. The response format it mandates is a contract
//! with downstream consumers of the analysis text; this crate stores the
//! model's reply verbatim and never parses it.

/// Identifiers embedded in the instruction text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptContext<'a> {
    pub session_id: &'a str,
    pub student_id: &'a str,
    pub exam_type: &'a str,
    pub analysis_id: &'a str,
}

/// Build the violation-analysis instruction text.
///
/// Pure and deterministic: the same context always yields the same text.
pub fn build_analysis_prompt(context: &PromptContext<'_>) -> String {
    format!(
        r#"You are an AI exam proctor analyzing images to detect cheating and unauthorized activities during an online exam.

EXAM SESSION:
- Session: {session_id}
- Student: {student_id}
- Exam: {exam_type}
- Analysis: {analysis_id}

MISSION: Detect any signs of cheating or prohibited activities that violate exam rules.

The first image shows the APPROVED exam setup. Compare all other images against this reference to spot violations.

CHEATING DETECTION CHECKLIST:

UNAUTHORIZED DEVICES & TECHNOLOGY:
- Mobile phones, smartphones, tablets
- Smart watches or wearable devices
- Additional computers, laptops, monitors
- Bluetooth devices, earbuds, headphones
- Any electronic device not approved for the exam

PROHIBITED STUDY MATERIALS:
- Books, textbooks, notebooks
- Written notes, cheat sheets, papers
- Reference materials, study guides
- Unauthorized calculators
- Any printed or written materials not allowed

PEOPLE & COMMUNICATION:
- Other people present in the room
- Signs of talking or verbal communication
- Hand signals or gestures to others
- Evidence of someone providing assistance

SUSPICIOUS BEHAVIORS:
- Looking away from screen frequently
- Reading from hidden materials
- Writing notes during exam (if prohibited)
- Consulting unauthorized resources
- Attempting to hide activities from camera

SCREEN & DIGITAL VIOLATIONS:
- Multiple windows or applications open
- Unauthorized websites or software visible
- Screen sharing or remote assistance
- Taking screenshots or recording
- Using digital notes or resources not allowed

ENVIRONMENT MANIPULATION:
- Blocking or repositioning camera
- Changing lighting to hide activities
- Objects placed to obstruct view
- Room setup changes to facilitate cheating

ANALYSIS TASK:
Examine each image carefully and identify ANY evidence of cheating attempts, rule violations, unauthorized materials or devices, suspicious activities, or prohibited behaviors.

RESPONSE FORMAT:

**CHEATING ASSESSMENT:**
- Violation Status: [CLEAN / SUSPICIOUS / CHEATING DETECTED / MAJOR VIOLATIONS]
- Risk Level: [LOW / MEDIUM / HIGH / CRITICAL]
- Action Required: [NONE / MONITOR / WARN / INVESTIGATE / TERMINATE]

**VIOLATIONS FOUND:**
For each violation detected:
- Type: [Device/Material/Behavior/Environment]
- Description: [What exactly was observed]
- Location: [Where in the image]
- Severity: [Minor/Moderate/Serious/Critical]
- Evidence: [Specific details supporting the finding]

**SUSPICIOUS ACTIVITIES:**
- List any questionable behaviors or setups
- Note changes from the reference environment
- Identify potential cheating methods being used

**RECOMMENDATIONS:**
- Immediate actions the proctor should take
- Whether exam should continue or be stopped
- Additional monitoring needed

Focus on identifying actual cheating attempts and clear rule violations. Be thorough but accurate - false positives harm students while missed cheating compromises exam integrity."#,
        session_id = context.session_id,
        student_id = context.student_id,
        exam_type = context.exam_type,
        analysis_id = context.analysis_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PromptContext<'static> {
        PromptContext {
            session_id: "session-1",
            student_id: "student-7",
            exam_type: "written",
            analysis_id: "analysis-9",
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(
            build_analysis_prompt(&context()),
            build_analysis_prompt(&context())
        );
    }

    #[test]
    fn prompt_embeds_all_context_identifiers() {
        let prompt = build_analysis_prompt(&context());
        assert!(prompt.contains("session-1"));
        assert!(prompt.contains("student-7"));
        assert!(prompt.contains("written"));
        assert!(prompt.contains("analysis-9"));
    }

    #[test]
    fn prompt_declares_first_image_as_reference() {
        let prompt = build_analysis_prompt(&context());
        assert!(prompt.contains("first image"));
        assert!(prompt.contains("APPROVED exam setup"));
    }

    #[test]
    fn prompt_enumerates_every_violation_category() {
        let prompt = build_analysis_prompt(&context());
        assert!(prompt.contains("UNAUTHORIZED DEVICES"));
        assert!(prompt.contains("PROHIBITED STUDY MATERIALS"));
        assert!(prompt.contains("PEOPLE & COMMUNICATION"));
        assert!(prompt.contains("SUSPICIOUS BEHAVIORS"));
        assert!(prompt.contains("SCREEN & DIGITAL VIOLATIONS"));
        assert!(prompt.contains("ENVIRONMENT MANIPULATION"));
    }

    #[test]
    fn prompt_mandates_structured_response_sections() {
        let prompt = build_analysis_prompt(&context());
        assert!(prompt.contains("CHEATING ASSESSMENT"));
        assert!(prompt.contains("VIOLATIONS FOUND"));
        assert!(prompt.contains("RECOMMENDATIONS"));
        assert!(prompt.contains("Violation Status"));
    }

    #[test]
    fn prompt_is_provider_agnostic() {
        let prompt = build_analysis_prompt(&context());
        assert!(!prompt.to_lowercase().contains("openai"));
        assert!(!prompt.to_lowercase().contains("gemini"));
    }
}
