//! Request and reply types shared by the vision provider clients.

use crate::types::TokenUsage;

/// One vision-analysis call: a prompt, the approved reference image, and the
/// candidate images to compare against it.
///
/// Image bytes are already normalized (bounded dimensions, JPEG) by the
/// upstream storage collaborator; clients only encode and transmit them.
#[derive(Clone)]
pub struct AnalysisRequest<'a> {
    /// Model name, which must have a pricing entry for the target provider.
    pub model: &'a str,
    /// Instruction text produced by the prompt builder.
    pub prompt: &'a str,
    /// The approved reference image, sent first.
    pub reference_image: &'a [u8],
    /// Candidate images, sent after the reference in order.
    pub candidate_images: &'a [Vec<u8>],
}

impl AnalysisRequest<'_> {
    /// Number of candidate images in the request.
    pub fn candidate_count(&self) -> u32 {
        self.candidate_images.len() as u32
    }

    /// Total images transmitted, reference included.
    pub fn transmitted_images(&self) -> u32 {
        self.candidate_count() + 1
    }
}

impl std::fmt::Debug for AnalysisRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisRequest")
            .field("model", &self.model)
            .field("prompt_len", &self.prompt.len())
            .field("reference_bytes", &self.reference_image.len())
            .field("candidate_images", &self.candidate_images.len())
            .finish()
    }
}

/// Outcome of one provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    /// Raw natural-language analysis from the model, stored verbatim.
    pub analysis_text: String,
    /// Exact token usage when the provider envelope reports it; `None` means
    /// cost must fall back to the fixed estimation policy.
    pub usage: Option<TokenUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_count_excludes_reference() {
        let reference = vec![1u8, 2, 3];
        let candidates = vec![vec![4u8], vec![5u8]];
        let request = AnalysisRequest {
            model: "gpt-4o",
            prompt: "compare",
            reference_image: &reference,
            candidate_images: &candidates,
        };

        assert_eq!(request.candidate_count(), 2);
        assert_eq!(request.transmitted_images(), 3);
    }

    #[test]
    fn debug_output_omits_image_bytes() {
        let reference = vec![0u8; 1024];
        let candidates = vec![vec![0u8; 2048]];
        let request = AnalysisRequest {
            model: "gpt-4o",
            prompt: "compare",
            reference_image: &reference,
            candidate_images: &candidates,
        };

        let debug = format!("{request:?}");
        assert!(debug.contains("reference_bytes"));
        assert!(!debug.contains("0, 0, 0"));
    }
}
