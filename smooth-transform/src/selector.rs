//! Layer selection by name-fragment keywords.

/// Default fragments target the diffusion backbone: UNet encoder blocks,
/// the bottleneck block, and decoder blocks. VAE (`first_stage_model`) and
/// text-encoder (`cond_stage_model`) tensors are excluded by omission.
pub const DEFAULT_TARGET_KEYWORDS: &[&str] = &[
    "diffusion_model.input_blocks",
    "diffusion_model.middle_block",
    "diffusion_model.output_blocks",
];

/// Pure predicate over tensor names: a name is selected iff it contains at
/// least one keyword as a substring. Case-sensitive, no wildcard or regex
/// semantics.
#[derive(Debug, Clone)]
pub struct LayerSelector {
    keywords: Vec<String>,
}

impl Default for LayerSelector {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_KEYWORDS.iter().copied())
    }
}

impl LayerSelector {
    /// Build a selector from an explicit keyword set. An empty set matches
    /// nothing.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn matches(&self, name: &str) -> bool {
        self.keywords.iter().any(|keyword| name.contains(keyword.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== default keyword tests ====================

    #[test]
    fn test_default_selects_unet_backbone() {
        let selector = LayerSelector::default();
        assert!(selector.matches("model.diffusion_model.input_blocks.3.weight"));
        assert!(selector.matches("model.diffusion_model.middle_block.1.bias"));
        assert!(selector.matches("model.diffusion_model.output_blocks.0.weight"));
    }

    #[test]
    fn test_default_excludes_vae_and_clip() {
        let selector = LayerSelector::default();
        assert!(!selector.matches("first_stage_model.decoder.weight"));
        assert!(!selector.matches("cond_stage_model.weight"));
        assert!(!selector.matches("diffusion_model.time_embed.0.weight"));
    }

    // ==================== matching semantics tests ====================

    #[test]
    fn test_substring_only_no_anchoring() {
        let selector = LayerSelector::new(["middle"]);
        assert!(selector.matches("a.middle.b"));
        assert!(selector.matches("middle"));
        assert!(!selector.matches("midd.le"));
    }

    #[test]
    fn test_case_sensitive() {
        let selector = LayerSelector::new(["Input_Blocks"]);
        assert!(!selector.matches("diffusion_model.input_blocks.0.weight"));
    }

    #[test]
    fn test_empty_keyword_set_matches_nothing() {
        let selector = LayerSelector::new(Vec::<String>::new());
        assert!(!selector.matches("diffusion_model.input_blocks.0.weight"));
        assert!(!selector.matches(""));
    }

    #[test]
    fn test_empty_name_not_matched() {
        let selector = LayerSelector::default();
        assert!(!selector.matches(""));
    }
}
