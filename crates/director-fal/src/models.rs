//! Text-to-video models available on fal.ai.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FalError;

/// Generation model, serialized as its fal.ai endpoint id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum VideoModel {
    #[default]
    #[serde(rename = "fal-ai/minimax-video")]
    MinimaxVideo,
    #[serde(rename = "fal-ai/mochi-v1")]
    MochiV1,
    #[serde(rename = "fal-ai/hunyuan-video")]
    HunyuanVideo,
    #[serde(rename = "fal-ai/luma-dream-machine")]
    LumaDreamMachine,
    #[serde(rename = "fal-ai/cogvideox-5b")]
    CogVideoX5b,
    #[serde(rename = "fal-ai/kling-video/v1/standard/text-to-video")]
    KlingV1Standard,
    #[serde(rename = "fal-ai/kling-video/v1.5/pro/text-to-video")]
    KlingV15Pro,
    #[serde(rename = "fal-ai/ltx-video")]
    LtxVideo,
    #[serde(rename = "fal-ai/fast-svd/text-to-video")]
    FastSvd,
    #[serde(rename = "fal-ai/fast-svd/fast-text-to-video")]
    FastSvdFast,
    #[serde(rename = "fal-ai/t2v-turbo")]
    T2vTurbo,
    #[serde(rename = "fal-ai/fast-animatediff/text-to-video")]
    FastAnimateDiff,
    #[serde(rename = "fal-ai/fast-animatediff/turbochest-text-to-video")]
    FastAnimateDiffTurbo,
    #[serde(rename = "fal-ai/animatediff-expansiondiff-lcm")]
    AnimateDiffExpansionLcm,
}

impl VideoModel {
    pub const ALL: [VideoModel; 14] = [
        VideoModel::MinimaxVideo,
        VideoModel::MochiV1,
        VideoModel::HunyuanVideo,
        VideoModel::LumaDreamMachine,
        VideoModel::CogVideoX5b,
        VideoModel::KlingV1Standard,
        VideoModel::KlingV15Pro,
        VideoModel::LtxVideo,
        VideoModel::FastSvd,
        VideoModel::FastSvdFast,
        VideoModel::T2vTurbo,
        VideoModel::FastAnimateDiff,
        VideoModel::FastAnimateDiffTurbo,
        VideoModel::AnimateDiffExpansionLcm,
    ];

    /// Endpoint id on fal.ai.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoModel::MinimaxVideo => "fal-ai/minimax-video",
            VideoModel::MochiV1 => "fal-ai/mochi-v1",
            VideoModel::HunyuanVideo => "fal-ai/hunyuan-video",
            VideoModel::LumaDreamMachine => "fal-ai/luma-dream-machine",
            VideoModel::CogVideoX5b => "fal-ai/cogvideox-5b",
            VideoModel::KlingV1Standard => "fal-ai/kling-video/v1/standard/text-to-video",
            VideoModel::KlingV15Pro => "fal-ai/kling-video/v1.5/pro/text-to-video",
            VideoModel::LtxVideo => "fal-ai/ltx-video",
            VideoModel::FastSvd => "fal-ai/fast-svd/text-to-video",
            VideoModel::FastSvdFast => "fal-ai/fast-svd/fast-text-to-video",
            VideoModel::T2vTurbo => "fal-ai/t2v-turbo",
            VideoModel::FastAnimateDiff => "fal-ai/fast-animatediff/text-to-video",
            VideoModel::FastAnimateDiffTurbo => "fal-ai/fast-animatediff/turbochest-text-to-video",
            VideoModel::AnimateDiffExpansionLcm => "fal-ai/animatediff-expansiondiff-lcm",
        }
    }
}

impl fmt::Display for VideoModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoModel {
    type Err = FalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VideoModel::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| FalError::UnknownModel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model() {
        assert_eq!(VideoModel::default().as_str(), "fal-ai/minimax-video");
    }

    #[test]
    fn test_serde_matches_as_str() {
        for model in VideoModel::ALL {
            let json = serde_json::to_value(model).unwrap();
            assert_eq!(json, model.as_str());
            assert_eq!(model.as_str().parse::<VideoModel>().unwrap(), model);
        }
    }

    #[test]
    fn test_unknown_model_rejected() {
        assert!(matches!(
            "fal-ai/not-a-model".parse::<VideoModel>(),
            Err(FalError::UnknownModel(_))
        ));
    }
}
