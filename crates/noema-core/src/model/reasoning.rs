//! Reasoning-chain input types (spec.md §4.7).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The role a reasoning step plays in its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Premise,
    Inference,
    Evidence,
    Counterargument,
    Rebuttal,
    Conclusion,
}

impl StepType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Premise => "premise",
            StepType::Inference => "inference",
            StepType::Evidence => "evidence",
            StepType::Counterargument => "counterargument",
            StepType::Rebuttal => "rebuttal",
            StepType::Conclusion => "conclusion",
        }
    }
}

/// Input describing the `ReasoningChain` container node.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningChainInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default = "default_methodology")]
    pub methodology: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source_thought: Option<String>,
    #[serde(default)]
    pub alternative_conclusions_considered: Vec<String>,
}

fn default_methodology() -> String {
    "mixed".to_string()
}

/// Input describing one `ReasoningStep` node in a chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningStepInput {
    pub name: String,
    pub content: String,
    pub step_type: StepType,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub evidence_type: Option<String>,
    #[serde(default)]
    pub supporting_references: Vec<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub counterarguments: Vec<String>,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default)]
    pub formal_notation: Option<String>,
    /// Extra kind-specific fields, folded into the step node's properties
    /// blob alongside the typed fields above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
