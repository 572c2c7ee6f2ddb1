use serde::{Deserialize, Serialize};

/// How the theorem wrapper refers to the reference specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TheoremDialect {
    /// Bare reference to the specification definition, no unfold step.
    Bare,
    /// Namespaced reference, preceded by an explicit unfold of both the reference and
    /// the generated definition.
    Namespaced { namespace: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterConfig {
    pub dialect: TheoremDialect,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            dialect: TheoremDialect::Namespaced {
                namespace: "RV64".to_string(),
            },
        }
    }
}
