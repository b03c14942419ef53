//! # Scenario Scripts
//!
//! A script is a JSON document listing engine operations in order:
//!
//! ```json
//! {
//!   "steps": [
//!     { "op": "add_node", "name": "Cat" },
//!     { "op": "add_node", "name": "Animal" },
//!     { "op": "add_link", "kind": "Inheritance", "members": ["Cat", "Animal"], "strength": 0.9 },
//!     { "op": "decay", "ticks": 3 }
//!   ]
//! }
//! ```
//!
//! Atoms are referenced by name. A reference resolves, in order, to a name
//! bound earlier in the script (node names and link labels), to a literal id
//! written `#7`, or to the first live atom carrying that name.
//!
//! Replaying a script always starts from an empty atom space.

use crate::error::CliError;
use crate::files::{MAX_SCRIPT_FILE_SIZE, read_bounded};
use atomspace_core::{
    AtomId, AtomSpace, AtomSpaceStats, AtomType, EngineConfig, KnowledgeUnit, LinkType, NodeType,
    Query, UnitKind,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::Path;

// =============================================================================
// SCRIPT FORMAT
// =============================================================================

/// A scenario: optional description plus ordered steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub description: Option<String>,
    pub steps: Vec<Step>,
}

/// Maximum number of ticks a single `decay` step may request.
pub const MAX_DECAY_TICKS: u32 = 10_000;

impl Script {
    /// Check step bounds before anything runs.
    pub fn validate(&self) -> Result<(), CliError> {
        for (index, step) in self.steps.iter().enumerate() {
            if let Step::Decay { ticks } = step
                && *ticks > MAX_DECAY_TICKS
            {
                return Err(CliError::Script(format!(
                    "step {} asks for {} decay ticks, limit is {}",
                    index + 1,
                    ticks,
                    MAX_DECAY_TICKS
                )));
            }
        }
        Ok(())
    }
}

fn concept() -> NodeType {
    NodeType::Concept
}

fn one_tick() -> u32 {
    1
}

/// One engine operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    AddNode {
        name: String,
        #[serde(default = "concept")]
        kind: NodeType,
    },
    AddLink {
        kind: LinkType,
        members: Vec<String>,
        /// Name under which later steps can refer to the link.
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        strength: Option<f32>,
        #[serde(default)]
        confidence: Option<f32>,
    },
    SetTruth {
        atom: String,
        strength: f32,
        confidence: f32,
    },
    SetAttention {
        atom: String,
        sti: f32,
        #[serde(default)]
        lti: f32,
        #[serde(default)]
        vlti: f32,
    },
    SetFeatures {
        atom: String,
        features: Vec<f32>,
    },
    Delete {
        atom: String,
    },
    InferInheritance {
        a: String,
        b: String,
        c: String,
    },
    InferSimilarity {
        a: String,
        b: String,
    },
    Similarity {
        a: String,
        b: String,
    },
    Decay {
        #[serde(default = "one_tick")]
        ticks: u32,
    },
    /// Spread `amount` from `atom`, or its diffusion share when omitted.
    Spread {
        atom: String,
        #[serde(default)]
        amount: Option<f32>,
    },
    Query {
        by: QueryBy,
        target: String,
    },
    Import {
        unit: ScriptUnit,
    },
    Describe {
        atom: String,
    },
}

impl Step {
    /// The `op` tag of this step.
    #[must_use]
    pub fn op(&self) -> &'static str {
        match self {
            Step::AddNode { .. } => "add_node",
            Step::AddLink { .. } => "add_link",
            Step::SetTruth { .. } => "set_truth",
            Step::SetAttention { .. } => "set_attention",
            Step::SetFeatures { .. } => "set_features",
            Step::Delete { .. } => "delete",
            Step::InferInheritance { .. } => "infer_inheritance",
            Step::InferSimilarity { .. } => "infer_similarity",
            Step::Similarity { .. } => "similarity",
            Step::Decay { .. } => "decay",
            Step::Spread { .. } => "spread",
            Step::Query { .. } => "query",
            Step::Import { .. } => "import",
            Step::Describe { .. } => "describe",
        }
    }
}

/// Query selector. `type` targets take canonical names such as `InheritanceLink`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryBy {
    Type,
    Name,
    Incoming,
    Outgoing,
}

/// A knowledge unit whose members are atom references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptUnit {
    pub kind: UnitKind,
    pub name: String,
    pub truth_value: f32,
    pub confidence: f32,
    #[serde(default)]
    pub attention: f32,
    #[serde(default)]
    pub activation: f32,
    #[serde(default)]
    pub features: Option<Vec<f32>>,
    pub external_id: u64,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Parse script text.
pub fn parse_script(text: &str) -> Result<Script, CliError> {
    let script: Script = serde_json::from_str(text).map_err(|e| CliError::Script(e.to_string()))?;
    script.validate()?;
    Ok(script)
}

/// Read and parse the script at `path`.
pub fn load_script(path: &Path) -> Result<Script, CliError> {
    let text = read_bounded(path, MAX_SCRIPT_FILE_SIZE)?;
    let script = parse_script(&text)?;
    tracing::info!(path = %path.display(), steps = script.steps.len(), "loaded script");
    Ok(script)
}

// =============================================================================
// EXECUTION
// =============================================================================

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    /// 1-based position in the script.
    pub step: usize,
    pub op: &'static str,
    pub result: Value,
}

/// Everything a script run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<StepOutcome>,
    pub stats: AtomSpaceStats,
}

/// Replays steps against one atom space and keeps the name bindings.
#[derive(Debug)]
pub struct ScriptRunner {
    space: AtomSpace,
    bindings: BTreeMap<String, AtomId>,
}

impl ScriptRunner {
    pub fn new(config: EngineConfig) -> Result<Self, CliError> {
        Ok(Self {
            space: AtomSpace::with_config(config)?,
            bindings: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn space(&self) -> &AtomSpace {
        &self.space
    }

    /// Run every step in order, stopping at the first failure.
    pub fn run(&mut self, script: &Script) -> Result<Vec<StepOutcome>, CliError> {
        script.validate()?;
        let mut outcomes = Vec::with_capacity(script.steps.len());
        for (index, step) in script.steps.iter().enumerate() {
            let position = index + 1;
            let result = self.apply(step).map_err(|e| {
                tracing::warn!(step = position, op = step.op(), error = %e, "step failed");
                e
            })?;
            outcomes.push(StepOutcome {
                step: position,
                op: step.op(),
                result,
            });
        }
        Ok(outcomes)
    }

    /// Resolve an atom reference.
    pub fn resolve(&self, reference: &str) -> Result<AtomId, CliError> {
        if let Some(id) = self.bindings.get(reference) {
            return Ok(*id);
        }
        if let Some(raw) = reference.strip_prefix('#') {
            let id = raw
                .parse::<u64>()
                .map(AtomId)
                .map_err(|_| CliError::Script(format!("invalid atom id '{}'", reference)))?;
            return if self.space.peek(id).is_some() {
                Ok(id)
            } else {
                Err(atomspace_core::AtomSpaceError::NotFound(id).into())
            };
        }
        self.space
            .query_by_name(reference)
            .first()
            .copied()
            .ok_or_else(|| CliError::Script(format!("unknown atom '{}'", reference)))
    }

    fn resolve_all(&self, references: &[String]) -> Result<Vec<AtomId>, CliError> {
        references.iter().map(|r| self.resolve(r)).collect()
    }

    fn apply(&mut self, step: &Step) -> Result<Value, CliError> {
        match step {
            Step::AddNode { name, kind } => {
                let id = self.space.add_node(*kind, name)?;
                self.bindings.insert(name.clone(), id);
                Ok(json!({ "id": id.0 }))
            }
            Step::AddLink {
                kind,
                members,
                label,
                strength,
                confidence,
            } => {
                let outgoing = self.resolve_all(members)?;
                let id = self.space.add_link(*kind, &outgoing)?;
                if strength.is_some() || confidence.is_some() {
                    let current = self.space.truth_value(id)?;
                    self.space.set_truth_value(
                        id,
                        strength.unwrap_or(current.strength),
                        confidence.unwrap_or(current.confidence),
                    )?;
                }
                if let Some(label) = label {
                    self.bindings.insert(label.clone(), id);
                }
                Ok(json!({ "id": id.0 }))
            }
            Step::SetTruth {
                atom,
                strength,
                confidence,
            } => {
                let id = self.resolve(atom)?;
                self.space.set_truth_value(id, *strength, *confidence)?;
                let tv = self.space.truth_value(id)?;
                Ok(json!({ "strength": tv.strength, "confidence": tv.confidence }))
            }
            Step::SetAttention {
                atom,
                sti,
                lti,
                vlti,
            } => {
                let id = self.resolve(atom)?;
                self.space.set_attention(id, *sti, *lti, *vlti)?;
                attention_json(&self.space, id)
            }
            Step::SetFeatures { atom, features } => {
                let id = self.resolve(atom)?;
                self.space.set_features(id, features.clone())?;
                Ok(json!({ "dimensions": features.len() }))
            }
            Step::Delete { atom } => {
                let id = self.resolve(atom)?;
                self.space.delete(id)?;
                self.bindings.retain(|_, bound| *bound != id);
                Ok(json!({ "deleted": id.0 }))
            }
            Step::InferInheritance { a, b, c } => {
                let (a, b, c) = (self.resolve(a)?, self.resolve(b)?, self.resolve(c)?);
                let derived = self.space.infer_inheritance(a, b, c)?;
                Ok(json!({ "derived": derived, "accuracy": self.space.reasoning_accuracy() }))
            }
            Step::InferSimilarity { a, b } => {
                let (a, b) = (self.resolve(a)?, self.resolve(b)?);
                let derived = self.space.infer_similarity(a, b)?;
                Ok(json!({ "derived": derived, "accuracy": self.space.reasoning_accuracy() }))
            }
            Step::Similarity { a, b } => {
                let (a, b) = (self.resolve(a)?, self.resolve(b)?);
                Ok(json!({ "similarity": self.space.compute_similarity(a, b)? }))
            }
            Step::Decay { ticks } => {
                let mut touched = 0usize;
                for _ in 0..*ticks {
                    touched = self.space.decay_tick();
                }
                Ok(json!({ "ticks": ticks, "atoms": touched }))
            }
            Step::Spread { atom, amount } => {
                let id = self.resolve(atom)?;
                let spread = match amount {
                    Some(amount) => {
                        self.space.spread(id, *amount)?;
                        *amount
                    }
                    None => self.space.spread_diffused(id)?,
                };
                Ok(json!({ "amount": spread }))
            }
            Step::Query { by, target } => {
                let query = match by {
                    QueryBy::Type => Query::by_type(AtomType::from_name(target).ok_or_else(
                        || CliError::Script(format!("unknown atom type '{}'", target)),
                    )?),
                    QueryBy::Name => Query::by_name(target.clone()),
                    QueryBy::Incoming => Query::incoming(self.resolve(target)?),
                    QueryBy::Outgoing => Query::outgoing(self.resolve(target)?),
                };
                let ids = self.space.execute(&query);
                let names: Vec<&str> = ids
                    .iter()
                    .filter_map(|id| self.space.peek(*id).map(|atom| atom.name.as_str()))
                    .collect();
                let raw: Vec<u64> = ids.iter().map(|id| id.0).collect();
                Ok(json!({ "ids": raw, "names": names }))
            }
            Step::Import { unit } => {
                let members = self.resolve_all(&unit.members)?;
                let id = self.space.import_knowledge_unit(&KnowledgeUnit {
                    kind: unit.kind,
                    name: unit.name.clone(),
                    truth_value: unit.truth_value,
                    confidence: unit.confidence,
                    attention: unit.attention,
                    activation: unit.activation,
                    features: unit.features.clone(),
                    external_id: unit.external_id,
                    members,
                })?;
                if self.space.peek(id).is_some_and(|atom| atom.is_node()) {
                    self.bindings.insert(unit.name.clone(), id);
                }
                Ok(json!({ "id": id.0 }))
            }
            Step::Describe { atom } => {
                let id = self.resolve(atom)?;
                Ok(Value::String(self.space.describe(id)?))
            }
        }
    }
}

fn attention_json(space: &AtomSpace, id: AtomId) -> Result<Value, CliError> {
    let av = space.get_attention(id)?;
    Ok(json!({ "sti": av.sti, "lti": av.lti, "vlti": av.vlti }))
}

/// Replay `script` on a fresh atom space built from `config`.
pub fn run_script(config: EngineConfig, script: &Script) -> Result<RunReport, CliError> {
    let mut runner = ScriptRunner::new(config)?;
    let outcomes = runner.run(script)?;
    Ok(RunReport {
        outcomes,
        stats: runner.space().stats(),
    })
}

// =============================================================================
// BUILT-IN DEMO
// =============================================================================

fn refs(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn node(name: &str) -> Step {
    Step::AddNode {
        name: name.to_string(),
        kind: NodeType::Concept,
    }
}

fn inherit(from: &str, to: &str, strength: f32, confidence: f32) -> Step {
    Step::AddLink {
        kind: LinkType::Inheritance,
        members: refs(&[from, to]),
        label: Some(format!("{}->{}", from, to)),
        strength: Some(strength),
        confidence: Some(confidence),
    }
}

/// The scenario run by `atomspace demo`: a small taxonomy, deduction,
/// similarity and a few attention ticks.
///
/// Dog and Cat share parents but no link names both of them, so relation
/// overlap finds nothing and the feature vectors carry the similarity.
#[must_use]
pub fn demo_script() -> Script {
    let mut steps: Vec<Step> = ["Human", "Mammal", "Animal", "Dog", "Cat", "Pet"]
        .into_iter()
        .map(node)
        .collect();

    steps.extend([
        inherit("Human", "Mammal", 0.9, 0.8),
        inherit("Mammal", "Animal", 0.85, 0.9),
        inherit("Dog", "Mammal", 0.95, 0.9),
        inherit("Cat", "Mammal", 0.95, 0.9),
        inherit("Dog", "Pet", 0.9, 0.85),
        inherit("Cat", "Pet", 0.85, 0.85),
        Step::InferInheritance {
            a: "Human".to_string(),
            b: "Mammal".to_string(),
            c: "Animal".to_string(),
        },
        Step::InferInheritance {
            a: "Dog".to_string(),
            b: "Mammal".to_string(),
            c: "Animal".to_string(),
        },
        Step::InferSimilarity {
            a: "Dog".to_string(),
            b: "Cat".to_string(),
        },
        Step::SetFeatures {
            atom: "Dog".to_string(),
            features: vec![0.9, 0.1, 0.8],
        },
        Step::SetFeatures {
            atom: "Cat".to_string(),
            features: vec![0.8, 0.2, 0.9],
        },
        Step::Similarity {
            a: "Dog".to_string(),
            b: "Cat".to_string(),
        },
        Step::SetAttention {
            atom: "Human".to_string(),
            sti: 0.8,
            lti: 0.2,
            vlti: 0.0,
        },
        Step::Spread {
            atom: "Human->Mammal".to_string(),
            amount: Some(0.4),
        },
        Step::Decay { ticks: 3 },
        Step::Query {
            by: QueryBy::Incoming,
            target: "Animal".to_string(),
        },
        Step::Describe {
            atom: "Human".to_string(),
        },
    ]);

    Script {
        description: Some("Taxonomy deduction and attention demo".to_string()),
        steps,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_steps() {
        let script = parse_script(
            r#"{"steps": [
                {"op": "add_node", "name": "Cat"},
                {"op": "add_node", "name": "likes", "kind": "Predicate"},
                {"op": "decay"}
            ]}"#,
        )
        .expect("parse");

        assert_eq!(script.steps.len(), 3);
        assert_eq!(
            script.steps[0],
            Step::AddNode {
                name: "Cat".to_string(),
                kind: NodeType::Concept
            }
        );
        assert_eq!(script.steps[2], Step::Decay { ticks: 1 });
    }

    #[test]
    fn decay_ticks_are_capped() {
        let at_limit = format!(r#"{{"steps": [{{"op": "decay", "ticks": {}}}]}}"#, MAX_DECAY_TICKS);
        assert!(parse_script(&at_limit).is_ok());

        let over = format!(r#"{{"steps": [{{"op": "decay", "ticks": {}}}]}}"#, u32::MAX);
        assert!(matches!(parse_script(&over), Err(CliError::Script(_))));

        let script = Script {
            description: None,
            steps: vec![
                node("A"),
                Step::Decay {
                    ticks: MAX_DECAY_TICKS + 1,
                },
            ],
        };
        let mut runner = ScriptRunner::new(EngineConfig::default()).expect("runner");
        assert!(matches!(runner.run(&script), Err(CliError::Script(_))));
        assert!(runner.space().table().is_empty());
    }

    #[test]
    fn unknown_op_rejected() {
        let result = parse_script(r#"{"steps": [{"op": "teleport"}]}"#);
        assert!(matches!(result, Err(CliError::Script(_))));
    }

    #[test]
    fn references_resolve_by_binding_id_and_name() {
        let mut runner = ScriptRunner::new(EngineConfig::default()).expect("runner");
        let script = Script {
            description: None,
            steps: vec![node("A"), node("B"), inherit("A", "B", 0.9, 0.9)],
        };
        runner.run(&script).expect("run");

        assert_eq!(runner.resolve("A").expect("A"), AtomId(1));
        assert_eq!(runner.resolve("#2").expect("#2"), AtomId(2));
        assert_eq!(runner.resolve("A->B").expect("label"), AtomId(3));
        assert_eq!(runner.resolve("Link_3").expect("generated name"), AtomId(3));
        assert!(runner.resolve("#99").is_err());
        assert!(runner.resolve("#x").is_err());
        assert!(runner.resolve("Nobody").is_err());
    }

    #[test]
    fn deleted_binding_no_longer_resolves() {
        let mut runner = ScriptRunner::new(EngineConfig::default()).expect("runner");
        let script = Script {
            description: None,
            steps: vec![
                node("A"),
                Step::Delete {
                    atom: "A".to_string(),
                },
            ],
        };
        runner.run(&script).expect("run");
        assert!(runner.resolve("A").is_err());
    }

    #[test]
    fn failing_step_stops_the_run() {
        let script = Script {
            description: None,
            steps: vec![
                node("A"),
                Step::SetTruth {
                    atom: "Missing".to_string(),
                    strength: 0.5,
                    confidence: 0.5,
                },
                node("B"),
            ],
        };
        let mut runner = ScriptRunner::new(EngineConfig::default()).expect("runner");
        assert!(runner.run(&script).is_err());
        assert_eq!(runner.space().table().len(), 1);
    }

    #[test]
    fn demo_derives_links() {
        let report = run_script(EngineConfig::default(), &demo_script()).expect("demo");

        let derived: Vec<bool> = report
            .outcomes
            .iter()
            .filter(|o| o.op.starts_with("infer_"))
            .map(|o| o.result["derived"].as_bool().unwrap_or(false))
            .collect();
        assert_eq!(derived, vec![true, true, false]);
        assert_eq!(report.stats.successful_inferences, 2);
        assert_eq!(report.stats.total_inferences, 3);
        assert_eq!(report.stats.count_of(LinkType::Similarity), 0);

        let similarity = report
            .outcomes
            .iter()
            .find(|o| o.op == "similarity")
            .and_then(|o| o.result["similarity"].as_f64())
            .unwrap_or(0.0);
        assert!(similarity > 0.9);
    }

    #[test]
    fn query_by_type_uses_canonical_names() {
        let script = parse_script(
            r#"{"steps": [
                {"op": "add_node", "name": "A"},
                {"op": "add_node", "name": "B"},
                {"op": "add_link", "kind": "Member", "members": ["A", "B"]},
                {"op": "query", "by": "type", "target": "MemberLink"}
            ]}"#,
        )
        .expect("parse");
        let report = run_script(EngineConfig::default(), &script).expect("run");
        assert_eq!(report.outcomes[3].result["ids"], json!([3]));

        let bad = parse_script(
            r#"{"steps": [{"op": "query", "by": "type", "target": "Widget"}]}"#,
        )
        .expect("parse");
        assert!(run_script(EngineConfig::default(), &bad).is_err());
    }
}
