//! Checks that an artifact's ABI describes the bytecode it ships with: every function
//! selector must be pushed by the dispatcher and every event topic by its emitter.
use std::{collections::HashSet, fmt};

use ethers::{
    abi::ParamType,
    types::{Selector, H256},
};
use thiserror::Error;

use crate::{artifact::Artifact, bytecode};

#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("{contract}: not found in bytecode: {}", .missing.join(", "))]
    Missing {
        contract: String,
        missing: Vec<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSelector {
    pub signature: String,
    pub selector: Selector,
    pub present: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventTopic {
    pub signature: String,
    pub topic: H256,
    pub present: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorReport {
    pub contract: String,
    pub functions: Vec<FunctionSelector>,
    pub events: Vec<EventTopic>,
}

impl SelectorReport {
    pub fn is_consistent(&self) -> bool {
        self.functions.iter().all(|f| f.present) && self.events.iter().all(|e| e.present)
    }

    /// Signatures of the entries whose selector or topic was not found.
    pub fn missing(&self) -> Vec<String> {
        self.functions
            .iter()
            .filter(|f| !f.present)
            .map(|f| f.signature.clone())
            .chain(
                self.events
                    .iter()
                    .filter(|e| !e.present)
                    .map(|e| e.signature.clone()),
            )
            .collect()
    }
}

impl fmt::Display for SelectorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.contract)?;
        for function in &self.functions {
            writeln!(
                f,
                "  {} 0x{} {}",
                mark(function.present),
                hex::encode(function.selector),
                function.signature
            )?;
        }
        for event in &self.events {
            writeln!(
                f,
                "  {} {:?} {}",
                mark(event.present),
                event.topic,
                event.signature
            )?;
        }
        Ok(())
    }
}

fn mark(present: bool) -> &'static str {
    if present {
        "ok"
    } else {
        "!!"
    }
}

/// `name(type,...)`, the form the selector or topic is hashed from.
fn signature<'a>(name: &str, kinds: impl Iterator<Item = &'a ParamType>) -> String {
    let kinds: Vec<String> = kinds.map(ToString::to_string).collect();
    format!("{name}({})", kinds.join(","))
}

pub fn check(artifact: &Artifact) -> SelectorReport {
    let pushed4: HashSet<Vec<u8>> = bytecode::push_words(&artifact.bytecode, 4).collect();
    let pushed32: HashSet<Vec<u8>> = bytecode::push_words(&artifact.bytecode, 32).collect();

    // `functions()` and `events()` iterate in name order
    let functions = artifact
        .abi
        .functions()
        .map(|function| {
            let selector = function.short_signature();
            FunctionSelector {
                signature: signature(&function.name, function.inputs.iter().map(|p| &p.kind)),
                selector,
                present: pushed4.contains(selector.as_slice()),
            }
        })
        .collect();
    let events = artifact
        .abi
        .events()
        .map(|event| {
            let topic = event.signature();
            EventTopic {
                signature: signature(&event.name, event.inputs.iter().map(|p| &p.kind)),
                topic,
                present: pushed32.contains(topic.as_bytes()),
            }
        })
        .collect();

    SelectorReport {
        contract: artifact.contract_name.clone(),
        functions,
        events,
    }
}

pub fn verify(artifact: &Artifact) -> Result<SelectorReport, SelectorError> {
    let report = check(artifact);
    if report.is_consistent() {
        tracing::debug!(contract = %report.contract, "selectors consistent with bytecode");
        return Ok(report);
    }
    Err(SelectorError::Missing {
        contract: report.contract.clone(),
        missing: report.missing(),
    })
}
