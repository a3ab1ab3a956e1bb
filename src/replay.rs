//! Session replay
//!
//! Drives a [`ModalController`] from a JSON script so the modal contract can
//! be exercised without any rendering code:
//!
//! ```json
//! { "steps": [
//!     { "op": "open", "kind": "schedule-review", "payload": { "date": "2024-12-15" } },
//!     { "op": "submit", "delay_ms": 10, "close_during": true },
//!     { "op": "expect", "open": "none", "busy": false }
//! ] }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::modals::{ModalController, ModalKind, ModalSnapshot, SubmitError};
use crate::trace_info;

/// Value of `expect.open` meaning "nothing open"
const CLOSED: &str = "none";

/// A scripted session
#[derive(Debug, Clone, Deserialize)]
pub struct SessionScript {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<Step>,
}

/// One scripted interaction
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Step {
    /// Open a modal by kind name with an untyped payload
    Open {
        kind: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
    /// Dismiss the active modal
    Close,
    /// Submit the active modal with a simulated action
    Submit {
        /// Simulated latency
        #[serde(default)]
        delay_ms: u64,
        /// Fail with this message instead of succeeding
        #[serde(default)]
        fail: Option<String>,
        /// Try to close the modal while the action is still running
        #[serde(default)]
        close_during: bool,
    },
    /// Check the controller state
    Expect {
        /// Kind expected to be open, or `"none"`
        #[serde(default)]
        open: Option<String>,
        #[serde(default)]
        busy: Option<bool>,
    },
}

impl Step {
    pub const fn op(&self) -> &'static str {
        match self {
            Self::Open { .. } => "open",
            Self::Close => "close",
            Self::Submit { .. } => "submit",
            Self::Expect { .. } => "expect",
        }
    }
}

impl SessionScript {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session script {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid session script {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(content)?;
        if script.steps.is_empty() {
            return Err(anyhow!("Session script has no steps"));
        }
        Ok(script)
    }
}

/// Result of one step
#[derive(Debug, Clone)]
pub struct StepReport {
    pub index: usize,
    pub op: &'static str,
    pub ok: bool,
    pub detail: String,
}

/// Result of a whole replay
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    pub final_state: ModalSnapshot,
}

impl ReplayReport {
    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| !s.ok)
    }

    pub fn passed(&self) -> bool {
        self.steps.iter().all(|s| s.ok)
    }
}

/// Run every step of `script` against `controller`, in order
pub async fn run(controller: &ModalController, script: &SessionScript) -> ReplayReport {
    trace_info!(
        steps = script.steps.len(),
        name = script.name.as_deref().unwrap_or("unnamed"),
        "replaying session script"
    );

    let mut steps = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.iter().enumerate() {
        let (ok, detail) = run_step(controller, step).await;
        steps.push(StepReport {
            index: index + 1,
            op: step.op(),
            ok,
            detail,
        });
    }

    ReplayReport {
        steps,
        final_state: controller.snapshot(),
    }
}

async fn run_step(controller: &ModalController, step: &Step) -> (bool, String) {
    match step {
        Step::Open { kind, payload } => match controller.open_value(kind, payload.clone()) {
            Ok(()) => (true, format!("{kind} is open")),
            Err(err) => (false, err.to_string()),
        },

        Step::Close => {
            controller.close();
            (true, describe(&controller.snapshot()))
        }

        Step::Submit {
            delay_ms,
            fail,
            close_during,
        } => {
            let delay = Duration::from_millis(*delay_ms);
            let failure = fail.clone();
            let action = move || async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                match failure {
                    Some(reason) => Err(anyhow!(reason)),
                    None => Ok(()),
                }
            };

            let (result, held_open) = if *close_during {
                let attempt_close = async {
                    tokio::task::yield_now().await;
                    if controller.is_busy() {
                        let before = controller.active();
                        controller.close();
                        Some(controller.active() == before)
                    } else {
                        None
                    }
                };
                tokio::join!(controller.submit(action), attempt_close)
            } else {
                (controller.submit(action).await, None)
            };

            let close_note = match held_open {
                Some(true) => ", close ignored while busy",
                Some(false) => ", close during submit was not blocked",
                None => "",
            };
            let held_ok = held_open.unwrap_or(true);

            match (result, fail) {
                (Ok(()), None) => (held_ok, format!("submitted{close_note}")),
                (Err(SubmitError::Action(err)), Some(_)) => {
                    (held_ok, format!("failed as scripted: {err}{close_note}"))
                }
                (Ok(()), Some(_)) => (false, "expected failure but submission succeeded".to_string()),
                (Err(err), _) => (false, format!("submission failed: {err}")),
            }
        }

        Step::Expect { open, busy } => check(&controller.snapshot(), open.as_deref(), *busy),
    }
}

fn check(snapshot: &ModalSnapshot, open: Option<&str>, busy: Option<bool>) -> (bool, String) {
    let mut problems = Vec::new();

    if let Some(expected) = open {
        if expected == CLOSED {
            if let Some(active) = snapshot.active {
                problems.push(format!("expected no modal, found {active}"));
            }
        } else {
            match expected.parse::<ModalKind>() {
                Ok(kind) if snapshot.is_open(kind) => {}
                Ok(kind) => problems.push(format!(
                    "expected {kind} open, found {}",
                    snapshot.active.map_or(CLOSED, |k| k.id())
                )),
                Err(err) => problems.push(err.to_string()),
            }
        }
    }

    if let Some(expected) = busy {
        if snapshot.busy != expected {
            problems.push(format!("expected busy={expected}, found busy={}", snapshot.busy));
        }
    }

    if problems.is_empty() {
        (true, describe(snapshot))
    } else {
        (false, problems.join("; "))
    }
}

fn describe(snapshot: &ModalSnapshot) -> String {
    match snapshot.active {
        Some(kind) if snapshot.busy => format!("{kind} open (busy)"),
        Some(kind) => format!("{kind} open"),
        None => "no modal open".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let script = SessionScript::from_json(
            r#"{"steps":[{"op":"open","kind":"new-improvement"},{"op":"close"},
                {"op":"submit","fail":"network"},{"op":"expect","open":"none"}]}"#,
        )
        .expect("valid script");

        assert_eq!(script.steps.len(), 4);
        assert!(matches!(&script.steps[0], Step::Open { payload, .. } if payload.is_null()));
        assert!(matches!(&script.steps[2], Step::Submit { fail: Some(f), .. } if f == "network"));
    }

    #[test]
    fn test_empty_script_rejected() {
        assert!(SessionScript::from_json(r#"{"steps":[]}"#).is_err());
    }

    #[test]
    fn test_unknown_op_rejected() {
        assert!(SessionScript::from_json(r#"{"steps":[{"op":"delete"}]}"#).is_err());
    }
}
