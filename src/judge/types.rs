//! Request/result types and the raw judge wire envelope.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};

use super::JudgeError;

/// Judge0 status ids 1 (In Queue) and 2 (Processing) are the only
/// non-terminal states; everything else ends the poll loop.
pub fn is_pending(status_id: i32) -> bool {
    status_id == 1 || status_id == 2
}

/// Sentinel status id for the synthesized polling-timeout result.
pub const STATUS_POLL_TIMEOUT: i32 = -1;

#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub source_code: String,
    pub language: String,
    pub stdin: Option<String>,
}

/// Normalized terminal outcome of one execution, decoded from the judge
/// response or synthesized when the poll budget runs out.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub token: String,
    pub status: String,
    pub status_id: i32,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    pub exit_code: Option<i32>,
    /// Wall-clock seconds reported by the judge.
    pub time: Option<f64>,
    /// Peak memory in kilobytes reported by the judge.
    pub memory: Option<f64>,
}

impl ExecutionResult {
    pub fn polling_timeout(token: String) -> Self {
        Self {
            token,
            status: "Time Limit Exceeded (polling timeout)".to_string(),
            status_id: STATUS_POLL_TIMEOUT,
            stdout: None,
            stderr: Some("Execution timed out.".to_string()),
            compile_output: None,
            exit_code: None,
            time: None,
            memory: None,
        }
    }

    pub fn accepted(&self) -> bool {
        self.status_id == 3
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusInfo {
    pub id: i32,
    pub description: Option<String>,
    pub name: Option<String>,
}

/// Raw submission envelope as the judge sends it. Every field is optional:
/// the `fields` allow-list and judge version decide what actually arrives.
#[derive(Debug, Deserialize)]
pub struct RawSubmission {
    pub token: Option<String>,
    pub status: Option<StatusInfo>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    pub exit_code: Option<i32>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub time: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub memory: Option<f64>,
}

impl RawSubmission {
    /// True while the judge still reports a queued/running status. An absent
    /// status object counts as terminal, matching the wire contract where
    /// terminal fields may arrive without a status block.
    pub fn pending(&self) -> bool {
        self.status.as_ref().is_some_and(|s| is_pending(s.id))
    }

    /// Decode the base64 payload fields and flatten the status block into an
    /// [`ExecutionResult`]. Each field decodes independently; absent fields
    /// stay `None`.
    pub fn into_result(self, token: String) -> Result<ExecutionResult, JudgeError> {
        let (status, status_id) = match self.status {
            Some(s) => (
                s.description
                    .or(s.name)
                    .unwrap_or_else(|| "Unknown".to_string()),
                s.id,
            ),
            None => ("Unknown".to_string(), 0),
        };
        Ok(ExecutionResult {
            token,
            status,
            status_id,
            stdout: decode_field(self.stdout, "stdout")?,
            stderr: decode_field(self.stderr, "stderr")?,
            compile_output: decode_field(self.compile_output, "compile_output")?,
            exit_code: self.exit_code,
            time: self.time,
            memory: self.memory,
        })
    }
}

fn decode_field(value: Option<String>, field: &str) -> Result<Option<String>, JudgeError> {
    match value {
        None => Ok(None),
        Some(encoded) => {
            // Judge0 wraps long payloads with newlines; the decoder rejects them.
            let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = BASE64.decode(compact).map_err(|e| {
                JudgeError::MalformedResponse(format!("invalid base64 in {field}: {e}"))
            })?;
            Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
        }
    }
}

// Judge0 serializes `time` as a decimal string ("0.002"); some deployments
// send plain numbers. Accept both, plus null.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawSubmission {
        serde_json::from_value(json).expect("envelope should deserialize")
    }

    #[test]
    fn base64_fields_round_trip() {
        let payload = "hello\nworld\n";
        let sub = raw(serde_json::json!({
            "status": { "id": 3, "description": "Accepted" },
            "stdout": BASE64.encode(payload),
        }));
        let res = sub.into_result("t".into()).unwrap();
        assert_eq!(res.stdout.as_deref(), Some(payload));
        assert_eq!(res.status, "Accepted");
        assert_eq!(res.status_id, 3);
    }

    #[test]
    fn absent_fields_decode_to_none() {
        let sub = raw(serde_json::json!({
            "status": { "id": 3, "description": "Accepted" },
            "stdout": null,
        }));
        let res = sub.into_result("t".into()).unwrap();
        assert_eq!(res.stdout, None);
        assert_eq!(res.stderr, None);
        assert_eq!(res.compile_output, None);
        assert_eq!(res.exit_code, None);
    }

    #[test]
    fn invalid_base64_is_a_malformed_response() {
        let sub = raw(serde_json::json!({
            "status": { "id": 6, "description": "Compilation Error" },
            "compile_output": "!!! not base64 !!!",
        }));
        let err = sub.into_result("t".into()).unwrap_err();
        assert!(err.to_string().contains("compile_output"));
    }

    #[test]
    fn status_label_falls_back_to_name_then_unknown() {
        let sub = raw(serde_json::json!({ "status": { "id": 4, "name": "Wrong Answer" } }));
        assert_eq!(sub.into_result("t".into()).unwrap().status, "Wrong Answer");

        let sub = raw(serde_json::json!({ "status": { "id": 4 } }));
        assert_eq!(sub.into_result("t".into()).unwrap().status, "Unknown");

        let sub = raw(serde_json::json!({ "stdout": null }));
        let res = sub.into_result("t".into()).unwrap();
        assert_eq!(res.status, "Unknown");
        assert_eq!(res.status_id, 0);
    }

    #[test]
    fn time_accepts_string_and_number() {
        let sub = raw(serde_json::json!({ "time": "0.002", "memory": 3456 }));
        assert_eq!(sub.time, Some(0.002));
        assert_eq!(sub.memory, Some(3456.0));

        let sub = raw(serde_json::json!({ "time": 1.5, "memory": null }));
        assert_eq!(sub.time, Some(1.5));
        assert_eq!(sub.memory, None);
    }

    #[test]
    fn pending_only_for_queue_and_processing() {
        assert!(raw(serde_json::json!({ "status": { "id": 1 } })).pending());
        assert!(raw(serde_json::json!({ "status": { "id": 2 } })).pending());
        assert!(!raw(serde_json::json!({ "status": { "id": 3 } })).pending());
        assert!(!raw(serde_json::json!({ "status": { "id": 13 } })).pending());
        assert!(!raw(serde_json::json!({ "stdout": null })).pending());
    }

    #[test]
    fn polling_timeout_result_shape() {
        let res = ExecutionResult::polling_timeout("abc".into());
        assert_eq!(res.token, "abc");
        assert_eq!(res.status_id, STATUS_POLL_TIMEOUT);
        assert_eq!(res.status, "Time Limit Exceeded (polling timeout)");
        assert!(res.stderr.is_some());
        assert_eq!(res.stdout, None);
        assert_eq!(res.exit_code, None);
        assert_eq!(res.time, None);
        assert_eq!(res.memory, None);
    }
}
