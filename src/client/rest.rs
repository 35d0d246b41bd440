// File: ./src/client/rest.rs
//! Batch REST client for a Todoist-style sync endpoint.
//!
//! `submit` only stages an `item_add` command locally; the whole batch goes
//! out in one POST when `commit` runs. Temp ids generated here are valid
//! parent references within the same batch, which is what lets a subtask be
//! staged before the server has ever seen its parent.

use crate::client::sink::{SubmissionRequest, SubmissionSink, SubmissionTarget};
use crate::error::ScheduleError;
use serde_json::json;
use uuid::Uuid;

pub struct RestSink {
    http: reqwest::Client,
    api_url: String,
    token: String,
    commands: Vec<serde_json::Value>,
}

impl RestSink {
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.to_string(),
            token: token.to_string(),
            commands: Vec::new(),
        }
    }

    /// Number of commands staged but not yet committed.
    pub fn staged(&self) -> usize {
        self.commands.len()
    }
}

impl SubmissionSink for RestSink {
    async fn submit(&mut self, request: &SubmissionRequest) -> Result<String, ScheduleError> {
        let temp_id = Uuid::new_v4().to_string();
        let mut args = json!({
            "content": request.name,
            "priority": request.priority,
            "auto_parse_labels": true,
            "due": {
                "string": request.due_string,
                "timezone": request.timezone,
                "is_recurring": false,
                "lang": "en",
            },
        });
        match &request.target {
            SubmissionTarget::Project(project_id) => {
                args["project_id"] = json!(project_id);
            }
            SubmissionTarget::Parent(parent_id) => {
                args["parent_id"] = json!(parent_id);
            }
        }
        if let Some(section_id) = request.section_id {
            args["section_id"] = json!(section_id);
        }

        self.commands.push(json!({
            "type": "item_add",
            "temp_id": temp_id,
            "uuid": Uuid::new_v4().to_string(),
            "args": args,
        }));
        log::debug!("staged '{}' as {}", request.name, temp_id);
        Ok(temp_id)
    }

    async fn commit(&mut self) -> Result<(), ScheduleError> {
        if self.commands.is_empty() {
            log::info!("nothing staged, skipping sync call");
            return Ok(());
        }

        let body = json!({ "commands": self.commands });
        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ScheduleError::Submission(format!("sync request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScheduleError::Submission(format!(
                "sync endpoint returned {status}"
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ScheduleError::Submission(format!("unreadable sync response: {e}")))?;

        // Per-command outcome: the value is the string "ok" or an error object.
        if let Some(sync_status) = payload.get("sync_status").and_then(|v| v.as_object()) {
            for (command_uuid, outcome) in sync_status {
                if outcome.as_str() != Some("ok") {
                    return Err(ScheduleError::Submission(format!(
                        "command {command_uuid} rejected: {outcome}"
                    )));
                }
            }
        }

        let sent = self.commands.len();
        self.commands.clear();
        log::info!("committed {sent} task(s) to the task service");
        Ok(())
    }
}
