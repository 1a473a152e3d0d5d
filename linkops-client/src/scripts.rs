//! Script run endpoints

use linkops_core::dto::script_run::{ScriptRunRequest, ScriptRunResponse};
use tracing::debug;

use crate::AgentClient;
use crate::error::Result;

impl AgentClient {
    /// URL of the run endpoint for one (target, script) pair
    pub fn script_run_url(&self, target_id: &str, script_id: &str) -> String {
        format!(
            "{}/api/targets/{}/scripts/{}/run",
            self.base_url, target_id, script_id
        )
    }

    /// Run a script on a target and wait for its outcome
    ///
    /// # Arguments
    /// * `target_id` - The enrolled machine to run on
    /// * `req` - Script id and the flags chosen for it
    ///
    /// # Returns
    /// The gateway's report for the run
    pub async fn run_script(
        &self,
        target_id: &str,
        req: &ScriptRunRequest,
    ) -> Result<ScriptRunResponse> {
        let url = self.script_run_url(target_id, &req.script_id);
        debug!("POST {} (flags: {:?})", url, req.flags);

        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }
}
