use async_trait::async_trait;

use super::{ActionHandler, ActionServices};
use crate::domain::request::ActionRequest;
use crate::domain::result::ActionResult;
use crate::errors::ActionError;

const HELP_TEXT: &str = "Here's a list of the possible commands:
* list my organizations
* list the networks in the Read Write Sandbox org
* list the admins in my org
* list the devices in the Sandbox 3 network
* total data usage over the last 30 minutes (networks only)
* top apps/sites used in the past 24 hours (networks only)
* block facebook.com";

const HELP_SPEECH: &str = "Here's a list of the possible commands: list my organizations, list the networks \
in the Read Write Sandbox org, list the admins in my org, list the devices in the Sandbox 3 network, total \
data usage over the last 30 minutes, top apps or sites used in the past 24 hours, and block facebook.com. \
Now what would you like to do?";

pub struct Help;

#[async_trait]
impl ActionHandler for Help {
    fn intent(&self) -> &'static str {
        "helpMe"
    }

    async fn handle(
        &self,
        _request: &ActionRequest,
        _services: &ActionServices,
    ) -> Result<ActionResult, ActionError> {
        Ok(ActionResult::new(HELP_TEXT, HELP_SPEECH))
    }
}
